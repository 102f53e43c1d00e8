use diary_core::{InitOutcome, NoteStore};

use crate::app::{resolve_config_path, AppContext};
use crate::config::{write_config, DiaryConfig};
use crate::ui::{badge, blank_line, hint, kv, print, Badge, OutputMode};

pub fn handle_init(ctx: &AppContext) -> anyhow::Result<()> {
    let store_dir = ctx.store_dir()?;
    let store = ctx.create_store()?;
    let outcome = store.initialize()?;
    let existing_notes = match outcome {
        InitOutcome::Created => None,
        InitOutcome::AlreadyInitialized => Some(store.note_count()?),
    };

    let config_path = resolve_config_path()?;
    let config_written = if config_path.exists() {
        false
    } else {
        write_config(&config_path, &DiaryConfig::new(&store_dir))?;
        tracing::info!(path = %config_path.display(), "wrote config");
        true
    };

    if ctx.quiet() {
        return Ok(());
    }

    let ui_ctx = ctx.ui_context(false, None);
    let store_path = store.path().display().to_string();
    match ui_ctx.mode {
        OutputMode::Pretty => {
            let line = match outcome {
                InitOutcome::Created => badge(&ui_ctx, Badge::Ok, "Initialized"),
                InitOutcome::AlreadyInitialized => {
                    badge(&ui_ctx, Badge::Warn, "Already initialized")
                }
            };
            print(&ui_ctx, &line);
            print(&ui_ctx, &kv(&ui_ctx, "Store", &store_path));
            if let Some(count) = existing_notes {
                print(&ui_ctx, &kv(&ui_ctx, "Notes", &count.to_string()));
            }
            if config_written {
                print(
                    &ui_ctx,
                    &kv(&ui_ctx, "Config", &config_path.display().to_string()),
                );
            }
            blank_line(&ui_ctx);
            print(
                &ui_ctx,
                &hint(&ui_ctx, "secret-diary add --title \"First note\""),
            );
        }
        OutputMode::Plain | OutputMode::Json => {
            let status = match outcome {
                InitOutcome::Created => "initialized",
                InitOutcome::AlreadyInitialized => "already_initialized",
            };
            println!("status={}", status);
            println!("store={}", store_path);
            if let Some(count) = existing_notes {
                println!("notes={}", count);
            }
            if config_written {
                println!("config={}", config_path.display());
            }
        }
    }
    Ok(())
}
