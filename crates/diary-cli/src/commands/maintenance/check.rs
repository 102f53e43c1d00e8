use diary_core::{DiaryError, NoteStore};

use crate::app::AppContext;
use crate::errors::CliError;
use crate::ui::{badge, kv, print, Badge, OutputMode};

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let ui_ctx = ctx.ui_context(false, None);

    match store.check_integrity() {
        Ok(()) => {}
        Err(DiaryError::Integrity(detail)) => {
            report_failure(ctx, "store", &detail);
            return Err(CliError::IntegrityFailed(detail).into());
        }
        Err(err) => return Err(err.into()),
    }

    let session = ctx.unlock(&store, false)?;
    let checked = match session.verify_all(&store) {
        Ok(count) => count,
        Err(DiaryError::Decryption) => {
            let detail = "A note failed to decrypt with the notebook key".to_string();
            report_failure(ctx, "notes", &detail);
            return Err(CliError::IntegrityFailed(detail).into());
        }
        Err(err) => return Err(err.into()),
    };

    if !ctx.quiet() {
        match ui_ctx.mode {
            OutputMode::Pretty => {
                print(
                    &ui_ctx,
                    &badge(&ui_ctx, Badge::Info, &store.path().display().to_string()),
                );
                print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "Store integrity"));
                print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "Salt"));
                print(
                    &ui_ctx,
                    &badge(&ui_ctx, Badge::Ok, &format!("{} note(s) decrypted", checked)),
                );
                println!();
                print(&ui_ctx, &kv(&ui_ctx, "Status", "All checks passed"));
            }
            OutputMode::Plain | OutputMode::Json => {
                println!("check=store ok");
                println!("check=salt ok");
                println!("check=notes ok");
                println!("notes={}", checked);
                println!("status=ok");
            }
        }
    }
    Ok(())
}

fn report_failure(ctx: &AppContext, stage: &str, detail: &str) {
    tracing::warn!(stage, detail, "integrity check failed");
    if ctx.quiet() {
        return;
    }
    let ui_ctx = ctx.ui_context(false, None);
    match ui_ctx.mode {
        OutputMode::Pretty => {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Err, &format!("Check failed: {}", stage)));
        }
        OutputMode::Plain | OutputMode::Json => {
            println!("check={} failed", stage);
            println!("status=failed");
        }
    }
}
