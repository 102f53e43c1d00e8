use std::path::Path;

use crate::app::AppContext;
use crate::cli::BackupArgs;
use crate::errors::CliError;
use crate::ui::progress::Spinner;
use crate::ui::theme::{styled, styles};
use crate::ui::{blank_line, format_bytes, hint, print, OutputMode};

pub fn handle_backup(ctx: &AppContext, args: &BackupArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let destination = Path::new(&args.destination);
    if destination == store.path() {
        return Err(
            CliError::invalid_input("Backup destination is the notebook database itself").into(),
        );
    }

    let ui_ctx = ctx.ui_context(false, None);
    let spinner = if ui_ctx.mode.is_pretty() && !ctx.quiet() {
        Some(Spinner::start(&ui_ctx, "Backing up"))
    } else {
        None
    };

    let bytes = match store.backup_to(destination) {
        Ok(bytes) => bytes,
        Err(err) => {
            if let Some(s) = spinner {
                s.finish_err("Backup failed");
            }
            return Err(err.into());
        }
    };

    if let Some(s) = spinner {
        s.finish("Backup complete");
    }

    if !ctx.quiet() {
        match ui_ctx.mode {
            OutputMode::Pretty => {
                let context = format!(
                    "Path: {}  \u{00B7}  Size: {}",
                    args.destination,
                    format_bytes(bytes)
                );
                println!("{}", styled(&context, styles::dim(), ui_ctx.color));
                blank_line(&ui_ctx);
                print(
                    &ui_ctx,
                    &hint(
                        &ui_ctx,
                        "The backup opens with the same password: secret-diary --store <DIR> check",
                    ),
                );
            }
            OutputMode::Plain | OutputMode::Json => {
                println!("status=ok");
                println!("destination={}", args.destination);
                println!("bytes={}", bytes);
            }
        }
    }
    Ok(())
}
