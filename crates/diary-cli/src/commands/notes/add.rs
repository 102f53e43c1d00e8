use diary_core::NoteDraft;

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::errors::CliError;
use crate::helpers::{normalize_tags, read_note_body};
use crate::ui::{badge, kv, print, Badge, OutputMode};

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    if args.title.trim().is_empty() {
        return Err(CliError::invalid_input("--title cannot be empty").into());
    }

    let store = ctx.open_store()?;
    // Unlock before composing so a wrong password does not cost an editor session.
    let session = ctx.unlock(&store, args.no_input)?;
    let body = read_note_body(args.no_input, args.body.clone(), ctx.editor()?)?;

    let draft = NoteDraft {
        title: args.title.clone(),
        tags: normalize_tags(&args.tags),
        body: body.as_str().to_owned(),
    };
    let id = session.add_note(&store, &draft)?;

    if ctx.quiet() {
        return Ok(());
    }
    let ui_ctx = ctx.ui_context(false, None);
    match ui_ctx.mode {
        OutputMode::Pretty => {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "Note added"));
            print(&ui_ctx, &kv(&ui_ctx, "ID", &id.to_string()));
        }
        OutputMode::Plain | OutputMode::Json => {
            println!("id={}", id);
        }
    }
    Ok(())
}
