use diary_core::NoteHeader;

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::helpers::parse_table_format;
use crate::ui::{
    blank_line, display_timestamp, header, hint, print, table, truncate, OutputMode, UiContext,
};

const TITLE_MAX: usize = 60;

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let format = parse_table_format(args.format.as_deref(), args.json)?;
    let store = ctx.open_store()?;
    let session = ctx.unlock(&store, false)?;

    let mut notes = match args.tag.as_deref() {
        Some(tag) => session.notes_with_tag(&store, tag)?,
        None => session.list_notes(&store)?,
    };
    if let Some(limit) = args.limit {
        notes.truncate(limit);
    }

    let ui_ctx = ctx.ui_context(args.json, format);
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&notes)?);
        return Ok(());
    }

    let filter = args.tag.as_ref().map(|tag| format!("tag: {}", tag));
    if notes.is_empty() {
        if !ctx.quiet() && ui_ctx.mode == OutputMode::Pretty {
            print(&ui_ctx, &header(&ui_ctx, "list", filter.as_deref()));
            blank_line(&ui_ctx);
            let text = if args.tag.is_some() {
                "No notes carry that tag."
            } else {
                "No notes yet. Add one with `secret-diary add --title <TITLE>`."
            };
            print(&ui_ctx, &hint(&ui_ctx, text));
        }
        return Ok(());
    }

    if !ctx.quiet() {
        print(&ui_ctx, &header(&ui_ctx, "list", filter.as_deref()));
        blank_line(&ui_ctx);
    }
    let rows: Vec<Vec<String>> = notes.iter().map(|note| list_row(&ui_ctx, note)).collect();
    print(&ui_ctx, &table(&ui_ctx, &["ID", "Created", "Tags", "Title"], &rows));
    Ok(())
}

fn list_row(ui_ctx: &UiContext, note: &NoteHeader) -> Vec<String> {
    let pretty = ui_ctx.mode.is_pretty();
    let tags = note.tag_list();
    let tags = if tags.is_empty() {
        "-".to_string()
    } else if pretty {
        tags.join(", ")
    } else {
        tags.join(",")
    };
    let title = if pretty {
        truncate(&note.title, TITLE_MAX)
    } else {
        note.title.clone()
    };
    vec![
        note.id.to_string(),
        display_timestamp(&note.created_at, ui_ctx.timezone, pretty),
        tags,
        title,
    ]
}
