use crate::app::AppContext;
use crate::cli::ReadArgs;
use crate::helpers::parse_note_id;
use crate::ui::{blank_line, display_timestamp, header, kv, print, OutputMode};

pub fn handle_read(ctx: &AppContext, args: &ReadArgs) -> anyhow::Result<()> {
    let id = parse_note_id(&args.id)?;
    let store = ctx.open_store()?;
    let session = ctx.unlock(&store, false)?;
    let note = session.read_note(&store, id)?;

    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&note)?);
        return Ok(());
    }

    let tags = note.tag_list();
    match ui_ctx.mode {
        OutputMode::Pretty => {
            if !ctx.quiet() {
                print(&ui_ctx, &header(&ui_ctx, "read", None));
                blank_line(&ui_ctx);
                print(&ui_ctx, &kv(&ui_ctx, "ID", &note.id.to_string()));
                print(&ui_ctx, &kv(&ui_ctx, "Title", &note.title));
                print(
                    &ui_ctx,
                    &kv(
                        &ui_ctx,
                        "Created",
                        &display_timestamp(&note.created_at, ui_ctx.timezone, true),
                    ),
                );
                if !tags.is_empty() {
                    print(&ui_ctx, &kv(&ui_ctx, "Tags", &tags.join(", ")));
                }
                blank_line(&ui_ctx);
            }
            println!("{}", note.body);
        }
        OutputMode::Plain | OutputMode::Json => {
            if !ctx.quiet() {
                println!("id={}", note.id);
                println!("title={}", note.title);
                println!("created_at={}", note.created_at);
                println!("tags={}", tags.join(","));
                println!();
            }
            println!("{}", note.body);
        }
    }
    Ok(())
}
