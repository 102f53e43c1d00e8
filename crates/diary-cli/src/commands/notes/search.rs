use diary_core::SearchHit;

use crate::app::AppContext;
use crate::cli::SearchArgs;
use crate::helpers::parse_table_format;
use crate::output::{hit_rows, matched_fields};
use crate::ui::theme::{styled, styles};
use crate::ui::{
    blank_line, header, highlight_matches, hint, print, table, truncate, OutputMode, UiContext,
};

const TITLE_MAX: usize = 60;

pub fn handle_search(ctx: &AppContext, args: &SearchArgs) -> anyhow::Result<()> {
    let format = parse_table_format(args.format.as_deref(), args.json)?;
    let store = ctx.open_store()?;
    let session = ctx.unlock(&store, false)?;

    let mut hits = session.search(&store, &args.query)?;
    if let Some(limit) = args.limit {
        hits.truncate(limit);
    }

    let ui_ctx = ctx.ui_context(args.json, format);
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&hit_rows(&hits))?);
        return Ok(());
    }

    let context = format!("\"{}\"", args.query);
    if !ctx.quiet() {
        print(&ui_ctx, &header(&ui_ctx, "search", Some(&context)));
        blank_line(&ui_ctx);
    }

    if hits.is_empty() {
        if !ctx.quiet() && ui_ctx.mode == OutputMode::Pretty {
            print(
                &ui_ctx,
                &hint(&ui_ctx, "No notes match. Matching is case-insensitive on titles and bodies."),
            );
        }
        return Ok(());
    }

    match ui_ctx.mode {
        // Highlighted titles carry escape codes, so pretty output is a
        // padded list rather than a table.
        OutputMode::Pretty if ui_ctx.color => {
            for hit in &hits {
                println!("{}", pretty_line(&ui_ctx, hit, &args.query));
            }
        }
        _ => {
            let rows: Vec<Vec<String>> = hits.iter().map(|hit| plain_row(&ui_ctx, hit)).collect();
            print(&ui_ctx, &table(&ui_ctx, &["ID", "Matched", "Title"], &rows));
        }
    }
    Ok(())
}

fn pretty_line(ui_ctx: &UiContext, hit: &SearchHit, query: &str) -> String {
    let title = truncate(&hit.title, TITLE_MAX);
    format!(
        "{:>5}  {}  {}",
        hit.id.to_string(),
        highlight_matches(&title, query, ui_ctx.color),
        styled(
            &format!("({})", matched_fields(hit).join(", ")),
            styles::dim(),
            ui_ctx.color
        )
    )
}

fn plain_row(ui_ctx: &UiContext, hit: &SearchHit) -> Vec<String> {
    let title = if ui_ctx.mode.is_pretty() {
        truncate(&hit.title, TITLE_MAX)
    } else {
        hit.title.clone()
    };
    vec![hit.id.to_string(), matched_fields(hit).join(","), title]
}
