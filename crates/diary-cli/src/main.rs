//! secret-diary CLI - a local notebook encrypted at rest under a master password
//!
//! This is the command-line interface for secret-diary. Key derivation,
//! encryption and storage live in `diary-core`; this crate handles
//! arguments, prompting, configuration and rendering.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;
mod ui;

use std::io::IsTerminal;

use clap::Parser;
use diary_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{init, maintenance, misc, notes};
use crate::errors::classify;
use crate::ui::{color_enabled, print_error, UiContext};

fn main() {
    let cli = Cli::parse();

    let stderr_color = color_enabled(
        std::io::stderr().is_terminal(),
        cli.no_color,
        std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false),
    );
    if let Err(err) = logging::init(cli.verbose, cli.quiet, stderr_color) {
        eprintln!("Warning: {}", err);
    }

    let ctx = AppContext::new(&cli);
    if let Err(err) = run(&ctx, &cli) {
        let failure = classify(&err);
        tracing::debug!(code = failure.code, error = ?err, "command failed");
        let ui_ctx = UiContext::for_stderr(cli.no_color);
        print_error(&ui_ctx, &err.to_string(), failure.hint.as_deref());
        std::process::exit(failure.code);
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init) => init::handle_init(ctx)?,
        Some(Commands::Add(args)) => notes::handle_add(ctx, args)?,
        Some(Commands::List(args)) => notes::handle_list(ctx, args)?,
        Some(Commands::Read(args)) => notes::handle_read(ctx, args)?,
        Some(Commands::Search(args)) => notes::handle_search(ctx, args)?,
        Some(Commands::Export(args)) => notes::handle_export(ctx, args)?,
        Some(Commands::Backup(args)) => maintenance::handle_backup(ctx, args)?,
        Some(Commands::Check) => maintenance::handle_check(ctx)?,
        Some(Commands::Completions(args)) => misc::handle_completions(args)?,
        None => {
            println!("secret-diary v{}", VERSION);
            println!("\nQuickstart:");
            println!("  secret-diary init");
            println!("  secret-diary add --title \"Diary\" --tags personal --body \"Today was fine\"");
            println!("  secret-diary list");
            println!("  secret-diary search fine");
            println!("  secret-diary read <id>");
            println!("\nRun `secret-diary --help` for full usage.");
        }
    }

    Ok(())
}
