//! Note Block World CLI - song thumbnails and inspection
//!
//! This binary renders song thumbnails and prints song notes, statistics and
//! upload summaries.

use clap::Parser;
use std::process::ExitCode;

use nbw_cli::{commands, logger};

mod cli_args;

use cli_args::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.verbose) {
        eprintln!("{}: {}", colored::Colorize::yellow("warning"), e);
    }

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            thumbnail,
            json,
        } => commands::render::run(&input, output.as_deref(), &thumbnail.into(), json),
        Commands::RenderAll {
            input_dir,
            output,
            thumbnail,
            json,
        } => commands::render_all::run(&input_dir, &output, &thumbnail.into(), json),
        Commands::Notes { input, json } => commands::notes::run(&input, json),
        Commands::Stats { input, json } => commands::stats::run(&input, json),
        Commands::Info { input, json } => commands::info::run(&input, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
