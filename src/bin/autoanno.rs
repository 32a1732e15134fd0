//! autoanno - entity auto-annotation CLI
//!
//! Adds and removes entity annotations in an application's marked-up
//! training queries.
//!
//! # Usage
//!
//! ```bash
//! # Annotate everything the [[annotate]] rules select
//! autoanno annotate --app my_app
//!
//! # Strip every annotation
//! autoanno unannotate --app my_app --all
//!
//! # Try the recognizer on one sentence
//! autoanno parse "set an alarm for 7 am tomorrow" --format markup
//! ```
//!
//! Logging goes to stderr at `info`; set `RUST_LOG` to change it.

use std::process::ExitCode;

use clap::Parser;

use autoanno::cli::commands::annotate::cmd_annotate;
use autoanno::cli::commands::parse::cmd_parse;
use autoanno::cli::commands::types::cmd_types;
use autoanno::cli::commands::unannotate::cmd_unannotate;
use autoanno::cli::{Cli, Commands};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result: Result<(), String> = match cli.command {
        Commands::Annotate(args) => cmd_annotate(args),
        Commands::Unannotate(args) => cmd_unannotate(args),
        Commands::Parse(args) => cmd_parse(args),
        Commands::Types(args) => cmd_types(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
