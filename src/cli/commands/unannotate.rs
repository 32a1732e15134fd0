//! Unannotate command

use clap::Parser;

use super::super::output::{format_report, log_info};
use super::{open_annotator, AppArgs};
use crate::UnannotateOptions;

/// Remove annotations from the files selected by the unannotate rules
#[derive(Parser, Debug)]
pub struct UnannotateArgs {
    #[command(flatten)]
    pub app: AppArgs,

    /// Remove every annotation from every file, ignoring the rules
    #[arg(long)]
    pub all: bool,

    /// Wildcard rules only remove types the recognizer supports
    #[arg(long, conflicts_with = "remove_all_types")]
    pub supported_only: bool,

    /// Wildcard rules remove every type
    #[arg(long)]
    pub remove_all_types: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl UnannotateArgs {
    fn options(&self, mut options: UnannotateOptions) -> UnannotateOptions {
        if self.supported_only {
            options = options.with_supported_only(true);
        } else if self.remove_all_types {
            options = options.with_supported_only(false);
        }
        options.unannotate_all |= self.all;
        options
    }
}

/// Run `autoanno unannotate`.
pub fn cmd_unannotate(args: UnannotateArgs) -> Result<(), String> {
    let config = args.app.load_config()?;
    let annotator = open_annotator(&args.app, &config)?;
    let options = args.options(config.unannotate_options());

    let report = annotator
        .unannotate(&options)
        .map_err(|e| format!("Unannotation failed: {}", e))?;
    log_info(&format_report("Unannotated", &report), args.quiet);
    Ok(())
}
