//! Annotate command

use clap::Parser;

use super::super::output::{format_report, log_info};
use super::{open_annotator, AppArgs};

/// Annotate the files selected by the annotate rules
#[derive(Parser, Debug)]
pub struct AnnotateArgs {
    #[command(flatten)]
    pub app: AppArgs,

    /// Replace existing annotations that overlap new ones
    #[arg(long)]
    pub overwrite: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Run `autoanno annotate`.
pub fn cmd_annotate(args: AnnotateArgs) -> Result<(), String> {
    let config = args.app.load_config()?;
    let annotator = open_annotator(&args.app, &config)?;

    let mut options = config.annotate_options();
    if args.overwrite {
        options = options.with_overwrite(true);
    }

    let report = annotator
        .annotate(&options)
        .map_err(|e| format!("Annotation failed: {}", e))?;
    log_info(&format_report("Annotated", &report), args.quiet);
    Ok(())
}
