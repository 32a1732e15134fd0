//! CLI argument parsing and structure definitions

use clap::{Parser, Subcommand, ValueEnum};

/// Entity auto-annotation for NLU training data
#[derive(Parser)]
#[command(name = "autoanno")]
#[command(
    author,
    version,
    about = "Entity auto-annotation for NLU training data",
    long_about = r#"
autoanno - add and remove entity annotations in marked-up training queries

Training data lives in <app>/domains/<domain>/<intent>/*.txt, one query per
line, entities written as {text|type} or {text|type|role}. Which files get
which entity types is decided by the [[annotate]] and [[unannotate]] rules in
<app>/annotator.toml.

EXAMPLES:
  autoanno annotate --app my_app
  autoanno annotate --app my_app --overwrite
  autoanno unannotate --app my_app --all
  autoanno parse "set an alarm for 7 am tomorrow"
  autoanno types --app my_app
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// autoanno subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Annotate the files selected by the annotate rules
    #[command(visible_alias = "a")]
    Annotate(crate::cli::commands::AnnotateArgs),

    /// Remove annotations from the files selected by the unannotate rules
    #[command(visible_alias = "u")]
    Unannotate(crate::cli::commands::UnannotateArgs),

    /// Recognize entities in a single sentence
    #[command(visible_alias = "p")]
    Parse(crate::cli::commands::ParseArgs),

    /// List the entity types the configured recognizer supports
    #[command(visible_alias = "t")]
    Types(crate::cli::commands::TypesArgs),
}

/// Output format for `parse`
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON array of entity records (default)
    #[default]
    Json,
    /// The sentence with inline `{text|type}` markup
    Markup,
}
