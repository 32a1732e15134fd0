//! CLI command implementations.
//!
//! Every command returns `Result<(), String>`; library errors are rendered
//! with `format!` at this boundary.

pub mod annotate;
pub mod parse;
pub mod types;
pub mod unannotate;

pub use annotate::AnnotateArgs;
pub use parse::ParseArgs;
pub use types::TypesArgs;
pub use unannotate::UnannotateArgs;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::backends::{build_recognizer, BuiltinModelLoader};
use crate::resolver::PatternResolver;
use crate::{AnnotatorConfig, Annotator, BraceMarkup, FsExampleStore, Recognizer};

/// Application location, shared by every command
#[derive(Args, Debug, Clone)]
pub struct AppArgs {
    /// Application directory (contains `domains/`)
    #[arg(long, default_value = ".", value_name = "PATH")]
    pub app: PathBuf,

    /// Config file (default: <app>/annotator.toml, if present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl AppArgs {
    /// Load the run configuration.
    pub fn load_config(&self) -> Result<AnnotatorConfig, String> {
        match &self.config {
            Some(path) => AnnotatorConfig::load(path)
                .map_err(|e| format!("Failed to load config {}: {}", path.display(), e)),
            None => AnnotatorConfig::load_for_app(&self.app)
                .map_err(|e| format!("Failed to load config from {}: {}", self.app.display(), e)),
        }
    }
}

/// Build the configured recognizer with the built-in model and resolver.
pub fn open_recognizer(config: &AnnotatorConfig) -> Result<Box<dyn Recognizer>, String> {
    build_recognizer(
        config,
        &BuiltinModelLoader,
        Arc::new(PatternResolver::new()),
        None,
    )
    .map_err(|e| format!("Failed to create {}: {}", config.annotator_class, e))
}

/// Recognizer plus on-disk store and brace markup for `app`.
pub fn open_annotator(app: &AppArgs, config: &AnnotatorConfig) -> Result<Annotator, String> {
    let recognizer = open_recognizer(config)?;
    Ok(Annotator::new(
        recognizer,
        Box::new(FsExampleStore::new(&app.app)),
        Box::new(BraceMarkup),
    ))
}
