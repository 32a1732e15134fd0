//! # autoanno
//!
//! Multi-source entity auto-annotation for NLU training data.
//!
//! Training examples live in plain-text files under
//! `<app>/domains/<domain>/<intent>/*.txt`, one marked-up query per line:
//!
//! ```text
//! set an alarm for {7 am|sys_time} {tomorrow|sys_time}
//! ```
//!
//! `autoanno` selects files with path rules, runs one or more recognizers
//! over every query, reconciles their outputs into a single non-overlapping
//! entity list, and merges that list into (or removes entities from) the
//! existing markup.
//!
//! ## Recognizers
//!
//! | Recognizer | Source of entities |
//! |------------|--------------------|
//! | [`ModelRecognizer`] | NER model + per-type value resolution heuristics |
//! | [`RuleRecognizer`] | rule-based resolver over the whole sentence |
//! | [`TranslationBridgeRecognizer`] | English pipeline over a translation, aligned back |
//! | [`CompositeRecognizer`] | model output, gaps filled by rules or the bridge |
//! | [`BootstrapRecognizer`] | the application's own trained NLU pipeline |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use autoanno::{AnnotatorConfig, Annotator, BraceMarkup, FsExampleStore};
//! use autoanno::backends::{build_recognizer, BuiltinModelLoader};
//! use autoanno::resolver::PatternResolver;
//! use std::sync::Arc;
//!
//! let app = std::path::Path::new("my_app");
//! let config = AnnotatorConfig::load_for_app(app)?;
//! let recognizer = build_recognizer(&config, &BuiltinModelLoader, Arc::new(PatternResolver::new()), None)?;
//! let annotator = Annotator::new(recognizer, Box::new(FsExampleStore::new(app)), Box::new(BraceMarkup));
//! let report = annotator.annotate(&config.annotate_options())?;
//! println!("{} files updated", report.files_processed);
//! # Ok::<(), autoanno::Error>(())
//! ```

#![warn(missing_docs)]

pub mod backends;
pub mod config;
pub mod conflict;
pub mod driver;
mod entity;
mod error;
pub mod lang;
pub mod markup;
pub mod offset;
pub mod resolver;
pub mod rules;
pub mod schema;
pub mod span;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

// =============================================================================
// Sealed Trait Pattern
// =============================================================================
//
// Recognizer is sealed: the driver and the rule engine rely on recognizers
// returning finalized, span-consistent records, so only the variants defined
// here implement it. Collaborators (models, resolvers, translators, NLU
// pipelines) are open traits and plug into these variants instead.

mod sealed {
    /// Sealed trait marker. Cannot be implemented outside this crate.
    pub trait Sealed {}

    impl Sealed for super::ModelRecognizer {}
    impl Sealed for super::RuleRecognizer {}
    impl Sealed for super::TranslationBridgeRecognizer {}
    impl Sealed for super::CompositeRecognizer {}
    impl Sealed for super::BootstrapRecognizer {}
    impl Sealed for super::MockRecognizer {}
}

pub use backends::{
    BootstrapRecognizer, CompositeRecognizer, ModelRecognizer, RuleRecognizer,
    TranslationBridgeRecognizer,
};
pub use config::{AnnotateOptions, AnnotatorConfig, UnannotateOptions};
pub use driver::{AnnotationReport, Annotator};
pub use entity::{is_system_entity, EntityDraft, EntityRecord};
pub use error::{Error, Result};
pub use lang::LanguageConfig;
pub use markup::{BraceMarkup, MarkupCodec, ProcessedExample};
pub use rules::{AnnotationRule, EntitySelection, FileEntityMap, RuleEngine};
pub use span::Span;
pub use store::{ExampleStore, FsExampleStore};

use std::collections::BTreeSet;

/// Where a sentence comes from. Only the bootstrap recognizer needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseContext {
    /// Domain directory of the example.
    pub domain: String,
    /// Intent directory of the example.
    pub intent: String,
}

impl ParseContext {
    /// Create a context.
    #[must_use]
    pub fn new(domain: impl Into<String>, intent: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            intent: intent.into(),
        }
    }
}

/// An entity recognizer.
///
/// # Sealed Trait
///
/// This trait is **sealed**. New entity sources plug in through the
/// collaborator traits instead: [`backends::NerModel`],
/// [`resolver::SystemEntityResolver`], [`backends::Translator`] and
/// [`backends::NluProcessor`].
///
/// # For Testing
///
/// Use [`MockRecognizer`] for canned output.
pub trait Recognizer: sealed::Sealed + Send + Sync {
    /// Recognize entities in `sentence`.
    ///
    /// `entity_types = None` returns every type the recognizer can resolve;
    /// `Some(types)` restricts both resolution and the output.
    fn parse(
        &self,
        sentence: &str,
        entity_types: Option<&[String]>,
        context: Option<&ParseContext>,
    ) -> Result<Vec<EntityRecord>>;

    /// Canonical entity types this recognizer can produce.
    ///
    /// Computed once and cached for the recognizer's lifetime.
    fn supported_entity_types(&self) -> &BTreeSet<String>;

    /// Case- and whitespace-insensitive membership test against
    /// [`Recognizer::supported_entity_types`].
    fn is_valid_entity(&self, entity_type: &str) -> bool {
        let normalized = entity_type.trim().to_lowercase();
        self.supported_entity_types().contains(&normalized)
    }

    /// Recognizer name for logging.
    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// A recognizer returning canned entities.
///
/// ```rust
/// use autoanno::{MockRecognizer, EntityRecord, Recognizer, Span};
/// use serde_json::json;
///
/// let mock = MockRecognizer::new("test-mock")
///     .with_entities(vec![
///         EntityRecord::new("7 am", Span::new(14, 17), "sys_time", json!({"value": "07:00"})),
///     ])
///     .with_types(["sys_time"]);
///
/// assert!(mock.is_valid_entity(" SYS_TIME "));
/// ```
#[derive(Debug, Clone)]
pub struct MockRecognizer {
    name: &'static str,
    entities: Vec<EntityRecord>,
    types: BTreeSet<String>,
}

impl MockRecognizer {
    /// Create a new mock recognizer.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entities: Vec::new(),
            types: BTreeSet::new(),
        }
    }

    /// Set entities to return from every parse.
    #[must_use]
    pub fn with_entities(mut self, entities: Vec<EntityRecord>) -> Self {
        self.entities = entities;
        self
    }

    /// Set supported entity types.
    #[must_use]
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }
}

impl Recognizer for MockRecognizer {
    fn parse(
        &self,
        _sentence: &str,
        entity_types: Option<&[String]>,
        _context: Option<&ParseContext>,
    ) -> Result<Vec<EntityRecord>> {
        let mut out = self.entities.clone();
        if let Some(types) = entity_types {
            out.retain(|e| types.contains(&e.entity_type));
        }
        Ok(out)
    }

    fn supported_entity_types(&self) -> &BTreeSet<String> {
        &self.types
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
