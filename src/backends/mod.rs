//! Recognizer backends and their collaborator seams.
//!
//! # Which recognizer when
//!
//! ```text
//!   language == en ──────────────▶ ModelRecognizer(en)
//!
//!   language != en ─┬────────────▶ ModelRecognizer(lang)            (base)
//!                   │
//!                   └─ translator? ─ yes ─▶ TranslationBridgeRecognizer (fills gaps)
//!                                  ─ no  ─▶ RuleRecognizer              (fills gaps)
//! ```
//!
//! [`CompositeRecognizer`] wires that decision; [`build_recognizer`] builds
//! the whole stack from an [`AnnotatorConfig`](crate::AnnotatorConfig).

pub mod bootstrap;
pub mod catalog;
pub mod composite;
pub mod heuristic;
pub mod model;
pub(crate) mod resolution;
pub mod rule;
pub mod translation;

pub use bootstrap::{BootstrapRecognizer, NluProcessor, ScoredEntity};
pub use catalog::{build_recognizer, model_name, BuiltinModelLoader, ModelLoader};
pub use composite::{CompositeRecognizer, CompositeRecognizerBuilder, GapFiller};
pub use heuristic::HeuristicNerModel;
pub use model::{MockNerModel, ModelRecognizer, NerModel, RawEntity};
pub use rule::RuleRecognizer;
pub use translation::{translator_from_name, NoOpTranslator, TranslationBridgeRecognizer, Translator};
