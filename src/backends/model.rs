//! Model-backed recognition.
//!
//! A [`NerModel`] finds spans and coarse labels (`CARDINAL`, `TIME`,
//! `PERSON`, ...). [`ModelRecognizer`] maps those labels onto canonical
//! system types and asks the rule-based resolver for values, dropping spans
//! it cannot resolve.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;
use once_cell::sync::OnceCell;

use super::resolution::Resolution;
use crate::entity::{EntityDraft, EntityRecord};
use crate::lang::LanguageConfig;
use crate::resolver::SystemEntityResolver;
use crate::schema;
use crate::{ParseContext, Recognizer, Result};

/// A raw model detection. Offsets are characters, `end_char` exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntity {
    /// Surface text.
    pub text: String,
    /// First character.
    pub start_char: usize,
    /// One past the last character.
    pub end_char: usize,
    /// Model label as emitted (any case).
    pub label: String,
}

impl RawEntity {
    /// Create a raw entity.
    #[must_use]
    pub fn new(text: impl Into<String>, start_char: usize, end_char: usize, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start_char,
            end_char,
            label: label.into(),
        }
    }
}

/// Seam to a per-language named-entity model.
pub trait NerModel: Send + Sync {
    /// Detect entities in `sentence`.
    fn infer(&self, sentence: &str) -> Result<Vec<RawEntity>>;

    /// The model's label inventory.
    fn labels(&self) -> Vec<String>;

    /// Model name for logging.
    fn name(&self) -> &str {
        "model"
    }
}

/// Model returning canned detections, for tests.
#[derive(Debug, Clone, Default)]
pub struct MockNerModel {
    entities: Vec<RawEntity>,
    labels: Vec<String>,
}

impl MockNerModel {
    /// Empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Detections returned for every sentence.
    #[must_use]
    pub fn with_entities(mut self, entities: Vec<RawEntity>) -> Self {
        self.entities = entities;
        self
    }

    /// Label inventory.
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

impl NerModel for MockNerModel {
    fn infer(&self, _sentence: &str) -> Result<Vec<RawEntity>> {
        Ok(self.entities.clone())
    }

    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Recognizer backed by an NER model plus value resolution heuristics.
pub struct ModelRecognizer {
    model: Box<dyn NerModel>,
    resolver: Arc<dyn SystemEntityResolver>,
    language: LanguageConfig,
    supported: OnceCell<BTreeSet<String>>,
}

impl ModelRecognizer {
    /// Create a recognizer for `language`.
    #[must_use]
    pub fn new(
        model: Box<dyn NerModel>,
        resolver: Arc<dyn SystemEntityResolver>,
        language: LanguageConfig,
    ) -> Self {
        Self {
            model,
            resolver,
            language,
            supported: OnceCell::new(),
        }
    }

    /// Active language.
    #[must_use]
    pub fn language(&self) -> &LanguageConfig {
        &self.language
    }

    fn compute_supported(&self) -> BTreeSet<String> {
        let mut types = BTreeSet::new();
        for label in self.model.labels() {
            let label = schema::normalize_label(&label);
            if label == schema::MISC_LABEL {
                continue;
            }
            if schema::is_temporal_label(&label) {
                types.extend(schema::TEMPORAL_TYPES.iter().map(|t| (*t).to_string()));
            } else {
                types.insert(schema::canonical_type(&label));
            }
        }

        if types.contains("sys_weight") {
            for implied in ["sys_distance", "sys_other-quantity"] {
                types.insert(implied.to_string());
            }
        }

        let resolvable = self.resolver.supported_entity_types(&self.language.language);
        types.retain(|t| !schema::requires_resolver(t) || resolvable.contains(t));
        debug!(
            "[model] {} supports {} types for {}",
            self.model.name(),
            types.len(),
            self.language.language
        );
        types
    }
}

impl Recognizer for ModelRecognizer {
    fn parse(
        &self,
        sentence: &str,
        entity_types: Option<&[String]>,
        _context: Option<&ParseContext>,
    ) -> Result<Vec<EntityRecord>> {
        let resolution = Resolution::new(self.resolver.as_ref(), &self.language);
        let mut drafts = Vec::new();

        for raw in self.model.infer(sentence)? {
            let label = schema::normalize_label(&raw.label);
            if label == schema::MISC_LABEL {
                continue;
            }
            let draft = EntityDraft::unresolved(raw.text, raw.start_char, raw.end_char, label);
            if let Some(resolved) = resolution.resolve(draft, sentence, entity_types)? {
                drafts.push(resolved);
            }
        }

        if let Some(types) = entity_types {
            drafts.retain(|d| types.contains(&d.dim));
        }

        Ok(drafts.into_iter().filter_map(EntityDraft::into_record).collect())
    }

    fn supported_entity_types(&self) -> &BTreeSet<String> {
        self.supported.get_or_init(|| self.compute_supported())
    }

    fn name(&self) -> &'static str {
        "model"
    }
}
