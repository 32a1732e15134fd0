//! Bootstrapping annotations from the application's own NLU pipeline.
//!
//! Once an application has a trained entity recognizer, its predictions can
//! annotate the rest of the data. Predictions are scoped to the example's
//! domain and intent, and only confident ones are kept.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, info};
use once_cell::sync::OnceCell;

use crate::entity::{is_system_entity, EntityRecord};
use crate::{Error, ParseContext, Recognizer, Result};

/// An entity predicted by an NLU pipeline, with its confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntity {
    /// The predicted entity.
    pub record: EntityRecord,
    /// Confidence for the predicted type, in `[0, 1]`.
    pub confidence: f64,
}

impl ScoredEntity {
    /// Pair a record with its confidence.
    #[must_use]
    pub fn new(record: EntityRecord, confidence: f64) -> Self {
        Self { record, confidence }
    }
}

/// Seam to an application's trained NLU pipeline.
pub trait NluProcessor: Send + Sync {
    /// Predict entities for `sentence`, restricted to `domain`/`intent`.
    fn process(&self, sentence: &str, domain: &str, intent: &str) -> Result<Vec<ScoredEntity>>;

    /// Entity types defined by the application.
    fn entity_types(&self) -> BTreeSet<String>;
}

/// Recognizer backed by an [`NluProcessor`].
pub struct BootstrapRecognizer {
    nlu: Arc<dyn NluProcessor>,
    confidence_threshold: f64,
    supported: OnceCell<BTreeSet<String>>,
}

impl BootstrapRecognizer {
    /// Create a recognizer keeping predictions at or above
    /// `confidence_threshold`.
    pub fn new(nlu: Arc<dyn NluProcessor>, confidence_threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&confidence_threshold) {
            return Err(Error::config(format!(
                "confidence_threshold must be within [0, 1], got {confidence_threshold}"
            )));
        }
        info!("[bootstrap] keeping predictions with confidence >= {confidence_threshold}");
        Ok(Self {
            nlu,
            confidence_threshold,
            supported: OnceCell::new(),
        })
    }

    /// The configured threshold.
    #[must_use]
    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }
}

impl Recognizer for BootstrapRecognizer {
    fn parse(
        &self,
        sentence: &str,
        entity_types: Option<&[String]>,
        context: Option<&ParseContext>,
    ) -> Result<Vec<EntityRecord>> {
        let context = context.ok_or_else(|| {
            Error::invalid_input("bootstrap recognition needs the example's domain and intent")
        })?;

        let predictions = self.nlu.process(sentence, &context.domain, &context.intent)?;
        let total = predictions.len();
        let kept: Vec<EntityRecord> = predictions
            .into_iter()
            .filter(|p| entity_types.map_or(true, |types| types.contains(&p.record.entity_type)))
            .filter(|p| p.confidence >= self.confidence_threshold)
            .map(|p| p.record)
            .collect();

        debug!("[bootstrap] kept {}/{} predictions", kept.len(), total);
        Ok(kept)
    }

    fn supported_entity_types(&self) -> &BTreeSet<String> {
        self.supported.get_or_init(|| self.nlu.entity_types())
    }

    fn is_valid_entity(&self, entity_type: &str) -> bool {
        let normalized = entity_type.trim().to_lowercase();
        is_system_entity(&normalized) || self.supported_entity_types().contains(&normalized)
    }

    fn name(&self) -> &'static str {
        "bootstrap"
    }
}
