//! Language-aware composition of recognizers.
//!
//! The native model always runs first and owns its spans. For languages
//! other than English a gap filler adds whatever the model missed:
//!
//! ```text
//!   "llámame a las 7"
//!         │
//!         ▼
//!   ┌───────────────────────┐     base
//!   │ ModelRecognizer (es)  │ ──────────────┐
//!   └───────────────────────┘               │
//!         │                                 ▼
//!         ▼                       ┌───────────────────┐
//!   ┌───────────────────────┐     │ conflict::resolve │──▶ records
//!   │ GapFiller             │ ──▶ │ (overwrite=false) │
//!   │  Bridge | Rules       │     └───────────────────┘
//!   └───────────────────────┘
//! ```

use std::collections::BTreeSet;

use log::debug;
use once_cell::sync::OnceCell;

use super::model::ModelRecognizer;
use super::rule::RuleRecognizer;
use super::translation::TranslationBridgeRecognizer;
use crate::conflict;
use crate::entity::EntityRecord;
use crate::{Error, ParseContext, Recognizer, Result};

/// Secondary recognizer that fills spans the native model left empty.
pub enum GapFiller {
    /// Recognize in English and align back (a translator is configured).
    Bridge(TranslationBridgeRecognizer),
    /// Run the resolver directly on the sentence.
    Rules(RuleRecognizer),
}

impl GapFiller {
    fn recognizer(&self) -> &dyn Recognizer {
        match self {
            GapFiller::Bridge(bridge) => bridge,
            GapFiller::Rules(rules) => rules,
        }
    }
}

/// Native model plus an optional gap filler.
///
/// # Example
///
/// ```rust,ignore
/// let composite = CompositeRecognizer::builder()
///     .model(spanish_model)
///     .gap_filler(GapFiller::Rules(rules))
///     .build()?;
/// ```
pub struct CompositeRecognizer {
    model: ModelRecognizer,
    gap_filler: Option<GapFiller>,
    supported: OnceCell<BTreeSet<String>>,
    name: String,
}

/// Builder for [`CompositeRecognizer`].
#[derive(Default)]
pub struct CompositeRecognizerBuilder {
    model: Option<ModelRecognizer>,
    gap_filler: Option<GapFiller>,
}

impl CompositeRecognizerBuilder {
    /// Set the native model (required).
    #[must_use]
    pub fn model(mut self, model: ModelRecognizer) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the gap filler. Not allowed for English models.
    #[must_use]
    pub fn gap_filler(mut self, filler: GapFiller) -> Self {
        self.gap_filler = Some(filler);
        self
    }

    /// Build the composite.
    pub fn build(self) -> Result<CompositeRecognizer> {
        let model = self
            .model
            .ok_or_else(|| Error::config("composite recognizer needs a model"))?;

        if model.language().is_english() && self.gap_filler.is_some() {
            return Err(Error::config(
                "English recognition uses the model alone; drop the gap filler",
            ));
        }

        let name = match &self.gap_filler {
            Some(filler) => format!("composite(model+{})", filler.recognizer().name()),
            None => "composite(model)".to_string(),
        };

        Ok(CompositeRecognizer {
            model,
            gap_filler: self.gap_filler,
            supported: OnceCell::new(),
            name,
        })
    }
}

impl CompositeRecognizer {
    /// Create a builder.
    #[must_use]
    pub fn builder() -> CompositeRecognizerBuilder {
        CompositeRecognizerBuilder::default()
    }

    /// Descriptive name, e.g. `composite(model+rule)`.
    #[must_use]
    pub fn describe(&self) -> &str {
        &self.name
    }

    /// The gap filler, if any.
    #[must_use]
    pub fn gap_filler(&self) -> Option<&GapFiller> {
        self.gap_filler.as_ref()
    }
}

impl Recognizer for CompositeRecognizer {
    fn parse(
        &self,
        sentence: &str,
        entity_types: Option<&[String]>,
        context: Option<&ParseContext>,
    ) -> Result<Vec<EntityRecord>> {
        let base = self.model.parse(sentence, entity_types, context)?;
        let Some(filler) = &self.gap_filler else {
            return Ok(base);
        };

        let extra = filler.recognizer().parse(sentence, entity_types, context)?;
        debug!(
            "[composite] model found {}, {} found {}",
            base.len(),
            filler.recognizer().name(),
            extra.len()
        );
        Ok(conflict::resolve(base, extra, false))
    }

    fn supported_entity_types(&self) -> &BTreeSet<String> {
        self.supported.get_or_init(|| {
            let mut types = self.model.supported_entity_types().clone();
            if let Some(filler) = &self.gap_filler {
                types.extend(filler.recognizer().supported_entity_types().iter().cloned());
            }
            types
        })
    }

    fn name(&self) -> &'static str {
        "composite"
    }
}
