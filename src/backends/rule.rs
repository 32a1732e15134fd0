//! Direct rule-based recognition over the whole sentence.

use std::collections::BTreeSet;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::entity::EntityRecord;
use crate::lang::LanguageConfig;
use crate::resolver::{Candidate, SystemEntityResolver};
use crate::span::{select_largest_non_overlapping, Span};
use crate::{ParseContext, Recognizer, Result};

/// Recognizer that runs the resolver directly on the sentence.
///
/// Overlapping candidates are reduced with
/// [`select_largest_non_overlapping`]; money amounts with an `unknown` unit
/// ("5 bucks") are discarded as noise first.
pub struct RuleRecognizer {
    resolver: Arc<dyn SystemEntityResolver>,
    language: LanguageConfig,
    supported: OnceCell<BTreeSet<String>>,
}

impl RuleRecognizer {
    /// Create a recognizer for `language`.
    #[must_use]
    pub fn new(resolver: Arc<dyn SystemEntityResolver>, language: LanguageConfig) -> Self {
        Self {
            resolver,
            language,
            supported: OnceCell::new(),
        }
    }
}

fn is_unresolved_money(candidate: &Candidate) -> bool {
    candidate.dim == "amount-of-money"
        && candidate.value.get("unit").and_then(Value::as_str) == Some("unknown")
}

impl Recognizer for RuleRecognizer {
    fn parse(
        &self,
        sentence: &str,
        entity_types: Option<&[String]>,
        _context: Option<&ParseContext>,
    ) -> Result<Vec<EntityRecord>> {
        let candidates: Vec<Candidate> = self
            .resolver
            .get_candidates(
                sentence,
                &self.language.language,
                self.language.locale(),
                entity_types,
            )?
            .into_iter()
            .filter(|c| !is_unresolved_money(c))
            .collect();

        let spans: Vec<Span> = candidates
            .iter()
            .filter_map(|c| Span::from_exclusive(c.start, c.end))
            .collect();

        let mut selected: Vec<&Candidate> = select_largest_non_overlapping(&spans)
            .into_iter()
            .filter_map(|span| {
                candidates
                    .iter()
                    .find(|c| Span::from_exclusive(c.start, c.end) == Some(span))
            })
            .collect();

        if let Some(types) = entity_types {
            selected.retain(|c| types.contains(&c.entity_type));
        }

        Ok(selected.into_iter().filter_map(Candidate::to_record).collect())
    }

    fn supported_entity_types(&self) -> &BTreeSet<String> {
        self.supported
            .get_or_init(|| self.resolver.supported_entity_types(&self.language.language))
    }

    fn name(&self) -> &'static str {
        "rule"
    }
}
