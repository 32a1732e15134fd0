//! Rule-based system entity resolution.
//!
//! The resolver turns free text into typed, valued candidates for numeric
//! and temporal entities (numbers, money, durations, times, ...). It is the
//! source of truth for entity *values*: model-backed recognizers only find
//! spans and labels, then look their spans up here.
//!
//! Candidates may overlap; callers decide which to keep.

mod pattern;

pub use pattern::PatternResolver;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{EntityDraft, EntityRecord};
use crate::schema;
use crate::Result;

/// A typed, valued match produced by a [`SystemEntityResolver`].
///
/// `start`/`end` are character offsets into the text passed to the
/// resolver, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Resolver dimension (`time`, `duration`, `number`, `amount-of-money`, ...).
    pub dim: String,
    /// Matched text.
    pub body: String,
    /// First character.
    pub start: usize,
    /// One past the last character.
    pub end: usize,
    /// Resolved value.
    pub value: Value,
    /// Canonical system type derived from `dim` and `value`.
    pub entity_type: String,
}

impl Candidate {
    /// Build a candidate, deriving its canonical type.
    #[must_use]
    pub fn new(dim: impl Into<String>, body: impl Into<String>, start: usize, end: usize, value: Value) -> Self {
        let dim = dim.into();
        let entity_type = canonical_entity_type(&dim, &value);
        Self {
            dim,
            body: body.into(),
            start,
            end,
            value,
            entity_type,
        }
    }

    /// Temporal classification with duration > interval > time priority.
    ///
    /// `None` for non-temporal candidates.
    #[must_use]
    pub fn temporal_type(&self) -> Option<&'static str> {
        match self.dim.as_str() {
            "duration" => Some("sys_duration"),
            "time" if is_interval(&self.value) => Some("sys_interval"),
            "time" => Some("sys_time"),
            _ => None,
        }
    }

    /// Convert into a working draft typed by the canonical type.
    #[must_use]
    pub fn to_draft(&self) -> EntityDraft {
        EntityDraft {
            body: self.body.clone(),
            start: self.start,
            end: self.end,
            dim: self.entity_type.clone(),
            value: self.value.clone(),
            role: None,
        }
    }

    /// Finalize directly into a record.
    #[must_use]
    pub fn to_record(&self) -> Option<EntityRecord> {
        self.to_draft().into_record()
    }
}

fn is_interval(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("interval")
}

/// Canonical system type for a resolver dimension.
#[must_use]
pub fn canonical_entity_type(dim: &str, value: &Value) -> String {
    if dim == "time" && is_interval(value) {
        "sys_interval".to_string()
    } else {
        schema::default_sys_type(dim)
    }
}

/// Seam to the rule-based numeric/temporal resolver.
pub trait SystemEntityResolver: Send + Sync {
    /// Candidates over `text`. With `entity_types` set, only candidates of
    /// those canonical types are returned.
    fn get_candidates(
        &self,
        text: &str,
        language: &str,
        locale: Option<&str>,
        entity_types: Option<&[String]>,
    ) -> Result<Vec<Candidate>>;

    /// Canonical types this resolver knows for `language`.
    fn supported_entity_types(&self, language: &str) -> BTreeSet<String> {
        schema::resolver_types(language)
    }

    /// Resolver name for logging.
    fn name(&self) -> &'static str {
        "resolver"
    }
}

/// Keep only candidates whose canonical type is listed.
pub(crate) fn filter_by_types(candidates: Vec<Candidate>, entity_types: Option<&[String]>) -> Vec<Candidate> {
    match entity_types {
        Some(types) => candidates
            .into_iter()
            .filter(|c| types.iter().any(|t| *t == c.entity_type))
            .collect(),
        None => candidates,
    }
}

/// Resolver that returns canned candidates, for tests.
///
/// Candidates are keyed by the exact text they are returned for.
#[derive(Debug, Clone, Default)]
pub struct MockResolver {
    responses: Vec<(String, Vec<Candidate>)>,
    types: BTreeSet<String>,
}

impl MockResolver {
    /// Empty mock: no candidates, no supported types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `candidates` whenever the resolver is called on `text`.
    #[must_use]
    pub fn with_response(mut self, text: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        self.responses.push((text.into(), candidates));
        self
    }

    /// Set the supported types (for every language).
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

impl SystemEntityResolver for MockResolver {
    fn get_candidates(
        &self,
        text: &str,
        _language: &str,
        _locale: Option<&str>,
        entity_types: Option<&[String]>,
    ) -> Result<Vec<Candidate>> {
        let found = self
            .responses
            .iter()
            .find(|(t, _)| t == text)
            .map(|(_, c)| c.clone())
            .unwrap_or_default();
        Ok(filter_by_types(found, entity_types))
    }

    fn supported_entity_types(&self, _language: &str) -> BTreeSet<String> {
        self.types.clone()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
