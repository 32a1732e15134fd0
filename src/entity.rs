//! Entity records: the normalized form every recognizer emits.
//!
//! Recognizers work on [`EntityDraft`]s (half-open spans, mutable, typed by a
//! raw `dim` that heuristics rewrite) and finalize them into immutable
//! [`EntityRecord`]s with inclusive spans once resolution is done.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::span::Span;

/// A recognized entity, ready to be merged into an annotated example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Surface text of the entity.
    pub body: String,
    /// Inclusive character span within the sentence.
    pub span: Span,
    /// Canonical system type (`sys_time`, `sys_number`, ...) or an
    /// application entity type.
    pub entity_type: String,
    /// Resolved value. Free-form JSON; system entities carry at least a
    /// `value` key.
    pub value: Value,
    /// Optional role label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl EntityRecord {
    /// Create a record without a role.
    #[must_use]
    pub fn new(
        body: impl Into<String>,
        span: Span,
        entity_type: impl Into<String>,
        value: Value,
    ) -> Self {
        Self {
            body: body.into(),
            span,
            entity_type: entity_type.into(),
            value,
            role: None,
        }
    }

    /// Attach a role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// True if this entity's span overlaps `other`'s.
    #[must_use]
    pub fn overlaps(&self, other: &EntityRecord) -> bool {
        self.span.overlaps(&other.span)
    }

    /// True if the type is a built-in system entity type.
    #[must_use]
    pub fn is_system_entity(&self) -> bool {
        is_system_entity(&self.entity_type)
    }
}

/// True for `sys_`-prefixed types.
#[must_use]
pub fn is_system_entity(entity_type: &str) -> bool {
    entity_type.starts_with("sys_")
}

/// Working copy of an entity inside a recognizer.
///
/// `end` is exclusive. `dim` starts as the raw model label (lowercased) and
/// is rewritten to a canonical type by the resolution heuristics.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDraft {
    /// Surface text.
    pub body: String,
    /// First character (inclusive).
    pub start: usize,
    /// One past the last character.
    pub end: usize,
    /// Raw or canonical type.
    pub dim: String,
    /// Resolved value.
    pub value: Value,
    /// Optional role label.
    pub role: Option<String>,
}

impl EntityDraft {
    /// Draft whose value is the surface text (`{"value": body}`).
    #[must_use]
    pub fn unresolved(body: impl Into<String>, start: usize, end: usize, dim: impl Into<String>) -> Self {
        let body = body.into();
        let value = serde_json::json!({ "value": body.clone() });
        Self {
            body,
            start,
            end,
            dim: dim.into(),
            value,
            role: None,
        }
    }

    /// Finalize into a record. Empty drafts have no inclusive span and are
    /// discarded.
    #[must_use]
    pub fn into_record(self) -> Option<EntityRecord> {
        let span = Span::from_exclusive(self.start, self.end)?;
        Some(EntityRecord {
            body: self.body,
            span,
            entity_type: self.dim,
            value: self.value,
            role: self.role,
        })
    }
}
