//! Inline entity markup.
//!
//! ```text
//! wake me at {7 am|sys_time} on {monday|sys_time|start}
//!            └─text─┘└type─┘            └type──┘└role┘
//! ```
//!
//! Braces and `|` are reserved; everything outside braces is query text.
//! Entity spans are inclusive character offsets into the plain text.

use log::warn;
use serde_json::Value;

use crate::entity::EntityRecord;
use crate::offset::{char_len, char_slice};
use crate::span::Span;
use crate::{Error, Result};

/// One training example: plain text plus its entities.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedExample {
    /// Query text with markup removed.
    pub text: String,
    /// Domain the example belongs to.
    pub domain: String,
    /// Intent the example belongs to.
    pub intent: String,
    /// Annotated entities.
    pub entities: Vec<EntityRecord>,
}

/// Seam to the markup format.
pub trait MarkupCodec {
    /// Parse one line of markup.
    ///
    /// # Errors
    ///
    /// [`Error::Markup`] when the line is not valid markup.
    fn load_query(&self, raw: &str, domain: &str, intent: &str) -> Result<ProcessedExample>;

    /// Render examples back to markup, one line each (no terminator).
    fn dump_queries(&self, examples: &[ProcessedExample]) -> Vec<String>;
}

/// The `{text|type}` / `{text|type|role}` markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceMarkup;

impl BraceMarkup {
    fn parse_entity(inner: &str, start: usize, raw: &str) -> Result<EntityRecord> {
        let parts: Vec<&str> = inner.split('|').collect();
        let (text, entity_type, role) = match parts.as_slice() {
            [text, ty] => (*text, *ty, None),
            [text, ty, role] => (*text, *ty, Some(*role)),
            _ => {
                return Err(Error::markup(format!(
                    "entity {{{inner}}} needs `text|type` or `text|type|role` in {raw:?}"
                )))
            }
        };

        let entity_type = entity_type.trim();
        if text.is_empty() || entity_type.is_empty() {
            return Err(Error::markup(format!("empty entity text or type in {raw:?}")));
        }

        let span = Span::new(start, start + char_len(text) - 1);
        let record = EntityRecord::new(text, span, entity_type, Value::Null);
        Ok(match role.map(str::trim).filter(|r| !r.is_empty()) {
            Some(role) => record.with_role(role),
            None => record,
        })
    }

    fn dump_one(example: &ProcessedExample) -> String {
        let text = &example.text;
        let total = char_len(text);

        let mut entities: Vec<&EntityRecord> = example.entities.iter().collect();
        entities.sort_by_key(|e| e.span.start);

        let mut out = String::with_capacity(text.len() + entities.len() * 16);
        let mut cursor = 0;
        for entity in entities {
            if entity.span.end >= total {
                warn!("[markup] entity {:?} lies outside {text:?}, dropping it", entity.body);
                continue;
            }
            if entity.span.start < cursor {
                warn!("[markup] entity {:?} overlaps another in {text:?}, dropping it", entity.body);
                continue;
            }
            out.push_str(char_slice(text, cursor, entity.span.start));
            out.push('{');
            out.push_str(char_slice(text, entity.span.start, entity.span.end_exclusive()));
            out.push('|');
            out.push_str(&entity.entity_type);
            if let Some(role) = &entity.role {
                out.push('|');
                out.push_str(role);
            }
            out.push('}');
            cursor = entity.span.end_exclusive();
        }
        out.push_str(char_slice(text, cursor, total));
        out
    }
}

impl MarkupCodec for BraceMarkup {
    fn load_query(&self, raw: &str, domain: &str, intent: &str) -> Result<ProcessedExample> {
        if raw.trim().is_empty() {
            return Err(Error::markup("empty query"));
        }

        let mut text = String::with_capacity(raw.len());
        let mut text_chars = 0;
        let mut entities = Vec::new();
        let mut rest = raw;

        while let Some(open) = rest.find(['{', '}']) {
            if rest[open..].starts_with('}') {
                return Err(Error::markup(format!("unmatched `}}` in {raw:?}")));
            }
            let before = &rest[..open];
            text.push_str(before);
            text_chars += char_len(before);

            let after_open = &rest[open + 1..];
            let close = after_open
                .find(['{', '}'])
                .filter(|&i| after_open[i..].starts_with('}'))
                .ok_or_else(|| Error::markup(format!("unclosed or nested `{{` in {raw:?}")))?;

            let inner = &after_open[..close];
            let entity = Self::parse_entity(inner, text_chars, raw)?;
            text.push_str(&entity.body);
            text_chars += char_len(&entity.body);
            entities.push(entity);

            rest = &after_open[close + 1..];
        }
        text.push_str(rest);

        Ok(ProcessedExample {
            text,
            domain: domain.to_string(),
            intent: intent.to_string(),
            entities,
        })
    }

    fn dump_queries(&self, examples: &[ProcessedExample]) -> Vec<String> {
        examples.iter().map(Self::dump_one).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(raw: &str) -> Result<ProcessedExample> {
        BraceMarkup.load_query(raw, "times", "set_alarm")
    }

    #[test]
    fn test_load_entities_and_roles() {
        let ex = load("alarm at {7 am|sys_time} on {mañana|sys_time|start}").unwrap();
        assert_eq!(ex.text, "alarm at 7 am on mañana");
        assert_eq!(ex.entities.len(), 2);
        assert_eq!(ex.entities[0].span, Span::new(9, 12));
        assert_eq!(ex.entities[0].entity_type, "sys_time");
        assert_eq!(ex.entities[1].span, Span::new(17, 22));
        assert_eq!(ex.entities[1].role.as_deref(), Some("start"));
        assert_eq!(ex.domain, "times");
    }

    #[test]
    fn test_plain_text() {
        let ex = load("hello there").unwrap();
        assert_eq!(ex.text, "hello there");
        assert!(ex.entities.is_empty());
    }

    #[test]
    fn test_malformed_markup() {
        for raw in ["", "   ", "{7 am", "7 am}", "{7 am}", "{{7 am|sys_time}}", "{|sys_time}", "{a|b|c|d}"] {
            assert!(matches!(load(raw), Err(Error::Markup(_))), "{raw:?} should fail");
        }
    }

    #[test]
    fn test_dump_round_trips_markup() {
        let raw = "wake me at {7 am|sys_time} with {Alice|sys_person|caller}";
        let ex = load(raw).unwrap();
        assert_eq!(BraceMarkup.dump_queries(&[ex]), vec![raw.to_string()]);
    }

    #[test]
    fn test_dump_sorts_and_skips_overlaps() {
        let text = "buy 5 apples at noon";
        let ex = ProcessedExample {
            text: text.to_string(),
            domain: "d".into(),
            intent: "i".into(),
            entities: vec![
                EntityRecord::new("noon", Span::new(16, 19), "sys_time", json!(null)),
                EntityRecord::new("5", Span::new(4, 4), "sys_number", json!({"value": 5})),
                EntityRecord::new("5 apples", Span::new(4, 11), "quantity", json!(null)),
                EntityRecord::new("x", Span::new(30, 31), "bogus", json!(null)),
            ],
        };
        assert_eq!(
            BraceMarkup.dump_queries(&[ex]),
            vec!["buy {5|sys_number} apples at {noon|sys_time}".to_string()]
        );
    }
}
