//! Type-specific value resolution for model detections.
//!
//! Each raw label gets its own rule for turning a model span into a valued
//! entity. Most consult the rule-based resolver over the span text and
//! either adopt a candidate or drop the detection:
//!
//! | raw label               | rule                                            | unresolved |
//! |-------------------------|-------------------------------------------------|------------|
//! | time / date / datetime  | exact body, else longest substring; duration > interval > time | dropped |
//! | cardinal                | exact `sys_number`, else longest substring      | dropped    |
//! | money                   | pull a leading currency symbol in, then exact   | dropped    |
//! | ordinal                 | exact                                           | dropped    |
//! | quantity                | exact distance > quantity, else longest substring | `sys_other-quantity` |
//! | percent                 | first fractional number / 100, else max integer / 100 | dropped |
//! | person                  | strip English possessive `'s`                   | kept       |
//! | anything else           | renamed `sys_<label>`                           | kept       |

use serde_json::{json, Value};

use crate::entity::EntityDraft;
use crate::lang::LanguageConfig;
use crate::offset::{char_at, char_len, char_slice};
use crate::resolver::{Candidate, SystemEntityResolver};
use crate::schema;
use crate::Result;

const QUANTITY_DIMS: &[&str] = &["distance", "quantity"];

pub(crate) struct Resolution<'a> {
    resolver: &'a dyn SystemEntityResolver,
    language: &'a LanguageConfig,
}

impl<'a> Resolution<'a> {
    pub(crate) fn new(resolver: &'a dyn SystemEntityResolver, language: &'a LanguageConfig) -> Self {
        Self { resolver, language }
    }

    /// Resolve one draft whose `dim` is a normalized raw label.
    pub(crate) fn resolve(
        &self,
        mut draft: EntityDraft,
        sentence: &str,
        entity_types: Option<&[String]>,
    ) -> Result<Option<EntityDraft>> {
        match draft.dim.as_str() {
            label if schema::is_temporal_label(label) => self.temporal(draft, entity_types),
            "cardinal" => self.cardinal(draft),
            "money" => self.money(draft, sentence),
            "ordinal" => self.ordinal(draft),
            "quantity" => self.quantity(draft),
            "percent" => self.percent(draft),
            "person" => Ok(Some(self.person(draft))),
            other => {
                draft.dim = schema::default_sys_type(other);
                Ok(Some(draft))
            }
        }
    }

    fn candidates(&self, text: &str) -> Result<Vec<Candidate>> {
        self.resolver
            .get_candidates(text, &self.language.language, self.language.locale(), None)
    }

    fn temporal(&self, mut draft: EntityDraft, entity_types: Option<&[String]>) -> Result<Option<EntityDraft>> {
        let candidates = self.candidates(&draft.body)?;
        if candidates.is_empty() {
            return Ok(None);
        }

        let allowed: Vec<&'static str> = schema::TEMPORAL_TYPES
            .iter()
            .copied()
            .filter(|t| entity_types.map_or(true, |types| types.iter().any(|x| x == t)))
            .collect();

        let exact = candidates.iter().find_map(|c| {
            let ty = c.temporal_type()?;
            (allowed.contains(&ty) && c.body == draft.body).then_some((c, ty))
        });
        if let Some((candidate, ty)) = exact {
            draft.dim = ty.to_string();
            draft.value = candidate.value.clone();
            return Ok(Some(draft));
        }

        Ok(largest_substring(&draft.body, &candidates, &allowed, |c| c.temporal_type())
            .map(|(candidate, ty)| adopt(draft, candidate, ty)))
    }

    fn cardinal(&self, mut draft: EntityDraft) -> Result<Option<EntityDraft>> {
        draft.dim = "sys_number".to_string();
        let candidates = self.candidates(&draft.body)?;
        if let Some(candidate) = exact_match(&draft, &candidates) {
            draft.value = candidate.value.clone();
            return Ok(Some(draft));
        }
        Ok(
            largest_substring(&draft.body, &candidates, &["sys_number"], |c| {
                Some(c.entity_type.as_str())
            })
            .map(|(candidate, ty)| adopt(draft, candidate, ty)),
        )
    }

    fn money(&self, mut draft: EntityDraft, sentence: &str) -> Result<Option<EntityDraft>> {
        for &symbol in schema::CURRENCY_SYMBOLS {
            if !sentence.contains(symbol) {
                continue;
            }
            let start = draft.start;
            let at_sentence_start = start == 1 && char_at(sentence, 0) == Some(symbol);
            let after_space = start >= 2
                && char_at(sentence, start - 2) == Some(' ')
                && char_at(sentence, start - 1) == Some(symbol);
            if at_sentence_start || after_space {
                draft.start -= 1;
                draft.body = char_slice(sentence, draft.start, draft.end).to_string();
            }
        }
        self.exact(draft, "sys_amount-of-money")
    }

    fn ordinal(&self, draft: EntityDraft) -> Result<Option<EntityDraft>> {
        self.exact(draft, "sys_ordinal")
    }

    fn exact(&self, mut draft: EntityDraft, entity_type: &str) -> Result<Option<EntityDraft>> {
        draft.dim = entity_type.to_string();
        let candidates = self.candidates(&draft.body)?;
        Ok(exact_match(&draft, &candidates).map(|candidate| {
            draft.value = candidate.value.clone();
            draft
        }))
    }

    fn quantity(&self, mut draft: EntityDraft) -> Result<Option<EntityDraft>> {
        let candidates = self.candidates(&draft.body)?;
        if candidates.is_empty() {
            draft.dim = "sys_other-quantity".to_string();
            return Ok(Some(draft));
        }

        for dim in QUANTITY_DIMS {
            if let Some(candidate) = candidates.iter().find(|c| c.dim == *dim && c.body == draft.body) {
                draft.value = candidate.value.clone();
                draft.dim = schema::default_sys_type(dim);
                return Ok(Some(draft));
            }
        }

        match largest_substring(&draft.body, &candidates, QUANTITY_DIMS, |c| Some(c.dim.as_str())) {
            Some((candidate, dim)) => {
                let mut resolved = adopt(draft, candidate, dim);
                resolved.dim = schema::default_sys_type(dim);
                Ok(Some(resolved))
            }
            None => {
                draft.dim = "sys_other-quantity".to_string();
                Ok(Some(draft))
            }
        }
    }

    fn percent(&self, mut draft: EntityDraft) -> Result<Option<EntityDraft>> {
        draft.dim = "sys_percent".to_string();
        let candidates = self.candidates(&draft.body)?;

        let mut integers = Vec::new();
        for candidate in candidates.iter().filter(|c| c.entity_type == "sys_number") {
            let Some(Value::Number(n)) = candidate.value.get("value") else {
                continue;
            };
            if n.is_f64() {
                let fraction = n.as_f64().unwrap_or_default() / 100.0;
                draft.value = json!({ "value": fraction });
                return Ok(Some(draft));
            }
            if let Some(i) = n.as_i64() {
                integers.push(i);
            }
        }

        Ok(integers.into_iter().max().map(|max| {
            draft.value = json!({ "value": max as f64 / 100.0 });
            draft
        }))
    }

    fn person(&self, mut draft: EntityDraft) -> EntityDraft {
        draft.dim = "sys_person".to_string();
        if self.language.is_english() && char_len(&draft.body) >= 2 && draft.body.ends_with("'s") {
            let stripped = draft.body[..draft.body.len() - 2].to_string();
            draft.value = json!({ "value": stripped.clone() });
            draft.body = stripped;
            draft.end -= 2;
        }
        draft
    }
}

fn exact_match<'c>(draft: &EntityDraft, candidates: &'c [Candidate]) -> Option<&'c Candidate> {
    candidates
        .iter()
        .find(|c| c.entity_type == draft.dim && c.body == draft.body)
}

/// Longest candidate whose body is a substring of `body`, scanning `types`
/// in priority order. Ties keep the earlier type, then the first candidate.
fn largest_substring<'c, F>(
    body: &str,
    candidates: &'c [Candidate],
    types: &[&'static str],
    classify: F,
) -> Option<(&'c Candidate, &'static str)>
where
    F: Fn(&Candidate) -> Option<&str>,
{
    let mut best: Option<(&Candidate, &'static str)> = None;
    for &ty in types {
        for candidate in candidates {
            if classify(candidate) != Some(ty) || !body.contains(candidate.body.as_str()) {
                continue;
            }
            let longer = best.map_or(true, |(b, _)| char_len(&candidate.body) > char_len(&b.body));
            if longer {
                best = Some((candidate, ty));
            }
        }
    }
    best
}

/// Rewrite a draft onto a candidate found inside it.
fn adopt(mut draft: EntityDraft, candidate: &Candidate, entity_type: &str) -> EntityDraft {
    let offset = draft.start;
    draft.body = candidate.body.clone();
    draft.start = offset + candidate.start;
    draft.end = offset + candidate.end;
    draft.value = candidate.value.clone();
    draft.dim = entity_type.to_string();
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MockResolver;

    fn en() -> LanguageConfig {
        LanguageConfig::english()
    }

    fn draft(body: &str, start: usize, label: &str) -> EntityDraft {
        EntityDraft::unresolved(body, start, start + body.chars().count(), label)
    }

    fn resolve(resolver: &MockResolver, lang: &LanguageConfig, d: EntityDraft, sentence: &str) -> Option<EntityDraft> {
        Resolution::new(resolver, lang).resolve(d, sentence, None).unwrap()
    }

    #[test]
    fn test_temporal_largest_substring() {
        // "nearly 15 minutes" has no exact candidate; "15 minutes" wins.
        let resolver = MockResolver::new().with_response(
            "nearly 15 minutes",
            vec![
                Candidate::new("number", "15", 7, 9, json!({"value": 15})),
                Candidate::new("duration", "15 minutes", 7, 17, json!({"value": 15, "unit": "minute"})),
            ],
        );
        let out = resolve(&resolver, &en(), draft("nearly 15 minutes", 20, "time"), "").unwrap();
        assert_eq!(out.dim, "sys_duration");
        assert_eq!(out.body, "15 minutes");
        assert_eq!((out.start, out.end), (27, 37));
        assert_eq!(out.value["unit"], "minute");
    }

    #[test]
    fn test_temporal_exact_match_first() {
        let resolver = MockResolver::new().with_response(
            "7 am",
            vec![
                Candidate::new("number", "7", 0, 1, json!({"value": 7})),
                Candidate::new("time", "7 am", 0, 4, json!({"type": "value", "value": "T07"})),
            ],
        );
        let out = resolve(&resolver, &en(), draft("7 am", 3, "time"), "").unwrap();
        assert_eq!(out.dim, "sys_time");
        assert_eq!((out.start, out.end), (3, 7));
    }

    #[test]
    fn test_temporal_respects_allowed_types() {
        let resolver = MockResolver::new().with_response(
            "for 2 hours",
            vec![Candidate::new("duration", "2 hours", 4, 11, json!({"value": 2}))],
        );
        let lang = en();
        let only_time = vec!["sys_time".to_string()];
        let out = Resolution::new(&resolver, &lang)
            .resolve(draft("for 2 hours", 0, "date"), "", Some(&only_time))
            .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_temporal_without_candidates_dropped() {
        assert!(resolve(&MockResolver::new(), &en(), draft("someday", 0, "date"), "").is_none());
    }

    #[test]
    fn test_substring_tie_keeps_first_seen() {
        let candidates = vec![
            Candidate::new("number", "12", 0, 2, json!({"value": 12})),
            Candidate::new("number", "34", 3, 5, json!({"value": 34})),
        ];
        let (best, _) =
            largest_substring("12 34", &candidates, &["sys_number"], |c| Some(c.entity_type.as_str())).unwrap();
        assert_eq!(best.body, "12");
    }

    #[test]
    fn test_money_pulls_in_symbol() {
        let sentence = "send $20 now";
        let resolver = MockResolver::new().with_response(
            "$20",
            vec![Candidate::new("amount-of-money", "$20", 0, 3, json!({"value": 20, "unit": "$"}))],
        );
        let out = resolve(&resolver, &en(), draft("20", 6, "money"), sentence).unwrap();
        assert_eq!(out.body, "$20");
        assert_eq!((out.start, out.end), (5, 8));
        assert_eq!(out.dim, "sys_amount-of-money");
    }

    #[test]
    fn test_money_at_sentence_start() {
        let resolver = MockResolver::new().with_response(
            "€5",
            vec![Candidate::new("amount-of-money", "€5", 0, 2, json!({"value": 5, "unit": "EUR"}))],
        );
        let out = resolve(&resolver, &en(), draft("5", 1, "money"), "€5 please").unwrap();
        assert_eq!(out.body, "€5");
        assert_eq!(out.start, 0);
    }

    #[test]
    fn test_money_without_exact_match_dropped() {
        let resolver = MockResolver::new();
        assert!(resolve(&resolver, &en(), draft("20", 5, "money"), "send 20 now").is_none());
    }

    #[test]
    fn test_quantity_fallback_never_drops() {
        let out = resolve(&MockResolver::new(), &en(), draft("a lot", 0, "quantity"), "").unwrap();
        assert_eq!(out.dim, "sys_other-quantity");
        assert_eq!(out.body, "a lot");
    }

    #[test]
    fn test_quantity_prefers_distance() {
        let resolver = MockResolver::new().with_response(
            "5 miles",
            vec![
                Candidate::new("quantity", "5 miles", 0, 7, json!({"value": 5})),
                Candidate::new("distance", "5 miles", 0, 7, json!({"value": 5, "unit": "mile"})),
            ],
        );
        let out = resolve(&resolver, &en(), draft("5 miles", 4, "quantity"), "").unwrap();
        assert_eq!(out.dim, "sys_distance");
        assert_eq!(out.value["unit"], "mile");
    }

    #[test]
    fn test_quantity_substring() {
        let resolver = MockResolver::new().with_response(
            "about 3 kg",
            vec![Candidate::new("quantity", "3 kg", 6, 10, json!({"value": 3, "unit": "kilogram"}))],
        );
        let out = resolve(&resolver, &en(), draft("about 3 kg", 0, "quantity"), "").unwrap();
        assert_eq!(out.dim, "sys_quantity");
        assert_eq!((out.start, out.end), (6, 10));
    }

    #[test]
    fn test_percent_fractional() {
        let resolver = MockResolver::new().with_response(
            "50.5%",
            vec![Candidate::new("number", "50.5", 0, 4, json!({"value": 50.5}))],
        );
        let out = resolve(&resolver, &en(), draft("50.5%", 0, "percent"), "").unwrap();
        let v = out.value["value"].as_f64().unwrap();
        assert!((v - 0.505).abs() < 1e-9);
        assert_eq!(out.dim, "sys_percent");
    }

    #[test]
    fn test_percent_max_integer() {
        let resolver = MockResolver::new().with_response(
            "fifty percent",
            vec![
                Candidate::new("number", "fifty", 0, 5, json!({"value": 50})),
                Candidate::new("number", "5", 0, 1, json!({"value": 5})),
            ],
        );
        let out = resolve(&resolver, &en(), draft("fifty percent", 0, "percent"), "").unwrap();
        assert_eq!(out.value, json!({"value": 0.5}));
    }

    #[test]
    fn test_percent_without_numbers_dropped() {
        let resolver = MockResolver::new().with_response(
            "lots percent",
            vec![Candidate::new("time", "lots", 0, 4, json!({"type": "value"}))],
        );
        assert!(resolve(&resolver, &en(), draft("lots percent", 0, "percent"), "").is_none());
    }

    #[test]
    fn test_person_possessive_english_only() {
        let out = resolve(&MockResolver::new(), &en(), draft("Alice's", 5, "person"), "").unwrap();
        assert_eq!(out.body, "Alice");
        assert_eq!(out.end, 10);
        assert_eq!(out.value, json!({"value": "Alice"}));

        let es = LanguageConfig::new("es", None);
        let kept = resolve(&MockResolver::new(), &es, draft("Alice's", 5, "person"), "").unwrap();
        assert_eq!(kept.body, "Alice's");
        assert_eq!(kept.end, 12);
        assert_eq!(kept.dim, "sys_person");
    }

    #[test]
    fn test_unknown_label_renamed() {
        let out = resolve(&MockResolver::new(), &en(), draft("Mona Lisa", 0, "work_of_art"), "").unwrap();
        assert_eq!(out.dim, "sys_work-of-art");
    }
}
