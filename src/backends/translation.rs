//! Translation bridge: English recognition projected back onto another
//! language.
//!
//! ```text
//!   "reserva para las 7 pm"  ──translate──▶  "booking for 7 pm"
//!            │                                      │
//!   resolver candidates (es)              English model + rules
//!            │                                      │
//!            └────── align by type + value ◀────────┘
//!                    (else by translated body)
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;
use once_cell::sync::OnceCell;

use super::model::ModelRecognizer;
use super::rule::RuleRecognizer;
use crate::conflict;
use crate::entity::EntityRecord;
use crate::lang::LanguageConfig;
use crate::resolver::{Candidate, SystemEntityResolver};
use crate::schema::ENGLISH;
use crate::{Error, ParseContext, Recognizer, Result};

/// Seam to a translation service.
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_language`.
    fn translate(&self, text: &str, target_language: &str) -> Result<String>;

    /// Translator name for logging.
    fn name(&self) -> &'static str {
        "translator"
    }
}

/// Identity translator. Useful when the text is already English-like or
/// for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpTranslator;

impl Translator for NoOpTranslator {
    fn translate(&self, text: &str, _target_language: &str) -> Result<String> {
        Ok(text.to_string())
    }

    fn name(&self) -> &'static str {
        "NoOpTranslator"
    }
}

/// Look a translator up by its configured name.
pub fn translator_from_name(name: &str) -> Result<Arc<dyn Translator>> {
    match name {
        "NoOpTranslator" | "noop" => Ok(Arc::new(NoOpTranslator)),
        other => Err(Error::config(format!("unknown translator {other:?}"))),
    }
}

/// Recognizer for languages handled through an English pipeline.
pub struct TranslationBridgeRecognizer {
    language: LanguageConfig,
    translator: Arc<dyn Translator>,
    english_model: ModelRecognizer,
    english_rules: RuleRecognizer,
    resolver: Arc<dyn SystemEntityResolver>,
    supported: OnceCell<BTreeSet<String>>,
}

impl TranslationBridgeRecognizer {
    /// Build a bridge for a non-English `language`.
    ///
    /// `english_model` must be an English [`ModelRecognizer`].
    pub fn new(
        language: LanguageConfig,
        translator: Arc<dyn Translator>,
        english_model: ModelRecognizer,
        resolver: Arc<dyn SystemEntityResolver>,
    ) -> Result<Self> {
        if language.is_english() {
            return Err(Error::config(
                "a translation bridge cannot target English",
            ));
        }
        if !english_model.language().is_english() {
            return Err(Error::config(format!(
                "translation bridge needs an English model, got {:?}",
                english_model.language().language
            )));
        }
        let english_rules = RuleRecognizer::new(Arc::clone(&resolver), LanguageConfig::english());
        Ok(Self {
            language,
            translator,
            english_model,
            english_rules,
            resolver,
            supported: OnceCell::new(),
        })
    }

    /// Map English entities back onto candidates over the original sentence.
    fn align<'c>(
        &self,
        english_entities: &[EntityRecord],
        candidates: &'c [Candidate],
    ) -> Result<Vec<&'c Candidate>> {
        let mut aligned = Vec::new();

        for entity in english_entities {
            let mut value_matched: Vec<&Candidate> = Vec::new();
            let mut translated_body: Option<String> = None;

            for candidate in candidates {
                if entity.entity_type != candidate.entity_type {
                    continue;
                }
                if entity.value == candidate.value {
                    value_matched.push(candidate);
                }
                if !value_matched.is_empty() {
                    continue;
                }
                if translated_body.is_none() {
                    translated_body = Some(
                        self.translator
                            .translate(&entity.body, &self.language.language)?,
                    );
                }
                if translated_body.as_deref() == Some(candidate.body.as_str()) {
                    aligned.push(candidate);
                    break;
                }
            }

            if let Some(best) = longest_first(value_matched) {
                aligned.push(best);
            }
        }

        Ok(aligned)
    }
}

/// Longest body; the first candidate wins ties.
fn longest_first<'c>(candidates: Vec<&'c Candidate>) -> Option<&'c Candidate> {
    candidates.into_iter().fold(None, |best, c| match best {
        Some(b) if b.body.chars().count() >= c.body.chars().count() => Some(b),
        _ => Some(c),
    })
}

impl Recognizer for TranslationBridgeRecognizer {
    fn parse(
        &self,
        sentence: &str,
        entity_types: Option<&[String]>,
        _context: Option<&ParseContext>,
    ) -> Result<Vec<EntityRecord>> {
        let candidates = self.resolver.get_candidates(
            sentence,
            &self.language.language,
            self.language.locale(),
            entity_types,
        )?;

        let english_sentence = self.translator.translate(sentence, ENGLISH)?;
        debug!("[translate] {sentence:?} -> {english_sentence:?}");

        let model_entities = self.english_model.parse(&english_sentence, entity_types, None)?;
        let rule_entities = self.english_rules.parse(&english_sentence, entity_types, None)?;
        let english_entities = conflict::resolve(model_entities, rule_entities, false);

        let mut aligned = self.align(&english_entities, &candidates)?;
        if let Some(types) = entity_types {
            aligned.retain(|c| types.contains(&c.entity_type));
        }

        Ok(aligned.into_iter().filter_map(Candidate::to_record).collect())
    }

    fn supported_entity_types(&self) -> &BTreeSet<String> {
        self.supported.get_or_init(|| {
            let target = self.resolver.supported_entity_types(&self.language.language);
            self.english_model
                .supported_entity_types()
                .intersection(&target)
                .cloned()
                .collect()
        })
    }

    fn name(&self) -> &'static str {
        "translation-bridge"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::model::{MockNerModel, RawEntity};
    use crate::resolver::MockResolver;
    use serde_json::json;

    /// Word-for-word dictionary translator.
    struct DictTranslator(Vec<(&'static str, &'static str)>);

    impl Translator for DictTranslator {
        fn translate(&self, text: &str, _target: &str) -> Result<String> {
            Ok(self
                .0
                .iter()
                .find(|(from, _)| *from == text)
                .map(|(_, to)| (*to).to_string())
                .unwrap_or_else(|| text.to_string()))
        }
    }

    fn english_model(entities: Vec<RawEntity>, resolver: Arc<dyn SystemEntityResolver>) -> ModelRecognizer {
        ModelRecognizer::new(
            Box::new(MockNerModel::new().with_entities(entities).with_labels(["CARDINAL", "ORG"])),
            resolver,
            LanguageConfig::english(),
        )
    }

    #[test]
    fn test_english_target_rejected() {
        let resolver: Arc<dyn SystemEntityResolver> = Arc::new(MockResolver::new());
        let err = TranslationBridgeRecognizer::new(
            LanguageConfig::english(),
            Arc::new(NoOpTranslator),
            english_model(vec![], Arc::clone(&resolver)),
            resolver,
        );
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_align_by_value_prefers_longest() {
        let es = "compra cinco manzanas";
        let en = "buy five apples";
        let resolver: Arc<dyn SystemEntityResolver> = Arc::new(
            MockResolver::new()
                .with_response(
                    es,
                    vec![
                        Candidate::new("number", "cinc", 7, 11, json!({"value": 5})),
                        Candidate::new("number", "cinco", 7, 12, json!({"value": 5})),
                        Candidate::new("number", "cinco", 7, 12, json!({"value": 5, "x": 1})),
                    ],
                )
                .with_response("five", vec![Candidate::new("number", "five", 0, 4, json!({"value": 5}))]),
        );
        let translator = DictTranslator(vec![(es, en)]);
        let bridge = TranslationBridgeRecognizer::new(
            LanguageConfig::new("es", Some("es_ES")),
            Arc::new(translator),
            english_model(vec![RawEntity::new("five", 4, 8, "CARDINAL")], Arc::clone(&resolver)),
            resolver,
        )
        .unwrap();

        let out = bridge.parse(es, None, None).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].body, "cinco");
        assert_eq!(out[0].span, crate::span::Span::new(7, 11));
        assert_eq!(out[0].value, json!({"value": 5}));
    }

    #[test]
    fn test_align_by_translated_body() {
        let de = "Termin bei Acme";
        let en = "appointment at Acme";
        let resolver: Arc<dyn SystemEntityResolver> = Arc::new(MockResolver::new().with_response(
            de,
            vec![
                Candidate::new("org", "Termin", 0, 6, json!({"value": "x"})),
                Candidate::new("org", "Acme", 11, 15, json!({"value": "y"})),
            ],
        ));
        let bridge = TranslationBridgeRecognizer::new(
            LanguageConfig::new("de", None),
            Arc::new(DictTranslator(vec![(de, en)])),
            english_model(vec![RawEntity::new("Acme", 15, 19, "ORG")], Arc::clone(&resolver)),
            resolver,
        )
        .unwrap();

        let out = bridge.parse(de, None, None).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].body, "Acme");
        assert_eq!(out[0].span.start, 11);
    }

    #[test]
    fn test_unaligned_entities_dropped() {
        let resolver: Arc<dyn SystemEntityResolver> = Arc::new(MockResolver::new());
        let bridge = TranslationBridgeRecognizer::new(
            LanguageConfig::new("fr", None),
            Arc::new(NoOpTranslator),
            english_model(vec![RawEntity::new("Acme", 0, 4, "ORG")], Arc::clone(&resolver)),
            resolver,
        )
        .unwrap();
        assert!(bridge.parse("Acme", None, None).unwrap().is_empty());
    }

    #[test]
    fn test_supported_is_intersection() {
        let resolver: Arc<dyn SystemEntityResolver> =
            Arc::new(MockResolver::new().with_types(["sys_number", "sys_time"]));
        let bridge = TranslationBridgeRecognizer::new(
            LanguageConfig::new("fr", None),
            Arc::new(NoOpTranslator),
            english_model(vec![], Arc::clone(&resolver)),
            resolver,
        )
        .unwrap();
        let types: Vec<_> = bridge.supported_entity_types().iter().cloned().collect();
        assert_eq!(types, vec!["sys_number".to_string()]);
    }

    struct OfflineTranslator;

    impl Translator for OfflineTranslator {
        fn translate(&self, _text: &str, _target: &str) -> Result<String> {
            Err(Error::translation("service unreachable"))
        }
    }

    #[test]
    fn test_translation_failure_propagates() {
        let resolver: Arc<dyn SystemEntityResolver> = Arc::new(MockResolver::new());
        let bridge = TranslationBridgeRecognizer::new(
            LanguageConfig::new("it", None),
            Arc::new(OfflineTranslator),
            english_model(vec![], Arc::clone(&resolver)),
            resolver,
        )
        .unwrap();
        assert!(matches!(bridge.parse("ciao", None, None), Err(Error::Translation(_))));
    }

    #[test]
    fn test_translator_lookup() {
        assert!(translator_from_name("NoOpTranslator").is_ok());
        assert!(matches!(translator_from_name("GoogleTranslator"), Err(Error::Config(_))));
    }
}
