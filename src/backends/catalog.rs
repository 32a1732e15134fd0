//! Model catalog and recognizer factory.
//!
//! # Model names
//!
//! Pretrained models follow `<lang>_core_<genre>_<size>`:
//!
//! | Language | Genre | Example |
//! |----------|-------|---------|
//! | `en`, `zh` | `web` | `en_core_web_lg` |
//! | everything else in the catalog | `news` | `de_core_news_sm` |
//!
//! A [`ModelLoader`] turns a name into a [`NerModel`]. The built-in loader
//! serves the English names with [`HeuristicNerModel`]; plug in a loader of
//! your own for real models.
//!
//! # Annotator classes
//!
//! | `annotator_class` | Recognizer |
//! |-------------------|------------|
//! | `MultiLingualAnnotator` | [`CompositeRecognizer`] |
//! | `SpacyAnnotator` | [`ModelRecognizer`] |
//! | `BootstrapAnnotator` | [`BootstrapRecognizer`] |

use std::sync::Arc;

use log::info;

use super::bootstrap::{BootstrapRecognizer, NluProcessor};
use super::composite::{CompositeRecognizer, GapFiller};
use super::heuristic::HeuristicNerModel;
use super::model::{ModelRecognizer, NerModel};
use super::rule::RuleRecognizer;
use super::translation::{translator_from_name, TranslationBridgeRecognizer};
use crate::config::AnnotatorConfig;
use crate::lang::LanguageConfig;
use crate::resolver::SystemEntityResolver;
use crate::schema::{MODEL_LANGUAGES, MODEL_SIZES, WEB_MODEL_LANGUAGES};
use crate::{Error, Recognizer, Result};

/// Catalog name of the model for `language` at `size`.
///
/// ```rust
/// use autoanno::backends::model_name;
///
/// assert_eq!(model_name("en", "lg").unwrap(), "en_core_web_lg");
/// assert_eq!(model_name("de", "sm").unwrap(), "de_core_news_sm");
/// assert!(model_name("tlh", "sm").is_err());
/// ```
pub fn model_name(language: &str, size: &str) -> Result<String> {
    if !MODEL_LANGUAGES.contains(&language) {
        return Err(Error::model_init(format!(
            "no pretrained model for language {language:?}"
        )));
    }
    if !MODEL_SIZES.contains(&size) {
        return Err(Error::model_init(format!(
            "{size:?} is not a valid model size, select from: {}",
            MODEL_SIZES.join(" ")
        )));
    }
    let genre = if WEB_MODEL_LANGUAGES.contains(&language) {
        "web"
    } else {
        "news"
    };
    Ok(format!("{language}_core_{genre}_{size}"))
}

/// Loads NER models by catalog name.
pub trait ModelLoader {
    /// Load the model called `name`.
    fn load(&self, name: &str) -> Result<Box<dyn NerModel>>;
}

/// Loader for the models shipped with this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinModelLoader;

impl ModelLoader for BuiltinModelLoader {
    fn load(&self, name: &str) -> Result<Box<dyn NerModel>> {
        if name.starts_with("en_core_web_") {
            info!("[model] serving {name} with the heuristic English model");
            return Ok(Box::new(HeuristicNerModel::new()));
        }
        Err(Error::model_init(format!(
            "model {name:?} is not available; provide a ModelLoader that can load it"
        )))
    }
}

fn model_recognizer(
    loader: &dyn ModelLoader,
    language: LanguageConfig,
    size: &str,
    resolver: Arc<dyn SystemEntityResolver>,
) -> Result<ModelRecognizer> {
    let name = model_name(&language.language, size)?;
    info!("[model] loading {name}");
    let model = loader.load(&name)?;
    Ok(ModelRecognizer::new(model, resolver, language))
}

fn multilingual(
    config: &AnnotatorConfig,
    language: LanguageConfig,
    loader: &dyn ModelLoader,
    resolver: Arc<dyn SystemEntityResolver>,
) -> Result<CompositeRecognizer> {
    let english = language.is_english();
    let native = model_recognizer(loader, language.clone(), &config.model_size, Arc::clone(&resolver))?;
    let builder = CompositeRecognizer::builder().model(native);
    if english {
        return builder.build();
    }

    let filler = match &config.translator {
        Some(name) => {
            let translator = translator_from_name(name)?;
            let english_model = model_recognizer(
                loader,
                LanguageConfig::english(),
                &config.model_size,
                Arc::clone(&resolver),
            )?;
            GapFiller::Bridge(TranslationBridgeRecognizer::new(
                language,
                translator,
                english_model,
                resolver,
            )?)
        }
        None => GapFiller::Rules(RuleRecognizer::new(resolver, language)),
    };
    builder.gap_filler(filler).build()
}

/// Build the recognizer selected by `config.annotator_class`.
///
/// `nlu` is only consulted by `BootstrapAnnotator`, which fails without it.
pub fn build_recognizer(
    config: &AnnotatorConfig,
    loader: &dyn ModelLoader,
    resolver: Arc<dyn SystemEntityResolver>,
    nlu: Option<Arc<dyn NluProcessor>>,
) -> Result<Box<dyn Recognizer>> {
    let language = config.language_config();
    info!(
        "[annotate] building {} for {}",
        config.annotator_class, language.language
    );

    match config.annotator_class.as_str() {
        "MultiLingualAnnotator" => Ok(Box::new(multilingual(config, language, loader, resolver)?)),
        "SpacyAnnotator" => Ok(Box::new(model_recognizer(
            loader,
            language,
            &config.model_size,
            resolver,
        )?)),
        "BootstrapAnnotator" => {
            let nlu = nlu.ok_or_else(|| {
                Error::config("BootstrapAnnotator needs the application's NLU processor")
            })?;
            Ok(Box::new(BootstrapRecognizer::new(nlu, config.confidence_threshold)?))
        }
        other => Err(Error::config(format!("unknown annotator class {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::model::MockNerModel;
    use crate::resolver::{MockResolver, PatternResolver};

    /// Serves a labelled mock for every name and records what was asked for.
    #[derive(Default)]
    struct RecordingLoader {
        asked: std::sync::Mutex<Vec<String>>,
    }

    impl ModelLoader for RecordingLoader {
        fn load(&self, name: &str) -> Result<Box<dyn NerModel>> {
            self.asked.lock().unwrap().push(name.to_string());
            Ok(Box::new(MockNerModel::new().with_labels(["PER", "DATE"])))
        }
    }

    fn config(class: &str, language: &str) -> AnnotatorConfig {
        AnnotatorConfig {
            annotator_class: class.to_string(),
            language: language.to_string(),
            locale: None,
            ..AnnotatorConfig::default()
        }
    }

    #[test]
    fn test_model_names() {
        assert_eq!(model_name("zh", "md").unwrap(), "zh_core_web_md");
        assert_eq!(model_name("es", "lg").unwrap(), "es_core_news_lg");
        assert!(matches!(model_name("en", "xl"), Err(Error::ModelInit(_))));
        assert!(matches!(model_name("ko", "sm"), Err(Error::ModelInit(_))));
    }

    #[test]
    fn test_builtin_loader() {
        assert!(BuiltinModelLoader.load("en_core_web_sm").is_ok());
        assert!(matches!(BuiltinModelLoader.load("de_core_news_sm"), Err(Error::ModelInit(_))));
    }

    #[test]
    fn test_english_multilingual_loads_one_model() {
        let loader = RecordingLoader::default();
        let rec = build_recognizer(
            &config("MultiLingualAnnotator", "en"),
            &loader,
            Arc::new(PatternResolver::new()),
            None,
        )
        .unwrap();
        assert_eq!(rec.name(), "composite");
        assert_eq!(*loader.asked.lock().unwrap(), vec!["en_core_web_lg".to_string()]);
    }

    #[test]
    fn test_non_english_without_translator_uses_rules() {
        let loader = RecordingLoader::default();
        let rec = build_recognizer(
            &config("MultiLingualAnnotator", "de"),
            &loader,
            Arc::new(MockResolver::new().with_types(["sys_number"])),
            None,
        )
        .unwrap();
        assert_eq!(*loader.asked.lock().unwrap(), vec!["de_core_news_lg".to_string()]);
        assert!(rec.is_valid_entity("sys_number"));
        assert!(rec.is_valid_entity("sys_person"));
    }

    #[test]
    fn test_translator_loads_english_model_too() {
        let loader = RecordingLoader::default();
        let mut cfg = config("MultiLingualAnnotator", "fr");
        cfg.translator = Some("NoOpTranslator".to_string());
        build_recognizer(&cfg, &loader, Arc::new(MockResolver::new()), None).unwrap();
        assert_eq!(
            *loader.asked.lock().unwrap(),
            vec!["fr_core_news_lg".to_string(), "en_core_web_lg".to_string()]
        );

        cfg.translator = Some("Babelfish".to_string());
        let err = build_recognizer(&cfg, &loader, Arc::new(MockResolver::new()), None);
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_spacy_and_unknown_classes() {
        let rec = build_recognizer(
            &config("SpacyAnnotator", "en"),
            &BuiltinModelLoader,
            Arc::new(PatternResolver::new()),
            None,
        )
        .unwrap();
        assert_eq!(rec.name(), "model");

        let err = build_recognizer(
            &config("FancyAnnotator", "en"),
            &BuiltinModelLoader,
            Arc::new(PatternResolver::new()),
            None,
        );
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_bootstrap_requires_nlu() {
        let err = build_recognizer(
            &config("BootstrapAnnotator", "en"),
            &BuiltinModelLoader,
            Arc::new(PatternResolver::new()),
            None,
        );
        assert!(matches!(err, Err(Error::Config(_))));
    }
}
