//! Annotator configuration.
//!
//! Loaded from `<app>/annotator.toml`; every field is optional.
//!
//! ```toml
//! annotator_class = "MultiLingualAnnotator"
//! language = "es"
//! locale = "es_MX"
//! model_size = "md"
//! translator = "NoOpTranslator"
//! overwrite = false
//! unannotate_supported_entities_only = true
//!
//! [[annotate]]
//! domains = ".*"
//! intents = ".*"
//! files = ".*"
//! entities = "*"
//!
//! [[unannotate]]
//! domains = "weather"
//! intents = ".*"
//! files = "train.txt"
//! entities = "sys_time"
//! ```

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::lang::LanguageConfig;
use crate::rules::AnnotationRule;
use crate::schema::{ENGLISH, ENGLISH_US_LOCALE};
use crate::Result;

/// Run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// `MultiLingualAnnotator`, `SpacyAnnotator` or `BootstrapAnnotator`.
    pub annotator_class: String,
    /// Application language (ISO 639-1).
    pub language: String,
    /// Application locale; dropped when it does not match `language`.
    pub locale: Option<String>,
    /// Model size: `sm`, `md` or `lg`.
    pub model_size: String,
    /// Translator for languages recognized through English.
    pub translator: Option<String>,
    /// Fresh annotations replace overlapping existing ones.
    pub overwrite: bool,
    /// Wildcard unannotation only removes types the recognizer supports.
    pub unannotate_supported_entities_only: bool,
    /// Minimum confidence for `BootstrapAnnotator` predictions.
    pub confidence_threshold: f64,
    /// Annotation rules.
    pub annotate: Vec<AnnotationRule>,
    /// Unannotation rules.
    pub unannotate: Vec<AnnotationRule>,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            annotator_class: "MultiLingualAnnotator".to_string(),
            language: ENGLISH.to_string(),
            locale: Some(ENGLISH_US_LOCALE.to_string()),
            model_size: "lg".to_string(),
            translator: None,
            overwrite: false,
            unannotate_supported_entities_only: true,
            confidence_threshold: 0.0,
            annotate: vec![AnnotationRule::wildcard()],
            unannotate: Vec::new(),
        }
    }
}

impl AnnotatorConfig {
    /// Config file name inside an application directory.
    pub const FILE_NAME: &'static str = "annotator.toml";

    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        info!("[config] loaded {}", path.display());
        Ok(config)
    }

    /// Load `<app>/annotator.toml`, or the defaults if there is none.
    pub fn load_for_app(app: impl AsRef<Path>) -> Result<Self> {
        let path = app.as_ref().join(Self::FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            info!("[config] no {} in {}, using defaults", Self::FILE_NAME, app.as_ref().display());
            Ok(Self::default())
        }
    }

    /// Language and (matching) locale.
    #[must_use]
    pub fn language_config(&self) -> LanguageConfig {
        LanguageConfig::new(&self.language, self.locale.as_deref())
    }

    /// Options for [`Annotator::annotate`](crate::Annotator::annotate).
    #[must_use]
    pub fn annotate_options(&self) -> AnnotateOptions {
        AnnotateOptions {
            rules: self.annotate.clone(),
            overwrite: self.overwrite,
        }
    }

    /// Options for [`Annotator::unannotate`](crate::Annotator::unannotate).
    #[must_use]
    pub fn unannotate_options(&self) -> UnannotateOptions {
        UnannotateOptions {
            rules: self.unannotate.clone(),
            unannotate_supported_entities_only: self.unannotate_supported_entities_only,
            unannotate_all: false,
        }
    }
}

/// Options for one annotation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotateOptions {
    /// File/entity selection rules, in order.
    pub rules: Vec<AnnotationRule>,
    /// Fresh annotations win over overlapping existing ones.
    pub overwrite: bool,
}

impl AnnotateOptions {
    /// Override the overwrite policy.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Options for one unannotation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnannotateOptions {
    /// File/entity selection rules, in order.
    pub rules: Vec<AnnotationRule>,
    /// With a wildcard selection, only remove types the recognizer supports.
    pub unannotate_supported_entities_only: bool,
    /// Remove every entity from every file, ignoring `rules`.
    pub unannotate_all: bool,
}

impl UnannotateOptions {
    /// Remove every entity everywhere.
    #[must_use]
    pub fn all() -> Self {
        Self {
            unannotate_all: true,
            ..Self::default()
        }
    }

    /// Set the supported-only policy.
    #[must_use]
    pub fn with_supported_only(mut self, supported_only: bool) -> Self {
        self.unannotate_supported_entities_only = supported_only;
        self
    }

    /// Options with `unannotate_all` expanded: a single wildcard rule and
    /// no supported-only restriction.
    #[must_use]
    pub fn effective(&self) -> UnannotateOptions {
        if self.unannotate_all {
            UnannotateOptions {
                rules: vec![AnnotationRule::wildcard()],
                unannotate_supported_entities_only: false,
                unannotate_all: true,
            }
        } else {
            self.clone()
        }
    }
}
