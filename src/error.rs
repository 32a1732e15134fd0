//! Error types for autoanno.

use thiserror::Error;

/// Result type for autoanno operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for autoanno operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Recognizer or model construction failed.
    #[error("Model initialization failed: {0}")]
    ModelInit(String),

    /// Invalid configuration (rule patterns, annotator class, translator name).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A line of annotated markup could not be parsed.
    #[error("Markup error: {0}")]
    Markup(String),

    /// The rule-based system entity resolver failed.
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// The translation service failed.
    #[error("Translation error: {0}")]
    Translation(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be deserialized.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a model initialization error.
    pub fn model_init(msg: impl Into<String>) -> Self {
        Error::ModelInit(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a markup error.
    pub fn markup(msg: impl Into<String>) -> Self {
        Error::Markup(msg.into())
    }

    /// Create a resolver error.
    pub fn resolver(msg: impl Into<String>) -> Self {
        Error::Resolver(msg.into())
    }

    /// Create a translation error.
    pub fn translation(msg: impl Into<String>) -> Self {
        Error::Translation(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
