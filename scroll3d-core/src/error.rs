use thiserror::Error;

/// Startup failures. Any of these aborts initialization.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no sections configured")]
    NoSections,

    #[error("no model bindings configured")]
    NoBindings,

    #[error("{sections} sections but {bindings} model bindings")]
    LengthMismatch { sections: usize, bindings: usize },

    #[error("model binding {index}: {message}")]
    InvalidOrbit { index: usize, message: String },

    #[error("invalid setting `{field}`: {message}")]
    InvalidSetting { field: &'static str, message: String },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A model resource the display surface could not load
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to load model {source_ref}: {reason}")]
pub struct ResourceLoadError {
    pub source_ref: String,
    pub reason: String,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
