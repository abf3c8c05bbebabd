use thiserror::Error;

use crate::types::{AttributeId, StoreId};

/// Top-level error type returned by the attribute mapper and its collaborators.
#[derive(Debug, Error)]
pub enum MapperError {
    /// The attribute store has no attribute with this id for the requested store.
    #[error("attribute {attribute_id} not found for store {store_id}")]
    AttributeNotFound { attribute_id: AttributeId, store_id: StoreId },

    /// Option text was requested for an attribute that has no option source.
    #[error("attribute '{attribute_code}' has no option source")]
    MissingOptionSource { attribute_code: String },

    /// Underlying attribute storage failed.
    #[error("attribute storage error: {message}")]
    Storage { message: String },

    /// An option source failed while resolving a display text.
    #[error("option source for '{attribute_code}' failed on option '{option_id}': {message}")]
    OptionSource {
        attribute_code: String,
        option_id: String,
        message: String,
    },

    /// Mapper configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Failures raised while reading TOML configuration or catalog fixtures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias for mapper operations.
pub type MapperResult<T> = Result<T, MapperError>;
