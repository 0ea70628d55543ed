//! Error types for STORM rendering.

use thiserror::Error;

/// Result type alias using StormError.
pub type StormResult<T> = Result<T, StormError>;

/// Primary error type for rendering operations.
#[derive(Debug, Error)]
pub enum StormError {
    // === Configuration Errors ===
    #[error("Unrecognized parameter: '{0}'")]
    UnknownParameter(String),

    #[error("Parameters must be given as name/value pairs, got {0} tokens")]
    OddArgumentCount(usize),

    #[error("Invalid value for '{param}': expected {expected}, got {value}")]
    InvalidParameter {
        param: String,
        expected: String,
        value: String,
    },

    // === Data Shape Errors ===
    #[error("Channel {channel}: field '{field}' has {actual} entries, expected {expected}")]
    LengthMismatch {
        channel: usize,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Channel {channel}: filter has {actual} entries, expected {expected}")]
    FilterLengthMismatch {
        channel: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Channel {channel}: required field '{field}' is missing")]
    MissingField { channel: usize, field: &'static str },

    // === Rendering Errors ===
    #[error("Invalid image axes: {0}")]
    InvalidAxes(String),

    #[error("Image encoding failed: {0}")]
    EncodeError(String),

    // === Infrastructure Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl StormError {
    /// Whether this error was raised while validating configuration,
    /// i.e. before any rendering work started.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StormError::UnknownParameter(_)
                | StormError::OddArgumentCount(_)
                | StormError::InvalidParameter { .. }
        )
    }

    /// Whether this error describes malformed molecule data.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            StormError::LengthMismatch { .. }
                | StormError::FilterLengthMismatch { .. }
                | StormError::MissingField { .. }
        )
    }

    /// Shorthand for an `InvalidParameter` error.
    pub fn invalid(param: &str, expected: impl Into<String>, value: impl ToString) -> Self {
        StormError::InvalidParameter {
            param: param.to_string(),
            expected: expected.into(),
            value: value.to_string(),
        }
    }
}
