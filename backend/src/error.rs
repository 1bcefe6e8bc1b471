//! Error types for the salescheck pipeline.
//!
//! Data-quality problems in a sheet (bad headers, unparsable numbers, price
//! drift) are never errors: they are reported as
//! [`Diagnostic`](crate::models::Diagnostic) values. The types here cover the
//! few ways a run can fail outright:
//!
//! - [`CsvError`] - input could not be read or decoded into text
//! - [`ExportError`] - validated records could not be serialized back to CSV
//! - [`ConfigError`] - an environment override has an invalid value
//! - [`PipelineError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP API errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while turning raw input into text.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Bytes are not valid in the detected encoding.
    #[error("Input is not valid {encoding} text")]
    Encoding { encoding: String },

    /// Detected encoding has no decoder.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing records back to CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writer failure.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Writer could not be flushed into its buffer.
    #[error("Failed to flush CSV output: {0}")]
    Flush(String),

    /// Output was not valid UTF-8.
    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors from environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable holds a value of the wrong shape.
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// Returned by [`crate::pipeline::check_file`] and friends.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Export error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Socket bind or serve failure.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input decoding.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for CSV export.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::Encoding {
            encoding: "utf-8".into(),
        };
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("utf-8"));

        // ConfigError -> PipelineError -> ServerError
        let config_err = ConfigError::InvalidValue {
            key: "SALESCHECK_THRESHOLD".into(),
            value: "abc".into(),
            reason: "not a number".into(),
        };
        let server_err: ServerError = PipelineError::from(config_err).into();
        assert!(server_err.to_string().contains("SALESCHECK_THRESHOLD"));
    }

    #[test]
    fn test_config_error_format() {
        let err = ConfigError::InvalidValue {
            key: "SALESCHECK_SAMPLE_SIZE".into(),
            value: "-3".into(),
            reason: "must be a positive integer".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SALESCHECK_SAMPLE_SIZE"));
        assert!(msg.contains("'-3'"));
        assert!(msg.contains("must be a positive integer"));
    }
}
