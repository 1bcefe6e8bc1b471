//! Runtime configuration.
//!
//! Defaults match the invoice sheets the tool was built for. A few knobs can
//! be overridden from the environment (or a `.env` file):
//!
//! | Variable                 | Default | Meaning                                   |
//! |--------------------------|---------|-------------------------------------------|
//! | `SALESCHECK_THRESHOLD`   | `0.25`  | relative price spread counted significant |
//! | `SALESCHECK_SAMPLE_SIZE` | `50`    | records handed to the insight context     |

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::validation::HeaderContract;

/// Relative spread `(max - min) / min` above which a price drift is significant.
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: f64 = 0.25;

/// Number of records included in the insight context sample.
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

/// Default port for the HTTP API.
pub const DEFAULT_PORT: u16 = 3000;

const THRESHOLD_VAR: &str = "SALESCHECK_THRESHOLD";
const SAMPLE_SIZE_VAR: &str = "SALESCHECK_SAMPLE_SIZE";

/// Options for one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Required columns and their display labels.
    pub headers: HeaderContract,

    /// Spread above which an inconsistent item is flagged significant.
    pub significance_threshold: f64,

    /// Records shown to the question-answering collaborator.
    pub sample_size: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            headers: HeaderContract::default(),
            significance_threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl CheckOptions {
    /// Build options from defaults plus environment overrides.
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let mut options = Self::default();
        if let Ok(raw) = env::var(THRESHOLD_VAR) {
            options.significance_threshold = parse_threshold(&raw)?;
        }
        if let Ok(raw) = env::var(SAMPLE_SIZE_VAR) {
            options.sample_size = parse_sample_size(&raw)?;
        }
        Ok(options)
    }
}

fn parse_threshold(raw: &str) -> ConfigResult<f64> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: THRESHOLD_VAR.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let value: f64 = raw.trim().parse().map_err(|_| invalid("not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid("must be a non-negative finite number"));
    }
    Ok(value)
}

fn parse_sample_size(raw: &str) -> ConfigResult<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key: SAMPLE_SIZE_VAR.to_string(),
            value: raw.to_string(),
            reason: "must be a positive integer".to_string(),
        }),
    }
}
