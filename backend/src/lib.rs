//! # Salescheck - sales invoice sheet validation
//!
//! Salescheck reads exported invoice spreadsheets (CSV), turns each row into a
//! typed invoice record and reports what is wrong with the sheet: unparsable
//! numbers, missing columns and items sold at inconsistent prices.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV bytes  │────▶│   Parser    │────▶│  Validation │────▶│   Report    │
//! │  (any enc)  │     │  (grid)     │     │  (+ prices) │     │ (rows+diag) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                                   │
//!                                              ┌────────────────────┼──────────┐
//!                                              ▼                    ▼          ▼
//!                                          export CSV         insight prompt   API
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use salescheck::{parse_csv, validate};
//!
//! let grid = parse_csv("Item,Harga\nBawang,100");
//! let report = validate(&grid);
//!
//! // required columns are missing
//! assert!(report.invoices.is_empty());
//! assert_eq!(report.diagnostics.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Check options and environment overrides
//! - [`models`] - Invoice records and diagnostics
//! - [`parser`] - CSV tokenizer and byte decoding
//! - [`validation`] - Row validation and price consistency
//! - [`export`] - CSV export with warning labels
//! - [`insights`] - Context sample and prompt for question answering
//! - [`pipeline`] - Decode, tokenize and validate in one call
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Downstream consumers
pub mod export;
pub mod insights;

pub mod pipeline;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, CsvError, ExportError, PipelineError, PipelineResult, ServerError,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::CheckOptions;

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Diagnostic, Invoice, PriceInconsistency, Report, RowError, Summary, WarningLabel,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{decode_bytes, decode_content, detect_encoding, parse_csv, parse_line, Grid, Row};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{parse_lenient, validate, validate_with, Column, HeaderContract};

// =============================================================================
// Re-exports - Export / Insights
// =============================================================================

pub use export::to_csv;
pub use insights::{build_prompt, context_sample};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{check_bytes, check_file, check_text, CheckResult, CsvInfo};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, CheckRequest, CheckResponse, CheckStatus, CsvMetadata, ResponseMetadata};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
