//! High-level API: input in, validated report out.
//!
//! Combines decoding, tokenizing and validation, and reports progress
//! through the log broadcaster. The tokenizer and validator themselves stay
//! silent.
//!
//! # Example
//!
//! ```rust,ignore
//! use salescheck::pipeline::check_file;
//! use salescheck::CheckOptions;
//! use std::path::Path;
//!
//! let result = check_file(Path::new("penjualan.csv"), None, &CheckOptions::default())?;
//! println!("{} valid rows", result.report.invoices.len());
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::api::logs::{log_error, log_info, log_info_indent, log_success, log_warning, log_warning_indent};
use crate::config::CheckOptions;
use crate::error::{CsvError, PipelineResult};
use crate::export;
use crate::models::{Report, Summary};
use crate::parser::{decode_bytes_as, parse_csv};
use crate::validation::validate_with;

/// Row errors echoed to the log before the rest are summarized.
const LOGGED_ROW_ERRORS: usize = 5;

/// Input metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvInfo {
    pub encoding: String,
    /// Header row as written, empty when the input had no lines.
    pub columns: Vec<String>,
    /// Non-blank lines after the header.
    pub row_count: usize,
}

/// Result of checking one document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub report: Report,
    pub csv_info: CsvInfo,
}

impl CheckResult {
    pub fn summary(&self) -> Summary {
        self.report.summary()
    }

    /// Validated invoices as CSV with warning labels.
    pub fn to_csv(&self, options: &CheckOptions) -> PipelineResult<String> {
        Ok(export::to_csv(&self.report.invoices, options)?)
    }
}

/// Check a document that is already text.
pub fn check_text(text: &str, options: &CheckOptions) -> CheckResult {
    check_decoded(text, "utf-8".to_string(), options)
}

/// Check raw bytes.
///
/// With `encoding: None` the encoding is detected; an explicit encoding that
/// does not fit the bytes is an error.
pub fn check_bytes(
    bytes: &[u8],
    encoding: Option<&str>,
    options: &CheckOptions,
) -> PipelineResult<CheckResult> {
    if encoding.is_none() {
        log_info("Detecting encoding...");
    }
    let decoded = decode_bytes_as(bytes, encoding)?;
    log_success(format!("Encoding: {}", decoded.encoding));
    Ok(check_decoded(&decoded.text, decoded.encoding, options))
}

/// Check a file on disk.
pub fn check_file(
    path: &Path,
    encoding: Option<&str>,
    options: &CheckOptions,
) -> PipelineResult<CheckResult> {
    log_info(format!("📄 Reading {}", path.display()));
    let bytes = std::fs::read(path).map_err(CsvError::from)?;
    check_bytes(&bytes, encoding, options)
}

fn check_decoded(text: &str, encoding: String, options: &CheckOptions) -> CheckResult {
    let grid = parse_csv(text);
    log_success(format!("Tokenized {} non-blank lines", grid.len()));

    let csv_info = CsvInfo {
        encoding,
        columns: grid.first().cloned().unwrap_or_default(),
        row_count: grid.len().saturating_sub(1),
    };

    log_info("✔️  Validating rows...");
    let report = validate_with(&grid, options);
    print_report(&report);

    CheckResult { report, csv_info }
}

fn print_report(report: &Report) {
    let summary = report.summary();
    log_success(format!("{} valid invoice rows", summary.records));

    for finding in report.price_inconsistencies() {
        let prices: Vec<String> = finding.prices.iter().map(|p| export::format_number(*p)).collect();
        let message = format!("Price drift for '{}': {}", finding.item_name, prices.join(", "));
        if finding.is_significant {
            log_warning_indent(format!("{} (significant)", message), 1);
        } else {
            log_info_indent(message, 1);
        }
    }

    let row_errors: Vec<_> = report.row_errors().collect();
    if row_errors.is_empty() {
        if report.is_clean() {
            log_success("No problems found");
        }
        return;
    }

    log_warning(format!("{} row problems", row_errors.len()));
    for err in row_errors.iter().take(LOGGED_ROW_ERRORS) {
        log_error(err.to_string());
    }

    if row_errors.len() > LOGGED_ROW_ERRORS {
        // remaining problems grouped by column
        let mut by_column: BTreeMap<&str, usize> = BTreeMap::new();
        for err in &row_errors[LOGGED_ROW_ERRORS..] {
            *by_column.entry(err.column.as_deref().unwrap_or("-")).or_default() += 1;
        }
        for (column, count) in by_column {
            log_warning_indent(format!("+{} more in '{}'", count, column), 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SHEET: &str = "Tgl Permintaan,Tgl Selesai,Pemesan / Cabang,Item,Jumlah,Satuan,Harga,Total,Diskon,Biaya Jasa,Total + Biaya Jasa - Diskon\n\
        1/1,1/2,Toko A,Wortel,1,kg,10,10,0,0,10\n\
        1/1,1/2,Toko B,Bawang,10,kg,\"Rp 5.000\",50000,,,50000\n";

    #[test]
    fn test_check_text() {
        let result = check_text(SHEET, &CheckOptions::default());

        assert_eq!(result.csv_info.encoding, "utf-8");
        assert_eq!(result.csv_info.row_count, 2);
        assert_eq!(result.csv_info.columns.len(), 11);
        assert!(result.report.is_clean());

        let items: Vec<&str> = result.report.invoices.iter().map(|i| i.item.as_str()).collect();
        assert_eq!(items, vec!["Bawang", "Wortel"]);
    }

    #[test]
    fn test_check_bytes_latin1() {
        let mut bytes = SHEET.as_bytes().to_vec();
        // "Caf\xe9" is not UTF-8
        bytes.extend_from_slice(b"1/1,1/2,Caf\xe9,Tomat,1,kg,5,5,0,0,5\n");

        let result = check_bytes(&bytes, None, &CheckOptions::default()).unwrap();
        assert_ne!(result.csv_info.encoding, "utf-8");
        assert_eq!(result.report.invoices.len(), 3);
    }

    #[test]
    fn test_check_bytes_wrong_explicit_encoding() {
        let err = check_bytes(b"Item\n\xff\xfe", Some("utf-8"), &CheckOptions::default())
            .unwrap_err();
        assert!(matches!(err, crate::error::PipelineError::Csv(CsvError::Encoding { .. })));
    }

    #[test]
    fn test_check_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SHEET.as_bytes()).unwrap();

        let result = check_file(file.path(), None, &CheckOptions::default()).unwrap();
        assert_eq!(result.report.invoices.len(), 2);
    }

    #[test]
    fn test_check_missing_file() {
        let err = check_file(Path::new("/definitely/not/here.csv"), None, &CheckOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_to_csv_uses_sorted_records() {
        let options = CheckOptions::default();
        let csv = check_text(SHEET, &options).to_csv(&options).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(",Bawang,"));
        assert!(lines[2].contains(",Wortel,"));
    }

    #[test]
    fn test_many_row_errors_still_reported() {
        let mut sheet = String::from(SHEET);
        for _ in 0..8 {
            sheet.push_str("1/1,1/2,Toko C,Jeruk,x,kg,1,1,0,0,1\n");
        }
        let result = check_text(&sheet, &CheckOptions::default());
        assert_eq!(result.report.row_errors().count(), 8);
        assert_eq!(result.report.invoices.len(), 2);
    }
}
