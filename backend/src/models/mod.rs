//! Domain models for the salescheck pipeline.
//!
//! - [`Invoice`] - One validated invoice line with its price flags
//! - [`Diagnostic`] - Row error or price-inconsistency finding
//! - [`Report`] - Records and diagnostics returned by a validation run
//! - [`WarningLabel`] - Per-record warning derived from the price flags

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Invoice
// =============================================================================

/// One validated invoice line.
///
/// Only built for rows where quantity, price, total and final total all
/// parsed as finite numbers. Dates are kept as the sheet wrote them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub request_date: String,
    pub completion_date: String,
    pub customer: String,
    /// Item name, original case preserved.
    pub item: String,
    pub quantity: f64,
    pub unit: String,
    pub price: f64,
    pub total: f64,
    /// Zero when blank or unparsable.
    pub discount: f64,
    /// Zero when blank or unparsable.
    pub service_fee: f64,
    pub final_total: f64,
    /// The item was seen with more than one distinct price.
    pub has_price_inconsistency: bool,
    /// The item's price spread exceeds the significance threshold.
    pub has_significant_price_inconsistency: bool,
}

impl Invoice {
    /// Warning attached to this line when exported.
    pub fn warning(&self) -> WarningLabel {
        if self.has_significant_price_inconsistency {
            WarningLabel::Significant
        } else if self.has_price_inconsistency {
            WarningLabel::Inconsistent
        } else {
            WarningLabel::None
        }
    }
}

// =============================================================================
// Warning Label
// =============================================================================

/// Export warning for an invoice line, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLabel {
    Significant,
    Inconsistent,
    None,
}

impl WarningLabel {
    /// Text written into the `Peringatan` column.
    ///
    /// `threshold` is the significance threshold in effect, as a fraction.
    pub fn text(&self, threshold: f64) -> String {
        match self {
            Self::Significant => format!(
                "Perbedaan harga signifikan (>{}%) untuk item ini.",
                percent(threshold)
            ),
            Self::Inconsistent => {
                "Harga tidak konsisten dengan entri lain untuk item ini.".to_string()
            }
            Self::None => String::new(),
        }
    }
}

/// `0.05` -> `5`; rounded so float noise never reaches the label.
fn percent(fraction: f64) -> String {
    let value = (fraction * 100.0 * 1e6).round() / 1e6;
    value.to_string()
}

// =============================================================================
// Diagnostics
// =============================================================================

/// A problem tied to one row of the sheet.
///
/// Row numbers are 1-based with the header as row 1, so the first data row
/// is row 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub row: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
}

impl RowError {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
            column: None,
            value: None,
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)
    }
}

/// An item sold at more than one distinct price across the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceInconsistency {
    /// First spelling of the item found in the sheet.
    pub item_name: String,
    /// Distinct prices, ascending.
    pub prices: Vec<f64>,
    pub is_significant: bool,
}

impl PriceInconsistency {
    pub fn min_price(&self) -> Option<f64> {
        self.prices.first().copied()
    }

    pub fn max_price(&self) -> Option<f64> {
        self.prices.last().copied()
    }
}

impl fmt::Display for PriceInconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prices: Vec<String> = self.prices.iter().map(|p| p.to_string()).collect();
        write!(
            f,
            "Inconsistent prices for item '{}': {}{}",
            self.item_name,
            prices.join(", "),
            if self.is_significant { " (significant)" } else { "" }
        )
    }
}

/// Anything the validator reports about a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    RowError(RowError),
    PriceInconsistency(PriceInconsistency),
}

impl Diagnostic {
    /// Row of a row error; `None` for dataset-wide findings.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::RowError(e) => Some(e.row),
            Self::PriceInconsistency(_) => None,
        }
    }

    pub fn as_row_error(&self) -> Option<&RowError> {
        match self {
            Self::RowError(e) => Some(e),
            Self::PriceInconsistency(_) => None,
        }
    }

    pub fn as_price_inconsistency(&self) -> Option<&PriceInconsistency> {
        match self {
            Self::PriceInconsistency(p) => Some(p),
            Self::RowError(_) => None,
        }
    }
}

impl From<RowError> for Diagnostic {
    fn from(e: RowError) -> Self {
        Self::RowError(e)
    }
}

impl From<PriceInconsistency> for Diagnostic {
    fn from(p: PriceInconsistency) -> Self {
        Self::PriceInconsistency(p)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowError(e) => e.fmt(f),
            Self::PriceInconsistency(p) => p.fmt(f),
        }
    }
}

// =============================================================================
// Report
// =============================================================================

/// Output of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub invoices: Vec<Invoice>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Headline numbers for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Valid invoice lines.
    pub records: usize,
    /// Every diagnostic: price findings plus row errors.
    pub warnings: usize,
    /// Invoice lines carrying a price-inconsistency flag.
    pub flagged_records: usize,
    /// Of those, lines with a significant spread.
    pub significant_records: usize,
}

impl Report {
    pub fn summary(&self) -> Summary {
        Summary {
            records: self.invoices.len(),
            warnings: self.diagnostics.len(),
            flagged_records: self
                .invoices
                .iter()
                .filter(|i| i.has_price_inconsistency)
                .count(),
            significant_records: self
                .invoices
                .iter()
                .filter(|i| i.has_significant_price_inconsistency)
                .count(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn row_errors(&self) -> impl Iterator<Item = &RowError> {
        self.diagnostics.iter().filter_map(Diagnostic::as_row_error)
    }

    pub fn price_inconsistencies(&self) -> impl Iterator<Item = &PriceInconsistency> {
        self.diagnostics
            .iter()
            .filter_map(Diagnostic::as_price_inconsistency)
    }
}

// =============================================================================
// Tests
// =============================================================================
