//! Header contract and column resolution.

use serde::{Deserialize, Serialize};

/// Logical columns every invoice sheet must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    RequestDate,
    CompletionDate,
    Customer,
    Item,
    Quantity,
    Unit,
    Price,
    Total,
    Discount,
    ServiceFee,
    FinalTotal,
}

impl Column {
    /// Contract order.
    pub const ALL: [Column; 11] = [
        Column::RequestDate,
        Column::CompletionDate,
        Column::Customer,
        Column::Item,
        Column::Quantity,
        Column::Unit,
        Column::Price,
        Column::Total,
        Column::Discount,
        Column::ServiceFee,
        Column::FinalTotal,
    ];

    fn ordinal(self) -> usize {
        self as usize
    }

    /// Header as written in the sheets this tool reads.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::RequestDate => "Tgl Permintaan",
            Self::CompletionDate => "Tgl Selesai",
            Self::Customer => "Pemesan / Cabang",
            Self::Item => "Item",
            Self::Quantity => "Jumlah",
            Self::Unit => "Satuan",
            Self::Price => "Harga",
            Self::Total => "Total",
            Self::Discount => "Diskon",
            Self::ServiceFee => "Biaya Jasa",
            Self::FinalTotal => "Total + Biaya Jasa - Diskon",
        }
    }
}

/// Normalizes a header cell for matching.
pub fn normalize_header(value: &str) -> String {
    value.trim().to_lowercase()
}

/// The required column names, one label per [`Column`].
///
/// Matching is case-insensitive and ignores surrounding whitespace; the
/// labels keep their display casing for exports and messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderContract {
    labels: [String; 11],
}

impl Default for HeaderContract {
    fn default() -> Self {
        Self {
            labels: Column::ALL.map(|c| c.default_label().to_string()),
        }
    }
}

impl HeaderContract {
    /// Replace the label of one column.
    pub fn with_label(mut self, column: Column, label: impl Into<String>) -> Self {
        self.labels[column.ordinal()] = label.into();
        self
    }

    /// Display label of a column.
    pub fn label(&self, column: Column) -> &str {
        &self.labels[column.ordinal()]
    }

    /// Matching key of a column.
    pub fn key(&self, column: Column) -> String {
        normalize_header(self.label(column))
    }

    /// All matching keys in contract order.
    pub fn names(&self) -> Vec<String> {
        Column::ALL.iter().map(|&c| self.key(c)).collect()
    }

    /// Display labels in contract order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Locate every required column in a header row.
    ///
    /// Returns the keys of all absent columns, in contract order, if any are
    /// missing. The first occurrence wins when a header is repeated.
    pub fn resolve(&self, header: &[String]) -> Result<ColumnIndex, Vec<String>> {
        let normalized: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();

        let mut positions = [0usize; 11];
        let mut missing = Vec::new();

        for column in Column::ALL {
            let key = self.key(column);
            match normalized.iter().position(|h| *h == key) {
                Some(pos) => positions[column.ordinal()] = pos,
                None => missing.push(key),
            }
        }

        if missing.is_empty() {
            Ok(ColumnIndex { positions })
        } else {
            Err(missing)
        }
    }
}

/// Resolved cell positions for one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: [usize; 11],
}

impl ColumnIndex {
    pub fn position(&self, column: Column) -> usize {
        self.positions[column.ordinal()]
    }

    /// Cell for a column; missing cells of short rows read as empty.
    pub fn cell<'a>(&self, row: &'a [String], column: Column) -> &'a str {
        row.get(self.position(column)).map(String::as_str).unwrap_or("")
    }
}
