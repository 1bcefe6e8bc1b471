//! Quote-aware CSV tokenizer plus byte decoding for uploads.
//!
//! The tokenizer knows nothing about invoices: it turns text into a grid of
//! trimmed string cells. Column meaning is resolved later by
//! [`crate::validation`].
//!
//! Lines are split before quotes are considered, so a quoted cell cannot
//! contain a newline. Malformed quoting never fails: an unterminated quote
//! swallows the rest of its line into one cell.

use std::borrow::Cow;

use crate::error::{CsvError, CsvResult};

/// One tokenized line.
pub type Row = Vec<String>;

/// Tokenized document. Rows are not guaranteed to have equal length.
pub type Grid = Vec<Row>;

const BOM: char = '\u{feff}';

const FALLBACK_ENCODING: &str = "windows-1252";

/// Tokenize a complete comma-separated document.
///
/// Accepts `\n` and `\r\n` line endings. Lines that are blank after trimming
/// produce no row.
///
/// # Example
/// ```
/// use salescheck::parse_csv;
///
/// let grid = parse_csv("a,\"b,c\",d\r\n\r\n1,2,3");
/// assert_eq!(grid, vec![vec!["a", "b,c", "d"], vec!["1", "2", "3"]]);
/// ```
pub fn parse_csv(text: &str) -> Grid {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

/// Tokenize a single line into trimmed cells.
pub fn parse_line(line: &str) -> Row {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());

    cells
}

// =============================================================================
// Byte decoding
// =============================================================================

/// Text recovered from raw bytes.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    /// Encoding the bytes were decoded with.
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet.
///
/// Valid UTF-8 always wins; chardet is only consulted for other input.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "" => FALLBACK_ENCODING.to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes with the named encoding.
///
/// Fails when the label is unknown or the bytes are malformed for it.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoder = encoding_rs::Encoding::for_label(encoding.trim().as_bytes())
        .ok_or_else(|| CsvError::UnsupportedEncoding(encoding.to_string()))?;

    let text: Cow<'_, str> = decoder
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| CsvError::Encoding {
            encoding: encoding.to_string(),
        })?;

    Ok(text.trim_start_matches(BOM).to_string())
}

/// Detect and decode in one step.
///
/// A wrong guess from chardet falls back to windows-1252, which maps every
/// byte.
pub fn decode_bytes(bytes: &[u8]) -> CsvResult<Decoded> {
    let detected = detect_encoding(bytes);
    if let Ok(text) = decode_content(bytes, &detected) {
        return Ok(Decoded {
            text,
            encoding: detected,
        });
    }

    let text = decode_content(bytes, FALLBACK_ENCODING)?;
    Ok(Decoded {
        text,
        encoding: FALLBACK_ENCODING.to_string(),
    })
}

/// Decode with a caller-chosen encoding, or detect it when `None`.
pub fn decode_bytes_as(bytes: &[u8], encoding: Option<&str>) -> CsvResult<Decoded> {
    match encoding {
        Some(label) => Ok(Decoded {
            text: decode_content(bytes, label)?,
            encoding: label.to_lowercase(),
        }),
        None => decode_bytes(bytes),
    }
}
