//! Lenient number parsing for spreadsheet cells.
//!
//! Cells carry currency symbols, unit suffixes and thousands separators
//! (`Rp 5.000`, `12 kg`, `"1,250"`). Everything except digits, `.` and `-`
//! is stripped, dot-grouped thousands are collapsed, and the longest leading
//! decimal is parsed.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9.\-]+").expect("Invalid numeric strip pattern"));

/// `5.000`, `-1.250.000`: dots used as thousands separators. A leading `0`
/// group is never a grouping, so `0.500` stays a decimal.
static DOT_GROUPED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?[1-9]\d{0,2}(?:\.\d{3})+$").expect("Invalid grouping pattern")
});

static LEADING_DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)").expect("Invalid decimal pattern")
});

/// Parse a cell as a finite number, or `None` if nothing numeric is left.
pub fn parse_lenient(raw: &str) -> Option<f64> {
    let stripped = NON_NUMERIC.replace_all(raw, "");

    let candidate = if DOT_GROUPED.is_match(&stripped) {
        stripped.replace('.', "")
    } else {
        stripped.into_owned()
    };

    let decimal = LEADING_DECIMAL.find(&candidate)?;
    decimal
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse an optional cell; blank and unparsable both read as zero.
///
/// An explicit `0` and a garbage string are indistinguishable here.
pub fn parse_optional(raw: &str) -> f64 {
    parse_lenient(raw).unwrap_or(0.0)
}
