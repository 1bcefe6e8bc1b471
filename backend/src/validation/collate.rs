//! Human ordering for item names.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Base letters only: decomposed, marks dropped, case folded.
fn primary_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Compare two names the way a spreadsheet user expects.
///
/// Accents and case are ignored first, so `Édam` sorts between `Apel` and
/// `Fanta`. Ties are broken by accents (unaccented first), then by case
/// (lowercase first), then by code point so the result is total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| {
            let folded_a = a.nfd().flat_map(char::to_lowercase);
            let folded_b = b.nfd().flat_map(char::to_lowercase);
            folded_a.cmp(folded_b)
        })
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .find(|(x, y)| x != y)
                .map(|(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.cmp(b))
}
