//! Score text normalisation and tiebreak inference.

use std::sync::LazyLock;

use regex::Regex;

/// Dash encodings seen in scraped scores. The multi-char entries are UTF-8
/// dashes decoded as Windows-1252.
const DASH_VARIANTS: [&str; 5] = ["\u{2013}", "\u{2014}", "â€“", "â€”", "â€\""];

/// A set score with a parenthesised tiebreak, e.g. `7-6(4)` or `6-7(4-7)`.
static TIEBREAK_SET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+-\d+\(\d+(-\d+)?\)").expect("static regex"));

/// Replace every known dash variant with `-`. Idempotent.
pub fn normalize_dashes(score: &str) -> String {
    DASH_VARIANTS
        .iter()
        .fold(score.to_string(), |acc, dash| acc.replace(dash, "-"))
}

/// Whether the score text contains a tiebreak set.
pub fn has_tiebreak_in_score(score: &str) -> bool {
    TIEBREAK_SET.is_match(&normalize_dashes(score))
}

/// Resolve the tiebreak flag for a row.
///
/// An explicit, all-digit `recorded` value wins (`0` is false, anything else
/// true). Otherwise the score text is searched for a tiebreak set.
pub fn infer_tiebreak(score: &str, recorded: Option<&str>) -> bool {
    match recorded.map(str::trim) {
        Some(value) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
            value.bytes().any(|b| b != b'0')
        }
        _ => has_tiebreak_in_score(score),
    }
}
