//! Municipality name normalization.
//!
//! The boundary layer and the statistics feed spell municipality names
//! independently ("Güira de Melena", "GUIRA DE MELENA ", "Guira de
//! Melena."). Both sides are reduced to the same key before joining.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Everything that is not a lowercase ASCII letter, digit, or whitespace.
static NON_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]+").expect("valid regex"));

/// Runs of whitespace.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalizes a municipality name into a join key.
///
/// The pipeline:
/// 1. Decompose (NFD) and drop combining marks
/// 2. Lowercase
/// 3. Strip everything outside `[a-z0-9\s]`, including letters of other
///    scripts and symbols
/// 4. Collapse whitespace runs to a single space
/// 5. Trim
///
/// Total over all inputs and idempotent; the empty string maps to itself.
#[must_use]
pub fn normalize_name(input: &str) -> String {
    let folded = input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    let stripped = NON_KEY_RE.replace_all(&folded, "");
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}
