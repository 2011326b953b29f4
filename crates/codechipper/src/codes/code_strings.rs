//! # Code String Utilities
//!
//! The MIMIC-III reference tables store ICD-9 codes without the separator;
//! labeled splits store them with it.

use std::sync::LazyLock;

use regex::Regex;

/// The separator between the coarse category and the fine sub-code.
pub const CODE_SEPARATOR: char = '.';

/// The prefix letter of external-cause (E-code) diagnoses.
pub const EXTERNAL_CAUSE_PREFIX: char = 'E';

static NON_WORD_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// Insert the separator at the position appropriate for the code family.
///
/// Any separators already present are removed first.
///
/// * Diagnosis codes: after 3 characters, or 4 for E-codes.
/// * Procedure codes: after 2 characters.
///
/// Codes which are not longer than the offset are returned without a separator.
///
/// ## Arguments
/// * `code` - the raw code.
/// * `is_diag` - true for diagnosis codes, false for procedure codes.
pub fn reformat(
    code: &str,
    is_diag: bool,
) -> String {
    if code.is_empty() {
        return String::new();
    }

    let code: String = code.chars().filter(|&c| c != CODE_SEPARATOR).collect();

    let offset = if !is_diag {
        2
    } else if code.starts_with(EXTERNAL_CAUSE_PREFIX) {
        4
    } else {
        3
    };

    match code.char_indices().nth(offset) {
        Some((split, _)) => format!("{}{CODE_SEPARATOR}{}", &code[..split], &code[split..]),
        None => code,
    }
}

/// The coarse code (category) of a fine code: everything before the first separator.
pub fn coarse_code(code: &str) -> &str {
    match code.split_once(CODE_SEPARATOR) {
        Some((prefix, _)) => prefix,
        None => code,
    }
}

/// Strip leading and trailing separator artifacts from a labeled-split code.
pub fn strip_code(code: &str) -> &str {
    code.trim_matches(CODE_SEPARATOR)
}

/// Tokenize a free-text description.
///
/// Splits on runs of non-word characters, keeps purely alphabetic tokens,
/// and lowercases them.
pub fn tokenize_description(text: &str) -> Vec<String> {
    NON_WORD_RUNS
        .split(text)
        .filter(|w| !w.is_empty() && w.chars().all(char::is_alphabetic))
        .map(str::to_lowercase)
        .collect()
}
