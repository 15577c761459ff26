//! Singular-vs-list decision for sequence fields (training, traits, techniques).

use std::sync::LazyLock;

use regex::Regex;

static LIST_DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[,;] ").expect("list delimiter pattern is valid")
});

/// A line without a terminal period is a short delimiter-separated list; a
/// line ending in a period is one sentence, commas and all.
pub fn normalize_entries(line: &str) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }
    if line.ends_with('.') {
        return vec![line.trim_end_matches('.').to_string()];
    }
    LIST_DELIMITER
        .split(line)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
