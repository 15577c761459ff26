//! Best-guess matching of user-typed archetype names against the catalog.

use std::collections::HashSet;

/// Character-set overlap normalised by set sizes, plus 1.0 when the query is
/// a literal substring of the candidate.
pub fn similarity(query: &str, candidate: &str) -> f64 {
    let bonus = if candidate.contains(query) { 1.0 } else { 0.0 };
    let query_chars: HashSet<char> = query.chars().collect();
    let candidate_chars: HashSet<char> = candidate.chars().collect();
    let shared = query_chars.intersection(&candidate_chars).count() as f64;
    let norm = (query_chars.len() as f64).sqrt() + (candidate_chars.len() as f64).sqrt();
    if norm == 0.0 {
        return bonus;
    }
    shared / norm + bonus
}

/// Returns the canonical (lower-cased) name closest to `query`. An exact
/// case-insensitive match wins outright; otherwise the highest score wins,
/// ties going to the lexicographically greatest name. `None` only when there
/// are no candidates.
pub fn best_guess<'a>(query: &str, candidates: &'a [String]) -> Option<&'a str> {
    let query = query.trim().to_lowercase();
    if let Some(exact) = candidates.iter().find(|c| **c == query) {
        return Some(exact.as_str());
    }
    candidates
        .iter()
        .map(|candidate| (similarity(&query, candidate), candidate))
        .max_by(|(score_a, name_a), (score_b, name_b)| {
            score_a.total_cmp(score_b).then_with(|| name_a.cmp(name_b))
        })
        .map(|(_, candidate)| candidate.as_str())
}
