//! Splits raw catalog text into one block per record.

/// Split on blank lines, keeping source order. Windows line endings are
/// normalised first; whitespace-only blocks are dropped.
pub fn split_records(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(str::to_string)
        .collect()
}
