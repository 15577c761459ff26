//! Reference text for techniques, shown beneath a character that names them.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use super::splitter::split_records;
use super::CatalogError;
use crate::render::format_item;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technique {
    /// Lower-cased title used for matching.
    pub key: String,
    /// Display text: upper-cased title followed by wrapped body lines.
    pub formatted: String,
}

#[derive(Debug, Clone, Default)]
pub struct TechniqueCatalog {
    techniques: Vec<Technique>,
}

impl TechniqueCatalog {
    pub fn parse(text: &str) -> Self {
        let techniques = split_records(text)
            .iter()
            .map(|block| format_technique(block))
            .collect();
        Self { techniques }
    }

    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Technique> {
        self.techniques.iter()
    }

    /// Techniques whose title appears in any of the given entries, sorted
    /// and de-duplicated.
    pub fn relevant_to<'a>(&'a self, entries: &[String]) -> Vec<&'a str> {
        let lowered: Vec<String> = entries.iter().map(|e| e.to_lowercase()).collect();
        let relevant: BTreeSet<&str> = self
            .techniques
            .iter()
            .filter(|t| !t.key.is_empty() && lowered.iter().any(|e| e.contains(&t.key)))
            .map(|t| t.formatted.as_str())
            .collect();
        relevant.into_iter().collect()
    }
}

fn format_technique(block: &str) -> Technique {
    let block = block.replace('•', "-");
    let mut lines = block.lines();
    let title = lines.next().unwrap_or_default().trim();
    let body: Vec<String> = lines.map(|line| format_item(line, 0)).collect();
    Technique {
        key: title.to_lowercase(),
        formatted: format!("{}\n{}", title.to_uppercase(), body.join("\n")),
    }
}

/// A missing file is not fatal: the appendix is optional.
pub fn load_techniques_file(path: impl AsRef<Path>) -> Result<Option<TechniqueCatalog>, CatalogError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(TechniqueCatalog::parse(&text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Riposte\n• Counter a parried blow.\n\nShield Wall\nStand together.";

    #[test]
    fn titles_are_uppercased_and_bullets_replaced() {
        let catalog = TechniqueCatalog::parse(TEXT);
        assert_eq!(catalog.len(), 2);
        let riposte = catalog.iter().next().expect("first technique");
        assert_eq!(riposte.key, "riposte");
        assert_eq!(riposte.formatted, "RIPOSTE\n- Counter a parried blow.");
    }

    #[test]
    fn relevance_is_substring_of_character_entries() {
        let catalog = TechniqueCatalog::parse(TEXT);
        let entries = vec!["(Knight) Shield wall drills".to_string()];
        assert_eq!(catalog.relevant_to(&entries), vec!["SHIELD WALL\nStand together."]);
        assert!(catalog.relevant_to(&["(Rogue) Lockpicking".to_string()]).is_empty());
    }
}
