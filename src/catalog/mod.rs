//! Archetype catalog: a blank-line separated text file parsed once at start-up
//! into an immutable list of [Archetype] records.

mod archetype;
mod entries;
mod parser;
mod splitter;
mod techniques;

use std::fs;
use std::path::Path;

use thiserror::Error;

pub use archetype::{Ability, Archetype, DieGrant};
pub use entries::normalize_entries;
pub use parser::{match_indicator, parse_archetype, ParseError, ParserState, FIELD_INDICATORS};
pub use splitter::split_records;
pub use techniques::{load_techniques_file, Technique, TechniqueCatalog};

pub const DEFAULT_CATALOG_PATH: &str = "data/archetypes.txt";
pub const DEFAULT_TECHNIQUES_PATH: &str = "data/techniques.txt";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("archetype #{index} ('{name}') is malformed: {source}")]
    Parse {
        index: usize,
        name: String,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    archetypes: Vec<Archetype>,
}

impl Catalog {
    /// Parse every record; the first malformed one fails the whole catalog.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let mut archetypes = Vec::new();
        for (index, block) in split_records(text).iter().enumerate() {
            let archetype = parse_archetype(block).map_err(|source| CatalogError::Parse {
                index: index + 1,
                name: block.lines().next().unwrap_or_default().trim().to_string(),
                source,
            })?;
            if !archetype.unparsed_lines.is_empty() {
                tracing::debug!(
                    archetype = %archetype.name,
                    lines = ?archetype.unparsed_lines,
                    "unparsed catalog lines"
                );
            }
            archetypes.push(archetype);
        }
        Ok(Self { archetypes })
    }

    pub fn from_archetypes(archetypes: Vec<Archetype>) -> Self {
        Self { archetypes }
    }

    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Case-insensitive lookup by exact name.
    pub fn get(&self, name: &str) -> Option<&Archetype> {
        let wanted = name.to_lowercase();
        self.archetypes
            .iter()
            .find(|archetype| archetype.name.to_lowercase() == wanted)
    }

    /// Lower-cased canonical names, in catalog order.
    pub fn canonical_names(&self) -> Vec<String> {
        self.archetypes
            .iter()
            .map(|archetype| archetype.name.to_lowercase())
            .collect()
    }
}

pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Catalog::parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reports_the_failing_record() {
        let text = "Knight\npower level 3\n\nBroken\npower level lots";
        match Catalog::parse(text) {
            Err(CatalogError::Parse { index, name, .. }) => {
                assert_eq!(index, 2);
                assert_eq!(name, "Broken");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let catalog = Catalog::parse("Knight\npower level 3").expect("catalog parses");
        assert_eq!(catalog.get("KNIGHT").map(|a| a.power_level), Some(3));
        assert_eq!(catalog.canonical_names(), vec!["knight"]);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_catalog_file("does/not/exist.txt").unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
