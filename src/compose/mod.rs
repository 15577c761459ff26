//! Character composition: pick 2-4 archetypes (by name or at random), merge
//! their abilities and flatten every list field into `(Archetype) entry` lines.

pub mod abilities;
pub mod resolver;
pub mod rng;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::catalog::{Ability, Archetype, Catalog};

pub use abilities::{merge_abilities, top_grants, AbilityRating};
pub use resolver::{best_guess, similarity};
pub use rng::Rng;

pub const MIN_ARCHETYPES: usize = 2;
pub const MAX_ARCHETYPES: usize = 4;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("the archetype catalog is empty")]
    EmptyCatalog,
    #[error("no archetype named '{0}'")]
    NoSuchArchetype(String),
}

/// Relative weights for how many archetypes a random character gets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountWeights(pub BTreeMap<usize, u32>);

impl Default for CountWeights {
    fn default() -> Self {
        Self(BTreeMap::from([(2, 2), (3, 3), (4, 1)]))
    }
}

impl CountWeights {
    pub fn total(&self) -> u64 {
        self.0.values().map(|w| u64::from(*w)).sum()
    }

    pub fn draw(&self, rng: &mut Rng) -> usize {
        self.count_for_roll(rng.below(self.total()))
    }

    /// Maps a roll in `0..total()` onto its count, walking counts in
    /// ascending order.
    pub fn count_for_roll(&self, mut roll: u64) -> usize {
        for (count, weight) in &self.0 {
            let weight = u64::from(*weight);
            if roll < weight {
                return *count;
            }
            roll -= weight;
        }
        MIN_ARCHETYPES
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Character<'a> {
    #[serde(serialize_with = "serialize_names")]
    pub archetypes: Vec<&'a Archetype>,
    pub abilities: BTreeMap<Ability, AbilityRating>,
    pub specialties: Vec<String>,
    pub training: Vec<String>,
    pub traits: Vec<String>,
    pub resources: Vec<String>,
    pub techniques: Vec<String>,
    pub bonds: Vec<String>,
    pub special_rules: Vec<String>,
    pub power_level: i32,
    pub legal: bool,
}

fn serialize_names<S: Serializer>(archetypes: &[&Archetype], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(archetypes.iter().map(|a| a.name.as_str()))
}

impl<'a> Character<'a> {
    pub fn from_archetypes(archetypes: Vec<&'a Archetype>) -> Self {
        Self {
            abilities: merge_abilities(&archetypes),
            specialties: flatten(&archetypes, |a| a.specialty.iter()),
            training: flatten(&archetypes, |a| a.training.iter()),
            traits: flatten(&archetypes, |a| a.traits.iter()),
            resources: flatten(&archetypes, |a| a.resources.iter()),
            techniques: flatten(&archetypes, |a| a.techniques.iter()),
            bonds: flatten(&archetypes, |a| a.bond.iter()),
            special_rules: flatten(&archetypes, |a| a.special_rules.iter()),
            power_level: archetypes.iter().map(|a| a.power_level).sum(),
            legal: is_legal(&archetypes),
            archetypes,
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.archetypes.iter().map(|a| a.name.as_str()).collect()
    }
}

/// 2-4 archetypes with at most one exemplar order among them.
pub fn is_legal(archetypes: &[&Archetype]) -> bool {
    let orders = archetypes.iter().filter(|a| a.is_order).count();
    (MIN_ARCHETYPES..=MAX_ARCHETYPES).contains(&archetypes.len()) && orders <= 1
}

fn flatten<'a, F, I>(archetypes: &[&'a Archetype], field: F) -> Vec<String>
where
    F: Fn(&'a Archetype) -> I,
    I: IntoIterator<Item = &'a String>,
{
    let mut entries: Vec<String> = archetypes
        .iter()
        .flat_map(|&archetype| {
            field(archetype)
                .into_iter()
                .map(move |entry| format!("({}) {}", archetype.name, entry))
        })
        .collect();
    entries.sort();
    entries
}

/// Resolve each fragment to its closest archetype, dropping duplicates while
/// keeping first-mention order.
pub fn resolve_names<'a, S: AsRef<str>>(
    catalog: &'a Catalog,
    names: &[S],
) -> Result<Vec<&'a Archetype>, ComposeError> {
    let candidates = catalog.canonical_names();
    let mut chosen: Vec<&'a Archetype> = Vec::new();
    for name in names {
        let canonical = best_guess(name.as_ref(), &candidates).ok_or(ComposeError::EmptyCatalog)?;
        let archetype = catalog
            .get(canonical)
            .ok_or_else(|| ComposeError::NoSuchArchetype(canonical.to_string()))?;
        if !chosen.iter().any(|c| std::ptr::eq(*c, archetype)) {
            chosen.push(archetype);
        }
    }
    Ok(chosen)
}

/// Draw a count from `weights` and pick that many distinct archetypes. The
/// catalog order is left untouched.
pub fn select_random<'a>(
    catalog: &'a Catalog,
    weights: &CountWeights,
    rng: &mut Rng,
) -> Result<Vec<&'a Archetype>, ComposeError> {
    let archetypes = catalog.archetypes();
    if archetypes.is_empty() {
        return Err(ComposeError::EmptyCatalog);
    }
    let count = weights.draw(rng).min(archetypes.len());
    let mut indices: Vec<usize> = (0..archetypes.len()).collect();
    for i in 0..count {
        let remaining = (indices.len() - i) as u64;
        let j = i + rng.below(remaining) as usize;
        indices.swap(i, j);
    }
    Ok(indices[..count].iter().map(|&i| &archetypes[i]).collect())
}

/// Build a character from name fragments; blank fragments are ignored and
/// no names at all means a random character.
pub fn compose<'a, S: AsRef<str>>(
    catalog: &'a Catalog,
    names: &[S],
    weights: &CountWeights,
    rng: &mut Rng,
) -> Result<Character<'a>, ComposeError> {
    let requested: Vec<&str> = names
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .collect();
    let archetypes = if requested.is_empty() {
        select_random(catalog, weights, rng)?
    } else {
        resolve_names(catalog, &requested)?
    };
    let character = Character::from_archetypes(archetypes);
    tracing::debug!(
        archetypes = ?character.names(),
        power_level = character.power_level,
        legal = character.legal,
        "composed character"
    );
    Ok(character)
}
