//! Typed archetype record produced by the catalog parser.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// The eleven abilities every character is rated in. Declaration order is
/// alphabetical so `BTreeMap<Ability, _>` iterates in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ability {
    Influence,
    Logistics,
    Medicine,
    Perception,
    Prowess,
    Speed,
    Stealth,
    Steel,
    Survival,
    Technology,
    Vehicles,
}

impl Ability {
    pub const ALL: [Ability; 11] = [
        Ability::Influence,
        Ability::Logistics,
        Ability::Medicine,
        Ability::Perception,
        Ability::Prowess,
        Ability::Speed,
        Ability::Stealth,
        Ability::Steel,
        Ability::Survival,
        Ability::Technology,
        Ability::Vehicles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Influence => "Influence",
            Self::Logistics => "Logistics",
            Self::Medicine => "Medicine",
            Self::Perception => "Perception",
            Self::Prowess => "Prowess",
            Self::Speed => "Speed",
            Self::Stealth => "Stealth",
            Self::Steel => "Steel",
            Self::Survival => "Survival",
            Self::Technology => "Technology",
            Self::Vehicles => "Vehicles",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ability| ability.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Die-grant token an archetype contributes to one ability.
/// Variant order is the rank order: `PossiblyThree < Three < ThreeOrFour < Four`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DieGrant {
    #[serde(rename = "possibly 3d")]
    PossiblyThree,
    #[serde(rename = "3d")]
    Three,
    #[serde(rename = "3d or 4d")]
    ThreeOrFour,
    #[serde(rename = "4d")]
    Four,
}

impl DieGrant {
    pub fn rank(&self) -> u8 {
        match self {
            Self::PossiblyThree => 0,
            Self::Three => 1,
            Self::ThreeOrFour => 2,
            Self::Four => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PossiblyThree => "possibly 3d",
            Self::Three => "3d",
            Self::ThreeOrFour => "3d or 4d",
            Self::Four => "4d",
        }
    }

    /// Parses catalog text such as `3d or 4d`. The hyphenated spellings
    /// (`3d-or-4d`, `possibly-3d`) are accepted too.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', " ");
        match normalized.as_str() {
            "possibly 3d" => Some(Self::PossiblyThree),
            "3d" => Some(Self::Three),
            "3d or 4d" => Some(Self::ThreeOrFour),
            "4d" => Some(Self::Four),
            _ => None,
        }
    }
}

impl fmt::Display for DieGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed catalog entry. Fields missing from the source block keep their
/// zero value; the catalog author is trusted for completeness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
    pub is_order: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<BTreeSet<String>>,
    pub power_level: i32,
    #[serde(default)]
    pub abilities: BTreeMap<Ability, DieGrant>,
    /// A plain specialty, or an unresolved choice block joined by newlines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default)]
    pub training: Vec<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bond: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_rules: Option<String>,
    /// Lines that fell outside any recognised field. Diagnostic only.
    #[serde(skip)]
    pub unparsed_lines: Vec<String>,
}

impl Archetype {
    pub fn grant(&self, ability: Ability) -> Option<DieGrant> {
        self.abilities.get(&ability).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_grants_are_ranked_in_declaration_order() {
        let mut grants = vec![
            DieGrant::Four,
            DieGrant::PossiblyThree,
            DieGrant::ThreeOrFour,
            DieGrant::Three,
        ];
        grants.sort();
        assert_eq!(
            grants.iter().map(DieGrant::rank).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn die_grant_accepts_both_spellings() {
        assert_eq!(DieGrant::parse("3d or 4d"), Some(DieGrant::ThreeOrFour));
        assert_eq!(DieGrant::parse("3d-or-4d"), Some(DieGrant::ThreeOrFour));
        assert_eq!(DieGrant::parse("possibly-3d"), Some(DieGrant::PossiblyThree));
        assert_eq!(DieGrant::parse("5d"), None);
    }

    #[test]
    fn ability_lookup_ignores_case() {
        assert_eq!(Ability::from_name("steel"), Some(Ability::Steel));
        assert_eq!(Ability::from_name("Vehicles"), Some(Ability::Vehicles));
        assert_eq!(Ability::from_name("Sorcery"), None);
    }
}
