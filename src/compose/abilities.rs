//! Merges overlapping die grants from several archetypes into one rating per
//! ability.
//!
//! Grants for an ability are ranked, the top two are kept, and a trailing
//! `possibly 3d` is dropped because it never combines with another grant.
//! The surviving tuple maps onto a fixed set of ratings.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::catalog::{Ability, Archetype, DieGrant};
use crate::render::DiceStyle;

/// Effective rating after merging. One variant per reachable grant tuple
/// class; the mapping from tuples is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AbilityRating {
    /// `()`
    Base,
    /// `(possibly 3d)`
    BaseOrRaise,
    /// `(3d)`
    Three,
    /// `(3d or 4d)`
    ThreeOrRaise,
    /// `(4d)`
    Four,
    /// `(3d, 3d)`, `(3d or 4d, 3d)`, `(3d or 4d, 3d or 4d)`
    ThreeBonusOrFour,
    /// `(4d, 3d)`, `(4d, 3d or 4d)`, `(4d, 4d)`
    FourBonus,
}

impl AbilityRating {
    /// Translation table over the top-two grant tuple of `grants`.
    pub fn from_grants(grants: &[DieGrant]) -> Self {
        use crate::catalog::DieGrant::*;
        match top_grants(grants.to_vec()).as_slice() {
            [] => Self::Base,
            [PossiblyThree] => Self::BaseOrRaise,
            [Three] => Self::Three,
            [ThreeOrFour] => Self::ThreeOrRaise,
            [Four] => Self::Four,
            [Four, _, ..] => Self::FourBonus,
            [_, _, ..] => Self::ThreeBonusOrFour,
        }
    }

    pub fn plain(&self) -> &'static str {
        match self {
            Self::Base => "2d",
            Self::BaseOrRaise => "2d or 3d +raise",
            Self::Three => "3d",
            Self::ThreeOrRaise => "3d or 4d +raise",
            Self::Four => "4d",
            Self::ThreeBonusOrFour => "3d +bonus or 4d",
            Self::FourBonus => "4d +bonus",
        }
    }

    /// Die glyphs, padded so alternatives line up in a column.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Base => "🎲🎲",
            Self::BaseOrRaise => "🎲🎲              or 🎲🎲🎲   +raise",
            Self::Three => "🎲🎲🎲",
            Self::ThreeOrRaise => "🎲🎲🎲            or 🎲🎲🎲🎲 +raise",
            Self::Four => "🎲🎲🎲🎲",
            Self::ThreeBonusOrFour => "🎲🎲🎲   +bonus   or 🎲🎲🎲🎲",
            Self::FourBonus => "🎲🎲🎲🎲 +bonus",
        }
    }

    pub fn display(&self, style: DiceStyle) -> &'static str {
        match style {
            DiceStyle::Plain => self.plain(),
            DiceStyle::Glyph => self.glyph(),
        }
    }
}

impl fmt::Display for AbilityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plain())
    }
}

impl Serialize for AbilityRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.plain())
    }
}

/// Top two grants by rank, highest first, with a second `possibly 3d` dropped.
pub fn top_grants(mut grants: Vec<DieGrant>) -> Vec<DieGrant> {
    grants.sort_unstable_by(|a, b| b.cmp(a));
    grants.truncate(2);
    if grants.len() == 2 && grants[1] == DieGrant::PossiblyThree {
        grants.truncate(1);
    }
    grants
}

pub fn merge_ability<'a>(
    archetypes: impl IntoIterator<Item = &'a Archetype>,
    ability: Ability,
) -> AbilityRating {
    let grants: Vec<DieGrant> = archetypes
        .into_iter()
        .filter_map(|archetype| archetype.grant(ability))
        .collect();
    AbilityRating::from_grants(&grants)
}

/// A rating for every ability, including those no archetype grants.
pub fn merge_abilities(archetypes: &[&Archetype]) -> BTreeMap<Ability, AbilityRating> {
    Ability::ALL
        .into_iter()
        .map(|ability| (ability, merge_ability(archetypes.iter().copied(), ability)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DieGrant::*;

    fn granting(grants: &[(Ability, DieGrant)]) -> Archetype {
        Archetype {
            name: "test".to_string(),
            abilities: grants.iter().copied().collect(),
            ..Archetype::default()
        }
    }

    #[test]
    fn translation_table_covers_every_reachable_tuple() {
        let cases: &[(&[DieGrant], AbilityRating)] = &[
            (&[], AbilityRating::Base),
            (&[PossiblyThree], AbilityRating::BaseOrRaise),
            (&[Three], AbilityRating::Three),
            (&[ThreeOrFour], AbilityRating::ThreeOrRaise),
            (&[Four], AbilityRating::Four),
            (&[Three, Three], AbilityRating::ThreeBonusOrFour),
            (&[ThreeOrFour, Three], AbilityRating::ThreeBonusOrFour),
            (&[ThreeOrFour, ThreeOrFour], AbilityRating::ThreeBonusOrFour),
            (&[Four, Three], AbilityRating::FourBonus),
            (&[Four, ThreeOrFour], AbilityRating::FourBonus),
            (&[Four, Four], AbilityRating::FourBonus),
        ];
        for (grants, expected) in cases {
            assert_eq!(
                AbilityRating::from_grants(grants),
                *expected,
                "grants {grants:?}"
            );
        }
    }

    #[test]
    fn glyphs_cover_every_rating() {
        let cases = [
            (AbilityRating::Base, "🎲🎲"),
            (AbilityRating::BaseOrRaise, "🎲🎲              or 🎲🎲🎲   +raise"),
            (AbilityRating::Three, "🎲🎲🎲"),
            (AbilityRating::ThreeOrRaise, "🎲🎲🎲            or 🎲🎲🎲🎲 +raise"),
            (AbilityRating::Four, "🎲🎲🎲🎲"),
            (AbilityRating::ThreeBonusOrFour, "🎲🎲🎲   +bonus   or 🎲🎲🎲🎲"),
            (AbilityRating::FourBonus, "🎲🎲🎲🎲 +bonus"),
        ];
        for (rating, glyph) in cases {
            assert_eq!(rating.glyph(), glyph);
            assert_eq!(rating.display(DiceStyle::Glyph), glyph);
            assert_eq!(rating.display(DiceStyle::Plain), rating.plain());
        }
    }

    #[test]
    fn possibly_never_pairs() {
        assert_eq!(top_grants(vec![PossiblyThree, Three]), vec![Three]);
        assert_eq!(top_grants(vec![PossiblyThree, PossiblyThree]), vec![PossiblyThree]);
        assert_eq!(top_grants(vec![Four, PossiblyThree, Three]), vec![Four, Three]);
    }

    #[test]
    fn only_top_two_survive() {
        assert_eq!(top_grants(vec![Three, Four, Three, ThreeOrFour]), vec![Four, ThreeOrFour]);
    }

    #[test]
    fn merge_is_order_independent() {
        let a = granting(&[(Ability::Steel, Four), (Ability::Speed, PossiblyThree)]);
        let b = granting(&[(Ability::Steel, Three), (Ability::Speed, ThreeOrFour)]);
        assert_eq!(merge_abilities(&[&a, &b]), merge_abilities(&[&b, &a]));
        let merged = merge_abilities(&[&a, &b]);
        assert_eq!(merged[&Ability::Steel], AbilityRating::FourBonus);
        assert_eq!(merged[&Ability::Speed], AbilityRating::ThreeOrRaise);
        assert_eq!(merged[&Ability::Medicine], AbilityRating::Base);
        assert_eq!(merged.len(), Ability::ALL.len());
    }

    #[test]
    fn unsorted_grants_are_ranked_first() {
        assert_eq!(AbilityRating::from_grants(&[Three, Four]), AbilityRating::FourBonus);
        assert_eq!(AbilityRating::from_grants(&[PossiblyThree, Three]), AbilityRating::Three);
    }
}
