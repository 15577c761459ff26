//! Plain-text rendering of characters and the archetype listing.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, TechniqueCatalog};
use crate::compose::Character;

pub const LINE_WIDTH: usize = 80;
const CONTINUATION_INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiceStyle {
    #[default]
    Plain,
    Glyph,
}

impl DiceStyle {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plain" => Some(Self::Plain),
            "glyph" => Some(Self::Glyph),
            _ => None,
        }
    }
}

/// Word-wrap one entry at [LINE_WIDTH]. Continuation lines hang four columns
/// deeper than `base_indent`; embedded newlines (choice-block members) start
/// a new line and deepen the hang by another four for the rest of the entry.
pub fn format_item(item: &str, base_indent: usize) -> String {
    let base = " ".repeat(base_indent);
    let mut out = base.clone();
    let mut line_len = base_indent;
    let mut in_choice = false;
    let mut at_line_start = true;

    for (index, segment) in item.split('\n').enumerate() {
        if index > 0 {
            line_len = base_indent + 4;
            in_choice = true;
            out.push('\n');
            out.push_str(CONTINUATION_INDENT);
            out.push_str(&base);
            at_line_start = true;
        }
        for word in segment.split_whitespace() {
            let width = word.chars().count() + 1;
            if line_len + width > LINE_WIDTH {
                let extra = if in_choice { CONTINUATION_INDENT } else { "" };
                line_len = base_indent + 5 + extra.len() + word.chars().count();
                out.push('\n');
                out.push_str(CONTINUATION_INDENT);
                out.push_str(&base);
                out.push_str(extra);
                at_line_start = true;
            } else {
                line_len += width;
            }
            if !at_line_start {
                out.push(' ');
            }
            out.push_str(word);
            at_line_start = false;
        }
    }
    out.trim_end().to_string()
}

pub fn format_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format_item(item, 4))
        .collect::<Vec<_>>()
        .join("\n")
}

fn section(title: &str, items: &[String]) -> String {
    format!("\n{title}:\n{}", format_list(items))
}

pub fn render_character(
    character: &Character<'_>,
    techniques: &TechniqueCatalog,
    style: DiceStyle,
) -> String {
    let abilities = character
        .abilities
        .iter()
        .map(|(ability, rating)| format!("{:>10}: {}", ability.as_str(), rating.display(style)))
        .collect::<Vec<_>>()
        .join("\n    ");

    let mut parts = vec![
        format!("ARCHETYPES: {}", character.names().join(", ")),
        format!("POWER LEVEL: {} plus raises", character.power_level),
    ];
    if !character.legal {
        parts.push("*** THIS IS NOT A LEGAL CHARACTER! ***".to_string());
    }
    parts.push(format!("\nABILITIES:\n    {abilities}"));
    if !character.specialties.is_empty() {
        parts.push(format!(
            "\nSPECIALTIES: (max of one per Ability)\n{}",
            format_list(&character.specialties)
        ));
    }
    if !character.training.is_empty() {
        parts.push(section("TRAINING", &character.training));
    }
    if !character.traits.is_empty() {
        parts.push(section("TRAITS", &character.traits));
    }
    parts.push(section("RESOURCES", &character.resources));
    if !character.techniques.is_empty() {
        parts.push(section("TECHNIQUES", &character.techniques));
    }
    parts.push(section("BOND RELATIONSHIPS", &character.bonds));
    if !character.special_rules.is_empty() {
        parts.push(section("SPECIAL RULES", &character.special_rules));
    }

    let mut text = parts.join("\n");
    if !character.techniques.is_empty() {
        let relevant = techniques.relevant_to(&character.techniques);
        text.push_str("\n\n");
        text.push_str(&"=".repeat(LINE_WIDTH));
        text.push_str("\n\nRELEVANT TECHNIQUES:\n\n");
        text.push_str(&relevant.join("\n\n"));
    }
    text
}

pub fn render_listing(catalog: &Catalog) -> String {
    catalog
        .archetypes()
        .iter()
        .map(|archetype| {
            format!(
                "{:<20}{}",
                format!("Power Level {}", archetype.power_level),
                archetype.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Appendix served beneath every character sheet over HTTP.
pub const GUIDANCE: &str = "

==============================================================================

SPENDING BONUSES:
Every character starts with one bonus, and overlapping abilities may grant a
few more. Spend each bonus on one of the following; some options also cost a
raise.

    - Add a specialty to an ability rated 3d or higher that has none yet.
    - Add a new resource, with the Referee's approval.
    - Add a new trait without special rules, with the Referee's approval.
    - Add a new training.
    - Raise an ability from 2d to 3d, or from 3d to 4d, for one raise.

CALCULATING VITALITY:
Vitality equals your dice in Steel plus your dice in the best of Prowess,
Speed, Stealth and Survival, plus any bonuses from traits.

CALCULATING GUARD VALUE:
Guard value is 1 with Prowess 2d, or 2 with Prowess 3d or higher. Training
with shields or parrying blades adds +1 when properly equipped.

OVERLAPPING GRANTS:
    - Specialties: one specialty per ability. Keep one and drop the rest.
    - Training: the same training granted twice counts once.
    - Traits: the same trait granted twice counts once.
    - Resources: weapons and armor come from one archetype only. Keep a
      single line of credit, income, reserve of wealth, and lodging; drop
      any duplicates in each category.
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Ability, Archetype, DieGrant};

    #[test]
    fn short_item_is_indented_only() {
        assert_eq!(format_item("a sword", 4), "    a sword");
    }

    #[test]
    fn long_item_wraps_with_hanging_indent() {
        let item = "word ".repeat(30);
        let wrapped = format_item(item.trim(), 4);
        let lines: Vec<&str> = wrapped.lines().collect();
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| line.chars().count() <= LINE_WIDTH));
        assert!(lines[1].starts_with("        word"));
    }

    #[test]
    fn choice_members_start_new_lines() {
        let wrapped = format_item("(Squire) Choose one.\nOption A\nOption B", 4);
        assert_eq!(wrapped, "    (Squire) Choose one.\n        Option A\n        Option B");
    }

    #[test]
    fn listing_pads_power_level_column() {
        let catalog = Catalog::from_archetypes(vec![Archetype {
            name: "Knight".to_string(),
            power_level: 3,
            ..Archetype::default()
        }]);
        assert_eq!(render_listing(&catalog), "Power Level 3       Knight");
    }

    #[test]
    fn illegal_character_carries_banner() {
        let knight = Archetype {
            name: "Knight".to_string(),
            power_level: 3,
            resources: vec!["a sword".to_string()],
            ..Archetype::default()
        };
        let character = Character::from_archetypes(vec![&knight]);
        let text = render_character(&character, &TechniqueCatalog::default(), DiceStyle::Plain);
        assert!(text.starts_with("ARCHETYPES: Knight\nPOWER LEVEL: 3 plus raises\n*** THIS IS NOT A LEGAL CHARACTER! ***"));
        assert!(text.contains("     Steel: 2d"));
        assert!(text.contains("\nRESOURCES:\n    (Knight) a sword"));
        assert!(!text.contains("RELEVANT TECHNIQUES"));
    }

    #[test]
    fn glyph_style_renders_die_icons() {
        let mut knight = Archetype {
            name: "Knight".to_string(),
            power_level: 3,
            ..Archetype::default()
        };
        knight.abilities.insert(Ability::Steel, DieGrant::Four);
        let character = Character::from_archetypes(vec![&knight]);
        let text = render_character(&character, &TechniqueCatalog::default(), DiceStyle::Glyph);
        assert!(text.contains("\n         Steel: 🎲🎲🎲🎲\n"));
        assert!(text.contains("\n         Speed: 🎲🎲\n"));
        assert!(!text.contains("4d"));
    }

    #[test]
    fn specialty_heading_keeps_its_note_after_the_colon() {
        let smith = Archetype {
            name: "Smith".to_string(),
            specialty: Some("Forging".to_string()),
            ..Archetype::default()
        };
        let character = Character::from_archetypes(vec![&smith]);
        let text = render_character(&character, &TechniqueCatalog::default(), DiceStyle::Plain);
        assert!(text.contains("\nSPECIALTIES: (max of one per Ability)\n    (Smith) Forging"));
    }

    #[test]
    fn dice_style_parses_names() {
        assert_eq!(DiceStyle::parse("Glyph"), Some(DiceStyle::Glyph));
        assert_eq!(DiceStyle::parse("dots"), None);
    }
}
