//! Line-oriented state machine turning one catalog block into an [Archetype].
//!
//! A block reads as a name line, a header line (power level, order marker,
//! requirements), then field sections introduced by indicator tokens at line
//! start (`Abilities`, `Training`, ...). Inside specialty, training, traits,
//! techniques and bond sections a `Choose ...` sentence opens a choice block:
//! its member lines are kept together as one opaque newline-joined entry and
//! left for the reader to resolve.

use std::num::ParseIntError;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::archetype::{Ability, Archetype, DieGrant};
use super::entries::normalize_entries;

const HEADER_SEPARATOR: &str = " • ";

static CHOICE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(And )?[Cc]hoose.*\.").expect("choice pattern is valid")
});

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid power level '{value}': {source}")]
    PowerLevel {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("unknown ability in entry '{entry}'")]
    UnknownAbility { entry: String },
    #[error("unknown die grant '{grant}' for {ability}")]
    UnknownDieGrant { ability: Ability, grant: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Name,
    PowerLevel,
    Abilities,
    Specialty,
    Training,
    Traits,
    Resources,
    Techniques,
    BondRelationship,
    SpecialRules,
    /// Lines after the header and before the first field indicator.
    Unparsed,
}

/// Indicator token -> state. Matching picks the longest token that prefixes
/// the line, so the outcome never depends on table order.
pub const FIELD_INDICATORS: &[(&str, ParserState)] = &[
    ("Abilities", ParserState::Abilities),
    ("Specialty", ParserState::Specialty),
    ("Training", ParserState::Training),
    ("Traits", ParserState::Traits),
    ("Resources", ParserState::Resources),
    ("Techniques", ParserState::Techniques),
    ("Bond Relationship", ParserState::BondRelationship),
    ("Special Rules", ParserState::SpecialRules),
    ("Related Rules", ParserState::SpecialRules),
];

/// Returns the indicated state and the rest of the line with the token and
/// one following space removed.
pub fn match_indicator(line: &str) -> Option<(ParserState, &str)> {
    let (token, state) = FIELD_INDICATORS
        .iter()
        .filter(|(token, _)| line.starts_with(token))
        .max_by_key(|(token, _)| token.len())?;
    let rest = &line[token.len()..];
    Some((*state, rest.strip_prefix(' ').unwrap_or(rest)))
}

/// Field a pending choice block is flushed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChoiceTarget {
    Specialty,
    Training,
    Traits,
    Techniques,
    Bond,
}

#[derive(Debug)]
struct ChoiceBlock {
    target: ChoiceTarget,
    lines: Vec<String>,
}

struct ArchetypeParser {
    record: Archetype,
    state: ParserState,
    choice: Option<ChoiceBlock>,
}

/// Parse one record block. Only a malformed power level or an ability entry
/// outside the fixed vocabulary is an error; every other gap is tolerated.
pub fn parse_archetype(block: &str) -> Result<Archetype, ParseError> {
    let mut parser = ArchetypeParser::new();
    for line in block.lines() {
        parser.parse_line(line.trim())?;
    }
    Ok(parser.finish())
}

impl ArchetypeParser {
    fn new() -> Self {
        Self {
            record: Archetype::default(),
            state: ParserState::Name,
            choice: None,
        }
    }

    fn finish(mut self) -> Archetype {
        self.flush_choice();
        self.record
    }

    fn parse_line(&mut self, mut line: &str) -> Result<(), ParseError> {
        if let Some((state, rest)) = match_indicator(line) {
            self.flush_choice();
            self.state = state;
            line = rest;
        }

        match self.state {
            ParserState::Name => {
                if !line.is_empty() {
                    self.record.name = line.to_string();
                    self.state = ParserState::PowerLevel;
                }
            }
            ParserState::PowerLevel => {
                if !line.is_empty() {
                    self.parse_header(line)?;
                    self.state = ParserState::Unparsed;
                }
            }
            ParserState::Abilities => self.parse_abilities(line)?,
            ParserState::Specialty => {
                if !self.handle_choice(line, ChoiceTarget::Specialty) && !line.is_empty() {
                    self.record.specialty = Some(line.to_string());
                }
            }
            ParserState::Training => {
                if !self.handle_choice(line, ChoiceTarget::Training) {
                    self.record.training.extend(normalize_entries(line));
                }
            }
            ParserState::Traits => {
                if !self.handle_choice(line, ChoiceTarget::Traits) {
                    self.record.traits.extend(normalize_entries(line));
                }
            }
            ParserState::Techniques => {
                if !self.handle_choice(line, ChoiceTarget::Techniques) {
                    self.record.techniques.extend(normalize_entries(line));
                }
            }
            ParserState::Resources => {
                let resource = line.trim_end_matches('.');
                if !resource.is_empty() {
                    self.record.resources.push(resource.to_string());
                }
            }
            ParserState::BondRelationship => {
                if !self.handle_choice(line, ChoiceTarget::Bond) && !line.is_empty() {
                    self.record.bond = Some(line.to_string());
                }
            }
            ParserState::SpecialRules => {
                if !line.is_empty() {
                    self.record.special_rules = Some(line.to_string());
                }
            }
            ParserState::Unparsed => {
                if !line.is_empty() {
                    self.record.unparsed_lines.push(line.to_string());
                }
            }
        }
        Ok(())
    }

    /// `power level N • exemplar order • requires the X or the Y, the Z`
    fn parse_header(&mut self, line: &str) -> Result<(), ParseError> {
        for part in line.split(HEADER_SEPARATOR) {
            let part = part.trim();
            let lowered = part.to_ascii_lowercase();
            if lowered == "exemplar order" {
                self.record.is_order = true;
            } else if lowered.starts_with("requires ") {
                let names = part["requires ".len()..]
                    .split(", ")
                    .map(|item| match item.rsplit_once("or ") {
                        Some((_, name)) => name.trim(),
                        None => item.trim(),
                    })
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();
                self.record.requirements = Some(names);
            } else if lowered.starts_with("power level") {
                let value = part.rsplit(' ').next().unwrap_or_default();
                self.record.power_level =
                    value.parse().map_err(|source| ParseError::PowerLevel {
                        value: value.to_string(),
                        source,
                    })?;
            } else if !part.is_empty() {
                self.record.unparsed_lines.push(part.to_string());
            }
        }
        Ok(())
    }

    /// `Steel 4d, possibly Speed 3d, Prowess 3d or 4d`
    fn parse_abilities(&mut self, line: &str) -> Result<(), ParseError> {
        for entry in line.split(", ").map(str::trim).filter(|e| !e.is_empty()) {
            let (possibly, rest) = match entry.strip_prefix("possibly ") {
                Some(rest) => (true, rest),
                None => (false, entry),
            };
            let (name, raw_grant) = rest.split_once(' ').unwrap_or((rest, ""));
            let ability = Ability::from_name(name).ok_or_else(|| ParseError::UnknownAbility {
                entry: entry.to_string(),
            })?;
            let raw_grant = if possibly {
                format!("possibly {raw_grant}")
            } else {
                raw_grant.to_string()
            };
            let grant = DieGrant::parse(&raw_grant)
                .ok_or(ParseError::UnknownDieGrant { ability, grant: raw_grant })?;
            self.record.abilities.insert(ability, grant);
        }
        Ok(())
    }

    /// Returns true when the line was consumed by a choice block.
    fn handle_choice(&mut self, line: &str, target: ChoiceTarget) -> bool {
        if CHOICE_START.is_match(line) {
            self.flush_choice();
            self.choice = Some(ChoiceBlock {
                target,
                lines: vec![line.to_string()],
            });
            return true;
        }
        match self.choice.as_mut() {
            Some(block) => {
                if !line.is_empty() {
                    block.lines.push(line.trim_matches('.').to_string());
                }
                true
            }
            None => false,
        }
    }

    fn flush_choice(&mut self) {
        let Some(block) = self.choice.take() else {
            return;
        };
        let joined = block.lines.join("\n");
        if joined.is_empty() {
            return;
        }
        match block.target {
            ChoiceTarget::Specialty => self.record.specialty = Some(joined),
            ChoiceTarget::Bond => self.record.bond = Some(joined),
            ChoiceTarget::Training => self.record.training.push(joined),
            ChoiceTarget::Traits => self.record.traits.push(joined),
            ChoiceTarget::Techniques => self.record.techniques.push(joined),
        }
    }
}
