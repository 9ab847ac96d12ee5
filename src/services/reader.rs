use std::collections::{BTreeSet, HashSet};
use std::io::BufRead;

use thiserror::Error;
use tracing::{debug, info};
use validator::Validate;

use crate::models::{Homeowner, MatchInput, Neighborhood, Ratings, MAX_RATING};

/// Separator between neighborhood ids in a homeowner's ranking
pub const PREFERENCE_SEPARATOR: char = '>';

/// Errors that can occur while reading match input
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed input line {line_number}: {line}")]
    MalformedLine { line_number: usize, line: String },

    #[error(
        "found neighborhood preferences for non-present neighborhoods [{}]",
        .neighborhoods.join(", ")
    )]
    PreferenceReferenceMismatch { neighborhoods: Vec<String> },

    #[error(
        "homeowner {homeowner} does not rank every neighborhood (missing {})",
        .missing.join(", ")
    )]
    IncompleteRanking {
        homeowner: String,
        missing: Vec<String>,
    },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// A single well-formed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Neighborhood(Neighborhood),
    Homeowner(Homeowner),
}

/// Reads neighborhood and homeowner records, one per line
///
/// ```text
/// N N0 E:7 W:7 R:10
/// H H0 E:3 W:9 R:2 N2>N0>N1
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InputReader {
    require_complete_rankings: bool,
}

impl Default for InputReader {
    fn default() -> Self {
        Self {
            require_complete_rankings: true,
        }
    }
}

impl InputReader {
    pub fn new(require_complete_rankings: bool) -> Self {
        Self {
            require_complete_rankings,
        }
    }

    /// Parse and validate a complete input
    ///
    /// Line-level problems are reported first, in input order. Cross-reference
    /// checks run only once every line is known to be well formed.
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<MatchInput, ParseError> {
        let mut input = MatchInput::default();
        let mut neighborhood_ids = HashSet::new();
        let mut homeowner_ids = HashSet::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }

            let malformed = || ParseError::MalformedLine {
                line_number: index + 1,
                line: line.to_string(),
            };

            let record = parse_record(line).map_err(|reason| {
                debug!(line_number = index + 1, reason, "Rejected input line");
                malformed()
            })?;

            match record {
                Record::Neighborhood(neighborhood) => {
                    if !neighborhood_ids.insert(neighborhood.id.clone()) {
                        debug!(line_number = index + 1, "Duplicate neighborhood id");
                        return Err(malformed());
                    }
                    input.neighborhoods.push(neighborhood);
                }
                Record::Homeowner(homeowner) => {
                    if !homeowner_ids.insert(homeowner.id.clone()) {
                        debug!(line_number = index + 1, "Duplicate homeowner id");
                        return Err(malformed());
                    }
                    input.homeowners.push(homeowner);
                }
            }
        }

        verify_preferences(&input)?;
        if self.require_complete_rankings {
            verify_complete_rankings(&input)?;
        }

        info!(
            "Read {} neighborhoods and {} homeowners",
            input.neighborhoods.len(),
            input.homeowners.len()
        );

        Ok(input)
    }

    pub fn parse_str(&self, input: &str) -> Result<MatchInput, ParseError> {
        self.parse(input.as_bytes())
    }
}

/// Parse one line, returning `None` if it matches neither record shape
pub fn parse_line(line: &str) -> Option<Record> {
    parse_record(line).ok()
}

fn parse_record(line: &str) -> Result<Record, &'static str> {
    if let Some(rest) = line.strip_prefix("N ") {
        let (id, ratings, _) = split_fields(rest, false)?;
        let neighborhood = Neighborhood::new(id, ratings);
        neighborhood
            .validate()
            .map_err(|_| "neighborhood failed validation")?;
        return Ok(Record::Neighborhood(neighborhood));
    }

    if let Some(rest) = line.strip_prefix("H ") {
        let (id, ratings, preferences) = split_fields(rest, true)?;
        let preferences = parse_preferences(preferences.unwrap_or_default())?;
        let homeowner = Homeowner::new(id, ratings, preferences);
        homeowner
            .validate()
            .map_err(|_| "homeowner failed validation")?;
        return Ok(Record::Homeowner(homeowner));
    }

    Err("unknown record type")
}

/// Split `<id> E:<n> W:<n> R:<n>[ <preferences>]`
///
/// The id is the shortest prefix that lets the rest of the line parse, so ids
/// may contain spaces.
fn split_fields(rest: &str, with_preferences: bool) -> Result<(&str, Ratings, Option<&str>), &'static str> {
    for (at, _) in rest.match_indices(" E:") {
        let id = &rest[..at];
        let tail = &rest[at + 1..];

        let mut fields = if with_preferences {
            tail.splitn(4, ' ')
        } else {
            tail.splitn(3, ' ')
        };

        let ratings = (
            fields.next().and_then(|f| parse_rating(f, "E:")),
            fields.next().and_then(|f| parse_rating(f, "W:")),
            fields.next().and_then(|f| parse_rating(f, "R:")),
        );
        let (Some(efficiency), Some(water), Some(resilience)) = ratings else {
            continue;
        };

        let preferences = fields.next();
        if with_preferences != preferences.is_some() {
            continue;
        }

        return Ok((id, Ratings::new(efficiency, water, resilience), preferences));
    }

    Err("expected <id> E:<0-10> W:<0-10> R:<0-10>")
}

/// A rating is a single digit or exactly `10`
fn parse_rating(field: &str, label: &str) -> Option<u8> {
    let value = field.strip_prefix(label)?;
    let valid = match value.as_bytes() {
        [digit] => digit.is_ascii_digit(),
        b"10" => true,
        _ => false,
    };
    if !valid {
        return None;
    }
    value.parse().ok().filter(|&rating| rating <= MAX_RATING)
}

fn parse_preferences(field: &str) -> Result<Vec<String>, &'static str> {
    if field.is_empty() {
        return Err("empty preference list");
    }

    let mut seen = HashSet::new();
    let mut preferences = Vec::new();
    for entry in field.split(PREFERENCE_SEPARATOR) {
        if entry.is_empty() {
            return Err("empty preference entry");
        }
        if !seen.insert(entry) {
            return Err("neighborhood ranked twice");
        }
        preferences.push(entry.to_string());
    }

    Ok(preferences)
}

/// Neighborhoods referenced by preferences must be exactly the defined ones
///
/// An undefined neighborhood in a ranking and a defined neighborhood nobody
/// ranks are both rejected.
pub fn verify_preferences(input: &MatchInput) -> Result<(), ParseError> {
    let defined: BTreeSet<&str> = input.neighborhoods.iter().map(|n| n.id.as_str()).collect();
    let referenced: BTreeSet<&str> = input
        .homeowners
        .iter()
        .flat_map(|h| h.preferences.iter().map(String::as_str))
        .collect();

    let neighborhoods: Vec<String> = defined
        .symmetric_difference(&referenced)
        .map(|id| id.to_string())
        .collect();

    if neighborhoods.is_empty() {
        Ok(())
    } else {
        Err(ParseError::PreferenceReferenceMismatch { neighborhoods })
    }
}

/// Every homeowner must rank every defined neighborhood
pub fn verify_complete_rankings(input: &MatchInput) -> Result<(), ParseError> {
    for homeowner in &input.homeowners {
        let ranked: HashSet<&str> = homeowner.preferences.iter().map(String::as_str).collect();
        let missing: Vec<String> = input
            .neighborhoods
            .iter()
            .filter(|n| !ranked.contains(n.id.as_str()))
            .map(|n| n.id.clone())
            .collect();

        if !missing.is_empty() {
            return Err(ParseError::IncompleteRanking {
                homeowner: homeowner.id.clone(),
                missing,
            });
        }
    }

    Ok(())
}
