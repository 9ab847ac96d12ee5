use serde::{Deserialize, Serialize};

/// A homeowner seated in a neighborhood, with the fit score that got them there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub homeowner: String,
    pub score: u32,
}

/// Final occupants of one neighborhood
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(rename = "id")]
    pub neighborhood: String,
    /// Occupants in the matcher's internal order (arrival order, reshuffled by evictions)
    pub occupants: Vec<Occupant>,
}

impl Placement {
    /// Occupants sorted by score, highest first; equal scores keep their internal order
    pub fn ranked_occupants(&self) -> Vec<Occupant> {
        let mut ranked = self.occupants.clone();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }
}

/// Counters describing how the matcher got to its result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub iterations: usize,
    pub evictions: usize,
}

/// Result of a complete matching run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub capacity: usize,
    /// One entry per neighborhood, in definition order
    pub neighborhoods: Vec<Placement>,
    #[serde(skip)]
    pub stats: MatchStats,
}

impl Assignment {
    /// Total number of homeowners placed across all neighborhoods
    pub fn total_placed(&self) -> usize {
        self.neighborhoods.iter().map(|p| p.occupants.len()).sum()
    }

    /// Neighborhood a homeowner ended up in, if any
    pub fn neighborhood_of(&self, homeowner: &str) -> Option<&str> {
        self.neighborhoods
            .iter()
            .find(|p| p.occupants.iter().any(|o| o.homeowner == homeowner))
            .map(|p| p.neighborhood.as_str())
    }

    pub fn placement(&self, neighborhood: &str) -> Option<&Placement> {
        self.neighborhoods.iter().find(|p| p.neighborhood == neighborhood)
    }
}
