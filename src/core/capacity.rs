use serde::{Deserialize, Serialize};

/// How many homeowners a neighborhood may hold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CapacityPolicy {
    /// Homeowners must divide evenly among neighborhoods
    #[default]
    Exact,
    /// Round the per-neighborhood share up, leaving slack when the division is uneven
    Ceiling,
}

/// Capacity could not be derived under the chosen policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnevenShare {
    pub homeowners: usize,
    pub neighborhoods: usize,
}

impl CapacityPolicy {
    /// Per-neighborhood capacity for the given population
    ///
    /// With no neighborhoods there is nothing to fill and capacity is zero.
    pub fn capacity(self, homeowners: usize, neighborhoods: usize) -> Result<usize, UnevenShare> {
        if neighborhoods == 0 {
            return Ok(0);
        }

        match self {
            CapacityPolicy::Exact if homeowners % neighborhoods != 0 => Err(UnevenShare {
                homeowners,
                neighborhoods,
            }),
            CapacityPolicy::Exact => Ok(homeowners / neighborhoods),
            CapacityPolicy::Ceiling => Ok(homeowners.div_ceil(neighborhoods)),
        }
    }
}
