use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound (inclusive) for every rating axis
pub const MAX_RATING: u8 = 10;

/// Fit ratings shared by homeowners and neighborhoods
///
/// Each axis is an integer in `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Ratings {
    #[validate(range(max = 10))]
    pub efficiency: u8,
    #[validate(range(max = 10))]
    pub water: u8,
    #[validate(range(max = 10))]
    pub resilience: u8,
}

impl Ratings {
    pub fn new(efficiency: u8, water: u8, resilience: u8) -> Self {
        Self {
            efficiency,
            water,
            resilience,
        }
    }

    /// Ratings as a vector in axis order (efficiency, water, resilience)
    #[inline]
    pub fn as_vector(&self) -> [u8; 3] {
        [self.efficiency, self.water, self.resilience]
    }
}

/// A neighborhood homeowners can be assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Neighborhood {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(nested)]
    pub ratings: Ratings,
}

impl Neighborhood {
    pub fn new(id: impl Into<String>, ratings: Ratings) -> Self {
        Self {
            id: id.into(),
            ratings,
        }
    }
}

/// A homeowner with a strict preference ranking over neighborhoods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Homeowner {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(nested)]
    pub ratings: Ratings,
    /// Neighborhood ids, most preferred first
    #[validate(length(min = 1))]
    pub preferences: Vec<String>,
}

impl Homeowner {
    pub fn new(id: impl Into<String>, ratings: Ratings, preferences: Vec<String>) -> Self {
        Self {
            id: id.into(),
            ratings,
            preferences,
        }
    }
}

/// Everything the matcher needs for one run, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInput {
    pub neighborhoods: Vec<Neighborhood>,
    pub homeowners: Vec<Homeowner>,
}
