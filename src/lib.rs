//! Neighborhood Match - greedy assignment of homeowners to neighborhoods
//!
//! Each homeowner ranks every neighborhood. Both sides carry fit ratings, and
//! the matcher seats homeowners greedily by fit score, bumping weaker fits out
//! of full neighborhoods, until everyone has exactly one neighborhood.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{fit_score, CapacityPolicy, MatchError, Matcher};
pub use error::AppError;
pub use models::{Assignment, Homeowner, MatchInput, Neighborhood, Occupant, Placement, Ratings};
pub use services::{InputReader, OccupantOrder, OutputFormat, OutputWriter, ParseError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let score = fit_score(&Ratings::new(3, 9, 2), &Ratings::new(7, 6, 4));
        assert_eq!(score, 83);
    }
}
