// Model exports
pub mod assignment;
pub mod domain;

pub use assignment::{Assignment, MatchStats, Occupant, Placement};
pub use domain::{Homeowner, MatchInput, Neighborhood, Ratings, MAX_RATING};
