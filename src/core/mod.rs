// Core algorithm exports
pub mod capacity;
pub mod matcher;
pub mod scoring;

pub use capacity::CapacityPolicy;
pub use matcher::{MatchError, Matcher};
pub use scoring::{calculate_fit, dot_product, fit_score};
