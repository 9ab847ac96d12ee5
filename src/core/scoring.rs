use crate::models::{Homeowner, Neighborhood, Ratings};

/// Dot product of two rating vectors
///
/// Both vectors share the fixed three-axis layout, so the result is bounded
/// by `3 * 10 * 10 = 300`.
#[inline]
pub fn dot_product(a: &[u8; 3], b: &[u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| u32::from(x) * u32::from(y))
        .sum()
}

/// Fit score between two sets of ratings (higher = better match)
#[inline]
pub fn fit_score(a: &Ratings, b: &Ratings) -> u32 {
    dot_product(&a.as_vector(), &b.as_vector())
}

/// Fit score of a homeowner for a neighborhood
#[inline]
pub fn calculate_fit(homeowner: &Homeowner, neighborhood: &Neighborhood) -> u32 {
    fit_score(&homeowner.ratings, &neighborhood.ratings)
}
