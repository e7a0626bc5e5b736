//! Distance helpers for the flat index.
//!
//! Build and search both use squared Euclidean distance (L2²); lower is
//! closer. For unit vectors this is `2 - 2·cos`, so it ranks exactly like
//! cosine similarity.

/// Squared Euclidean distance between two equal-length slices.
#[inline]
pub fn euclidean_sq(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| { let d = x - y; d * d }).sum()
}

/// True when every component is exactly zero, e.g. a query with no known term.
#[inline]
pub fn is_zero_vector(v: &[f32]) -> bool {
    v.iter().all(|x| *x == 0.0)
}
