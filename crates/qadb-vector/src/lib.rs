//! qadb-vector
//!
//! Flat (exhaustive) Euclidean nearest-neighbour index. Corpora are small and
//! fixed at startup, so every search scans all rows and is exact.
pub mod distance;
pub mod index;

pub use distance::{euclidean_sq, is_zero_vector};
pub use index::FlatIndex;
