use tracing::debug;

use qadb_core::error::{Error, Result};
use qadb_core::types::Neighbor;

use crate::distance::euclidean_sq;

/// Exact nearest-neighbour index over a fixed set of vectors.
///
/// Rows are stored contiguously in insertion order; position `i` is the
/// `i`-th vector passed to [`FlatIndex::build`]. Immutable once built.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dim: usize,
    len: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self> {
        let first = vectors.first().ok_or(Error::EmptyIndex)?;
        let dim = first.len();
        let mut data = Vec::with_capacity(dim * vectors.len());
        for v in vectors {
            if v.len() != dim { return Err(Error::DimensionMismatch { expected: dim, found: v.len() }); }
            data.extend_from_slice(v);
        }
        debug!(len = vectors.len(), dim, "built flat index");
        Ok(Self { dim, len: vectors.len(), data })
    }

    pub fn len(&self) -> usize { self.len }

    /// Always false: an index cannot be built from zero vectors.
    pub fn is_empty(&self) -> bool { self.len == 0 }

    pub fn dim(&self) -> usize { self.dim }

    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        (position < self.len).then(|| &self.data[position * self.dim..(position + 1) * self.dim])
    }

    /// The `min(k, len)` closest rows to `query`, ascending by squared
    /// distance. Equal distances keep the lower position first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 { return Err(Error::InvalidArgument("k must be positive".into())); }
        if query.len() != self.dim { return Err(Error::DimensionMismatch { expected: self.dim, found: query.len() }); }

        let mut hits: Vec<Neighbor> = self.rows()
            .enumerate()
            .map(|(position, row)| Neighbor { position, distance: euclidean_sq(query, row) })
            .collect();
        let order = |a: &Neighbor, b: &Neighbor| a.distance.total_cmp(&b.distance).then(a.position.cmp(&b.position));
        let k = k.min(hits.len());
        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, order);
            hits.truncate(k);
        }
        hits.sort_unstable_by(order);
        Ok(hits)
    }

    /// Closest row only; shorthand for `search(query, 1)`.
    pub fn nearest(&self, query: &[f32]) -> Result<Neighbor> {
        self.search(query, 1)?.into_iter().next().ok_or(Error::EmptyIndex)
    }

    fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        // chunks_exact(0) panics; a zero-width index still has `len` rows
        (0..self.len).map(move |i| &self.data[i * self.dim..(i + 1) * self.dim])
    }
}
