//! Sparse symmetric matrices and their extraction from a tagged Gram matrix.
//!
//! A symmetric matrix is stored by its lower triangle only: every triple has
//! `row >= col`, and an off-diagonal triple stands for both `(row, col)` and
//! `(col, row)`. This is the convention conic solvers use for the coefficient
//! matrices of a semidefinite variable, so the encoder can hand the triples
//! over without touching them again.

use ndarray::Array2;

use crate::relaxation::{GramMatrix, MonomialIndex};

/// One stored entry of a [`SparseSymmetric`] matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triplet {
    /// Row index, always `>= col`.
    pub row: usize,
    /// Column index.
    pub col: usize,
    /// Entry value.
    pub value: f64,
}

/// A `dim × dim` symmetric matrix stored as lower-triangular triples.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseSymmetric {
    dim: usize,
    /// Lower-triangular triples, sorted by `(col, row)` once finished
    entries: Vec<Triplet>,
}

impl SparseSymmetric {
    /// Create an empty matrix
    pub fn new(dim: usize) -> Self {
        SparseSymmetric {
            dim,
            entries: Vec::new(),
        }
    }

    /// Add `value` at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position lies above the diagonal or outside the matrix.
    pub fn push(&mut self, row: usize, col: usize, value: f64) {
        assert!(row >= col, "({row}, {col}) is above the diagonal");
        assert!(row < self.dim, "({row}, {col}) is out of bounds for dimension {}", self.dim);
        self.entries.push(Triplet { row, col, value });
    }

    /// Sort entries column by column and merge triples at the same position.
    pub fn finish(mut self) -> Self {
        self.entries.sort_by_key(|t| (t.col, t.row));
        let mut merged: Vec<Triplet> = Vec::with_capacity(self.entries.len());
        for t in self.entries {
            match merged.last_mut() {
                Some(last) if last.row == t.row && last.col == t.col => last.value += t.value,
                _ => merged.push(t),
            }
        }
        self.entries = merged;
        self
    }

    /// The same matrix with every entry multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        SparseSymmetric {
            dim: self.dim,
            entries: self
                .entries
                .iter()
                .map(|t| Triplet { value: t.value * factor, ..*t })
                .collect(),
        }
    }

    /// Side length of the matrix
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Stored triples
    pub fn entries(&self) -> &[Triplet] {
        &self.entries
    }

    /// Number of stored triples
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no triple is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expand to a dense symmetric matrix
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.dim, self.dim));
        for t in &self.entries {
            dense[[t.row, t.col]] += t.value;
            if t.row != t.col {
                dense[[t.col, t.row]] += t.value;
            }
        }
        dense
    }

    /// `⟨self, X⟩ = trace(self · X)` for a dense symmetric `X`.
    pub fn inner(&self, x: &Array2<f64>) -> f64 {
        self.entries
            .iter()
            .map(|t| {
                let weight = if t.row == t.col { 1.0 } else { 2.0 };
                weight * t.value * x[[t.row, t.col]]
            })
            .sum()
    }
}

/// Collect the cells of `gram` tagged with `monomial`, each multiplied by `scale`.
///
/// Only cells with `row >= col` are visited, so symmetric pairs are counted
/// once. Every matching cell yields its own triple.
pub fn extract_monomial<G>(gram: &G, monomial: MonomialIndex, scale: f64) -> SparseSymmetric
where
    G: GramMatrix + ?Sized,
{
    let dim = gram.dim();
    let mut matrix = SparseSymmetric::new(dim);
    for col in 0..dim {
        for row in col..dim {
            if let Some(cell) = gram.cell(row, col) {
                if cell.monomial == monomial {
                    matrix.push(row, col, cell.scale * scale);
                }
            }
        }
    }
    matrix.finish()
}

/// Extract the matrices of monomials `0..count` in a single sweep.
///
/// Entry `k` of the result equals `extract_monomial(gram, k, 1.0)`. Cells
/// tagged with an index `>= count` are skipped and counted in the second
/// return value.
pub fn extract_all<G>(gram: &G, count: usize) -> (Vec<SparseSymmetric>, usize)
where
    G: GramMatrix + ?Sized,
{
    let dim = gram.dim();
    let mut matrices: Vec<SparseSymmetric> = (0..count).map(|_| SparseSymmetric::new(dim)).collect();
    let mut skipped = 0;
    for col in 0..dim {
        for row in col..dim {
            let Some(cell) = gram.cell(row, col) else {
                continue;
            };
            match matrices.get_mut(cell.monomial) {
                Some(matrix) => matrix.push(row, col, cell.scale),
                None => skipped += 1,
            }
        }
    }
    (matrices.into_iter().map(SparseSymmetric::finish).collect(), skipped)
}
