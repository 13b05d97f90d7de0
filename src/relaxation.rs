//! The read-only view of a moment relaxation consumed by the encoder.
//!
//! Building a relaxation (choosing generating words, reducing products to
//! normal form, symmetrizing) happens upstream. The encoder only needs to know,
//! for each cell of the Gram matrix, which monomial it holds and with what
//! scale, plus the objective coefficient of every monomial. [`GramMatrix`] and
//! [`Relaxation`] are exactly that interface.
//!
//! [`MomentMatrix`] and [`MomentRelaxation`] are plain carriers implementing
//! the traits for callers that assemble the tags themselves.

use std::collections::BTreeSet;

use crate::field::RealEmbedding;

/// Index of a distinct monomial. Index 0 is reserved for the identity.
pub type MonomialIndex = usize;

/// The monomial index of the identity.
pub const IDENTITY: MonomialIndex = 0;

/// The content of one Gram matrix cell: a monomial and the factor it enters with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GramCell {
    /// The monomial this cell evaluates to.
    pub monomial: MonomialIndex,
    /// Multiplicative factor of the monomial in this cell.
    pub scale: f64,
}

impl GramCell {
    /// A cell holding `monomial` with unit scale.
    pub fn new(monomial: MonomialIndex) -> Self {
        GramCell {
            monomial,
            scale: 1.0,
        }
    }

    /// A cell holding `scale · monomial`.
    pub fn scaled(monomial: MonomialIndex, scale: f64) -> Self {
        GramCell { monomial, scale }
    }
}

/// A symmetric matrix whose cells are tagged by monomial index.
pub trait GramMatrix {
    /// Side length `d` of the matrix.
    fn dim(&self) -> usize;

    /// The monomial stored at `(row, col)`, or `None` for a structural zero.
    ///
    /// Implementations must be symmetric: `cell(r, c) == cell(c, r)`.
    fn cell(&self, row: usize, col: usize) -> Option<GramCell>;

    /// Whether monomial index 0 denotes the identity.
    fn identity_at_zero(&self) -> bool;
}

/// A moment relaxation: a Gram matrix and a linear objective over its monomials.
pub trait Relaxation {
    /// Coefficient field of the objective.
    type Coefficient: RealEmbedding;

    /// Concrete Gram matrix type.
    type Gram: GramMatrix;

    /// The tagged Gram matrix.
    fn gram_matrix(&self) -> &Self::Gram;

    /// One coefficient per unique monomial, indexed by [`MonomialIndex`].
    fn objective(&self) -> &[Self::Coefficient];

    /// Number of distinct monomials in the Gram matrix, identity included.
    fn unique_monomial_count(&self) -> usize;
}

/// Dense table of Gram cells.
///
/// Cells are written in symmetric pairs, so the table can never become
/// asymmetric.
#[derive(Clone, Debug, PartialEq)]
pub struct MomentMatrix {
    dim: usize,
    cells: Vec<Option<GramCell>>,
    identity: Option<MonomialIndex>,
}

impl MomentMatrix {
    /// Create an empty `dim × dim` matrix with no identity declared.
    pub fn new(dim: usize) -> Self {
        MomentMatrix {
            dim,
            cells: vec![None; dim * dim],
            identity: None,
        }
    }

    /// Declare which monomial index denotes the identity.
    pub fn with_identity(mut self, monomial: MonomialIndex) -> Self {
        self.identity = Some(monomial);
        self
    }

    /// Tag cells `(row, col)` and `(col, row)` with `monomial` at unit scale.
    pub fn set(&mut self, row: usize, col: usize, monomial: MonomialIndex) {
        self.set_cell(row, col, GramCell::new(monomial));
    }

    /// Tag cells `(row, col)` and `(col, row)` with `cell`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    pub fn set_cell(&mut self, row: usize, col: usize, cell: GramCell) {
        assert!(
            row < self.dim && col < self.dim,
            "cell ({row}, {col}) out of bounds for dimension {}",
            self.dim
        );
        self.cells[row * self.dim + col] = Some(cell);
        self.cells[col * self.dim + row] = Some(cell);
    }

    /// Build a matrix from the tags of its lower triangle, row by row.
    ///
    /// `rows[r]` holds the monomials of cells `(r, 0) ..= (r, r)`.
    pub fn from_lower_rows(rows: &[Vec<MonomialIndex>]) -> Self {
        let mut matrix = MomentMatrix::new(rows.len());
        for (row, tags) in rows.iter().enumerate() {
            assert_eq!(tags.len(), row + 1, "row {row} must hold {} tags", row + 1);
            for (col, &monomial) in tags.iter().enumerate() {
                matrix.set(row, col, monomial);
            }
        }
        matrix
    }

    /// Distinct monomial indices that occur in the matrix.
    pub fn monomials(&self) -> BTreeSet<MonomialIndex> {
        self.cells.iter().flatten().map(|cell| cell.monomial).collect()
    }
}

impl GramMatrix for MomentMatrix {
    fn dim(&self) -> usize {
        self.dim
    }

    fn cell(&self, row: usize, col: usize) -> Option<GramCell> {
        if row < self.dim && col < self.dim {
            self.cells[row * self.dim + col]
        } else {
            None
        }
    }

    fn identity_at_zero(&self) -> bool {
        self.identity == Some(IDENTITY)
    }
}

/// A [`MomentMatrix`] paired with its objective.
#[derive(Clone, Debug)]
pub struct MomentRelaxation<C> {
    gram: MomentMatrix,
    objective: Vec<C>,
    unique_monomial_count: usize,
}

impl<C: RealEmbedding> MomentRelaxation<C> {
    /// Pair `gram` with `objective`.
    ///
    /// The unique monomial count is the number of distinct indices in `gram`.
    /// Indices are expected to be contiguous from 0.
    pub fn new(gram: MomentMatrix, objective: Vec<C>) -> Self {
        let unique_monomial_count = gram.monomials().len();
        MomentRelaxation {
            gram,
            objective,
            unique_monomial_count,
        }
    }
}

impl<C: RealEmbedding> Relaxation for MomentRelaxation<C> {
    type Coefficient = C;
    type Gram = MomentMatrix;

    fn gram_matrix(&self) -> &MomentMatrix {
        &self.gram
    }

    fn objective(&self) -> &[C] {
        &self.objective
    }

    fn unique_monomial_count(&self) -> usize {
        self.unique_monomial_count
    }
}
