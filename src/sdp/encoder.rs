//! Encoding a relaxation as a numeric semidefinite program.
//!
//! The moment problem
//!
//! ```text
//! maximize    c_0 + Σ_i c_i y_i
//! subject to  F_0 + Σ_i y_i F_i ⪰ 0
//! ```
//!
//! where `F_k` collects the Gram cells tagged with monomial `k`, is handed to
//! the solver through its conic dual
//!
//! ```text
//! minimize    c_0 + ⟨F_0, X⟩
//! subject to  ⟨-F_i, X⟩ = c_i    for i = 1..m
//!             X ⪰ 0
//! ```
//!
//! The multipliers of the equality constraints are then the moments `y_i`.

use std::path::Path;

use tracing::debug;

use super::decoder::{decode, Outcome};
use super::packed::packed_len;
use super::session::{RawSolution, SolverSession};
use super::sparse::{extract_all, SparseSymmetric};
use crate::config::SolverConfig;
use crate::error::{SdpError, SdpResult};
use crate::field::RealEmbedding;
use crate::relaxation::{GramMatrix, Relaxation};

/// Sign applied to every constraint matrix.
const CONSTRAINT_SCALE: f64 = -1.0;

/// The solver-agnostic data of a semidefinite program with equality constraints.
#[derive(Clone, Debug, PartialEq)]
pub struct NumericProgram {
    dim: usize,
    constant_offset: f64,
    fixed_matrix: SparseSymmetric,
    constraint_matrices: Vec<SparseSymmetric>,
    bounds: Vec<f64>,
}

impl NumericProgram {
    /// Assemble a program from its parts.
    ///
    /// `constraint_matrices[k]` and `bounds[k]` describe constraint `k + 1`.
    /// Triples at the same position are merged.
    ///
    /// # Panics
    ///
    /// Panics if the number of bounds differs from the number of constraint
    /// matrices, or if any matrix is not `dim × dim`.
    pub fn from_parts(
        dim: usize,
        constant_offset: f64,
        fixed_matrix: SparseSymmetric,
        constraint_matrices: Vec<SparseSymmetric>,
        bounds: Vec<f64>,
    ) -> Self {
        assert_eq!(
            constraint_matrices.len(),
            bounds.len(),
            "one bound per constraint matrix"
        );
        assert_eq!(fixed_matrix.dim(), dim, "fixed matrix dimension");
        assert!(
            constraint_matrices.iter().all(|a| a.dim() == dim),
            "constraint matrix dimension"
        );
        NumericProgram {
            dim,
            constant_offset,
            fixed_matrix: fixed_matrix.finish(),
            constraint_matrices: constraint_matrices.into_iter().map(SparseSymmetric::finish).collect(),
            bounds,
        }
    }

    /// Side length `d` of the semidefinite block.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of equality constraints `m`.
    pub fn constraint_count(&self) -> usize {
        self.constraint_matrices.len()
    }

    /// Length `d(d+1)/2` of the packed primal solution.
    pub fn packed_len(&self) -> usize {
        packed_len(self.dim)
    }

    /// Constant term of the objective.
    pub fn constant_offset(&self) -> f64 {
        self.constant_offset
    }

    /// Objective coefficient of the semidefinite variable.
    pub fn fixed_matrix(&self) -> &SparseSymmetric {
        &self.fixed_matrix
    }

    /// Constraint coefficient matrices; entry `k` belongs to monomial `k + 1`.
    pub fn constraint_matrices(&self) -> &[SparseSymmetric] {
        &self.constraint_matrices
    }

    /// Right-hand sides of the equality constraints, aligned with the matrices.
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }
}

/// Encodes a [`Relaxation`] once and solves or exports the result on demand.
#[derive(Clone, Debug)]
pub struct SdpEncoder {
    program: NumericProgram,
}

impl SdpEncoder {
    /// Encode `relaxation`.
    ///
    /// Fails with [`SdpError::MissingIdentity`] unless monomial 0 is the
    /// identity, and with [`SdpError::ObjectiveLength`] unless the objective
    /// carries one coefficient per unique monomial. Every Gram cell must be
    /// tagged with a monomial in `0..unique_monomial_count`, otherwise
    /// [`SdpError::MonomialOutOfRange`] is returned.
    pub fn new<R>(relaxation: &R) -> SdpResult<Self>
    where
        R: Relaxation + ?Sized,
    {
        let gram = relaxation.gram_matrix();
        if !gram.identity_at_zero() {
            return Err(SdpError::MissingIdentity);
        }

        let unique = relaxation.unique_monomial_count();
        let objective = relaxation.objective();
        if unique == 0 || objective.len() != unique {
            return Err(SdpError::ObjectiveLength {
                expected: unique,
                actual: objective.len(),
            });
        }

        let dim = gram.dim();
        let (mut matrices, skipped) = extract_all(gram, unique);
        if skipped > 0 {
            return Err(SdpError::MonomialOutOfRange {
                cells: skipped,
                count: unique,
            });
        }

        // matrices[0] belongs to the identity and stays unscaled
        let constraint_matrices: Vec<SparseSymmetric> = matrices
            .split_off(1)
            .iter()
            .map(|a| a.scaled(CONSTRAINT_SCALE))
            .collect();
        let fixed_matrix = matrices.pop().unwrap_or_else(|| SparseSymmetric::new(dim));

        let constant_offset = objective[0].to_real();
        let bounds: Vec<f64> = objective[1..].iter().map(RealEmbedding::to_real).collect();

        debug!(
            dim,
            constraints = constraint_matrices.len(),
            fixed_nnz = fixed_matrix.len(),
            constraint_nnz = constraint_matrices.iter().map(SparseSymmetric::len).sum::<usize>(),
            "encoded relaxation"
        );

        Ok(SdpEncoder {
            program: NumericProgram::from_parts(
                dim,
                constant_offset,
                fixed_matrix,
                constraint_matrices,
                bounds,
            ),
        })
    }

    /// Wrap an already assembled program.
    pub fn from_program(program: NumericProgram) -> Self {
        SdpEncoder { program }
    }

    /// The encoded program.
    pub fn program(&self) -> &NumericProgram {
        &self.program
    }

    /// Number of equality constraints `m`.
    pub fn constraint_count(&self) -> usize {
        self.program.constraint_count()
    }

    /// Side length `d` of the semidefinite block.
    pub fn dim(&self) -> usize {
        self.program.dim()
    }

    /// Solve and return the solver's raw arrays.
    pub fn solve_raw(&self, config: &SolverConfig) -> SdpResult<RawSolution> {
        let session = SolverSession::open(&self.program, config)?;
        Ok(session.solve())
    }

    /// Solve and decode the result.
    pub fn solve(&self, config: &SolverConfig) -> SdpResult<Outcome> {
        let raw = self.solve_raw(config)?;
        Ok(decode(&self.program, &raw))
    }

    /// Write the solver-native problem description to `path` without solving.
    pub fn export_problem(&self, path: impl AsRef<Path>, config: &SolverConfig) -> SdpResult<()> {
        let session = SolverSession::open(&self.program, config)?;
        session.export(path.as_ref())
    }
}
