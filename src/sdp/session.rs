//! Solver sessions backed by the Clarabel interior-point solver.
//!
//! Clarabel solves conic programs of the form
//!
//! ```text
//! minimize    ½ xᵀPx + qᵀx
//! subject to  Ax + s = b,  s ∈ K
//! ```
//!
//! A [`NumericProgram`] is mapped onto it by taking `x` to be the scaled
//! upper-triangular vectorization of the semidefinite variable `X`: diagonal
//! entries as they are, off-diagonal entries multiplied by √2, stacked column
//! by column of the upper triangle. With that scaling `⟨A, X⟩` is a plain dot
//! product, so every lower-triangular triple `(r, c, v)` becomes one
//! coefficient `v` (or `√2·v` off the diagonal) in column `r(r+1)/2 + c`.
//! The rows of `A` are the `m` equality constraints (zero cone) followed by
//! `-I` over the PSD triangle cone, which forces `x` itself to be PSD.
//!
//! Everything Clarabel-specific is undone before a [`RawSolution`] leaves this
//! module: the primal is unscaled and repacked in lower column-major order,
//! equality multipliers are negated back to the moment convention, and the
//! constant objective offset (which Clarabel has no slot for) is added to
//! the reported objective.

use std::f64::consts::SQRT_2;
use std::fs::File;
use std::path::Path;

use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettings, DefaultSolver, IPSolver, SolverJSONReadWrite, SolverStatus, SupportedConeT,
    SupportedConeT::{PSDTriangleConeT, ZeroConeT},
};
use tracing::{debug, info, warn};

use super::encoder::NumericProgram;
use super::packed::packed_index;
use super::sparse::SparseSymmetric;
use crate::config::SolverConfig;
use crate::error::{SdpError, SdpResult};

/// Terminal status of a solve, independent of the solver's own codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolutionStatus {
    /// Solved to the requested accuracy.
    Optimal,
    /// Solved to a reduced accuracy.
    NearOptimal,
    /// Certificate that the dual problem is infeasible.
    DualInfeasibleCertificate,
    /// Certificate that the primal problem is infeasible.
    PrimalInfeasibleCertificate,
    /// Certificate of dual infeasibility at reduced accuracy.
    NearDualInfeasibleCertificate,
    /// Certificate of primal infeasibility at reduced accuracy.
    NearPrimalInfeasibleCertificate,
    /// The solver stopped without a conclusion (limits, stalls, numerics).
    Unknown,
    /// Any other status.
    Other,
}

impl SolutionStatus {
    /// Whether the raw arrays carry a usable solution.
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolutionStatus::Optimal | SolutionStatus::NearOptimal)
    }

    /// Whether the status is one of the four infeasibility certificates.
    pub fn is_certificate(&self) -> bool {
        matches!(
            self,
            SolutionStatus::DualInfeasibleCertificate
                | SolutionStatus::PrimalInfeasibleCertificate
                | SolutionStatus::NearDualInfeasibleCertificate
                | SolutionStatus::NearPrimalInfeasibleCertificate
        )
    }
}

impl From<&SolverStatus> for SolutionStatus {
    fn from(status: &SolverStatus) -> Self {
        match status {
            SolverStatus::Solved => SolutionStatus::Optimal,
            SolverStatus::AlmostSolved => SolutionStatus::NearOptimal,
            SolverStatus::DualInfeasible => SolutionStatus::DualInfeasibleCertificate,
            SolverStatus::PrimalInfeasible => SolutionStatus::PrimalInfeasibleCertificate,
            SolverStatus::AlmostDualInfeasible => SolutionStatus::NearDualInfeasibleCertificate,
            SolverStatus::AlmostPrimalInfeasible => SolutionStatus::NearPrimalInfeasibleCertificate,
            SolverStatus::Unsolved
            | SolverStatus::MaxIterations
            | SolverStatus::MaxTime
            | SolverStatus::NumericalError
            | SolverStatus::InsufficientProgress => SolutionStatus::Unknown,
            _ => SolutionStatus::Other,
        }
    }
}

/// What a solve hands back before decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct RawSolution {
    /// Terminal status.
    pub status: SolutionStatus,
    /// Primal matrix, packed lower-triangular column by column, length `d(d+1)/2`.
    pub packed_primal: Vec<f64>,
    /// One multiplier per equality constraint, length `m`.
    pub duals: Vec<f64>,
    /// Primal objective as reported by the solver, constant offset included.
    pub reported_objective: f64,
}

/// A populated solver, alive for a single solve or export.
///
/// Opening the session builds the solver; dropping it releases everything,
/// whichever way the call that owns it returns.
pub struct SolverSession<'p> {
    program: &'p NumericProgram,
    solver: DefaultSolver<f64>,
}

impl<'p> SolverSession<'p> {
    /// Populate a fresh solver with `program`.
    pub fn open(program: &'p NumericProgram, config: &SolverConfig) -> SdpResult<Self> {
        config.validate()?;

        let n = program.packed_len();
        let m = program.constraint_count();
        let dim = program.dim();

        let p = CscMatrix::zeros((n, n));
        let q = svec_dense(program.fixed_matrix(), n);

        let mut a = CscMatrixBuilder::new(n);
        for constraint in program.constraint_matrices() {
            a.add_row(svec_terms(constraint));
        }
        for k in 0..n {
            a.add_row(vec![(k, -1.0)]);
        }
        let a = a.build();

        let mut b = program.bounds().to_vec();
        b.resize(m + n, 0.0);

        let mut cones: Vec<SupportedConeT<f64>> = Vec::with_capacity(2);
        if m > 0 {
            cones.push(ZeroConeT(m));
        }
        if dim > 0 {
            cones.push(PSDTriangleConeT(dim));
        }

        let solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings(config))
            .map_err(|e| SdpError::Solver(format!("{e:?}")))?;

        debug!(dim, constraints = m, variables = n, "opened solver session");
        Ok(SolverSession { program, solver })
    }

    /// Run the optimization and collect the raw arrays.
    pub fn solve(mut self) -> RawSolution {
        self.solver.solve();

        let solution = &self.solver.solution;
        let status = SolutionStatus::from(&solution.status);
        let dim = self.program.dim();
        let m = self.program.constraint_count();

        let mut packed_primal = vec![0.0; self.program.packed_len()];
        for col in 0..dim {
            for row in col..dim {
                let value = solution.x[svec_index(row, col)];
                packed_primal[packed_index(dim, row, col)] =
                    if row == col { value } else { value / SQRT_2 };
            }
        }
        let duals: Vec<f64> = solution.z[..m].iter().map(|z| -z).collect();
        let reported_objective = solution.obj_val + self.program.constant_offset();

        if status.is_optimal() {
            info!(
                ?status,
                objective = reported_objective,
                iterations = solution.iterations,
                "solve finished"
            );
        } else {
            warn!(?status, solver_status = ?solution.status, "solve finished without optimum");
        }

        RawSolution {
            status,
            packed_primal,
            duals,
            reported_objective,
        }
    }

    /// Serialize the populated problem to `path` in Clarabel's JSON format.
    ///
    /// The constant objective offset is not part of the file.
    pub fn export(&self, path: &Path) -> SdpResult<()> {
        let export_error = |reason: String| SdpError::Export {
            path: path.to_path_buf(),
            reason,
        };
        let mut file = File::create(path).map_err(|e| export_error(e.to_string()))?;
        self.solver
            .save_to_file(&mut file)
            .map_err(|e| export_error(e.to_string()))?;
        debug!(path = %path.display(), "exported problem");
        Ok(())
    }
}

impl Drop for SolverSession<'_> {
    fn drop(&mut self) {
        debug!(dim = self.program.dim(), "released solver session");
    }
}

fn settings(config: &SolverConfig) -> DefaultSettings<f64> {
    DefaultSettings {
        tol_gap_rel: config.relative_gap_tolerance,
        tol_gap_abs: config.relative_gap_tolerance,
        tol_feas: config.feasibility_tolerance,
        max_iter: config.max_iterations,
        time_limit: config.time_limit_secs.unwrap_or(f64::INFINITY),
        verbose: config.verbose,
        ..DefaultSettings::default()
    }
}

/// Position of lower entry `(row, col)` in the scaled upper-triangular vector.
#[inline]
fn svec_index(row: usize, col: usize) -> usize {
    row * (row + 1) / 2 + col
}

fn svec_coefficient(row: usize, col: usize, value: f64) -> f64 {
    if row == col {
        value
    } else {
        SQRT_2 * value
    }
}

fn svec_terms(matrix: &SparseSymmetric) -> Vec<(usize, f64)> {
    matrix
        .entries()
        .iter()
        .map(|t| (svec_index(t.row, t.col), svec_coefficient(t.row, t.col, t.value)))
        .collect()
}

fn svec_dense(matrix: &SparseSymmetric, n: usize) -> Vec<f64> {
    let mut dense = vec![0.0; n];
    for (k, value) in svec_terms(matrix) {
        dense[k] += value;
    }
    dense
}

/// Row-by-row assembly of a CSC matrix.
struct CscMatrixBuilder {
    rowval: Vec<Vec<usize>>,
    nzval: Vec<Vec<f64>>,
    n_rows: usize,
    n_cols: usize,
}

impl CscMatrixBuilder {
    fn new(n_cols: usize) -> Self {
        Self {
            rowval: vec![Vec::new(); n_cols],
            nzval: vec![Vec::new(); n_cols],
            n_rows: 0,
            n_cols,
        }
    }

    /// Append a row; each column may appear at most once in `terms`.
    fn add_row(&mut self, terms: Vec<(usize, f64)>) {
        for (col, value) in terms {
            self.rowval[col].push(self.n_rows);
            self.nzval[col].push(value);
        }
        self.n_rows += 1;
    }

    fn build(self) -> CscMatrix<f64> {
        let mut colptr = Vec::with_capacity(self.n_cols + 1);
        let mut offset = 0;
        colptr.push(offset);
        for col in &self.rowval {
            offset += col.len();
            colptr.push(offset);
        }
        CscMatrix::new(
            self.n_rows,
            self.n_cols,
            colptr,
            self.rowval.into_iter().flatten().collect(),
            self.nzval.into_iter().flatten().collect(),
        )
    }
}
