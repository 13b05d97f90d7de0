//! Error hierarchy for encoding and solving moment relaxations.
//!
//! Only conditions the caller can act on are errors. Solver outcomes such as
//! infeasibility certificates are never reported here; they come back as
//! [`Outcome::Failure`](crate::sdp::Outcome::Failure) values.

use std::path::PathBuf;

use thiserror::Error;

/// Root error type for all encoding and solver-session failures.
#[derive(Error, Debug)]
pub enum SdpError {
    /// Monomial 0 of the Gram matrix is not the identity.
    #[error("monomial 0 of the gram matrix must be the identity")]
    MissingIdentity,

    /// The objective vector does not carry one coefficient per unique monomial.
    #[error("objective vector has {actual} coefficients, expected {expected}")]
    ObjectiveLength {
        /// Number of unique monomials reported by the relaxation.
        expected: usize,
        /// Length of the objective vector.
        actual: usize,
    },

    /// Gram cells carry monomial indices outside `0..count`.
    #[error("{cells} gram cells are tagged with monomials outside 0..{count}")]
    MonomialOutOfRange {
        /// Number of lower-triangular cells with an out-of-range tag.
        cells: usize,
        /// Number of unique monomials reported by the relaxation.
        count: usize,
    },

    /// The solver rejected the problem data or its settings.
    #[error("solver session could not be created: {0}")]
    Solver(String),

    /// Writing the problem file failed.
    #[error("failed to export problem to {}: {reason}", path.display())]
    Export {
        /// Target path of the export.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// Invalid solver configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type SdpResult<T> = Result<T, SdpError>;
