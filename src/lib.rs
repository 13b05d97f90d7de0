//! # moment-sdp
//!
//! Numeric back end for moment-matrix relaxations of polynomial optimization
//! problems.
//!
//! A relaxation arrives as a symmetric Gram matrix whose cells are tagged by
//! the monomial they stand for, together with one objective coefficient per
//! monomial. This crate turns that into the data of a semidefinite program,
//! solves it with the [Clarabel](https://oxfordcontrol.github.io/ClarabelDocs/stable/)
//! conic solver, and decodes the result into a typed [`Outcome`].
//!
//! ## Features
//!
//! - **Narrow input interface**: anything implementing [`Relaxation`] and
//!   [`GramMatrix`] can be encoded; the symbolic front end stays opaque
//! - **Any coefficient field**: objectives only need [`RealEmbedding`], which is
//!   implemented for floats, integers, big rationals and [`CyclotomicNumber`]
//! - **Exact sign and layout conventions**: lower-triangular sparse data in,
//!   packed lower-triangular primal and moment vector out
//! - **Scoped solver sessions**: every solve or export builds its own solver and
//!   releases it on return
//!
//! ## Quick Start
//!
//! ```ignore
//! use moment_sdp::*;
//!
//! // Gram matrix over the words {1, x}: [[1, x], [x, x²]]
//! let gram = MomentMatrix::from_lower_rows(&[vec![0], vec![1, 2]]).with_identity(0);
//!
//! // maximize <x> - <x²>
//! let relaxation = MomentRelaxation::new(gram, vec![0.0, 1.0, -1.0]);
//!
//! let encoder = SdpEncoder::new(&relaxation)?;
//! let outcome = encoder.solve(&SolverConfig::default())?;
//! assert!((outcome.objective_value().unwrap() - 0.25).abs() < 1e-7);
//! ```
//!
//! ## Exporting
//!
//! ```ignore
//! use moment_sdp::*;
//!
//! let encoder = SdpEncoder::new(&relaxation)?;
//! encoder.export_problem("relaxation.json", &SolverConfig::default())?;
//! ```
//!
//! ## BLAS backends
//!
//! Clarabel's semidefinite cone needs BLAS and LAPACK. The `openblas` feature
//! is on by default; `netlib`, `accelerate` and `mkl` select the other
//! providers Clarabel supports.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod field;
pub mod relaxation;
pub mod sdp;

pub use config::SolverConfig;
pub use error::{SdpError, SdpResult};
pub use field::{CyclotomicNumber, RealEmbedding};
pub use relaxation::{
    GramCell, GramMatrix, MomentMatrix, MomentRelaxation, MonomialIndex, Relaxation, IDENTITY,
};
pub use sdp::{
    decode, NumericProgram, Outcome, RawSolution, SdpEncoder, SolutionStatus, SolverSession,
    SparseSymmetric, Triplet,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
