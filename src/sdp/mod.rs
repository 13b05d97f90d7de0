//! Semidefinite encoding, solving, and decoding of moment relaxations
//!
//! ## Pipeline
//!
//! 1. [`SdpEncoder::new`] validates the relaxation and derives a
//!    [`NumericProgram`]: one fixed matrix for the identity monomial, one
//!    negated constraint matrix and one bound per remaining monomial.
//! 2. A [`SolverSession`] loads the program into Clarabel. Sessions are opened
//!    per call and released when dropped.
//! 3. [`decode`] turns the session's [`RawSolution`] into an [`Outcome`].
//!
//! Infeasibility and unclassified solver stops are ordinary [`Outcome::Failure`]
//! values. Only encoding preconditions and solver setup produce errors.
//!
//! ## Example
//!
//! ```ignore
//! use moment_sdp::*;
//!
//! let encoder = SdpEncoder::new(&relaxation)?;
//! match encoder.solve(&SolverConfig::default())? {
//!     Outcome::OptimumFound { objective_value, .. } => println!("bound: {objective_value}"),
//!     Outcome::Failure { reason } => println!("no bound: {reason}"),
//! }
//! ```

pub mod decoder;
pub mod encoder;
pub mod packed;
pub mod session;
pub mod sparse;

pub use decoder::{decode, Outcome};
pub use encoder::{NumericProgram, SdpEncoder};
pub use packed::{pack_lower, packed_index, packed_len, unpack_lower};
pub use session::{RawSolution, SolutionStatus, SolverSession};
pub use sparse::{extract_all, extract_monomial, SparseSymmetric, Triplet};
