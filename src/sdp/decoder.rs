//! Turning a raw solve into an [`Outcome`].

use ndarray::Array2;
use tracing::debug;

use super::encoder::NumericProgram;
use super::packed::unpack_lower;
use super::session::{RawSolution, SolutionStatus};

/// Failure reason for any of the four infeasibility certificates.
pub const INFEASIBILITY_CERTIFICATE: &str = "Primal or dual infeasibility certificate found.";

/// Failure reason when the solver could not classify the result.
pub const UNKNOWN_STATUS: &str = "The status of the solution could not be determined.";

/// Failure reason for every other status.
pub const OTHER_STATUS: &str = "Other solution status.";

/// The decoded result of one solve.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The solver reached an (approximately) optimal point.
    OptimumFound {
        /// `constant_offset + Σ_i dual_vector[i] · bound_i`.
        objective_value: f64,
        /// The `d × d` primal matrix.
        primal_matrix: Array2<f64>,
        /// Moments `[1, y_1, ..., y_m]`.
        dual_vector: Vec<f64>,
    },
    /// No optimum; `reason` says why.
    Failure {
        /// Fixed, human-readable reason.
        reason: String,
    },
}

impl Outcome {
    /// Whether an optimum was found.
    pub fn is_optimal(&self) -> bool {
        matches!(self, Outcome::OptimumFound { .. })
    }

    /// The objective value of an optimum.
    pub fn objective_value(&self) -> Option<f64> {
        match self {
            Outcome::OptimumFound { objective_value, .. } => Some(*objective_value),
            Outcome::Failure { .. } => None,
        }
    }

    /// The failure reason, if any.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Outcome::OptimumFound { .. } => None,
            Outcome::Failure { reason } => Some(reason.as_str()),
        }
    }

    fn failure(reason: &str) -> Self {
        Outcome::Failure {
            reason: reason.to_string(),
        }
    }
}

/// Decode `raw` against the program it was solved from.
///
/// The objective is recomputed from the multipliers and the bounds rather
/// than taken from the solver, so it is exactly the dual objective of the
/// returned moments. `raw.reported_objective` keeps the solver's own value.
///
/// # Panics
///
/// Panics if an optimal `raw` does not have the lengths `program` implies.
pub fn decode(program: &NumericProgram, raw: &RawSolution) -> Outcome {
    match raw.status {
        SolutionStatus::Optimal | SolutionStatus::NearOptimal => {
            assert_eq!(
                raw.duals.len(),
                program.constraint_count(),
                "one multiplier per constraint"
            );
            let primal_matrix = unpack_lower(program.dim(), &raw.packed_primal);

            let mut dual_vector = Vec::with_capacity(raw.duals.len() + 1);
            dual_vector.push(1.0);
            dual_vector.extend_from_slice(&raw.duals);

            let objective_value = program.constant_offset()
                + raw
                    .duals
                    .iter()
                    .zip(program.bounds())
                    .map(|(y, b)| y * b)
                    .sum::<f64>();

            debug!(
                objective_value,
                reported = raw.reported_objective,
                "decoded optimum"
            );
            Outcome::OptimumFound {
                objective_value,
                primal_matrix,
                dual_vector,
            }
        }
        SolutionStatus::DualInfeasibleCertificate
        | SolutionStatus::PrimalInfeasibleCertificate
        | SolutionStatus::NearDualInfeasibleCertificate
        | SolutionStatus::NearPrimalInfeasibleCertificate => Outcome::failure(INFEASIBILITY_CERTIFICATE),
        SolutionStatus::Unknown => Outcome::failure(UNKNOWN_STATUS),
        SolutionStatus::Other => Outcome::failure(OTHER_STATUS),
    }
}
