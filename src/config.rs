//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::error::{SdpError, SdpResult};

/// Settings forwarded to the solver on every solve and export.
///
/// The two tolerances shape the result; the remaining fields bound the work
/// the solver may do or control its console output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Relative duality-gap tolerance. Default: 1e-9.
    ///
    /// Clarabel stops when either the relative or the absolute gap is below
    /// its tolerance, so this value is written to both.
    pub relative_gap_tolerance: f64,

    /// Primal and dual residual tolerance. Default: 1e-9.
    pub feasibility_tolerance: f64,

    /// Print the solver's iteration log to stdout.
    pub verbose: bool,

    /// Maximum number of interior-point iterations.
    pub max_iterations: u32,

    /// Wall-clock limit in seconds, `None` for no limit.
    pub time_limit_secs: Option<f64>,
}

impl SolverConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        SolverConfig {
            relative_gap_tolerance: 1e-9,
            feasibility_tolerance: 1e-9,
            verbose: false,
            max_iterations: 200,
            time_limit_secs: None,
        }
    }

    /// Set the relative gap tolerance
    pub fn with_relative_gap_tolerance(mut self, tolerance: f64) -> Self {
        self.relative_gap_tolerance = tolerance;
        self
    }

    /// Set the primal and dual residual tolerance
    pub fn with_feasibility_tolerance(mut self, tolerance: f64) -> Self {
        self.feasibility_tolerance = tolerance;
        self
    }

    /// Enable or disable the solver's iteration log
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the iteration limit
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set a wall-clock limit
    pub fn with_time_limit_secs(mut self, seconds: f64) -> Self {
        self.time_limit_secs = Some(seconds);
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> SdpResult<()> {
        if !(self.relative_gap_tolerance.is_finite() && self.relative_gap_tolerance > 0.0) {
            return Err(SdpError::Config(format!(
                "relative_gap_tolerance must be finite and > 0, got {}",
                self.relative_gap_tolerance
            )));
        }
        if !(self.feasibility_tolerance.is_finite() && self.feasibility_tolerance > 0.0) {
            return Err(SdpError::Config(format!(
                "feasibility_tolerance must be finite and > 0, got {}",
                self.feasibility_tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(SdpError::Config("max_iterations must be > 0".to_string()));
        }
        if let Some(limit) = self.time_limit_secs {
            if limit.is_nan() || limit <= 0.0 {
                return Err(SdpError::Config(format!(
                    "time_limit_secs must be > 0, got {limit}"
                )));
            }
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their default values.
    pub fn from_json(json: &str) -> SdpResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SdpError::Config(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
