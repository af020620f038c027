//! # Kepler solver configuration
//!
//! [`KeplerSolverParams`] centralizes the tunable knobs of the iterative
//! anomaly-difference solvers used by the state predictor:
//!
//! - `tolerance` – relative stopping threshold on the Halley/Newton correction,
//!   scaled by `max(1, |x|)`.
//! - `max_iterations` – hard cap on the number of corrections; reaching it is
//!   reported as [`KeplerError::AnomalyNotConverged`].
//!
//! ## Example
//!
//! ```rust
//! use keplerian_motion::solver_params::KeplerSolverParams;
//!
//! let params = KeplerSolverParams::builder()
//!     .tolerance(1e-13)
//!     .max_iterations(20)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.max_iterations, 20);
//! ```
use std::cmp::Ordering::Greater;

use serde::{Deserialize, Serialize};

use crate::kepler_errors::KeplerError;

/// Parameters of the anomaly-difference solvers.
///
/// Notes & Validation
/// -----------------
/// * `tolerance` must be finite and `> 0`.
/// * `max_iterations ≥ 1`.
///
/// See also
/// -----------------
/// * [`crate::kepler::elliptic_mean_to_eccentric_difference`]
/// * [`crate::kepler::hyperbolic_mean_to_hyperbolic_difference`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeplerSolverParams {
    /// Relative tolerance on the correction step, scaled by `max(1, |x|)`.
    pub tolerance: f64,
    /// Maximum number of Halley/Newton corrections.
    pub max_iterations: usize,
}

impl KeplerSolverParams {
    /// Construct a new [`KeplerSolverParams`] with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`KeplerSolverParamsBuilder`] starting from the defaults.
    pub fn builder() -> KeplerSolverParamsBuilder {
        KeplerSolverParamsBuilder::new()
    }
}

impl Default for KeplerSolverParams {
    fn default() -> Self {
        KeplerSolverParams {
            tolerance: 32.0 * f64::EPSILON,
            max_iterations: 50,
        }
    }
}

/// Builder for [`KeplerSolverParams`], with validation.
#[derive(Debug, Clone)]
pub struct KeplerSolverParamsBuilder {
    params: KeplerSolverParams,
}

impl Default for KeplerSolverParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeplerSolverParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: KeplerSolverParams::default(),
        }
    }

    pub fn tolerance(mut self, v: f64) -> Self {
        self.params.tolerance = v;
        self
    }

    pub fn max_iterations(mut self, v: usize) -> Self {
        self.params.max_iterations = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Return
    /// ----------
    /// * `Ok(KeplerSolverParams)` when every value is usable.
    /// * `Err(KeplerError::InvalidSolverParameter)` otherwise.
    pub fn build(self) -> Result<KeplerSolverParams, KeplerError> {
        let p = &self.params;

        // NaN compares as None and is rejected with the rest
        if !p.tolerance.is_finite() || p.tolerance.partial_cmp(&0.0) != Some(Greater) {
            return Err(KeplerError::InvalidSolverParameter(
                "tolerance must be finite and > 0".into(),
            ));
        }
        if p.max_iterations == 0 {
            return Err(KeplerError::InvalidSolverParameter(
                "max_iterations must be >= 1".into(),
            ));
        }

        Ok(self.params)
    }
}
