//! # keplerian-motion
//!
//! Closed-form two-body (Keplerian) propagation of Cartesian states.
//!
//! The core of the crate is
//! [`predict_position_velocity`](crate::cartesian_motion::predict_position_velocity):
//! given a position, a velocity, a gravitational parameter `μ` and a signed
//! time of flight, it returns the position and velocity reached under
//! unperturbed Keplerian motion, on elliptic and hyperbolic trajectories alike.
//!
//! Every kernel routine is generic over
//! [`CalculusScalar`](crate::field::CalculusScalar), so the same code runs on
//! `f64` or on [`hyperdual::Hyperdual`] numbers to obtain exact partial
//! derivatives (see [`state_transition`]).
//!
//! ## Modules
//!
//! - [`kepler`] – anomaly-difference solvers and classical anomaly conversions.
//! - [`cartesian_motion`] – the state predictor and [`CartesianState`](crate::cartesian_motion::CartesianState).
//! - [`state_transition`] – 6×6 state transition matrix by automatic differentiation.
//! - [`propagator`] – epoch-based propagation with [`hifitime`].
//! - [`orbit_type`] – Keplerian and equinoctial element sets.
//! - [`solver_params`] – tolerance and iteration cap of the solvers.
//! - [`kepler_errors`] – error type shared by the crate.
//!
//! ## Quick start
//!
//! ```rust
//! use keplerian_motion::prelude::*;
//!
//! let params = KeplerSolverParams::default();
//! let state = CartesianState::new(Vector3::new(10.0, 1.0, 0.0), Vector3::new(0.0, 0.1, 0.2));
//!
//! let later = state.shifted_by(50.0, 1.0, &params).unwrap();
//! let back = later.shifted_by(-50.0, 1.0, &params).unwrap();
//!
//! assert!((back.position - state.position).norm() < 1e-10);
//! ```
pub mod cartesian_motion;
pub mod constants;
pub mod field;
pub mod kepler;
pub mod kepler_errors;
pub mod orbit_type;
pub mod propagator;
pub mod solver_params;
pub mod state_transition;

pub mod prelude {
    pub use crate::cartesian_motion::{predict_position_velocity, CartesianState};
    pub use crate::field::CalculusScalar;
    pub use crate::kepler_errors::KeplerError;
    pub use crate::orbit_type::{
        equinoctial_element::EquinoctialElements, keplerian_element::KeplerianElements,
        OrbitalElements,
    };
    pub use crate::propagator::KeplerianPropagator;
    pub use crate::solver_params::KeplerSolverParams;
    pub use crate::state_transition::{propagate_with_state_transition, state_transition_matrix};
    pub use nalgebra::Vector3;
}
