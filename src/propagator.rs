//! # Epoch-based Keplerian propagation
//!
//! [`KeplerianPropagator`] anchors a Cartesian state at a reference
//! [`hifitime::Epoch`] and predicts it at arbitrary other epochs with
//! [`predict_position_velocity`](crate::cartesian_motion::predict_position_velocity).
//!
//! The time of flight handed to the kernel is `epoch − reference_epoch`
//! expressed in the propagator's time unit (seconds by default), so the unit
//! must match the one of the gravitational parameter: `Unit::Second` with
//! [`EARTH_MU`](crate::constants::EARTH_MU), `Unit::Day` with
//! [`GAUSS_GRAV_SQUARED`](crate::constants::GAUSS_GRAV_SQUARED), …
//!
//! ## Example
//!
//! ```rust
//! use hifitime::{Epoch, TimeScale, Unit};
//! use nalgebra::Vector3;
//! use keplerian_motion::cartesian_motion::CartesianState;
//! use keplerian_motion::constants::GAUSS_GRAV_SQUARED;
//! use keplerian_motion::propagator::KeplerianPropagator;
//!
//! let t0 = Epoch::from_mjd_in_time_scale(60_000.0, TimeScale::TT);
//! let earth_like = CartesianState::new(
//!     Vector3::new(1.0, 0.0, 0.0),
//!     Vector3::new(0.0, GAUSS_GRAV_SQUARED.sqrt(), 0.0),
//! );
//!
//! let propagator = KeplerianPropagator::new(t0, earth_like, GAUSS_GRAV_SQUARED)
//!     .unwrap()
//!     .with_time_unit(Unit::Day);
//!
//! let later = propagator.propagate(t0 + 30.0 * Unit::Day).unwrap();
//! assert!((later.position.norm() - 1.0).abs() < 1e-12);
//! ```
use hifitime::{Duration, Epoch, TimeSeries, Unit};
use log::debug;

use crate::{
    cartesian_motion::CartesianState,
    field::is_finite_vector,
    kepler_errors::KeplerError,
    solver_params::KeplerSolverParams,
};

/// Two-body propagator of a Cartesian state anchored at an epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct KeplerianPropagator {
    reference_epoch: Epoch,
    initial_state: CartesianState<f64>,
    mu: f64,
    time_unit: Unit,
    params: KeplerSolverParams,
}

impl KeplerianPropagator {
    /// Anchor `initial_state` at `reference_epoch` around a body of parameter `mu`.
    ///
    /// Errors
    /// ----------
    /// * [`KeplerError::InvalidGravitationalParameter`] if `mu` is not finite and positive.
    /// * [`KeplerError::NonFiniteInput`] if the state has non-finite components.
    /// * [`KeplerError::DegenerateOrbit`] if the position vector is zero.
    pub fn new(
        reference_epoch: Epoch,
        initial_state: CartesianState<f64>,
        mu: f64,
    ) -> Result<Self, KeplerError> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(KeplerError::InvalidGravitationalParameter(mu));
        }
        if !is_finite_vector(&initial_state.position) || !is_finite_vector(&initial_state.velocity)
        {
            return Err(KeplerError::NonFiniteInput("initial state".into()));
        }
        if initial_state.position.norm() == 0.0 {
            return Err(KeplerError::DegenerateOrbit(
                "position vector has zero length".into(),
            ));
        }

        Ok(Self {
            reference_epoch,
            initial_state,
            mu,
            time_unit: Unit::Second,
            params: KeplerSolverParams::default(),
        })
    }

    pub fn with_params(mut self, params: KeplerSolverParams) -> Self {
        self.params = params;
        self
    }

    /// Time unit in which `mu` is expressed.
    pub fn with_time_unit(mut self, unit: Unit) -> Self {
        self.time_unit = unit;
        self
    }

    pub fn reference_epoch(&self) -> Epoch {
        self.reference_epoch
    }

    pub fn initial_state(&self) -> &CartesianState<f64> {
        &self.initial_state
    }

    pub fn gravitational_parameter(&self) -> f64 {
        self.mu
    }

    fn time_of_flight(&self, epoch: Epoch) -> f64 {
        (epoch - self.reference_epoch).to_unit(self.time_unit)
    }

    /// State at `epoch`, before or after the reference epoch.
    pub fn propagate(&self, epoch: Epoch) -> Result<CartesianState<f64>, KeplerError> {
        let dt = self.time_of_flight(epoch);
        self.initial_state.shifted_by(dt, self.mu, &self.params)
    }

    /// States at each of `epochs`, in order. Stops at the first failure.
    pub fn propagate_many(&self, epochs: &[Epoch]) -> Result<Vec<CartesianState<f64>>, KeplerError> {
        epochs.iter().map(|&epoch| self.propagate(epoch)).collect()
    }

    /// Evenly spaced ephemeris from `start` to `end` inclusive.
    pub fn ephemeris(
        &self,
        start: Epoch,
        end: Epoch,
        step: Duration,
    ) -> Result<Vec<(Epoch, CartesianState<f64>)>, KeplerError> {
        debug!("Keplerian ephemeris from {start} to {end} every {step}");
        TimeSeries::inclusive(start, end, step)
            .map(|epoch| self.propagate(epoch).map(|state| (epoch, state)))
            .collect()
    }

    /// Same trajectory anchored at `epoch`.
    pub fn rebased_at(&self, epoch: Epoch) -> Result<Self, KeplerError> {
        let state = self.propagate(epoch)?;
        Ok(Self {
            reference_epoch: epoch,
            initial_state: state,
            ..self.clone()
        })
    }
}
