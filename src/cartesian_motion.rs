//! # Keplerian motion in Cartesian coordinates
//!
//! Closed-form two-body prediction of a position/velocity pair over a signed
//! time of flight, without going through orbital elements.
//!
//! ## Algorithm
//!
//! 1. `r = |r₀|`, semi-major axis from vis-viva: `a = r / (2 − r·v²/μ)`.
//! 2. Branch on the sign of `a` (real part only):
//!    * `a ≥ 0` – elliptic/circular, solve for the eccentric anomaly difference `ΔE`,
//!    * `a < 0` – hyperbolic, solve for the hyperbolic anomaly difference `ΔH`.
//! 3. Lagrange coefficients `f, g` give `r₁ = f·r₀ + g·v₀`.
//! 4. `ḟ, ġ` (using `|r₁|`) give `v₁ = ḟ·r₀ + ġ·v₀`.
//!
//! With `σ₀ = (r₀·v₀)/√μ`, the elliptic coefficients are
//!
//! ```text
//! f = 1 − (a/r)(1 − cos ΔE)          ḟ = −√(μa)/(r·r₁) · sin ΔE
//! g = (a·σ₀/√μ)(1 − cos ΔE)          ġ = 1 − (a/r₁)(1 − cos ΔE)
//!     + r·√(a/μ) · sin ΔE
//! ```
//!
//! and the hyperbolic ones follow with `cosh`, `sinh` and `√(−a)`. `1 − cos x`
//! and `cosh x − 1` are evaluated as `2·sin²(x/2)` and `2·sinh²(x/2)`.
//!
//! Every routine is generic over [`CalculusScalar`]: instantiated with `f64`
//! it is a plain propagator, instantiated with [`hyperdual::Hyperdual`] it
//! also returns the partial derivatives of the predicted state.
//!
//! ## Example
//!
//! ```rust
//! use nalgebra::Vector3;
//! use keplerian_motion::cartesian_motion::predict_position_velocity;
//! use keplerian_motion::solver_params::KeplerSolverParams;
//!
//! let params = KeplerSolverParams::default();
//! let position = Vector3::new(4.0, 0.0, 0.0);
//! let velocity = Vector3::new(0.0, 0.5, 0.0);
//!
//! // a quarter of the circular period 2π·4^(3/2)
//! let dt = std::f64::consts::PI * 4.0;
//! let (p, v) = predict_position_velocity(dt, &position, &velocity, 1.0, &params).unwrap();
//!
//! assert!((p - Vector3::new(0.0, 4.0, 0.0)).norm() < 1e-12);
//! assert!((v - Vector3::new(-0.5, 0.0, 0.0)).norm() < 1e-12);
//! ```
use log::trace;
use nalgebra::Vector3;

use crate::{
    field::{cross, dot, is_finite_vector, linear_combination, norm, CalculusScalar},
    kepler::{elliptic_mean_to_eccentric_difference, hyperbolic_mean_to_hyperbolic_difference},
    kepler_errors::KeplerError,
    solver_params::KeplerSolverParams,
};

/// Position and velocity of a body in an inertial frame chosen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianState<T: CalculusScalar> {
    pub position: Vector3<T>,
    pub velocity: Vector3<T>,
}

impl<T: CalculusScalar> CartesianState<T> {
    pub fn new(position: Vector3<T>, velocity: Vector3<T>) -> Self {
        Self { position, velocity }
    }

    /// Two-body specific orbital energy `v²/2 − μ/r`.
    pub fn specific_energy(&self, mu: T) -> T {
        let half = T::constant(0.5);
        half * dot(&self.velocity, &self.velocity) - mu / norm(&self.position)
    }

    /// Specific angular momentum `r × v`.
    pub fn angular_momentum(&self) -> Vector3<T> {
        cross(&self.position, &self.velocity)
    }

    /// Semi-major axis from vis-viva, negative on hyperbolic trajectories.
    pub fn semi_major_axis(&self, mu: T) -> T {
        let r = norm(&self.position);
        r / (T::constant(2.0) - r * dot(&self.velocity, &self.velocity) / mu)
    }

    /// State reached after `dt` under two-body motion around `mu`.
    ///
    /// See [`predict_position_velocity`].
    pub fn shifted_by(
        &self,
        dt: T,
        mu: T,
        params: &KeplerSolverParams,
    ) -> Result<Self, KeplerError> {
        let (position, velocity) =
            predict_position_velocity(dt, &self.position, &self.velocity, mu, params)?;
        Ok(Self { position, velocity })
    }
}

impl From<(Vector3<f64>, Vector3<f64>)> for CartesianState<f64> {
    fn from((position, velocity): (Vector3<f64>, Vector3<f64>)) -> Self {
        Self { position, velocity }
    }
}

/// Conic regime, chosen once per prediction from the real part of `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConicBranch {
    Elliptic,
    Hyperbolic,
}

impl ConicBranch {
    fn select(semi_major_axis: f64) -> Self {
        if semi_major_axis >= 0.0 {
            ConicBranch::Elliptic
        } else {
            ConicBranch::Hyperbolic
        }
    }
}

/// Reject inputs the kernel has no meaningful answer for.
fn check_inputs<T: CalculusScalar>(
    dt: T,
    position: &Vector3<T>,
    velocity: &Vector3<T>,
    mu: T,
) -> Result<(), KeplerError> {
    let mu_r = mu.real();
    if !mu_r.is_finite() || mu_r <= 0.0 {
        return Err(KeplerError::InvalidGravitationalParameter(mu_r));
    }
    if !dt.real().is_finite() {
        return Err(KeplerError::NonFiniteInput(format!(
            "time of flight {}",
            dt.real()
        )));
    }
    if !is_finite_vector(position) {
        return Err(KeplerError::NonFiniteInput("position".into()));
    }
    if !is_finite_vector(velocity) {
        return Err(KeplerError::NonFiniteInput("velocity".into()));
    }
    Ok(())
}

/// Predict position and velocity after a time of flight under Keplerian motion.
///
/// Arguments
/// -----------------
/// * `dt`: signed time of flight; negative values propagate backward.
/// * `position`: initial position vector.
/// * `velocity`: initial velocity vector.
/// * `mu`: central body gravitational parameter (`> 0`), in units consistent
///   with the position, velocity and time of flight.
/// * `params`: anomaly solver controls.
///
/// Return
/// ----------
/// * `(position, velocity)` at `t₀ + dt`, in the frame of the inputs.
///   `dt = 0` returns the inputs unchanged.
///
/// Errors
/// ----------
/// * [`KeplerError::InvalidGravitationalParameter`] – `μ ≤ 0` or not finite.
/// * [`KeplerError::NonFiniteInput`] – NaN/infinite time, position or velocity.
/// * [`KeplerError::DegenerateOrbit`] – zero position vector, or exactly
///   parabolic energy (infinite semi-major axis).
/// * [`KeplerError::AnomalyNotConverged`] – the anomaly solver hit its cap.
pub fn predict_position_velocity<T: CalculusScalar>(
    dt: T,
    position: &Vector3<T>,
    velocity: &Vector3<T>,
    mu: T,
    params: &KeplerSolverParams,
) -> Result<(Vector3<T>, Vector3<T>), KeplerError> {
    check_inputs(dt, position, velocity, mu)?;

    let r = norm(position);
    if r.real() == 0.0 {
        return Err(KeplerError::DegenerateOrbit(
            "position vector has zero length".into(),
        ));
    }

    let vis_viva = T::constant(2.0) - r * dot(velocity, velocity) / mu;
    if vis_viva.real() == 0.0 {
        return Err(KeplerError::DegenerateOrbit(
            "parabolic trajectory, semi-major axis is infinite".into(),
        ));
    }
    let a = r / vis_viva;
    if !a.real().is_finite() {
        return Err(KeplerError::DegenerateOrbit(format!(
            "semi-major axis overflow (2 − r·v²/μ = {:e})",
            vis_viva.real()
        )));
    }

    let branch = ConicBranch::select(a.real());
    trace!("{branch:?} branch, a = {}", a.real());

    match branch {
        ConicBranch::Elliptic => predict_elliptic(dt, position, velocity, mu, r, a, params),
        ConicBranch::Hyperbolic => predict_hyperbolic(dt, position, velocity, mu, r, a, params),
    }
}

fn predict_elliptic<T: CalculusScalar>(
    dt: T,
    position: &Vector3<T>,
    velocity: &Vector3<T>,
    mu: T,
    r: T,
    a: T,
    params: &KeplerSolverParams,
) -> Result<(Vector3<T>, Vector3<T>), KeplerError> {
    let one = T::one();
    let two = T::constant(2.0);
    let half = T::constant(0.5);

    let sqrt_mu = mu.sqrt();
    let sigma0 = dot(position, velocity) / sqrt_mu;
    let sqrt_a = a.sqrt();

    // e·cos E₀ and e·sin E₀
    let e_c = one - r / a;
    let e_s = sigma0 / sqrt_a;
    let delta_m = sqrt_mu / (sqrt_a * a) * dt;

    let delta_e = elliptic_mean_to_eccentric_difference(e_s, e_c, delta_m, params)?;
    let sin_de = delta_e.sin();
    let sin_half = (half * delta_e).sin();
    let one_minus_cos = two * sin_half * sin_half;

    let f = one - a / r * one_minus_cos;
    let g = a * sigma0 / sqrt_mu * one_minus_cos + r * sqrt_a / sqrt_mu * sin_de;
    let predicted_position = linear_combination(f, position, g, velocity);

    let r1 = norm(&predicted_position);
    let f_dot = -sqrt_mu * sqrt_a / (r * r1) * sin_de;
    let g_dot = one - a / r1 * one_minus_cos;
    let predicted_velocity = linear_combination(f_dot, position, g_dot, velocity);

    Ok((predicted_position, predicted_velocity))
}

fn predict_hyperbolic<T: CalculusScalar>(
    dt: T,
    position: &Vector3<T>,
    velocity: &Vector3<T>,
    mu: T,
    r: T,
    a: T,
    params: &KeplerSolverParams,
) -> Result<(Vector3<T>, Vector3<T>), KeplerError> {
    let one = T::one();
    let two = T::constant(2.0);
    let half = T::constant(0.5);

    let sqrt_mu = mu.sqrt();
    let sigma0 = dot(position, velocity) / sqrt_mu;
    let minus_a = -a;
    let sqrt_minus_a = minus_a.sqrt();

    // e·cosh H₀ and e·sinh H₀
    let e_c = one - r / a;
    let e_s = sigma0 / sqrt_minus_a;
    let delta_n = sqrt_mu / (sqrt_minus_a * minus_a) * dt;

    let delta_h = hyperbolic_mean_to_hyperbolic_difference(e_s, e_c, delta_n, params)?;
    let sinh_dh = delta_h.sinh();
    let sinh_half = (half * delta_h).sinh();
    let cosh_minus_one = two * sinh_half * sinh_half;

    let f = one + a / r * cosh_minus_one;
    let g = minus_a * sigma0 / sqrt_mu * cosh_minus_one + r * sqrt_minus_a / sqrt_mu * sinh_dh;
    let predicted_position = linear_combination(f, position, g, velocity);

    let r1 = norm(&predicted_position);
    let f_dot = -sqrt_mu * sqrt_minus_a / (r * r1) * sinh_dh;
    let g_dot = one + a / r1 * cosh_minus_one;
    let predicted_velocity = linear_combination(f_dot, position, g_dot, velocity);

    Ok((predicted_position, predicted_velocity))
}
