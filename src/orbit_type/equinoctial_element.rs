//! # Equinoctial orbital elements
//!
//! Non-singular element set for **elliptic** orbits:
//!
//! | symbol | field                    | definition              |
//! |--------|--------------------------|-------------------------|
//! | `a`    | `semi_major_axis`        | semi-major axis         |
//! | `h`    | `eccentricity_sin_lon`   | `e·sin(Ω + ω)`          |
//! | `k`    | `eccentricity_cos_lon`   | `e·cos(Ω + ω)`          |
//! | `p`    | `tan_half_incl_sin_node` | `tan(i/2)·sin Ω`        |
//! | `q`    | `tan_half_incl_cos_node` | `tan(i/2)·cos Ω`        |
//! | `λ`    | `mean_longitude`         | `Ω + ω + M`             |
//!
//! The set stays well defined for circular and equatorial orbits, where the
//! classical ω and Ω are not. It is singular for retrograde equatorial orbits
//! (`i = π`) and does not describe hyperbolic motion.
//!
//! [`EquinoctialElements::solve_two_body_problem`] propagates the elements
//! with the equinoctial form of Kepler's equation
//! `F − k·sin F + h·cos F = λ`, solved for the eccentric longitude `F`.
use std::f64::consts::PI;
use std::fmt;

use nalgebra::Vector3;
use roots::find_root_newton_raphson;
use serde::{Deserialize, Serialize};

use crate::{
    constants::DPI,
    kepler::{classical_convergency, principal_angle},
    kepler_errors::KeplerError,
    orbit_type::keplerian_element::KeplerianElements,
};

/// Equinoctial orbital elements.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct EquinoctialElements {
    pub semi_major_axis: f64,
    pub eccentricity_sin_lon: f64,
    pub eccentricity_cos_lon: f64,
    pub tan_half_incl_sin_node: f64,
    pub tan_half_incl_cos_node: f64,
    pub mean_longitude: f64,
}

impl EquinoctialElements {
    /// Forward mapping from classical elements `(a, e, i, Ω, ω, M)`.
    ///
    /// The mean longitude is returned unwrapped as `Ω + ω + M`.
    pub(crate) fn from_kepler_internal(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        ascending_node_longitude: f64,
        periapsis_argument: f64,
        mean_anomaly: f64,
    ) -> Self {
        let lon_peri = ascending_node_longitude + periapsis_argument;
        let tan_half_incl = (inclination / 2.0).tan();

        Self {
            semi_major_axis,
            eccentricity_sin_lon: eccentricity * lon_peri.sin(),
            eccentricity_cos_lon: eccentricity * lon_peri.cos(),
            tan_half_incl_sin_node: tan_half_incl * ascending_node_longitude.sin(),
            tan_half_incl_cos_node: tan_half_incl * ascending_node_longitude.cos(),
            mean_longitude: lon_peri + mean_anomaly,
        }
    }

    /// Equinoctial elements of a Cartesian state on an elliptic orbit.
    ///
    /// Errors
    /// ------
    /// * Every error of [`KeplerianElements::from_cartesian`].
    /// * [`KeplerError::InvalidConversion`] if the state is hyperbolic.
    pub fn from_cartesian(
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        mu: f64,
    ) -> Result<Self, KeplerError> {
        let kepler = KeplerianElements::from_cartesian(position, velocity, mu)?;
        EquinoctialElements::try_from(&kepler)
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_sin_lon.hypot(self.eccentricity_cos_lon)
    }

    /// Mean motion `n = √(μ/a³)`.
    pub fn mean_motion(&self, mu: f64) -> f64 {
        (mu / self.semi_major_axis.powi(3)).sqrt()
    }

    /// Elements after `dt` of two-body motion: only `λ` moves.
    pub fn propagate(&self, dt: f64, mu: f64) -> Self {
        Self {
            mean_longitude: self.mean_longitude + self.mean_motion(mu) * dt,
            ..self.clone()
        }
    }

    /// Solve `F − k·sin F + h·cos F = λ₁` for the eccentric longitude `F`.
    ///
    /// `mean_longitude_t1` must already be shifted into `[ϖ, ϖ + 2π)` so that
    /// the starting point `π + ϖ` sits in the middle of the revolution.
    fn solve_kepler_equation(
        &self,
        mean_longitude_t1: f64,
        longitude_of_periastre: f64,
    ) -> Result<f64, KeplerError> {
        let (h, k) = (self.eccentricity_sin_lon, self.eccentricity_cos_lon);

        let f = |x: f64| x - k * x.sin() + h * x.cos() - mean_longitude_t1;
        let df = |x: f64| 1.0 - k * x.cos() - h * x.sin();

        let x0 = PI + longitude_of_periastre;
        let longitude = find_root_newton_raphson(x0, &f, &df, &mut classical_convergency())?;

        Ok(longitude - f(longitude) / df(longitude))
    }

    fn compute_cartesian_position_and_velocity(
        &self,
        mean_motion: f64,
        eccentric_longitude: f64,
        eccentricity_pow2: f64,
    ) -> (Vector3<f64>, Vector3<f64>) {
        let (h, k) = (self.eccentricity_sin_lon, self.eccentricity_cos_lon);
        let (p, q) = (self.tan_half_incl_sin_node, self.tan_half_incl_cos_node);
        let a = self.semi_major_axis;

        let beta = 1. / (1. + (1. - eccentricity_pow2).sqrt());
        let beta_hk = beta * h * k;
        let (sin_f, cos_f) = eccentric_longitude.sin_cos();

        // coordinates in the equinoctial frame
        let xe = a * ((1. - beta * h * h) * cos_f + beta_hk * sin_f - k);
        let ye = a * ((1. - beta * k * k) * sin_f + beta_hk * cos_f - h);

        let inv_u = 1.0 / (1. + p * p + q * q);
        let cross_pq = 2. * p * q * inv_u;
        let f_vector = Vector3::new((1. - p * p + q * q) * inv_u, cross_pq, -2. * p * inv_u);
        let g_vector = Vector3::new(cross_pq, (1. + p * p - q * q) * inv_u, 2. * q * inv_u);

        let position = xe * f_vector + ye * g_vector;

        let v_const = mean_motion * a * a / xe.hypot(ye);
        let v_xe = v_const * (beta_hk * cos_f - (1. - beta * h * h) * sin_f);
        let v_ye = v_const * ((1. - beta * k * k) * cos_f - beta_hk * sin_f);
        let velocity = v_xe * f_vector + v_ye * g_vector;

        (position, velocity)
    }

    /// Cartesian state after `dt` of two-body motion around `mu`.
    ///
    /// Arguments
    /// ---------
    /// * `dt` – signed time of flight, in the time unit of `mu`.
    /// * `mu` – gravitational parameter of the central body.
    ///
    /// Errors
    /// ------
    /// * [`KeplerError::InvalidGravitationalParameter`] for a bad `mu`.
    /// * [`KeplerError::InvalidConversion`] if the elements are not elliptic.
    /// * [`KeplerError::RootFinding`] if the eccentric longitude does not converge.
    pub fn solve_two_body_problem(
        &self,
        dt: f64,
        mu: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), KeplerError> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(KeplerError::InvalidGravitationalParameter(mu));
        }
        let eccentricity_pow2 = self.eccentricity_sin_lon.powi(2) + self.eccentricity_cos_lon.powi(2);
        if !(self.semi_major_axis > 0.0 && eccentricity_pow2 < 1.0) {
            return Err(KeplerError::InvalidConversion(format!(
                "equinoctial propagation needs an elliptic orbit, got a = {} and e² = {}",
                self.semi_major_axis, eccentricity_pow2
            )));
        }

        let mean_motion = self.mean_motion(mu);
        let mut mean_longitude_t1 = principal_angle(self.mean_longitude + mean_motion * dt);

        let longitude_of_periastre = if eccentricity_pow2 > f64::EPSILON * 1e2 {
            principal_angle(self.eccentricity_sin_lon.atan2(self.eccentricity_cos_lon))
        } else {
            0.0
        };
        if mean_longitude_t1 < longitude_of_periastre {
            mean_longitude_t1 += DPI;
        }

        let eccentric_longitude =
            self.solve_kepler_equation(mean_longitude_t1, longitude_of_periastre)?;

        Ok(self.compute_cartesian_position_and_velocity(
            mean_motion,
            eccentric_longitude,
            eccentricity_pow2,
        ))
    }

    /// Cartesian state at the epoch of the elements.
    pub fn to_cartesian(&self, mu: f64) -> Result<(Vector3<f64>, Vector3<f64>), KeplerError> {
        self.solve_two_body_problem(0.0, mu)
    }
}

impl From<&EquinoctialElements> for KeplerianElements {
    fn from(equinoctial: &EquinoctialElements) -> Self {
        KeplerianElements::from_equinoctial_internal(
            equinoctial.semi_major_axis,
            equinoctial.eccentricity_sin_lon,
            equinoctial.eccentricity_cos_lon,
            equinoctial.tan_half_incl_sin_node,
            equinoctial.tan_half_incl_cos_node,
            equinoctial.mean_longitude,
        )
    }
}

impl From<EquinoctialElements> for KeplerianElements {
    fn from(equinoctial: EquinoctialElements) -> Self {
        KeplerianElements::from(&equinoctial)
    }
}

impl fmt::Display for EquinoctialElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Equinoctial Elements")?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(f, "  a   (semi-major axis)       = {:.6}", self.semi_major_axis)?;
        writeln!(f, "  h   (e·sin ϖ)               = {:.6}", self.eccentricity_sin_lon)?;
        writeln!(f, "  k   (e·cos ϖ)               = {:.6}", self.eccentricity_cos_lon)?;
        writeln!(f, "  p   (tan(i/2)·sin Ω)        = {:.6}", self.tan_half_incl_sin_node)?;
        writeln!(f, "  q   (tan(i/2)·cos Ω)        = {:.6}", self.tan_half_incl_cos_node)?;
        writeln!(f, "  λ   (mean longitude)        = {:.6} rad", self.mean_longitude)
    }
}
