//! # Keplerian orbital elements
//!
//! [`KeplerianElements`] is the classical osculating element set
//! `(a, e, i, Ω, ω, M)` of a two-body orbit, for both conic regimes:
//!
//! | regime     | `a`   | `e`         | last element                    |
//! |------------|-------|-------------|---------------------------------|
//! | elliptic   | `> 0` | `[0, 1)`    | mean anomaly `M`, in `[0, 2π)`  |
//! | hyperbolic | `< 0` | `> 1`       | mean hyperbolic anomaly `N`     |
//!
//! ## Provided functionality
//!
//! - [`KeplerianElements::from_cartesian`] / [`KeplerianElements::to_cartesian`]
//!   – conversion from/to a position/velocity pair around a body of parameter `μ`.
//! - [`KeplerianElements::propagate`] – two-body motion as a mean anomaly drift.
//! - Conversion from/to [`EquinoctialElements`] for elliptic orbits.
//!
//! Units follow the caller: lengths and `μ` must share a length unit, angles
//! are in radians.
//!
//! ## Degeneracies
//!
//! - **Circular orbits (`e < 1e-12`)**: ω is undefined and set to `0`; the
//!   mean anomaly then carries the argument of latitude.
//! - **Equatorial orbits (`i = 0` or `π`)**: Ω is undefined and set to `0`.
//! - **Rectilinear and parabolic motion** has no element set here and is
//!   reported as [`KeplerError::DegenerateOrbit`].
//!
//! ## Example
//!
//! ```rust
//! use nalgebra::Vector3;
//! use keplerian_motion::orbit_type::keplerian_element::KeplerianElements;
//!
//! let r = Vector3::new(1.0, 0.0, 0.0);
//! let v = Vector3::new(0.0, 1.1, 0.1);
//!
//! let kep = KeplerianElements::from_cartesian(&r, &v, 1.0).unwrap();
//! let (r2, v2) = kep.to_cartesian(1.0).unwrap();
//!
//! assert!((r2 - r).norm() < 1e-13);
//! assert!((v2 - v).norm() < 1e-13);
//! ```
//!
//! ## See also
//!
//! - [`EquinoctialElements`] – non-singular form for elliptic orbits.
//! - [`principal_angle`] – angle normalization to `[0, 2π)`.
use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    constants::CIRCULAR_ECCENTRICITY,
    kepler::{
        eccentric_to_true_anomaly, hyperbolic_to_true_anomaly, mean_to_eccentric_anomaly,
        mean_to_hyperbolic_anomaly, principal_angle,
    },
    kepler_errors::KeplerError,
    orbit_type::equinoctial_element::EquinoctialElements,
};

/// Keplerian orbital elements (osculating, two-body).
///
/// Units
/// -----
/// * `semi_major_axis`: caller length unit, negative for hyperbolic orbits.
/// * `eccentricity`: unitless.
/// * `inclination`: radians, `[0, π]`.
/// * `ascending_node_longitude`: radians (Ω).
/// * `periapsis_argument`: radians (ω).
/// * `mean_anomaly`: radians (M, or N on hyperbolic orbits).
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct KeplerianElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node_longitude: f64,
    pub periapsis_argument: f64,
    pub mean_anomaly: f64,
}

/// Periapsis (P) and semi-latus (Q) unit vectors of the orbital plane.
fn perifocal_basis(i: f64, node: f64, peri: f64) -> (Vector3<f64>, Vector3<f64>) {
    let (si, ci) = i.sin_cos();
    let (sn, cn) = node.sin_cos();
    let (sw, cw) = peri.sin_cos();

    let p = Vector3::new(cn * cw - sn * sw * ci, sn * cw + cn * sw * ci, sw * si);
    let q = Vector3::new(-cn * sw - sn * cw * ci, -sn * sw + cn * cw * ci, cw * si);
    (p, q)
}

impl KeplerianElements {
    pub fn is_hyperbolic(&self) -> bool {
        self.eccentricity > 1.0
    }

    /// Mean motion `n = √(μ/|a|³)`.
    pub fn mean_motion(&self, mu: f64) -> f64 {
        (mu / self.semi_major_axis.abs().powi(3)).sqrt()
    }

    /// Osculating elements of a position/velocity pair.
    ///
    /// Arguments
    /// ---------
    /// * `position`, `velocity` – Cartesian state.
    /// * `mu` – gravitational parameter, same units as the state.
    ///
    /// Return
    /// ------
    /// * Elliptic elements when `2 − r·v²/μ > 0`, hyperbolic ones otherwise.
    ///
    /// Errors
    /// ------
    /// * [`KeplerError::InvalidGravitationalParameter`], [`KeplerError::NonFiniteInput`].
    /// * [`KeplerError::DegenerateOrbit`] for zero position, zero angular
    ///   momentum or exactly parabolic energy.
    pub fn from_cartesian(
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        mu: f64,
    ) -> Result<Self, KeplerError> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(KeplerError::InvalidGravitationalParameter(mu));
        }
        if !position.iter().chain(velocity.iter()).all(|c| c.is_finite()) {
            return Err(KeplerError::NonFiniteInput("Cartesian state".into()));
        }

        let r = position.norm();
        if r == 0.0 {
            return Err(KeplerError::DegenerateOrbit(
                "position vector has zero length".into(),
            ));
        }

        let h = position.cross(velocity);
        let h_norm = h.norm();
        if h_norm == 0.0 {
            return Err(KeplerError::DegenerateOrbit(
                "rectilinear motion has no orbital plane".into(),
            ));
        }

        let rv2_mu = r * velocity.norm_squared() / mu;
        let vis_viva = 2.0 - rv2_mu;
        if vis_viva == 0.0 {
            return Err(KeplerError::DegenerateOrbit(
                "parabolic trajectory, semi-major axis is infinite".into(),
            ));
        }
        let a = r / vis_viva;

        // orbital plane
        let h_xy = h.x.hypot(h.y);
        let inclination = h_xy.atan2(h.z);
        let node = if h_xy == 0.0 {
            0.0
        } else {
            principal_angle(h.x.atan2(-h.y))
        };

        // argument of latitude u = ω + ν
        let (si, ci) = inclination.sin_cos();
        let (sn, cn) = node.sin_cos();
        let arg_lat = ((-position.x * sn + position.y * cn) * ci + position.z * si)
            .atan2(position.x * cn + position.y * sn);

        let e_c = rv2_mu - 1.0;
        let rv = position.dot(velocity);

        let (e, peri, mean_anomaly) = if a > 0.0 {
            let e_s = rv / (mu * a).sqrt();
            let e = e_s.hypot(e_c);
            if e < CIRCULAR_ECCENTRICITY {
                (e, 0.0, principal_angle(arg_lat))
            } else {
                let ecc_anomaly = e_s.atan2(e_c);
                let nu = eccentric_to_true_anomaly(ecc_anomaly, e);
                (
                    e,
                    principal_angle(arg_lat - nu),
                    principal_angle(ecc_anomaly - e * ecc_anomaly.sin()),
                )
            }
        } else {
            let e_s = rv / (-mu * a).sqrt();
            let e = ((e_c - e_s) * (e_c + e_s)).sqrt();
            let hyp_anomaly = (e_s / e_c).atanh();
            let nu = hyperbolic_to_true_anomaly(hyp_anomaly, e);
            (
                e,
                principal_angle(arg_lat - nu),
                e * hyp_anomaly.sinh() - hyp_anomaly,
            )
        };

        Ok(Self {
            semi_major_axis: a,
            eccentricity: e,
            inclination,
            ascending_node_longitude: node,
            periapsis_argument: peri,
            mean_anomaly,
        })
    }

    /// Position and velocity described by the elements.
    ///
    /// Errors
    /// ------
    /// * [`KeplerError::InvalidGravitationalParameter`] for a bad `mu`.
    /// * [`KeplerError::InvalidConversion`] when `a` and `e` describe
    ///   neither an ellipse (`a > 0`, `0 ≤ e < 1`) nor a hyperbola (`a < 0`, `e > 1`).
    pub fn to_cartesian(&self, mu: f64) -> Result<(Vector3<f64>, Vector3<f64>), KeplerError> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(KeplerError::InvalidGravitationalParameter(mu));
        }

        let a = self.semi_major_axis;
        let e = self.eccentricity;

        // in-plane coordinates along P and Q
        let (x, y, vx, vy) = if a > 0.0 && (0.0..1.0).contains(&e) {
            let ecc_anomaly = mean_to_eccentric_anomaly(self.mean_anomaly, e)?;
            let (s, c) = ecc_anomaly.sin_cos();
            let b = (1.0 - e * e).sqrt();
            let r = a * (1.0 - e * c);
            let k = (mu * a).sqrt() / r;
            (a * (c - e), a * b * s, -k * s, k * b * c)
        } else if a < 0.0 && e > 1.0 {
            let hyp_anomaly = mean_to_hyperbolic_anomaly(self.mean_anomaly, e)?;
            let (sh, ch) = (hyp_anomaly.sinh(), hyp_anomaly.cosh());
            let b = (e * e - 1.0).sqrt();
            let r = a * (1.0 - e * ch);
            let k = (-mu * a).sqrt() / r;
            (a * (ch - e), -a * b * sh, -k * sh, k * b * ch)
        } else {
            return Err(KeplerError::InvalidConversion(format!(
                "no conic with a = {a} and e = {e}"
            )));
        };

        let (p, q) = perifocal_basis(
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
        );
        Ok((x * p + y * q, vx * p + vy * q))
    }

    /// Elements after `dt` of two-body motion: only the mean anomaly moves.
    pub fn propagate(&self, dt: f64, mu: f64) -> Self {
        let drift = self.mean_anomaly + self.mean_motion(mu) * dt;
        Self {
            mean_anomaly: if self.is_hyperbolic() {
                drift
            } else {
                principal_angle(drift)
            },
            ..self.clone()
        }
    }

    /// Convert equinoctial elements to Keplerian elements.
    ///
    /// Inverse mapping from `(a, h ≡ e·sin ϖ, k ≡ e·cos ϖ, p ≡ tan(i/2)·sin Ω,
    /// q ≡ tan(i/2)·cos Ω, λ ≡ M + ϖ)` where ϖ = ω + Ω.
    ///
    /// If `e ≈ 0`, ϖ is set to `0`. If `tan(i/2) ≈ 0`, Ω is set to `0`.
    /// All output angles lie in `[0, 2π)`.
    pub fn from_equinoctial_internal(
        semi_major_axis: f64,
        eccentricity_sin_lon: f64,
        eccentricity_cos_lon: f64,
        tan_half_incl_sin_node: f64,
        tan_half_incl_cos_node: f64,
        mean_longitude: f64,
    ) -> Self {
        let ecc = eccentricity_sin_lon.hypot(eccentricity_cos_lon);
        let lon_peri = if ecc < CIRCULAR_ECCENTRICITY {
            0.0
        } else {
            eccentricity_sin_lon.atan2(eccentricity_cos_lon)
        };

        let tan_half_incl = tan_half_incl_sin_node.hypot(tan_half_incl_cos_node);
        let node = if tan_half_incl < CIRCULAR_ECCENTRICITY {
            0.0
        } else {
            tan_half_incl_sin_node.atan2(tan_half_incl_cos_node)
        };

        Self {
            semi_major_axis,
            eccentricity: ecc,
            inclination: 2.0 * tan_half_incl.atan(),
            ascending_node_longitude: principal_angle(node),
            periapsis_argument: principal_angle(lon_peri - node),
            mean_anomaly: principal_angle(mean_longitude - lon_peri),
        }
    }
}

impl TryFrom<&KeplerianElements> for EquinoctialElements {
    type Error = KeplerError;

    /// Forward conversion, elliptic orbits only.
    fn try_from(k: &KeplerianElements) -> Result<Self, Self::Error> {
        if !(k.semi_major_axis > 0.0 && (0.0..1.0).contains(&k.eccentricity)) {
            return Err(KeplerError::InvalidConversion(format!(
                "equinoctial elements need an elliptic orbit, got a = {} and e = {}",
                k.semi_major_axis, k.eccentricity
            )));
        }
        Ok(EquinoctialElements::from_kepler_internal(
            k.semi_major_axis,
            k.eccentricity,
            k.inclination,
            k.ascending_node_longitude,
            k.periapsis_argument,
            k.mean_anomaly,
        ))
    }
}

impl TryFrom<KeplerianElements> for EquinoctialElements {
    type Error = KeplerError;

    fn try_from(k: KeplerianElements) -> Result<Self, Self::Error> {
        EquinoctialElements::try_from(&k)
    }
}

impl fmt::Display for KeplerianElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 180.0 / std::f64::consts::PI;
        let regime = if self.is_hyperbolic() {
            "hyperbolic"
        } else {
            "elliptic"
        };
        writeln!(f, "Keplerian Elements ({regime})")?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6}",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.6}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6} rad ({:.6}°)",
            self.inclination,
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6} rad ({:.6}°)",
            self.ascending_node_longitude,
            self.ascending_node_longitude * rad_to_deg
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6} rad ({:.6}°)",
            self.periapsis_argument,
            self.periapsis_argument * rad_to_deg
        )?;
        writeln!(
            f,
            "  M   (mean anomaly)          = {:.6} rad ({:.6}°)",
            self.mean_anomaly,
            self.mean_anomaly * rad_to_deg
        )
    }
}
