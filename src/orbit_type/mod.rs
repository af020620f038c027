//! # Orbital element representations
//!
//! Element sets describing the same two-body orbit as a Cartesian state:
//!
//! - [`keplerian_element`](crate::orbit_type::keplerian_element) – classical
//!   elements `(a, e, i, Ω, ω, M)`, elliptic and hyperbolic orbits.
//! - [`equinoctial_element`](crate::orbit_type::equinoctial_element) – equinoctial
//!   elements `(a, h, k, p, q, λ)`, non-singular for circular and equatorial
//!   elliptic orbits.
//!
//! The [`OrbitalElements`] enum carries either representation behind a
//! uniform interface.
//!
//! ## Typical workflow
//!
//! ```rust
//! use nalgebra::Vector3;
//! use keplerian_motion::orbit_type::OrbitalElements;
//!
//! let r = Vector3::new(1.0, 0.0, 0.0);
//! let v = Vector3::new(0.0, 1.0, 0.0);
//!
//! let elems = OrbitalElements::from_cartesian(&r, &v, 1.0).unwrap();
//! let kep = elems.to_keplerian();
//! assert!((kep.semi_major_axis - 1.0).abs() < 1e-15);
//! ```
use std::fmt;

use nalgebra::Vector3;

use crate::{
    kepler_errors::KeplerError,
    orbit_type::{
        equinoctial_element::EquinoctialElements, keplerian_element::KeplerianElements,
    },
};

/// Equinoctial orbital elements and related conversions.
pub mod equinoctial_element;

/// Classical Keplerian elements structure and utilities.
pub mod keplerian_element;

/// Orbital elements in one of the supported representations.
///
/// Variants
/// --------
/// * `Keplerian` – classical elements, any non-parabolic orbit.
/// * `Equinoctial` – non-singular elements, elliptic orbits only.
#[derive(Debug, Clone, PartialEq)]
pub enum OrbitalElements {
    Keplerian(KeplerianElements),
    Equinoctial(EquinoctialElements),
}

impl OrbitalElements {
    /// Classical elements of a Cartesian state around a body of parameter `mu`.
    ///
    /// See [`KeplerianElements::from_cartesian`] for the error cases.
    pub fn from_cartesian(
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        mu: f64,
    ) -> Result<Self, KeplerError> {
        KeplerianElements::from_cartesian(position, velocity, mu).map(OrbitalElements::Keplerian)
    }

    pub fn to_keplerian(&self) -> KeplerianElements {
        match self {
            OrbitalElements::Keplerian(ke) => ke.clone(),
            OrbitalElements::Equinoctial(ee) => KeplerianElements::from(ee),
        }
    }

    /// Convert to equinoctial elements.
    ///
    /// Errors
    /// ------
    /// [`KeplerError::InvalidConversion`] for hyperbolic Keplerian elements.
    pub fn to_equinoctial(&self) -> Result<EquinoctialElements, KeplerError> {
        match self {
            OrbitalElements::Keplerian(ke) => EquinoctialElements::try_from(ke),
            OrbitalElements::Equinoctial(ee) => Ok(ee.clone()),
        }
    }

    pub fn as_keplerian(&self) -> Option<&KeplerianElements> {
        if let OrbitalElements::Keplerian(ref k) = self {
            Some(k)
        } else {
            None
        }
    }

    pub fn as_equinoctial(&self) -> Option<&EquinoctialElements> {
        if let OrbitalElements::Equinoctial(ref e) = self {
            Some(e)
        } else {
            None
        }
    }

    /// Cartesian state described by the elements.
    pub fn to_cartesian(&self, mu: f64) -> Result<(Vector3<f64>, Vector3<f64>), KeplerError> {
        match self {
            OrbitalElements::Keplerian(ke) => ke.to_cartesian(mu),
            OrbitalElements::Equinoctial(ee) => ee.to_cartesian(mu),
        }
    }

    /// Elements after `dt` of two-body motion, in the same representation.
    pub fn propagate(&self, dt: f64, mu: f64) -> Self {
        match self {
            OrbitalElements::Keplerian(ke) => OrbitalElements::Keplerian(ke.propagate(dt, mu)),
            OrbitalElements::Equinoctial(ee) => OrbitalElements::Equinoctial(ee.propagate(dt, mu)),
        }
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrbitalElements::Keplerian(k) => {
                writeln!(f, "[Keplerian representation]")?;
                write!(f, "{k}")
            }
            OrbitalElements::Equinoctial(e) => {
                writeln!(f, "[Equinoctial representation]")?;
                write!(f, "{e}")
            }
        }
    }
}
