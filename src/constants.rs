//! # Constants and type definitions
//!
//! Physical constants and a few type aliases shared by the solvers, the
//! element sets and the propagator.
//!
//! The prediction kernel itself is unit-agnostic: every routine takes the
//! gravitational parameter explicitly, so any consistent set of length and
//! time units works (m & s, km & s, AU & day, canonical units with μ = 1…).

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Earth gravitational parameter GM in m³/s² (EGM96 / WGS84 value)
pub const EARTH_MU: f64 = 3.986004415e14;

/// Sun gravitational parameter GM in m³/s² (IAU 2015 nominal value)
pub const SUN_MU: f64 = 1.327_124_400_41e20;

/// Gaussian gravitational constant k (AU^(3/2) / day)
pub const GAUSS_GRAV: f64 = 0.01720209895;

/// k², the heliocentric gravitational parameter in AU³/day²
pub const GAUSS_GRAV_SQUARED: f64 = GAUSS_GRAV * GAUSS_GRAV;

/// Eccentricity below which an orbit is treated as circular when extracting
/// angular elements (periapsis direction undefined).
pub const CIRCULAR_ECCENTRICITY: f64 = 1e-12;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Gravitational parameter, in length³/time² of the caller's unit system
pub type GravitationalParameter = f64;
