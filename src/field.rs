//! # Field elements
//!
//! The prediction kernel is written once against [`CalculusScalar`], a small
//! contract over [`num_traits::Float`] that every arithmetic type used by the
//! crate satisfies:
//!
//! - `f64` for plain evaluation,
//! - [`hyperdual::Hyperdual<f64, N>`] for forward-mode automatic
//!   differentiation with `N - 1` free variables.
//!
//! Control flow (branch selection, convergence tests, brackets) only ever
//! looks at [`CalculusScalar::real`]; every value that flows into the result
//! goes through the type's own arithmetic so that derivative parts follow the
//! chain rule.
//!
//! ## Example
//!
//! ```rust
//! use hyperdual::{Float, Hyperdual};
//! use keplerian_motion::field::CalculusScalar;
//!
//! // x = 2 with dx/dx = 1
//! let x = Hyperdual::<f64, 2>::from_slice(&[2.0, 1.0]);
//! let y = x * x.sin();
//! assert_eq!(y.real(), 2.0 * 2.0_f64.sin());
//! assert!((y[1] - (2.0_f64.sin() + 2.0 * 2.0_f64.cos())).abs() < 1e-15);
//! ```

use nalgebra::{Scalar, Vector3};
use num_traits::Float;

/// Scalar type usable by the Keplerian prediction kernel.
///
/// The trait is blanket-implemented for any `Float + Scalar`, there is
/// nothing to implement by hand.
pub trait CalculusScalar: Float + Scalar {
    /// Value part of the scalar, derivatives discarded.
    fn real(&self) -> f64;

    /// Lift a real constant into the scalar type (all derivatives zero).
    fn constant(value: f64) -> Self;
}

impl<T> CalculusScalar for T
where
    T: Float + Scalar,
{
    #[inline]
    fn real(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    #[inline]
    fn constant(value: f64) -> Self {
        <T as num_traits::NumCast>::from(value).unwrap_or_else(T::nan)
    }
}

/// Scalar product `a · b`.
#[inline]
pub fn dot<T: CalculusScalar>(a: &Vector3<T>, b: &Vector3<T>) -> T {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean norm `|v|`.
#[inline]
pub fn norm<T: CalculusScalar>(v: &Vector3<T>) -> T {
    dot(v, v).sqrt()
}

/// Cross product `a × b`.
#[inline]
pub fn cross<T: CalculusScalar>(a: &Vector3<T>, b: &Vector3<T>) -> Vector3<T> {
    Vector3::new(
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    )
}

/// Linear combination `f·a + g·b`.
#[inline]
pub fn linear_combination<T: CalculusScalar>(
    f: T,
    a: &Vector3<T>,
    g: T,
    b: &Vector3<T>,
) -> Vector3<T> {
    Vector3::new(
        f * a[0] + g * b[0],
        f * a[1] + g * b[1],
        f * a[2] + g * b[2],
    )
}

/// `true` when every component has a finite real part.
#[inline]
pub(crate) fn is_finite_vector<T: CalculusScalar>(v: &Vector3<T>) -> bool {
    v.iter().all(|c| c.real().is_finite())
}
