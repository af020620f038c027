//! # Kepler equation solvers
//!
//! Two families of solvers live here:
//!
//! 1. **Anomaly-difference solvers**, generic over [`CalculusScalar`], used by
//!    the Cartesian state predictor. They invert Kepler's equation written in
//!    difference form, relative to the initial anomaly `E₀` (or `H₀`):
//!
//!    * elliptic: `ΔE − eC·sin ΔE + eS·(1 − cos ΔE) = ΔM`, with `eS = e·sin E₀`, `eC = e·cos E₀`,
//!    * hyperbolic: `eC·sinh ΔH + eS·(cosh ΔH − 1) − ΔH = ΔN`, with `eS = e·sinh H₀`, `eC = e·cosh H₀`.
//!
//!    Both left-hand sides are strictly increasing, so a real bracket on the
//!    root is maintained and a safeguarded Halley iteration is used. All the
//!    control flow looks at real parts only, and the accepted last step is
//!    always a Halley/Newton correction, which makes the derivative parts of a
//!    differentiable scalar equal to the implicit-function derivatives.
//!
//! 2. **Classical anomaly conversions** on plain `f64`
//!    (mean ↔ eccentric, mean ↔ hyperbolic, → true), solved with the
//!    Newton–Raphson of the [`roots`] crate. They back the element-set
//!    propagation in [`crate::orbit_type`].
//!
//! ## Reference
//!
//! * Battin, *An Introduction to the Mathematics and Methods of Astrodynamics*, §4.
use std::f64::consts::PI;

use log::{debug, trace};
use roots::{find_root_newton_raphson, SimpleConvergency};

use crate::{
    constants::DPI, field::CalculusScalar, kepler_errors::KeplerError,
    solver_params::KeplerSolverParams,
};

/// Relative step size under which a step that stopped shrinking is round-off noise.
const ROUND_OFF_FLOOR: f64 = 1e-8;

/// Largest half-width explored when bracketing the hyperbolic root.
const MAX_BRACKET_HALF_WIDTH: f64 = 1024.0;

/// Returns the principal value of an angle in radians, in `[0, 2π)`.
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Refine the root of a strictly increasing function inside `[lower, upper]`.
///
/// `residual(x)` returns `(F(x), F'(x), F''(x), m)` where `m` is the sum of the
/// magnitudes of the terms of `F`, i.e. the scale of its round-off. Each
/// iteration tries a Halley step, then a Newton step, and falls back to
/// bisection of the real bracket when both would leave it.
///
/// The iteration stops when the step, the residual or the bracket reaches
/// round-off level. Near `e → 1` the slope `F'` is tiny and the steps are
/// noise well above the step tolerance, so the residual test is the one that
/// fires there.
fn refine_increasing_root<T, R>(
    residual: R,
    seed: T,
    mut lower: f64,
    mut upper: f64,
    params: &KeplerSolverParams,
) -> Result<T, KeplerError>
where
    T: CalculusScalar,
    R: Fn(T) -> (T, T, T, f64),
{
    let half = T::constant(0.5);
    let mut x = seed;
    let mut last_step = f64::INFINITY;
    let mut last_residual = f64::NAN;

    for iteration in 1..=params.max_iterations {
        let (f, df, d2f, magnitude) = residual(x);
        let (fr, xr) = (f.real(), x.real());
        last_residual = fr;

        if fr < 0.0 {
            lower = lower.max(xr);
        } else if fr > 0.0 {
            upper = upper.min(xr);
        }

        let newton = -f / df;
        let halley = newton / (T::one() + half * newton * d2f / df);

        let stays_inside = |step: &T| {
            let candidate = xr + step.real();
            candidate.is_finite() && candidate >= lower && candidate <= upper
        };

        let scale = xr.abs().max(1.0);
        if fr.abs() <= params.tolerance * magnitude || upper - lower <= params.tolerance * scale {
            trace!("anomaly difference at round-off level after {iteration} iteration(s)");
            return Ok(final_correction(x, newton, stays_inside(&newton)));
        }

        let step = if stays_inside(&halley) {
            halley
        } else if stays_inside(&newton) {
            newton
        } else {
            // value-only restart, the next corrections rebuild the derivative parts
            x = T::constant(0.5 * (lower + upper));
            if upper - lower > ROUND_OFF_FLOOR * scale {
                last_step = f64::INFINITY;
            }
            continue;
        };

        x = x + step;

        let step_size = step.real().abs();
        let scale = x.real().abs().max(1.0);
        if step_size <= params.tolerance * scale
            || (step_size >= last_step && step_size <= ROUND_OFF_FLOOR * scale)
        {
            trace!("anomaly difference converged after {iteration} iteration(s)");
            return Ok(x);
        }
        last_step = step_size;
    }

    debug!(
        "anomaly difference did not converge in {} iterations (bracket [{lower}, {upper}], residual {last_residual:e})",
        params.max_iterations
    );
    Err(KeplerError::AnomalyNotConverged {
        iterations: params.max_iterations,
        residual: last_residual.abs(),
    })
}

/// Last correction of an accepted root.
///
/// The Newton step is applied in full when it stays in the bracket. Otherwise
/// only its derivative parts are, so that a root reached by bisection still
/// carries the implicit-function derivatives `x' − F_p/F'`.
fn final_correction<T: CalculusScalar>(x: T, newton: T, inside: bool) -> T {
    if inside {
        x + newton
    } else if newton.real().is_finite() {
        x + (newton - T::constant(newton.real()))
    } else {
        x
    }
}

/// Solve the elliptic Kepler equation in difference form for `ΔE`.
///
/// Arguments
/// -----------------
/// * `e_s`: `e·sin E₀ = σ₀/√a` with `σ₀ = (r·v)/√μ`.
/// * `e_c`: `e·cos E₀ = 1 − r₀/a`.
/// * `delta_m`: mean anomaly advance `ΔM = √(μ/a³)·Δt` (signed, any magnitude).
/// * `params`: iteration controls.
///
/// Return
/// ----------
/// * `ΔE` such that `ΔE − eC·sin ΔE + eS·(1 − cos ΔE) = ΔM`. The result is
///   not reduced modulo 2π: multi-revolution advances give multi-revolution
///   anomaly differences.
///
/// Errors
/// ----------
/// * [`KeplerError::NonFiniteInput`] when `ΔM` is not finite.
/// * [`KeplerError::AnomalyNotConverged`] when the iteration cap is reached.
pub fn elliptic_mean_to_eccentric_difference<T: CalculusScalar>(
    e_s: T,
    e_c: T,
    delta_m: T,
    params: &KeplerSolverParams,
) -> Result<T, KeplerError> {
    if !delta_m.real().is_finite() {
        return Err(KeplerError::NonFiniteInput(format!(
            "mean anomaly advance {}",
            delta_m.real()
        )));
    }

    // F(x + 2π) = F(x) + 2π: solve on the reduced advance, add the turns back
    let revolutions = (delta_m.real() / DPI).round();
    let turns = T::constant(revolutions * DPI);
    let reduced = delta_m - turns;
    let reduced_r = reduced.real();

    // |ΔE − ΔM| = e·|sin(E₀ + ΔE) − sin E₀| ≤ 2e
    let ecc = e_s.real().hypot(e_c.real());
    let half_width = 2.0 * ecc + 4.0 * f64::EPSILON * (1.0 + reduced_r.abs());

    let one = T::one();
    let (sin_m, cos_m) = reduced.sin_cos();
    let seed = reduced + e_c * sin_m - e_s * (one - cos_m);

    let residual = |x: T| {
        let (s, c) = x.sin_cos();
        let (sine_term, cosine_term) = (e_c * s, e_s * (one - c));
        let magnitude = x.real().abs()
            + sine_term.real().abs()
            + cosine_term.real().abs()
            + reduced_r.abs();
        (
            x - sine_term + cosine_term - reduced,
            one - e_c * c + e_s * s,
            e_c * s + e_s * c,
            magnitude,
        )
    };

    let root = refine_increasing_root(
        residual,
        seed,
        reduced_r - half_width,
        reduced_r + half_width,
        params,
    )?;

    Ok(root + turns)
}

/// Grow `[seed − w, seed + w]` until it brackets the root of an increasing `f`.
fn bracket_increasing_root<F: Fn(f64) -> f64>(f: F, seed: f64) -> Result<(f64, f64), KeplerError> {
    let mut half_width = 1.0;
    while !(f(seed - half_width) <= 0.0) {
        half_width *= 2.0;
        if half_width > MAX_BRACKET_HALF_WIDTH {
            return Err(KeplerError::AnomalyNotConverged {
                iterations: 0,
                residual: f(seed).abs(),
            });
        }
    }
    let lower = seed - half_width;

    half_width = 1.0;
    while !(f(seed + half_width) >= 0.0) {
        half_width *= 2.0;
        if half_width > MAX_BRACKET_HALF_WIDTH {
            return Err(KeplerError::AnomalyNotConverged {
                iterations: 0,
                residual: f(seed).abs(),
            });
        }
    }

    Ok((lower, seed + half_width))
}

/// Solve the hyperbolic Kepler equation in difference form for `ΔH`.
///
/// Arguments
/// -----------------
/// * `e_s`: `e·sinh H₀ = σ₀/√(−a)`.
/// * `e_c`: `e·cosh H₀ = 1 − r₀/a` (always `> 1` on a hyperbola).
/// * `delta_n`: mean hyperbolic anomaly advance `ΔN = √(μ/(−a)³)·Δt`.
/// * `params`: iteration controls.
///
/// Return
/// ----------
/// * `ΔH` such that `eC·sinh ΔH + eS·(cosh ΔH − 1) − ΔH = ΔN`.
///
/// Errors
/// ----------
/// * [`KeplerError::NonFiniteInput`] when `ΔN` is not finite.
/// * [`KeplerError::DegenerateOrbit`] when `eC ≤ |eS|` (not a hyperbola).
///
/// Limits
/// ----------
/// `eC − |eS| = e·exp(−|H₀|)`. Far out on an asymptote `eC` and `|eS|` agree
/// to the last bit, `e` and `H₀` can no longer be recovered from them and the
/// terms of `G` cancel catastrophically. Such a start is reported as
/// [`KeplerError::DegenerateOrbit`] once the two coincide; before that the
/// accuracy of `ΔH` degrades like `ε·eC²`.
/// * [`KeplerError::AnomalyNotConverged`] when no bracket or no root is found.
pub fn hyperbolic_mean_to_hyperbolic_difference<T: CalculusScalar>(
    e_s: T,
    e_c: T,
    delta_n: T,
    params: &KeplerSolverParams,
) -> Result<T, KeplerError> {
    let (es, ec, dn) = (e_s.real(), e_c.real(), delta_n.real());
    if !dn.is_finite() {
        return Err(KeplerError::NonFiniteInput(format!(
            "mean hyperbolic anomaly advance {dn}"
        )));
    }
    if !(ec > es.abs()) {
        return Err(KeplerError::DegenerateOrbit(format!(
            "e·cosh H0 = {ec} must exceed |e·sinh H0| = {} (not a hyperbola, or too far on its asymptote)",
            es.abs()
        )));
    }

    // seed on the absolute anomaly H₁ then shift back by H₀
    let ecc = ((ec - es) * (ec + es)).sqrt();
    let h0 = (es / ec).atanh();
    let n1 = es - h0 + dn;
    let h1 = n1.signum() * (2.0 * n1.abs() / ecc + 1.8).ln();
    // ΔN = 0 has the exact root 0
    let seed = if dn == 0.0 { 0.0 } else { h1 - h0 };

    let (lower, upper) = bracket_increasing_root(
        |x: f64| ec * x.sinh() + es * (x.cosh() - 1.0) - x - dn,
        seed,
    )?;

    let one = T::one();
    let residual = |x: T| {
        let (sh, ch) = (x.sinh(), x.cosh());
        let (sinh_term, cosh_term) = (e_c * sh, e_s * (ch - one));
        let magnitude =
            sinh_term.real().abs() + cosh_term.real().abs() + x.real().abs() + dn.abs();
        (
            sinh_term + cosh_term - x - delta_n,
            e_c * ch + e_s * sh - one,
            e_c * sh + e_s * ch,
            magnitude,
        )
    };

    refine_increasing_root(residual, T::constant(seed), lower, upper, params)
}

/// Newton convergence used by the classical conversions, followed by one
/// explicit correction so the returned anomaly sits at round-off level.
pub(crate) fn classical_convergency() -> SimpleConvergency<f64> {
    SimpleConvergency {
        eps: f64::EPSILON * 1e2,
        max_iter: 50,
    }
}

/// Solve `M = E − e·sin E` for the eccentric anomaly `E` (`0 ≤ e < 1`).
///
/// The returned anomaly lies in the same revolution as `mean_anomaly`.
pub fn mean_to_eccentric_anomaly(mean_anomaly: f64, e: f64) -> Result<f64, KeplerError> {
    if !(0.0..1.0).contains(&e) {
        return Err(KeplerError::InvalidConversion(format!(
            "elliptic Kepler equation needs 0 <= e < 1, got {e}"
        )));
    }

    let turns = DPI * (mean_anomaly / DPI).round();
    let m = mean_anomaly - turns;

    let f = |x: f64| x - e * x.sin() - m;
    let df = |x: f64| 1.0 - e * x.cos();

    // Danby starting value
    let x0 = m + 0.85 * e * m.signum();
    let anomaly = find_root_newton_raphson(x0, &f, &df, &mut classical_convergency())?;

    Ok(anomaly - f(anomaly) / df(anomaly) + turns)
}

/// Mean anomaly from eccentric anomaly, `M = E − e·sin E`.
pub fn eccentric_to_mean_anomaly(eccentric_anomaly: f64, e: f64) -> f64 {
    eccentric_anomaly - e * eccentric_anomaly.sin()
}

/// Solve `N = e·sinh H − H` for the hyperbolic anomaly `H` (`e > 1`).
pub fn mean_to_hyperbolic_anomaly(mean_anomaly: f64, e: f64) -> Result<f64, KeplerError> {
    if !(e > 1.0) {
        return Err(KeplerError::InvalidConversion(format!(
            "hyperbolic Kepler equation needs e > 1, got {e}"
        )));
    }

    let f = |x: f64| e * x.sinh() - x - mean_anomaly;
    let df = |x: f64| e * x.cosh() - 1.0;

    let x0 = mean_anomaly.signum() * (2.0 * mean_anomaly.abs() / e + 1.8).ln();
    let anomaly = find_root_newton_raphson(x0, &f, &df, &mut classical_convergency())?;

    Ok(anomaly - f(anomaly) / df(anomaly))
}

/// Mean hyperbolic anomaly from hyperbolic anomaly, `N = e·sinh H − H`.
pub fn hyperbolic_to_mean_anomaly(hyperbolic_anomaly: f64, e: f64) -> f64 {
    e * hyperbolic_anomaly.sinh() - hyperbolic_anomaly
}

/// True anomaly from eccentric anomaly, in `(-π, π]`.
pub fn eccentric_to_true_anomaly(eccentric_anomaly: f64, e: f64) -> f64 {
    let (s, c) = eccentric_anomaly.sin_cos();
    ((1.0 - e * e).sqrt() * s).atan2(c - e)
}

/// True anomaly from hyperbolic anomaly, in `(-π, π)`.
pub fn hyperbolic_to_true_anomaly(hyperbolic_anomaly: f64, e: f64) -> f64 {
    ((e * e - 1.0).sqrt() * hyperbolic_anomaly.sinh()).atan2(e - hyperbolic_anomaly.cosh())
}

/// Returns the principal difference `a − b` between two angles, in `[-π, π]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut diff = principal_angle(a) - principal_angle(b);

    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::assert_relative_eq;
    use hyperdual::Hyperdual;
    use rstest::rstest;

    fn elliptic_residual(e_s: f64, e_c: f64, delta_m: f64, x: f64) -> f64 {
        x - e_c * x.sin() + e_s * (1.0 - x.cos()) - delta_m
    }

    fn hyperbolic_residual(e_s: f64, e_c: f64, delta_n: f64, x: f64) -> f64 {
        e_c * x.sinh() + e_s * (x.cosh() - 1.0) - x - delta_n
    }

    #[test]
    fn test_principal_angle_and_diff() {
        assert_relative_eq!(principal_angle(-PI / 2.0), 1.5 * PI);
        assert_relative_eq!(principal_angle(5.0 * PI), PI, epsilon = 1e-14);
        assert_relative_eq!(angle_diff(0.1, DPI - 0.1), 0.2, epsilon = 1e-14);
        assert_relative_eq!(angle_diff(DPI - 0.1, 0.1), -0.2, epsilon = 1e-14);
    }

    #[test]
    fn test_elliptic_zero_advance_is_exact() {
        let params = KeplerSolverParams::default();
        let de = elliptic_mean_to_eccentric_difference(0.3, -0.2, 0.0, &params).unwrap();
        assert_eq!(de, 0.0);

        let dh = hyperbolic_mean_to_hyperbolic_difference(0.09, 9.15, 0.0, &params).unwrap();
        assert_eq!(dh, 0.0);
    }

    #[test]
    fn test_elliptic_difference_satisfies_equation() {
        let params = KeplerSolverParams::default();
        for &ecc in &[0.0, 1e-14, 0.1, 0.5, 0.9, 0.999] {
            for &e0 in &[-2.5, -0.3, 0.0, 0.7, 3.0] {
                let (e_s, e_c) = (ecc * f64::sin(e0), ecc * f64::cos(e0));
                for &dm in &[-50.3, -3.0, -0.01, 1e-9, 0.4, 2.9, 12.0, 1000.25] {
                    let de = elliptic_mean_to_eccentric_difference(e_s, e_c, dm, &params).unwrap();
                    let res = elliptic_residual(e_s, e_c, dm, de);
                    assert!(
                        res.abs() <= 1e-13 * (1.0 + dm.abs()),
                        "e = {ecc}, E0 = {e0}, dM = {dm}: residual {res:e}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_elliptic_difference_matches_absolute_anomalies() {
        let params = KeplerSolverParams::default();
        let (ecc, e0) = (0.6_f64, 1.1_f64);
        let m0 = eccentric_to_mean_anomaly(e0, ecc);

        for &dm in &[-7.0, -1.0, 0.25, 4.0, 20.0] {
            let e1 = mean_to_eccentric_anomaly(m0 + dm, ecc).unwrap();
            let de = elliptic_mean_to_eccentric_difference(
                ecc * e0.sin(),
                ecc * e0.cos(),
                dm,
                &params,
            )
            .unwrap();
            assert_relative_eq!(e0 + de, e1, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_hyperbolic_difference_satisfies_equation() {
        let params = KeplerSolverParams::default();
        for &ecc in &[1.0001, 1.1, 2.0, 10.0] {
            for &h0 in &[-3.0, -0.5, 0.0, 0.2, 2.5] {
                let (e_s, e_c) = (ecc * f64::sinh(h0), ecc * f64::cosh(h0));
                for &dn in &[-100.0, -2.0, -1e-6, 0.0, 0.3, 5.0, 1e4] {
                    let dh =
                        hyperbolic_mean_to_hyperbolic_difference(e_s, e_c, dn, &params).unwrap();
                    let res = hyperbolic_residual(e_s, e_c, dn, dh);
                    let scale = 1.0 + dn.abs() + e_c * dh.cosh();
                    assert!(
                        res.abs() <= 1e-13 * scale,
                        "e = {ecc}, H0 = {h0}, dN = {dn}: residual {res:e}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_hyperbolic_difference_matches_absolute_anomalies() {
        let params = KeplerSolverParams::default();
        let (ecc, h0) = (1.7_f64, -0.8_f64);
        let n0 = hyperbolic_to_mean_anomaly(h0, ecc);

        for &dn in &[-3.0, 0.5, 2.0, 40.0] {
            let h1 = mean_to_hyperbolic_anomaly(n0 + dn, ecc).unwrap();
            let dh = hyperbolic_mean_to_hyperbolic_difference(
                ecc * h0.sinh(),
                ecc * h0.cosh(),
                dn,
                &params,
            )
            .unwrap();
            assert_relative_eq!(h0 + dh, h1, epsilon = 1e-12, max_relative = 1e-13);
        }
    }

    #[test]
    fn test_hyperbolic_rejects_non_hyperbola() {
        let params = KeplerSolverParams::default();
        let res = hyperbolic_mean_to_hyperbolic_difference(2.0, 1.5, 0.1, &params);
        assert!(matches!(res, Err(KeplerError::DegenerateOrbit(_))));

        // H0 ≈ 28: e·cosh H0 and e·sinh H0 are the same double
        let far = 7.303_403_690_767_333e11;
        let res = hyperbolic_mean_to_hyperbolic_difference(far, far, -1e12, &params);
        assert!(matches!(res, Err(KeplerError::DegenerateOrbit(_))));
    }

    #[rstest]
    #[case(1e-6)]
    #[case(1e-8)]
    #[case(1e-10)]
    #[case(1e-12)]
    fn test_elliptic_difference_near_unit_eccentricity(#[case] one_minus_e: f64) {
        // periapsis start: eS = 0, eC = e, tiny slope F'(0) = 1 − e
        let params = KeplerSolverParams::default();
        let e_c = 1.0 - one_minus_e;
        let a = 1.0 / one_minus_e;
        for dt in [0.1, 1.0, 10.0, -1.0, -10.0, 100.0] {
            let dm = dt / (a * a.sqrt());
            let de = elliptic_mean_to_eccentric_difference(0.0, e_c, dm, &params).unwrap();
            assert!(de * dt > 0.0, "1 − e = {one_minus_e}, dt = {dt}: ΔE = {de}");
            // residual at the round-off of the terms of F
            let res = elliptic_residual(0.0, e_c, dm, de);
            assert!(
                res.abs() <= 1e-13 * (de.abs() + dm.abs()),
                "1 − e = {one_minus_e}, dt = {dt}: residual {res:e}"
            );
        }
    }

    #[test]
    fn test_hyperbolic_difference_near_unit_eccentricity() {
        let params = KeplerSolverParams::default();
        for one_plus in [1e-6_f64, 1e-10, 1e-12] {
            let e_c = 1.0 + one_plus;
            let a = 1.0 / one_plus;
            for dt in [-100.0, -1.0, 0.1, 10.0, 100.0] {
                let dn = dt / (a * a.sqrt());
                let dh = hyperbolic_mean_to_hyperbolic_difference(0.0, e_c, dn, &params).unwrap();
                assert!(dh * dt > 0.0);
                let res = hyperbolic_residual(0.0, e_c, dn, dh);
                assert!(
                    res.abs() <= 1e-13 * (dh.abs() + dn.abs()),
                    "dt = {dt}: residual {res:e}"
                );
            }
        }
    }

    #[test]
    fn test_non_finite_advance_is_rejected() {
        let params = KeplerSolverParams::default();
        let res = elliptic_mean_to_eccentric_difference(0.0, 0.1, f64::NAN, &params);
        assert!(matches!(res, Err(KeplerError::NonFiniteInput(_))));
        let res = hyperbolic_mean_to_hyperbolic_difference(0.0, 1.5, f64::INFINITY, &params);
        assert!(matches!(res, Err(KeplerError::NonFiniteInput(_))));
    }

    #[test]
    fn test_iteration_cap_is_reported() {
        let params = KeplerSolverParams::builder()
            .max_iterations(1)
            .build()
            .unwrap();
        let res = elliptic_mean_to_eccentric_difference(0.5, 0.7, 0.3, &params);
        assert!(matches!(
            res,
            Err(KeplerError::AnomalyNotConverged { iterations: 1, .. })
        ));
    }

    #[test]
    fn test_elliptic_difference_derivatives() {
        // dΔE/dΔM = 1 / F'(ΔE), dΔE/deC = sin ΔE / F'(ΔE)
        let params = KeplerSolverParams::default();
        let (e_s, e_c, dm) = (0.2, 0.45, 1.3);

        let de = elliptic_mean_to_eccentric_difference(
            Hyperdual::<f64, 3>::from_real(e_s),
            Hyperdual::<f64, 3>::from_slice(&[e_c, 0.0, 1.0]),
            Hyperdual::<f64, 3>::from_slice(&[dm, 1.0, 0.0]),
            &params,
        )
        .unwrap();

        let x = de.real();
        let fp = 1.0 - e_c * x.cos() + e_s * x.sin();
        assert_relative_eq!(
            x,
            elliptic_mean_to_eccentric_difference(e_s, e_c, dm, &params).unwrap(),
            max_relative = 1e-15
        );
        assert_relative_eq!(de[1], 1.0 / fp, max_relative = 1e-12);
        assert_relative_eq!(de[2], x.sin() / fp, max_relative = 1e-12);
    }

    #[test]
    fn test_hyperbolic_difference_derivatives() {
        // dΔH/dΔN = 1 / G'(ΔH)
        let params = KeplerSolverParams::default();
        let (e_s, e_c, dn) = (-0.4, 1.6, 2.2);

        let dh = hyperbolic_mean_to_hyperbolic_difference(
            Hyperdual::<f64, 2>::from_real(e_s),
            Hyperdual::<f64, 2>::from_real(e_c),
            Hyperdual::<f64, 2>::from_slice(&[dn, 1.0]),
            &params,
        )
        .unwrap();

        let x = dh.real();
        let gp = e_c * x.cosh() + e_s * x.sinh() - 1.0;
        assert_relative_eq!(dh[1], 1.0 / gp, max_relative = 1e-12);
    }

    #[test]
    fn test_classical_conversions() {
        let e = 0.3;
        let ea = mean_to_eccentric_anomaly(1.0, e).unwrap();
        assert_relative_eq!(eccentric_to_mean_anomaly(ea, e), 1.0, epsilon = 1e-15);

        let h = mean_to_hyperbolic_anomaly(-4.0, 1.5).unwrap();
        assert_relative_eq!(hyperbolic_to_mean_anomaly(h, 1.5), -4.0, epsilon = 1e-14);

        // perigee and apogee
        assert_eq!(eccentric_to_true_anomaly(0.0, e), 0.0);
        assert_relative_eq!(eccentric_to_true_anomaly(PI, e), PI, epsilon = 1e-15);
        assert_eq!(hyperbolic_to_true_anomaly(0.0, 1.5), 0.0);

        assert!(matches!(
            mean_to_eccentric_anomaly(1.0, 1.2),
            Err(KeplerError::InvalidConversion(_))
        ));
        assert!(matches!(
            mean_to_hyperbolic_anomaly(1.0, 0.5),
            Err(KeplerError::InvalidConversion(_))
        ));
    }
}
