//! # State transition matrix
//!
//! Sensitivity of a predicted Cartesian state to the initial one,
//! `Φ(t₀ + dt, t₀) = ∂(r₁, v₁) / ∂(r₀, v₀)`, obtained by running
//! [`predict_position_velocity`] once over hyper-dual numbers.
//!
//! Each of the six initial components is seeded with its own derivative slot
//! (slots `1..=6` of a [`Hyperdual<f64, 7>`]); `dt` and `μ` are lifted as
//! constants. Column `j` of `Φ` is then read from slot `j + 1` of the six
//! output components.
//!
//! The result is exact up to the convergence of the anomaly solver, with no
//! finite-difference step to tune.
use hyperdual::Hyperdual;
use log::debug;
use nalgebra::{Matrix6, Vector3};

use crate::{
    cartesian_motion::{predict_position_velocity, CartesianState},
    kepler_errors::KeplerError,
    solver_params::KeplerSolverParams,
};

type Dual7 = Hyperdual<f64, 7>;

/// Lift `value` with a unit derivative in slot `slot`.
fn seeded(value: f64, slot: usize) -> Dual7 {
    let mut parts = [0.0; 7];
    parts[0] = value;
    parts[slot] = 1.0;
    Dual7::from_slice(&parts)
}

/// Propagate a state and compute its 6×6 state transition matrix.
///
/// Arguments
/// -----------------
/// * `dt`: signed time of flight.
/// * `state`: initial position and velocity.
/// * `mu`: gravitational parameter of the central body.
/// * `params`: anomaly solver controls.
///
/// Return
/// ----------
/// * The state at `t₀ + dt` together with `Φ`, rows ordered
///   `(x, y, z, vx, vy, vz)` of the final state and columns of the initial one.
///
/// Errors
/// ----------
/// Same as [`predict_position_velocity`].
pub fn propagate_with_state_transition(
    dt: f64,
    state: &CartesianState<f64>,
    mu: f64,
    params: &KeplerSolverParams,
) -> Result<(CartesianState<f64>, Matrix6<f64>), KeplerError> {
    let position = Vector3::new(
        seeded(state.position.x, 1),
        seeded(state.position.y, 2),
        seeded(state.position.z, 3),
    );
    let velocity = Vector3::new(
        seeded(state.velocity.x, 4),
        seeded(state.velocity.y, 5),
        seeded(state.velocity.z, 6),
    );

    let (p1, v1) = predict_position_velocity(
        Dual7::from_real(dt),
        &position,
        &velocity,
        Dual7::from_real(mu),
        params,
    )?;

    let mut stm = Matrix6::zeros();
    for row in 0..3 {
        for col in 0..6 {
            stm[(row, col)] = p1[row][col + 1];
            stm[(row + 3, col)] = v1[row][col + 1];
        }
    }
    debug!("state transition over dt = {dt}: det(Φ) = {:e}", stm.determinant());

    let final_state = CartesianState::new(p1.map(|c| c.real()), v1.map(|c| c.real()));
    Ok((final_state, stm))
}

/// State transition matrix only, see [`propagate_with_state_transition`].
pub fn state_transition_matrix(
    dt: f64,
    state: &CartesianState<f64>,
    mu: f64,
    params: &KeplerSolverParams,
) -> Result<Matrix6<f64>, KeplerError> {
    propagate_with_state_transition(dt, state, mu, params).map(|(_, stm)| stm)
}
