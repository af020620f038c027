#![allow(dead_code)]

use approx::assert_relative_eq;
use keplerian_motion::cartesian_motion::CartesianState;
use nalgebra::Vector3;

/// Route `log` output of the crate to the test harness.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn assert_state_close(
    actual: &CartesianState<f64>,
    expected: &CartesianState<f64>,
    position_epsilon: f64,
    velocity_epsilon: f64,
) {
    assert_relative_eq!(
        actual.position,
        expected.position,
        epsilon = position_epsilon
    );
    assert_relative_eq!(
        actual.velocity,
        expected.velocity,
        epsilon = velocity_epsilon
    );
}

pub fn state(position: [f64; 3], velocity: [f64; 3]) -> CartesianState<f64> {
    CartesianState::new(Vector3::from(position), Vector3::from(velocity))
}

/// Eccentricity vector `(v × h)/μ − r/|r|`.
pub fn eccentricity_vector(state: &CartesianState<f64>, mu: f64) -> Vector3<f64> {
    let h = state.position.cross(&state.velocity);
    state.velocity.cross(&h) / mu - state.position / state.position.norm()
}
