mod common;

use approx::assert_relative_eq;
use hyperdual::Hyperdual;
use keplerian_motion::prelude::*;
use rstest::rstest;

use common::{init_logger, state};

/// Value and partial derivatives with respect to `(r0, v0, μ, dt)`.
type Dual9 = Hyperdual<f64, 9>;

fn seeded(value: f64, slot: usize) -> Dual9 {
    let mut parts = [0.0; 9];
    parts[0] = value;
    parts[slot] = 1.0;
    Dual9::from_slice(&parts)
}

/// Flattened `(r1, v1)` as a function of `(r0, v0, μ, dt)`.
fn predict_flat(inputs: &[f64; 8]) -> [f64; 6] {
    let p = Vector3::new(inputs[0], inputs[1], inputs[2]);
    let v = Vector3::new(inputs[3], inputs[4], inputs[5]);
    let (p1, v1) =
        predict_position_velocity(inputs[7], &p, &v, inputs[6], &KeplerSolverParams::default())
            .unwrap();
    [p1.x, p1.y, p1.z, v1.x, v1.y, v1.z]
}

#[rstest]
#[case::elliptic([10.0, 1.0, 0.0], [0.0, 0.1, 0.2], 20.0)]
#[case::elliptic_backward([10.0, 1.0, 0.0], [0.0, 0.1, 0.2], -7.5)]
#[case::hyperbolic([10.0, 1.0, 0.0], [0.0, 0.1, 1.0], 8.0)]
#[case::multi_revolution([4.0, 0.0, 0.0], [0.0, 0.45, 0.1], 150.0)]
fn hyperdual_derivatives_match_central_differences(
    #[case] position: [f64; 3],
    #[case] velocity: [f64; 3],
    #[case] dt: f64,
) {
    init_logger();
    let mu = 1.0;
    let inputs = [
        position[0], position[1], position[2], velocity[0], velocity[1], velocity[2], mu, dt,
    ];

    let p = Vector3::new(seeded(inputs[0], 1), seeded(inputs[1], 2), seeded(inputs[2], 3));
    let v = Vector3::new(seeded(inputs[3], 4), seeded(inputs[4], 5), seeded(inputs[5], 6));
    let (p1, v1) = predict_position_velocity(
        seeded(dt, 8),
        &p,
        &v,
        seeded(mu, 7),
        &KeplerSolverParams::default(),
    )
    .unwrap();
    let outputs = [p1.x, p1.y, p1.z, v1.x, v1.y, v1.z];

    // value parts agree with the plain evaluation
    let plain = predict_flat(&inputs);
    for (dual, value) in outputs.iter().zip(plain.iter()) {
        assert_relative_eq!(dual.real(), *value, epsilon = 1e-13, max_relative = 1e-13);
    }

    for input in 0..8 {
        let h = 1e-6 * inputs[input].abs().max(1.0);
        let mut plus = inputs;
        let mut minus = inputs;
        plus[input] += h;
        minus[input] -= h;
        let (fp, fm) = (predict_flat(&plus), predict_flat(&minus));

        for output in 0..6 {
            let numeric = (fp[output] - fm[output]) / (2.0 * h);
            let analytic = outputs[output][input + 1];
            assert_relative_eq!(analytic, numeric, epsilon = 1e-6, max_relative = 1e-6);
        }
    }
}

#[test]
fn state_transition_matches_finite_differences() {
    let initial = state([10.0, 1.0, 0.0], [0.0, 0.1, 0.2]);
    let params = KeplerSolverParams::default();
    let stm = state_transition_matrix(33.0, &initial, 1.0, &params).unwrap();

    for col in 0..6 {
        let h = 1e-6;
        let mut plus = initial.clone();
        let mut minus = initial.clone();
        if col < 3 {
            plus.position[col] += h;
            minus.position[col] -= h;
        } else {
            plus.velocity[col - 3] += h;
            minus.velocity[col - 3] -= h;
        }
        let fp = plus.shifted_by(33.0, 1.0, &params).unwrap();
        let fm = minus.shifted_by(33.0, 1.0, &params).unwrap();

        for row in 0..3 {
            let dp = (fp.position[row] - fm.position[row]) / (2.0 * h);
            let dv = (fp.velocity[row] - fm.velocity[row]) / (2.0 * h);
            assert_relative_eq!(stm[(row, col)], dp, epsilon = 1e-6, max_relative = 1e-6);
            assert_relative_eq!(stm[(row + 3, col)], dv, epsilon = 1e-6, max_relative = 1e-6);
        }
    }
}

#[test]
fn state_transition_composes_over_split_intervals() {
    let initial = state([10.0, 1.0, 0.0], [0.0, 0.1, 0.2]);
    let params = KeplerSolverParams::default();

    let (middle, first) = propagate_with_state_transition(12.0, &initial, 1.0, &params).unwrap();
    let (_, second) = propagate_with_state_transition(18.0, &middle, 1.0, &params).unwrap();
    let (_, direct) = propagate_with_state_transition(30.0, &initial, 1.0, &params).unwrap();

    assert_relative_eq!(second * first, direct, epsilon = 1e-9, max_relative = 1e-9);
}

#[test]
fn state_transition_is_symplectic() {
    use nalgebra::{Matrix3, Matrix6};

    let params = KeplerSolverParams::default();
    let mut j = Matrix6::<f64>::zeros();
    j.fixed_view_mut::<3, 3>(0, 3).copy_from(&Matrix3::<f64>::identity());
    j.fixed_view_mut::<3, 3>(3, 0).copy_from(&(-Matrix3::<f64>::identity()));

    for (initial, dt) in [
        (state([10.0, 1.0, 0.0], [0.0, 0.1, 0.2]), 45.0),
        (state([10.0, 1.0, 0.0], [0.0, 0.1, 1.0]), -12.0),
    ] {
        let phi = state_transition_matrix(dt, &initial, 1.0, &params).unwrap();
        assert_relative_eq!(phi.transpose() * j * phi, j, epsilon = 1e-8);
    }
}
