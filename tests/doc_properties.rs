//! End-to-end properties of the degree-of-controllability routine.

use approx::assert_relative_eq;
use uav_mdo::error::Error;
use uav_mdo::{DocInput, degree_of_controllability};

/// Quadcopter with the realistic placeholder parameters used throughout the
/// study definitions.
fn quad_input() -> DocInput {
    DocInput {
        rotors: 4,
        coaxial: false,
        max_thrust: 6.0,
        arm_length: 0.28,
        uav_mass: 2.0,
        motor_mass: 0.1,
        propeller_mass: 0.02,
        horizon: 0.5,
        steps: 2,
    }
}

#[test]
fn quadcopter_doc_is_finite_and_is_the_minimum_failure_margin() {
    let result = degree_of_controllability(&quad_input()).unwrap();
    assert_eq!(result.per_rotor.len(), 4);
    assert!(result.doc.is_finite());
    assert!(result.per_rotor.iter().all(|m| m.is_finite()));
    let min = result.per_rotor.iter().copied().fold(f64::INFINITY, f64::min);
    assert_relative_eq!(result.doc, min);
}

#[test]
fn symmetric_quadcopter_has_equal_per_rotor_margins() {
    let result = degree_of_controllability(&quad_input()).unwrap();
    for &margin in &result.per_rotor[1..] {
        assert_relative_eq!(
            margin,
            result.per_rotor[0],
            epsilon = 1e-9,
            max_relative = 1e-9
        );
    }
}

#[test]
fn coaxial_failure_vectors_cover_every_rotor() {
    // Coaxial layouts report one margin per individual rotor, not per arm.
    let mut input = quad_input();
    input.rotors = 8;
    input.coaxial = true;
    input.uav_mass = 3.0;
    let result = degree_of_controllability(&input).unwrap();
    assert_eq!(result.per_rotor.len(), 8);

    input.rotors = 12;
    input.uav_mass = 4.0;
    let result = degree_of_controllability(&input).unwrap();
    assert_eq!(result.per_rotor.len(), 12);
}

#[test]
fn unsupported_layout_is_a_configuration_error() {
    let mut input = quad_input();
    input.rotors = 10;
    input.coaxial = false;
    match degree_of_controllability(&input) {
        Err(Error::UnsupportedConfiguration { rotors, coaxial }) => {
            assert_eq!(rotors, 10);
            assert!(!coaxial);
        }
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn nonpositive_parameters_are_rejected_at_entry() {
    for mutate in [
        (|i: &mut DocInput| i.max_thrust = -6.0) as fn(&mut DocInput),
        |i| i.arm_length = 0.0,
        |i| i.uav_mass = -2.0,
        |i| i.horizon = 0.0,
        |i| i.steps = 0,
    ] {
        let mut input = quad_input();
        mutate(&mut input);
        assert!(matches!(
            degree_of_controllability(&input),
            Err(Error::InvalidParameter { .. })
        ));
    }
}

#[test]
fn more_thrust_never_lowers_the_margin() {
    let result_low = degree_of_controllability(&quad_input()).unwrap();
    let mut boosted = quad_input();
    boosted.max_thrust = 9.0;
    let result_high = degree_of_controllability(&boosted).unwrap();
    assert!(result_high.doc >= result_low.doc - 1e-12);
}

#[test]
fn reruns_are_deterministic() {
    let first = degree_of_controllability(&quad_input()).unwrap();
    let second = degree_of_controllability(&quad_input()).unwrap();
    assert_eq!(first.doc.to_bits(), second.doc.to_bits());
    for (a, b) in first.per_rotor.iter().zip(&second.per_rotor) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn hexacopter_runs_with_default_masses() {
    let mut input = quad_input();
    input.rotors = 6;
    let result = degree_of_controllability(&input).unwrap();
    assert_eq!(result.per_rotor.len(), 6);
    assert!(result.doc.is_finite());
}
