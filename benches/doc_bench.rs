//! Benchmarks for the controllability hot path: the exhaustive hyperplane
//! search dominates, and grows combinatorially with rotor and step count.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use uav_mdo::{DocInput, degree_of_controllability};

fn case(rotors: usize, coaxial: bool) -> DocInput {
    DocInput {
        rotors,
        coaxial,
        max_thrust: 6.0,
        arm_length: 0.28,
        uav_mass: 3.0,
        motor_mass: 0.03,
        propeller_mass: 0.015,
        horizon: 0.5,
        steps: 2,
    }
}

fn bench_doc(c: &mut Criterion) {
    let mut group = c.benchmark_group("degree_of_controllability");
    for (label, input) in [
        ("quad", case(4, false)),
        ("hexa", case(6, false)),
        ("octo", case(8, false)),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(label), &input, |b, input| {
            b.iter(|| degree_of_controllability(input).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_doc);
criterion_main!(benches);
