use criterion::{criterion_group, criterion_main, Criterion};

use mueller::mueller::{DecomposeSettings, FilterSettings, PolarOrder};
use mueller::MuellerMatrix;

// ---------------------------------------------------------------------------
// Helpers: a depolarizing sample and a non-physical perturbation of it
// ---------------------------------------------------------------------------

fn sample() -> MuellerMatrix {
    MuellerMatrix::depolarizer_from_factors([0.7, 0.6, 0.5], 1.0)
        * MuellerMatrix::retarder_carac_angles_from_vector(1.3, 0.6, 2.1)
        * MuellerMatrix::diattenuator_carac_angles_from_vector(0.95, 0.45, 0.35, 0.8)
}

fn non_physical() -> MuellerMatrix {
    let mut m = *sample().matrix();
    m[(0, 1)] += 0.4;
    m[(3, 3)] -= 0.5;
    MuellerMatrix::from_matrix(m)
}

// ---------------------------------------------------------------------------
// Covariance eigenvalues (Hermitian 4x4)
// ---------------------------------------------------------------------------

fn covariance_eigen(c: &mut Criterion) {
    let mut g = c.benchmark_group("covariance_eigen");
    let h = sample().covariance_matrix();

    g.bench_function("mueller", |b| {
        b.iter(|| std::hint::black_box(&h).eig_symmetric())
    });

    g.bench_function("nalgebra", |b| {
        let hn = nalgebra::Matrix4::from_fn(|r, c| nalgebra::Complex::new(h[(r, c)].re, h[(r, c)].im));
        b.iter(|| std::hint::black_box(hn).symmetric_eigen())
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Inverse 4x4
// ---------------------------------------------------------------------------

fn inverse_4x4(c: &mut Criterion) {
    let mut g = c.benchmark_group("inverse_4x4");
    let m = sample();

    g.bench_function("mueller", |b| {
        b.iter(|| std::hint::black_box(&m).inverse())
    });

    g.bench_function("nalgebra", |b| {
        let mn = nalgebra::Matrix4::from_fn(|r, c| m.matrix()[(r, c)]);
        b.iter(|| std::hint::black_box(mn).try_inverse())
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Realizability
// ---------------------------------------------------------------------------

fn physical_conditions(c: &mut Criterion) {
    let m = sample();
    c.bench_function("physical_conditions", |b| {
        b.iter(|| std::hint::black_box(&m).physical_conditions(1e-6))
    });
}

fn physical_filter(c: &mut Criterion) {
    let m = non_physical();
    let settings = FilterSettings::default();
    c.bench_function("physical_filter", |b| {
        b.iter(|| std::hint::black_box(&m).filter_physical_conditions(&settings))
    });
}

// ---------------------------------------------------------------------------
// Polar decomposition
// ---------------------------------------------------------------------------

fn polar_decomposition(c: &mut Criterion) {
    let mut g = c.benchmark_group("polar_decomposition");
    let m = sample();
    let settings = DecomposeSettings::default();

    for order in PolarOrder::ALL {
        g.bench_function(order.code(), |b| {
            b.iter(|| std::hint::black_box(&m).decompose_polar(order, &settings))
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    covariance_eigen,
    inverse_4x4,
    physical_conditions,
    physical_filter,
    polar_decomposition,
);
criterion_main!(benches);
