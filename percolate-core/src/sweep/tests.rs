//! Unit tests for the finite-size-scaling sweep driver.

use std::num::NonZeroUsize;

use rstest::rstest;

use crate::{
    CriticalExponents, PercolationError, ScalingChecks, SweepBuilder, run_scaling_sweep,
};

fn sizes(ls: &[usize]) -> Vec<NonZeroUsize> {
    ls.iter()
        .map(|&l| NonZeroUsize::new(l).expect("non-zero side"))
        .collect()
}

#[test]
fn build_rejects_empty_axes() {
    let err = SweepBuilder::new()
        .with_l_values(sizes(&[4]))
        .build()
        .expect_err("empty p axis must be rejected");
    assert_eq!(err, PercolationError::EmptySweep { axis: "p" });

    let err = SweepBuilder::new()
        .with_p_values(vec![0.3])
        .build()
        .expect_err("empty L axis must be rejected");
    assert_eq!(err, PercolationError::EmptySweep { axis: "L" });
}

#[rstest]
#[case(vec![0.1, 1.2], 1.2)]
#[case(vec![-0.4], -0.4)]
fn build_rejects_out_of_range_probabilities(#[case] p_values: Vec<f64>, #[case] offender: f64) {
    let err = SweepBuilder::new()
        .with_p_values(p_values)
        .with_l_values(sizes(&[4]))
        .build()
        .expect_err("probability must be rejected");
    assert_eq!(err, PercolationError::InvalidProbability { p: offender });
}

#[test]
fn build_rejects_zero_samples() {
    let err = SweepBuilder::new()
        .with_p_values(vec![0.3])
        .with_l_values(sizes(&[4]))
        .with_n_samples(0)
        .build()
        .expect_err("zero samples must be rejected");
    assert_eq!(err, PercolationError::InvalidSampleCount { got: 0 });
}

#[test]
fn sweep_preserves_axis_order_and_shape() {
    let p_values = vec![0.4, 0.2, 0.3];
    let config = SweepBuilder::new()
        .with_p_values(p_values.clone())
        .with_l_values(sizes(&[2, 3]))
        .with_n_samples(4)
        .with_base_seed(17)
        .build()
        .expect("configuration is valid");

    let curves = run_scaling_sweep(&config).expect("sweep must succeed");
    assert_eq!(curves.len(), 2);
    assert_eq!(curves[0].l.get(), 2);
    assert_eq!(curves[1].l.get(), 3);
    for curve in &curves {
        let swept: Vec<f64> = curve.points.iter().map(|pt| pt.p).collect();
        assert_eq!(swept, p_values);
    }
}

#[test]
fn sweeps_are_reproducible_for_a_fixed_seed() {
    let build = || {
        SweepBuilder::new()
            .with_p_values(vec![0.25, 0.35])
            .with_l_values(sizes(&[4]))
            .with_n_samples(8)
            .with_base_seed(23)
            .build()
            .expect("configuration is valid")
    };
    let first = run_scaling_sweep(&build()).expect("sweep must succeed");
    let second = run_scaling_sweep(&build()).expect("sweep must succeed");
    assert_eq!(first, second);
}

#[test]
fn rescaling_matches_the_collapse_transform() {
    let exponents = CriticalExponents::SITE_3D;
    let config = SweepBuilder::new()
        .with_p_values(vec![1.0])
        .with_l_values(sizes(&[4]))
        .with_n_samples(2)
        .build()
        .expect("configuration is valid");
    let curves = run_scaling_sweep(&config).expect("sweep must succeed");
    let point = &curves[0].points[0];

    let volume = 64.0_f64;
    let nu_bar = exponents.nu_bar();
    let expected_x = (1.0 - exponents.p_c) * volume.powf(1.0 / nu_bar);
    assert!((point.s1_scaled_x - expected_x).abs() < 1e-12);
    assert_eq!(point.s1_scaled_x, point.chi_scaled_x);
    // At p = 1 the sample is deterministic: S1 = 1, chi = 0.
    assert!((point.s1_scaled_y - volume.powf(exponents.beta / nu_bar)).abs() < 1e-12);
    assert_eq!(point.chi_scaled_y, 0.0);
}

#[test]
fn scaling_checks_report_the_literature_relations() {
    let checks = CriticalExponents::SITE_3D.checks();
    assert!((checks.rushbrooke - 2.0).abs() < 0.05);
    assert!((checks.rushbrooke_residual()).abs() < 0.05);
    assert!((checks.hyperscaling_d_nu - 2.64).abs() < 1e-12);
    assert!((checks.hyperscaling_two_minus_alpha - 2.62).abs() < 1e-12);
    assert_eq!(ScalingChecks::RUSHBROOKE_EXPECTED, 2.0);
}

#[test]
fn susceptibility_peaks_near_criticality_for_small_lattices() {
    // Coarse physics check: chi at the critical point should exceed chi
    // deep in either phase once a few samples are averaged.
    let config = SweepBuilder::new()
        .with_p_values(vec![0.05, 0.3116, 0.9])
        .with_l_values(sizes(&[8]))
        .with_n_samples(32)
        .with_base_seed(3)
        .build()
        .expect("configuration is valid");
    let curves = run_scaling_sweep(&config).expect("sweep must succeed");
    let chi: Vec<f64> = curves[0].points.iter().map(|pt| pt.chi_mean).collect();
    assert!(chi[1] > chi[0]);
    assert!(chi[1] > chi[2]);
}
