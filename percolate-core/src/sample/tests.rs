//! Unit tests for percolation sample generation and mask clustering.

use std::num::NonZeroUsize;

use rand::{SeedableRng, rngs::SmallRng};
use rstest::rstest;

use crate::{
    Configuration, Lattice, PercolationError, generate_configuration, sample::UNOCCUPIED,
};

fn lattice(l: usize) -> Lattice {
    Lattice::new(NonZeroUsize::new(l).expect("non-zero side"))
}

#[rstest]
#[case(-0.25)]
#[case(1.01)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn rejects_probabilities_outside_unit_interval(#[case] p: f64) {
    let mut rng = SmallRng::seed_from_u64(0);
    let err = generate_configuration(lattice(4), p, &mut rng)
        .expect_err("probability must be rejected");
    assert!(matches!(err, PercolationError::InvalidProbability { .. }));
}

#[test]
fn rejects_short_occupancy_mask() {
    let err = Configuration::from_occupancy(lattice(3), vec![true; 9])
        .expect_err("mask must cover the lattice");
    assert_eq!(
        err,
        PercolationError::MaskLength {
            got: 9,
            expected: 27,
        }
    );
}

#[test]
fn empty_lattice_is_the_defined_degenerate_state() {
    let config = generate_configuration(lattice(5), 0.0, &mut SmallRng::seed_from_u64(3))
        .expect("p = 0 is valid");
    assert!(config.occupied().iter().all(|&o| !o));
    assert!(config.labels().iter().all(|&l| l == UNOCCUPIED));
    assert!(config.sizes().is_empty());
    assert_eq!(config.order_parameter(), 0.0);
    assert_eq!(config.susceptibility(), 0.0);
}

#[test]
fn full_lattice_is_one_spanning_cluster() {
    let config = generate_configuration(lattice(4), 1.0, &mut SmallRng::seed_from_u64(3))
        .expect("p = 1 is valid");
    assert_eq!(config.sizes(), &[64]);
    assert_eq!(config.order_parameter(), 1.0);
    assert_eq!(config.susceptibility(), 0.0);
    assert!(config.labels().iter().all(|&l| l == 0));
}

#[test]
fn unit_cube_percolates_at_p_one() {
    let config = generate_configuration(lattice(2), 1.0, &mut SmallRng::seed_from_u64(11))
        .expect("p = 1 is valid");
    assert_eq!(config.sizes(), &[8]);
    assert_eq!(config.order_parameter(), 1.0);
    assert_eq!(config.susceptibility(), 0.0);
}

#[test]
fn two_isolated_corners_form_two_unit_clusters() {
    let lattice = lattice(3);
    let mut mask = vec![false; 27];
    mask[lattice.site_index(0, 0, 0)] = true;
    mask[lattice.site_index(2, 2, 2)] = true;
    let config = Configuration::from_occupancy(lattice, mask).expect("mask covers the lattice");

    assert_eq!(config.sizes(), &[1, 1]);
    assert!((config.order_parameter() - 1.0 / 27.0).abs() < 1e-12);
    assert!((config.susceptibility() - 1.0 / 27.0).abs() < 1e-12);

    let near = config.labels()[lattice.site_index(0, 0, 0)];
    let far = config.labels()[lattice.site_index(2, 2, 2)];
    assert_ne!(near, far);
    assert!(near == 0 || far == 0);
    let labelled = config.labels().iter().filter(|&&l| l != UNOCCUPIED).count();
    assert_eq!(labelled, 2);
}

#[test]
fn label_zero_tracks_the_largest_cluster() {
    let lattice = lattice(3);
    let mut mask = vec![false; 27];
    // A three-site rod along +z and a detached single site.
    mask[lattice.site_index(0, 0, 0)] = true;
    mask[lattice.site_index(0, 0, 1)] = true;
    mask[lattice.site_index(0, 0, 2)] = true;
    mask[lattice.site_index(2, 2, 0)] = true;
    let config = Configuration::from_occupancy(lattice, mask).expect("mask covers the lattice");

    assert_eq!(config.sizes(), &[3, 1]);
    assert_eq!(config.labels()[lattice.site_index(0, 0, 1)], 0);
    assert_eq!(config.labels()[lattice.site_index(2, 2, 0)], 1);
}

#[test]
fn identical_seeds_reproduce_bit_identical_samples() {
    let lattice = lattice(6);
    let first = generate_configuration(lattice, 0.31, &mut SmallRng::seed_from_u64(99))
        .expect("probability is valid");
    let second = generate_configuration(lattice, 0.31, &mut SmallRng::seed_from_u64(99))
        .expect("probability is valid");
    assert_eq!(first, second);
}

#[test]
fn cluster_sizes_account_for_every_occupied_site() {
    let lattice = lattice(8);
    let config = generate_configuration(lattice, 0.4, &mut SmallRng::seed_from_u64(5))
        .expect("probability is valid");
    let population = config.occupied().iter().filter(|&&o| o).count();
    assert_eq!(config.sizes().iter().sum::<usize>(), population);
    let labelled = config.labels().iter().filter(|&&l| l != UNOCCUPIED).count();
    assert_eq!(labelled, population);
}
