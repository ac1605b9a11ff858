//! Single-sample percolation configuration generation.
//!
//! A sample is one random occupancy draw over the lattice together with the
//! connected-cluster analysis of that draw: every site is occupied
//! independently with probability `p`, bonds are harvested between occupied
//! nearest neighbours, and a per-sample [`UnionFind`] resolves the clusters.
//! Only the three positive-direction neighbours of each site are checked so
//! every occupied-occupied bond is registered exactly once.
//!
//! The union-find works over *compressed* indices covering only occupied
//! sites, bounding its cost to the population count rather than the full
//! lattice volume.

use rand::{Rng, distributions::Standard};
use tracing::trace;

use crate::{
    error::{PercolationError, Result},
    lattice::Lattice,
    union_find::UnionFind,
};

/// Label given to unoccupied sites in the full-lattice labelling.
pub const UNOCCUPIED: i64 = -1;

/// A fully analysed percolation sample.
///
/// Immutable once built. `labels` covers the whole lattice with
/// [`UNOCCUPIED`] at empty sites; occupied sites carry their cluster's
/// rank-by-size label (`0` = largest cluster).
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use percolate_core::{Configuration, Lattice};
///
/// let lattice = Lattice::new(NonZeroUsize::new(2).expect("non-zero"));
/// let config = Configuration::from_occupancy(lattice, vec![true; 8])
///     .expect("mask covers the lattice");
/// assert_eq!(config.sizes(), &[8]);
/// assert_eq!(config.order_parameter(), 1.0);
/// assert_eq!(config.susceptibility(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    lattice: Lattice,
    occupied: Vec<bool>,
    labels: Vec<i64>,
    sizes: Vec<usize>,
    s1: f64,
    chi: f64,
}

impl Configuration {
    /// Clusters a caller-supplied occupancy mask.
    ///
    /// This is the deterministic core shared by [`generate_configuration`]
    /// and by callers that thin a fixed random field at successive
    /// thresholds. A mask with zero occupied sites is the defined degenerate
    /// state: all labels [`UNOCCUPIED`], both observables zero, no sizes.
    ///
    /// # Errors
    /// Returns [`PercolationError::MaskLength`] when the mask does not have
    /// exactly one entry per lattice site.
    pub fn from_occupancy(lattice: Lattice, occupied: Vec<bool>) -> Result<Self> {
        let sites = lattice.sites();
        if occupied.len() != sites {
            return Err(PercolationError::MaskLength {
                got: occupied.len(),
                expected: sites,
            });
        }

        let occupied_sites: Vec<usize> = occupied
            .iter()
            .enumerate()
            .filter_map(|(site, &filled)| filled.then_some(site))
            .collect();
        if occupied_sites.is_empty() {
            return Ok(Self {
                lattice,
                occupied,
                labels: vec![UNOCCUPIED; sites],
                sizes: Vec::new(),
                s1: 0.0,
                chi: 0.0,
            });
        }

        // Dense index assignment follows lattice-id order; `usize::MAX`
        // marks unoccupied sites and is never dereferenced.
        let mut dense_of = vec![usize::MAX; sites];
        for (dense, &site) in occupied_sites.iter().enumerate() {
            dense_of[site] = dense;
        }

        let mut clusters = UnionFind::new(occupied_sites.len());
        for &site in &occupied_sites {
            for neighbour in lattice.positive_neighbours(site) {
                if occupied[neighbour] {
                    clusters.union(dense_of[site], dense_of[neighbour]);
                }
            }
        }

        let sizes = clusters.cluster_sizes();
        let dense_labels = clusters.cluster_labels();
        let mut labels = vec![UNOCCUPIED; sites];
        for (dense, &site) in occupied_sites.iter().enumerate() {
            labels[site] = dense_labels[dense] as i64;
        }

        let volume = sites as f64;
        let largest = sizes.first().copied().unwrap_or(0);
        let s1 = largest as f64 / volume;
        let chi = sizes
            .iter()
            .skip(1)
            .map(|&s| (s as f64) * (s as f64))
            .sum::<f64>()
            / volume;

        trace!(
            occupied = occupied_sites.len(),
            clusters = sizes.len(),
            largest,
            "clustered occupancy mask"
        );

        Ok(Self {
            lattice,
            occupied,
            labels,
            sizes,
            s1,
            chi,
        })
    }

    /// Returns the lattice geometry this sample was drawn on.
    #[must_use]
    pub const fn lattice(&self) -> Lattice {
        self.lattice
    }

    /// Returns the occupancy mask, one entry per lattice site.
    #[must_use]
    pub fn occupied(&self) -> &[bool] {
        &self.occupied
    }

    /// Returns the full-lattice cluster labelling ([`UNOCCUPIED`] at empty
    /// sites, rank-by-size labels elsewhere).
    #[must_use]
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Returns every cluster size, descending.
    #[must_use]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Returns the order parameter `S1`: the largest cluster's share of all
    /// `N = L³` sites.
    #[must_use]
    pub const fn order_parameter(&self) -> f64 {
        self.s1
    }

    /// Returns the susceptibility `χ`: the second moment of the cluster
    /// size distribution excluding the largest cluster, per site. Zero when
    /// at most one cluster exists.
    #[must_use]
    pub const fn susceptibility(&self) -> f64 {
        self.chi
    }
}

/// Draws one percolation sample: each site occupied independently with
/// probability `p`, clusters resolved via union-find.
///
/// The outcome is fully determined by the generator's stream; a caller
/// supplying a seeded generator gets bit-identical results for the same
/// seed, `L` and `p`. Exactly one uniform draw is consumed per site, in
/// lattice-id order.
///
/// # Errors
/// Returns [`PercolationError::InvalidProbability`] when `p` is outside
/// `[0, 1]` or non-finite. Probabilities are never clamped.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use rand::{SeedableRng, rngs::SmallRng};
/// use percolate_core::{Lattice, generate_configuration};
///
/// let lattice = Lattice::new(NonZeroUsize::new(8).expect("non-zero"));
/// let mut rng = SmallRng::seed_from_u64(7);
/// let config = generate_configuration(lattice, 0.3, &mut rng)
///     .expect("probability is valid");
/// assert_eq!(config.occupied().len(), 512);
/// ```
pub fn generate_configuration<R: Rng + ?Sized>(
    lattice: Lattice,
    p: f64,
    rng: &mut R,
) -> Result<Configuration> {
    if !(0.0..=1.0).contains(&p) {
        return Err(PercolationError::InvalidProbability { p });
    }

    let occupied: Vec<bool> = (0..lattice.sites())
        .map(|_| {
            let draw: f64 = rng.sample(Standard);
            draw < p
        })
        .collect();
    Configuration::from_occupancy(lattice, occupied)
}

#[cfg(test)]
mod tests;
