//! Percolate core library.
//!
//! Monte Carlo engine for 3D site percolation on a cubic lattice. Each site
//! of an L×L×L lattice is occupied independently with probability `p`;
//! nearest-neighbour adjacency among occupied sites defines clusters. The
//! crate computes the percolation order parameter (relative size of the
//! largest cluster) and the susceptibility (second moment of the cluster
//! size distribution excluding the largest cluster), and sweeps both across
//! lattice sizes to produce finite-size-scaling data collapses.
//!
//! All randomness flows through explicit seeds: every sample owns its own
//! generator derived from a caller-supplied base seed, so results are
//! reproducible bit-for-bit and samples may be evaluated in parallel.

mod error;
mod lattice;
mod observables;
mod sample;
mod sweep;
mod union_find;

pub use crate::{
    error::{PercolationError, PercolationErrorCode, Result},
    lattice::Lattice,
    observables::{ObservableSummary, estimate_observables},
    sample::{Configuration, UNOCCUPIED, generate_configuration},
    sweep::{
        CriticalExponents, ScalingChecks, ScalingPoint, SweepBuilder, SweepConfig, SweepCurve,
        run_scaling_sweep,
    },
    union_find::UnionFind,
};
