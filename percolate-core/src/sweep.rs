//! Finite-size-scaling sweep driver.
//!
//! Sweeps the occupation probability across several lattice sizes, collects
//! observable curves via the Monte Carlo estimator, and rescales each point
//! into the scale-invariant coordinates used for data collapse:
//!
//! - abscissa `x = (p − p_c) · N^(1/ν̄)`
//! - order parameter ordinate `y = S1 · N^(β/ν̄)`
//! - susceptibility ordinate `y = χ · N^(−γ/ν̄)`
//!
//! with `N = L³` and `ν̄ = 3ν` (three dimensions). The critical exponents
//! are fixed literature constants, never fitted; [`ScalingChecks`] reports
//! how well they satisfy the Rushbrooke and hyperscaling relations, purely
//! as a diagnostic.

use std::num::NonZeroUsize;

use tracing::{info, instrument};

use crate::{
    error::{PercolationError, Result},
    lattice::Lattice,
    observables::{estimate_observables, mix_sample_seed},
};

/// Spatial dimension of the lattice.
const DIMENSION: f64 = 3.0;

/// Literature critical exponents and critical probability for a percolation
/// universality class.
///
/// # Examples
/// ```
/// use percolate_core::CriticalExponents;
///
/// let exponents = CriticalExponents::SITE_3D;
/// assert_eq!(exponents.p_c, 0.3116);
/// assert!((exponents.nu_bar() - 2.64).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalExponents {
    /// Critical occupation probability.
    pub p_c: f64,
    /// Specific-heat exponent α (enters only the scaling-law diagnostics).
    pub alpha: f64,
    /// Order-parameter exponent β.
    pub beta: f64,
    /// Susceptibility exponent γ.
    pub gamma: f64,
    /// Correlation-length exponent ν.
    pub nu: f64,
}

impl CriticalExponents {
    /// Literature values for 3D site percolation on the cubic lattice.
    pub const SITE_3D: Self = Self {
        p_c: 0.3116,
        alpha: -0.62,
        beta: 0.41,
        gamma: 1.80,
        nu: 0.88,
    };

    /// Returns the volume-rescaled correlation exponent `ν̄ = d·ν`.
    #[must_use]
    pub fn nu_bar(&self) -> f64 {
        DIMENSION * self.nu
    }

    /// Computes the scaling-law diagnostics for this exponent set.
    #[must_use]
    pub fn checks(&self) -> ScalingChecks {
        ScalingChecks {
            rushbrooke: self.alpha + 2.0 * self.beta + self.gamma,
            hyperscaling_d_nu: DIMENSION * self.nu,
            hyperscaling_two_minus_alpha: 2.0 - self.alpha,
        }
    }
}

/// Diagnostic comparison of the exponents against the scaling laws.
///
/// Informational only; nothing gates on these values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingChecks {
    /// `α + 2β + γ`; the Rushbrooke law predicts exactly 2.
    pub rushbrooke: f64,
    /// Left side of the hyperscaling relation, `d·ν`.
    pub hyperscaling_d_nu: f64,
    /// Right side of the hyperscaling relation, `2 − α`.
    pub hyperscaling_two_minus_alpha: f64,
}

impl ScalingChecks {
    /// Theoretical value of the Rushbrooke combination.
    pub const RUSHBROOKE_EXPECTED: f64 = 2.0;

    /// Returns the deviation of `α + 2β + γ` from its theoretical value.
    #[must_use]
    pub fn rushbrooke_residual(&self) -> f64 {
        self.rushbrooke - Self::RUSHBROOKE_EXPECTED
    }
}

/// One sweep cell: raw observables at `(L, p)` plus their rescaled
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingPoint {
    /// Occupation probability of this cell.
    pub p: f64,
    /// Mean order parameter.
    pub s1_mean: f64,
    /// Mean susceptibility.
    pub chi_mean: f64,
    /// Standard error of the order parameter.
    pub s1_stderr: f64,
    /// Standard error of the susceptibility.
    pub chi_stderr: f64,
    /// Rescaled abscissa for the order-parameter collapse.
    pub s1_scaled_x: f64,
    /// Rescaled order-parameter ordinate.
    pub s1_scaled_y: f64,
    /// Rescaled abscissa for the susceptibility collapse.
    pub chi_scaled_x: f64,
    /// Rescaled susceptibility ordinate.
    pub chi_scaled_y: f64,
}

/// Observable curve for one lattice size, in the caller's `p` order.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepCurve {
    /// Linear lattice size the curve was measured on.
    pub l: NonZeroUsize,
    /// One point per swept probability, order preserved.
    pub points: Vec<ScalingPoint>,
}

/// Validated configuration for [`run_scaling_sweep`].
///
/// Construct via [`SweepBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    p_values: Vec<f64>,
    l_values: Vec<NonZeroUsize>,
    n_samples: NonZeroUsize,
    exponents: CriticalExponents,
    base_seed: u64,
}

impl SweepConfig {
    /// Returns the swept probabilities, in sweep order.
    #[must_use]
    pub fn p_values(&self) -> &[f64] {
        &self.p_values
    }

    /// Returns the swept lattice sizes, in sweep order.
    #[must_use]
    pub fn l_values(&self) -> &[NonZeroUsize] {
        &self.l_values
    }

    /// Returns the per-cell sample count.
    #[must_use]
    pub const fn n_samples(&self) -> NonZeroUsize {
        self.n_samples
    }

    /// Returns the exponent set used for rescaling.
    #[must_use]
    pub const fn exponents(&self) -> CriticalExponents {
        self.exponents
    }

    /// Returns the base seed every cell derives its streams from.
    #[must_use]
    pub const fn base_seed(&self) -> u64 {
        self.base_seed
    }
}

/// Configures and validates a [`SweepConfig`].
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use percolate_core::{CriticalExponents, SweepBuilder};
///
/// let config = SweepBuilder::new()
///     .with_p_values(vec![0.25, 0.30, 0.35])
///     .with_l_values(vec![NonZeroUsize::new(4).expect("non-zero")])
///     .with_n_samples(10)
///     .with_exponents(CriticalExponents::SITE_3D)
///     .with_base_seed(42)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(config.p_values().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SweepBuilder {
    p_values: Vec<f64>,
    l_values: Vec<NonZeroUsize>,
    n_samples: usize,
    exponents: CriticalExponents,
    base_seed: u64,
}

impl Default for SweepBuilder {
    fn default() -> Self {
        Self {
            p_values: Vec::new(),
            l_values: Vec::new(),
            n_samples: 50,
            exponents: CriticalExponents::SITE_3D,
            base_seed: 0,
        }
    }
}

impl SweepBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ordered probability grid.
    #[must_use]
    pub fn with_p_values(mut self, p_values: Vec<f64>) -> Self {
        self.p_values = p_values;
        self
    }

    /// Sets the lattice sizes to sweep.
    #[must_use]
    pub fn with_l_values(mut self, l_values: Vec<NonZeroUsize>) -> Self {
        self.l_values = l_values;
        self
    }

    /// Overrides the per-cell sample count.
    #[must_use]
    pub fn with_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Overrides the critical exponents used for rescaling.
    #[must_use]
    pub fn with_exponents(mut self, exponents: CriticalExponents) -> Self {
        self.exponents = exponents;
        self
    }

    /// Overrides the base seed.
    #[must_use]
    pub fn with_base_seed(mut self, base_seed: u64) -> Self {
        self.base_seed = base_seed;
        self
    }

    /// Validates the configuration and constructs a [`SweepConfig`].
    ///
    /// Parameters are rejected at entry so a running sweep can no longer hit
    /// an invalid cell; probabilities are never clamped.
    ///
    /// # Errors
    /// Returns [`PercolationError::EmptySweep`] when either axis is empty,
    /// [`PercolationError::InvalidProbability`] when any `p` falls outside
    /// `[0, 1]`, and [`PercolationError::InvalidSampleCount`] when
    /// `n_samples` is zero.
    pub fn build(self) -> Result<SweepConfig> {
        if self.p_values.is_empty() {
            return Err(PercolationError::EmptySweep { axis: "p" });
        }
        if self.l_values.is_empty() {
            return Err(PercolationError::EmptySweep { axis: "L" });
        }
        if let Some(&p) = self.p_values.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(PercolationError::InvalidProbability { p });
        }
        let n_samples = NonZeroUsize::new(self.n_samples)
            .ok_or(PercolationError::InvalidSampleCount { got: self.n_samples })?;

        Ok(SweepConfig {
            p_values: self.p_values,
            l_values: self.l_values,
            n_samples,
            exponents: self.exponents,
            base_seed: self.base_seed,
        })
    }
}

/// Runs the full finite-size-scaling sweep.
///
/// For every lattice size, every probability is estimated in the caller's
/// order and rescaled into collapse coordinates. Each cell derives an
/// independent seed from the base seed and its position, so curves are
/// reproducible and cells share no generator state. Curves are published
/// whole: an error surfaces before any partial curve escapes.
///
/// # Errors
/// Propagates any estimator failure for the offending cell.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use percolate_core::{SweepBuilder, run_scaling_sweep};
///
/// let config = SweepBuilder::new()
///     .with_p_values(vec![0.2, 0.4])
///     .with_l_values(vec![NonZeroUsize::new(3).expect("non-zero")])
///     .with_n_samples(4)
///     .build()
///     .expect("configuration is valid");
/// let curves = run_scaling_sweep(&config).expect("sweep must succeed");
/// assert_eq!(curves.len(), 1);
/// assert_eq!(curves[0].points.len(), 2);
/// ```
#[instrument(
    name = "sweep.run",
    err,
    skip(config),
    fields(
        l_count = config.l_values.len(),
        p_count = config.p_values.len(),
        n_samples = config.n_samples.get(),
    ),
)]
pub fn run_scaling_sweep(config: &SweepConfig) -> Result<Vec<SweepCurve>> {
    let exponents = config.exponents;
    let nu_bar = exponents.nu_bar();
    let mut curves = Vec::with_capacity(config.l_values.len());

    for (l_index, &l) in config.l_values.iter().enumerate() {
        let lattice = Lattice::new(l);
        let volume = lattice.sites() as f64;
        let mut points = Vec::with_capacity(config.p_values.len());

        for (p_index, &p) in config.p_values.iter().enumerate() {
            let cell = (l_index * config.p_values.len() + p_index) as u64;
            let cell_seed = mix_sample_seed(config.base_seed, cell);
            let summary = estimate_observables(lattice, p, config.n_samples, cell_seed)?;

            let scaled_x = (p - exponents.p_c) * volume.powf(1.0 / nu_bar);
            points.push(ScalingPoint {
                p,
                s1_mean: summary.s1_mean,
                chi_mean: summary.chi_mean,
                s1_stderr: summary.s1_stderr,
                chi_stderr: summary.chi_stderr,
                s1_scaled_x: scaled_x,
                s1_scaled_y: summary.s1_mean * volume.powf(exponents.beta / nu_bar),
                chi_scaled_x: scaled_x,
                chi_scaled_y: summary.chi_mean * volume.powf(-exponents.gamma / nu_bar),
            });
        }

        info!(l = l.get(), points = points.len(), "lattice size swept");
        curves.push(SweepCurve { l, points });
    }

    Ok(curves)
}

#[cfg(test)]
mod tests;
