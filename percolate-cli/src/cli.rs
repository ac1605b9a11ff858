//! Command implementations and argument parsing for the percolate CLI.
//!
//! Two commands wrap the core engine: `sweep` runs the full finite-size
//! scaling analysis and prints one CSV row per `(L, p)` cell, and `sample`
//! draws a single configuration and prints its cluster summary. Constants
//! default to the 3D site-percolation literature values.

use std::io::{self, Write};
use std::num::NonZeroUsize;

use clap::{Args, Parser, Subcommand};
use percolate_core::{
    CriticalExponents, Lattice, PercolationError, ScalingChecks, SweepBuilder, SweepCurve,
    UNOCCUPIED, generate_configuration, run_scaling_sweep,
};
use rand::{SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_SIZES: [usize; 4] = [8, 12, 16, 20];

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "percolate", about = "3D site-percolation Monte Carlo engine.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the finite-size-scaling sweep and emit CSV data-collapse tables.
    Sweep(SweepArgs),
    /// Draw and summarise a single percolation configuration.
    Sample(SampleArgs),
}

/// Options accepted by the `sweep` command.
#[derive(Debug, Args, Clone)]
pub struct SweepArgs {
    /// Lowest occupation probability in the grid.
    #[arg(long, default_value_t = 0.20)]
    pub p_min: f64,

    /// Highest occupation probability in the grid.
    #[arg(long, default_value_t = 0.42)]
    pub p_max: f64,

    /// Number of evenly spaced probabilities between `p_min` and `p_max`.
    #[arg(long, default_value_t = 25)]
    pub p_steps: usize,

    /// Lattice sizes to sweep, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SIZES)]
    pub sizes: Vec<usize>,

    /// Monte Carlo samples per `(L, p)` cell.
    #[arg(long, default_value_t = 50)]
    pub samples: usize,

    /// Base seed; every cell and sample derives its own stream from it.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Critical probability used for rescaling.
    #[arg(long, default_value_t = CriticalExponents::SITE_3D.p_c)]
    pub p_c: f64,

    /// Specific-heat exponent α (diagnostics only).
    #[arg(long, default_value_t = CriticalExponents::SITE_3D.alpha, allow_hyphen_values = true)]
    pub alpha: f64,

    /// Order-parameter exponent β.
    #[arg(long, default_value_t = CriticalExponents::SITE_3D.beta)]
    pub beta: f64,

    /// Susceptibility exponent γ.
    #[arg(long, default_value_t = CriticalExponents::SITE_3D.gamma)]
    pub gamma: f64,

    /// Correlation-length exponent ν.
    #[arg(long, default_value_t = CriticalExponents::SITE_3D.nu)]
    pub nu: f64,
}

/// Options accepted by the `sample` command.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Linear lattice size.
    #[arg(long, default_value_t = 15)]
    pub size: usize,

    /// Occupation probability.
    #[arg(long, default_value_t = CriticalExponents::SITE_3D.p_c)]
    pub p: f64,

    /// Seed for the configuration draw.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A probability grid could not be constructed from the arguments.
    #[error("invalid probability grid: {reason} (p_min={p_min}, p_max={p_max}, steps={steps})")]
    Grid {
        /// Human-readable description of the violated constraint.
        reason: &'static str,
        /// Lower grid bound supplied by the user.
        p_min: f64,
        /// Upper grid bound supplied by the user.
        p_max: f64,
        /// Requested step count.
        steps: usize,
    },
    /// A lattice size of zero was supplied.
    #[error("lattice sizes must be at least 1")]
    ZeroSize,
    /// The core engine rejected the configuration or failed mid-run.
    #[error(transparent)]
    Core(#[from] PercolationError),
}

/// Outcome of executing a CLI command, ready for rendering.
#[derive(Debug, Clone)]
pub enum Report {
    /// Data-collapse tables plus exponent diagnostics.
    Sweep(SweepReport),
    /// Summary of a single drawn configuration.
    Sample(SampleReport),
}

/// Sweep outcome: one curve per lattice size plus scaling-law diagnostics.
#[derive(Debug, Clone)]
pub struct SweepReport {
    /// Scaling-law diagnostics for the exponents in use.
    pub checks: ScalingChecks,
    /// Per-size observable curves with rescaled coordinates.
    pub curves: Vec<SweepCurve>,
}

/// Single-configuration outcome.
#[derive(Debug, Clone)]
pub struct SampleReport {
    /// Linear lattice size.
    pub size: usize,
    /// Occupation probability.
    pub p: f64,
    /// Number of occupied sites.
    pub occupied: usize,
    /// Number of clusters.
    pub clusters: usize,
    /// Order parameter of the draw.
    pub s1: f64,
    /// Susceptibility of the draw.
    pub chi: f64,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when argument validation or execution fails.
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<Report, CliError> {
    match cli.command {
        Command::Sweep(args) => {
            Span::current().record("command", field::display("sweep"));
            run_sweep(&args).map(Report::Sweep)
        }
        Command::Sample(args) => {
            Span::current().record("command", field::display("sample"));
            run_sample(&args).map(Report::Sample)
        }
    }
}

fn non_zero_sizes(sizes: &[usize]) -> Result<Vec<NonZeroUsize>, CliError> {
    sizes
        .iter()
        .map(|&l| NonZeroUsize::new(l).ok_or(CliError::ZeroSize))
        .collect()
}

/// Builds the inclusive, evenly spaced probability grid.
fn probability_grid(p_min: f64, p_max: f64, steps: usize) -> Result<Vec<f64>, CliError> {
    let grid_error = |reason| CliError::Grid {
        reason,
        p_min,
        p_max,
        steps,
    };
    if steps == 0 {
        return Err(grid_error("at least one step is required"));
    }
    if !p_min.is_finite() || !p_max.is_finite() || p_min > p_max {
        return Err(grid_error("bounds must be finite with p_min <= p_max"));
    }
    if steps == 1 {
        return Ok(vec![p_min]);
    }
    let span = p_max - p_min;
    let last = (steps - 1) as f64;
    Ok((0..steps)
        .map(|i| p_min + span * (i as f64) / last)
        .collect())
}

#[instrument(
    name = "cli.sweep",
    err,
    skip(args),
    fields(sizes = args.sizes.len(), p_steps = args.p_steps, samples = args.samples),
)]
fn run_sweep(args: &SweepArgs) -> Result<SweepReport, CliError> {
    let exponents = CriticalExponents {
        p_c: args.p_c,
        alpha: args.alpha,
        beta: args.beta,
        gamma: args.gamma,
        nu: args.nu,
    };
    let config = SweepBuilder::new()
        .with_p_values(probability_grid(args.p_min, args.p_max, args.p_steps)?)
        .with_l_values(non_zero_sizes(&args.sizes)?)
        .with_n_samples(args.samples)
        .with_exponents(exponents)
        .with_base_seed(args.seed)
        .build()?;

    let checks = exponents.checks();
    info!(
        rushbrooke = checks.rushbrooke,
        rushbrooke_expected = ScalingChecks::RUSHBROOKE_EXPECTED,
        d_nu = checks.hyperscaling_d_nu,
        two_minus_alpha = checks.hyperscaling_two_minus_alpha,
        "scaling-law diagnostics"
    );

    let curves = run_scaling_sweep(&config)?;
    Ok(SweepReport { checks, curves })
}

#[instrument(
    name = "cli.sample",
    err,
    skip(args),
    fields(size = args.size, p = args.p, seed = args.seed),
)]
fn run_sample(args: &SampleArgs) -> Result<SampleReport, CliError> {
    let size = NonZeroUsize::new(args.size).ok_or(CliError::ZeroSize)?;
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let config = generate_configuration(Lattice::new(size), args.p, &mut rng)?;

    let occupied = config.occupied().iter().filter(|&&o| o).count();
    let report = SampleReport {
        size: args.size,
        p: args.p,
        occupied,
        clusters: config.sizes().len(),
        s1: config.order_parameter(),
        chi: config.susceptibility(),
    };
    debug_assert_eq!(
        config.labels().iter().filter(|&&l| l != UNOCCUPIED).count(),
        occupied,
    );
    info!(
        occupied,
        clusters = report.clusters,
        s1 = report.s1,
        chi = report.chi,
        "configuration drawn"
    );
    Ok(report)
}

/// Renders a report to the given writer: CSV for sweeps, key-value lines
/// for single samples.
///
/// # Errors
/// Returns any I/O error raised by the writer.
pub fn render_report<W: Write>(report: &Report, writer: &mut W) -> io::Result<()> {
    match report {
        Report::Sweep(sweep) => render_sweep(sweep, writer),
        Report::Sample(sample) => render_sample(sample, writer),
    }
}

fn render_sweep<W: Write>(report: &SweepReport, writer: &mut W) -> io::Result<()> {
    writeln!(
        writer,
        "l,p,s1_mean,chi_mean,s1_stderr,chi_stderr,s1_scaled_x,s1_scaled_y,chi_scaled_x,chi_scaled_y"
    )?;
    for curve in &report.curves {
        for pt in &curve.points {
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{},{}",
                curve.l,
                pt.p,
                pt.s1_mean,
                pt.chi_mean,
                pt.s1_stderr,
                pt.chi_stderr,
                pt.s1_scaled_x,
                pt.s1_scaled_y,
                pt.chi_scaled_x,
                pt.chi_scaled_y,
            )?;
        }
    }
    Ok(())
}

fn render_sample<W: Write>(report: &SampleReport, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "size: {}", report.size)?;
    writeln!(writer, "p: {}", report.p)?;
    writeln!(writer, "occupied: {}", report.occupied)?;
    writeln!(writer, "clusters: {}", report.clusters)?;
    writeln!(writer, "s1: {}", report.s1)?;
    writeln!(writer, "chi: {}", report.chi)?;
    Ok(())
}
