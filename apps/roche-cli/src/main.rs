use clap::{Args, Parser, Subcommand};
use config::{CliConfig, CliResult, load_directions};
use roche_core::{BinaryParameters, ConvergenceConfig, Real};
use roche_solver::{
    BatchRadiusSolver, Direction, Execution, RadiusSolver, RocheField, SaddlePointSolver,
    directions_from_cosines,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser)]
#[command(name = "roche-cli")]
#[command(about = "Roche-lobe radius and L1 solver for close binaries", long_about = None)]
struct Cli {
    /// YAML file overriding the convergence settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BinaryArgs {
    /// Mass ratio (companion / primary)
    #[arg(long)]
    q: Real,
    /// Rotation rate in units of the orbital frequency
    #[arg(long, default_value_t = 1.0)]
    omega: Real,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct TargetArgs {
    /// Target potential
    #[arg(long, allow_negative_numbers = true)]
    psi0: Option<Real>,
    /// Target potential as a multiple of the L1 potential
    #[arg(long)]
    fill_l1: Option<Real>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the potential and its gradient at a point
    Potential {
        #[command(flatten)]
        binary: BinaryArgs,
        #[arg(allow_negative_numbers = true)]
        x: Real,
        #[arg(allow_negative_numbers = true)]
        y: Real,
        #[arg(allow_negative_numbers = true)]
        z: Real,
    },
    /// Locate the inner Lagrange point
    Saddle {
        #[command(flatten)]
        binary: BinaryArgs,
        /// Initial guess on the line of centres
        #[arg(long, default_value_t = 0.5)]
        x0: Real,
    },
    /// Solve for the radius along one direction
    Radius {
        #[command(flatten)]
        binary: BinaryArgs,
        #[command(flatten)]
        target: TargetArgs,
        /// Initial radius
        #[arg(long, default_value_t = 0.14)]
        r0: Real,
        #[arg(allow_negative_numbers = true)]
        cosx: Real,
        #[arg(allow_negative_numbers = true)]
        cosy: Real,
        #[arg(allow_negative_numbers = true)]
        cosz: Real,
    },
    /// Solve for radii along every direction listed in a YAML file
    Radii {
        #[command(flatten)]
        binary: BinaryArgs,
        #[command(flatten)]
        target: TargetArgs,
        /// Initial radius shared by all directions
        #[arg(long, default_value_t = 0.14)]
        r0: Real,
        /// YAML list of [cosx, cosy, cosz] triples
        #[arg(long)]
        directions: PathBuf,
        /// Solve on the calling thread only
        #[arg(long)]
        sequential: bool,
        /// Worker threads (overrides the config file)
        #[arg(long)]
        threads: Option<usize>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Potential { binary, x, y, z } => cmd_potential(&binary, x, y, z),
        Commands::Saddle { binary, x0 } => cmd_saddle(&binary, x0, &config.convergence),
        Commands::Radius {
            binary,
            target,
            r0,
            cosx,
            cosy,
            cosz,
        } => cmd_radius(&binary, &target, r0, [cosx, cosy, cosz], &config.convergence),
        Commands::Radii {
            binary,
            target,
            r0,
            directions,
            sequential,
            threads,
        } => {
            let execution = if sequential {
                Execution::Sequential
            } else {
                match threads.or(config.threads) {
                    Some(n) => Execution::ParallelWith(n),
                    None => Execution::Parallel,
                }
            };
            cmd_radii(&binary, &target, r0, &directions, execution, &config.convergence)
        }
    }
}

fn field(binary: &BinaryArgs) -> CliResult<RocheField> {
    Ok(RocheField::from(BinaryParameters::new(binary.q, binary.omega)?))
}

/// Explicit target, or a multiple of the L1 potential.
fn resolve_target(
    field: RocheField,
    target: &TargetArgs,
    cfg: &ConvergenceConfig,
) -> CliResult<Real> {
    if let Some(psi0) = target.psi0 {
        return Ok(psi0);
    }
    let factor = target.fill_l1.unwrap_or(1.0);
    let l1 = SaddlePointSolver::new(field, *cfg)?.solve(0.5)?;
    let psi0 = factor * l1.psi;
    info!(l1_x = l1.x, l1_psi = l1.psi, factor, psi0, "target from L1 potential");
    Ok(psi0)
}

fn cmd_potential(binary: &BinaryArgs, x: Real, y: Real, z: Real) -> CliResult<()> {
    let s = field(binary)?.evaluate(x, y, z);
    println!("rc     = {}", s.rc);
    println!("rx     = {}", s.rx);
    println!("psi    = {}", s.psi);
    println!("dpsi   = {}", s.dpsi);
    println!("dpsidx = {}", s.dpsidx);
    println!("dpsidy = {}", s.dpsidy);
    println!("dpsidz = {}", s.dpsidz);
    Ok(())
}

fn cmd_saddle(binary: &BinaryArgs, x0: Real, cfg: &ConvergenceConfig) -> CliResult<()> {
    let l1 = SaddlePointSolver::new(field(binary)?, *cfg)?.solve(x0)?;
    println!("x          = {}", l1.x);
    println!("psi        = {}", l1.psi);
    println!("iterations = {}", l1.iterations);
    Ok(())
}

fn cmd_radius(
    binary: &BinaryArgs,
    target: &TargetArgs,
    r0: Real,
    cosines: [Real; 3],
    cfg: &ConvergenceConfig,
) -> CliResult<()> {
    let field = field(binary)?;
    let psi0 = resolve_target(field, target, cfg)?;
    let direction = Direction::try_from(cosines)?;
    let solution = RadiusSolver::new(field, *cfg)?.solve(&direction, psi0, r0)?;
    println!("{}", solution.result.to_raw(cfg.sentinel));
    info!(iterations = solution.iterations, converged = solution.result.is_converged());
    Ok(())
}

fn cmd_radii(
    binary: &BinaryArgs,
    target: &TargetArgs,
    r0: Real,
    path: &Path,
    execution: Execution,
    cfg: &ConvergenceConfig,
) -> CliResult<()> {
    let field = field(binary)?;
    let psi0 = resolve_target(field, target, cfg)?;

    let triples = load_directions(path)?;
    let cosx: Vec<Real> = triples.iter().map(|c| c[0]).collect();
    let cosy: Vec<Real> = triples.iter().map(|c| c[1]).collect();
    let cosz: Vec<Real> = triples.iter().map(|c| c[2]).collect();
    let directions = directions_from_cosines(&cosx, &cosy, &cosz)?;

    let radii = BatchRadiusSolver::new(field, *cfg)?
        .with_execution(execution)
        .solve_raw(&directions, psi0, r0)?;
    for (i, r) in radii.iter().enumerate() {
        println!("{i}\t{r}");
    }
    Ok(())
}
