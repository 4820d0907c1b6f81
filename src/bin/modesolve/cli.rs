use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Args, Parser, Subcommand};

use trapmodes::Species;

#[derive(Parser)]
#[command(
    name = "modesolve",
    about = "Equilibrium positions and normal modes of trapped-ion crystals",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Solve a crystal and print its normal-mode report
    #[command(visible_alias = "s")]
    Solve(SolveArgs),

    /// Write the default settings file
    Init(InitArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Destination of the settings file
    #[arg(short, long, value_name = "FILE", default_value = "modesolve.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct SolveArgs {
    /// Settings file (TOML); built-in defaults if omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub trap: TrapOptions,

    #[command(flatten)]
    pub perturbation: PerturbationOptions,

    #[command(flatten)]
    pub solver: SolverOptions,
}

/// Output options for the solve command.
#[derive(Args)]
pub struct OutputOptions {
    /// Write the report to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Save the effective settings (after overrides) to FILE
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    /// Allow --save to overwrite an existing file
    #[arg(long, requires = "save")]
    pub force: bool,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Trap and crystal overrides.
#[derive(Args)]
#[command(next_help_heading = "Trap")]
pub struct TrapOptions {
    /// Ion list, e.g. "Ca40 * 2, Be9"
    #[arg(long, value_name = "LIST")]
    pub ions: Option<String>,

    /// Axial secular frequency (MHz)
    #[arg(long, value_name = "MHZ")]
    pub fx: Option<f64>,

    /// First radial secular frequency (MHz)
    #[arg(long, value_name = "MHZ")]
    pub fy: Option<f64>,

    /// Second radial secular frequency (MHz)
    #[arg(long, value_name = "MHZ")]
    pub fz: Option<f64>,

    /// Species the secular frequencies refer to
    #[arg(long, value_name = "SPECIES")]
    pub species: Option<Species>,

    /// Seed spacing between neighbouring ions (um)
    #[arg(long, value_name = "UM")]
    pub spacing: Option<f64>,
}

/// Perturbations added to the harmonic trap.
#[derive(Args)]
#[command(next_help_heading = "Perturbations")]
pub struct PerturbationOptions {
    /// Uniform electric field X,Y,Z (V/m); enables the field term
    #[arg(long, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub field: Option<FieldVector>,

    /// Cubic coefficient (1e12 V/m^3); enables the cubic term
    #[arg(long, value_name = "COEFF", allow_hyphen_values = true)]
    pub cubic: Option<f64>,

    /// Quartic coefficient (1e18 V/m^4); enables the quartic term
    #[arg(long, value_name = "COEFF", allow_hyphen_values = true)]
    pub quartic: Option<f64>,
}

/// Solver and report options.
#[derive(Args)]
#[command(next_help_heading = "Solver")]
pub struct SolverOptions {
    /// Maximum number of minimiser iterations
    #[arg(long = "max-iter", value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Significant digits in the report
    #[arg(long, value_name = "DIGITS")]
    pub precision: Option<usize>,

    /// Report title
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,
}

/// Three comma-separated field components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldVector(pub [f64; 3]);

impl FromStr for FieldVector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let &[x, y, z] = parts.as_slice() else {
            return Err(format!(
                "expected three comma-separated components, got {}",
                parts.len()
            ));
        };

        let parse = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| format!("invalid field component: {v}"))
        };
        Ok(Self([parse(x)?, parse(y)?, parse(z)?]))
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
