//! cph - HDR tone reproduction from the command line
//!
//! Thin front end over the curve engine, the fallback handler and the frame
//! processor. Parameters come from an optional JSON file plus flag overrides.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use cph_core::{ColorSpace, Curve};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cph")]
#[command(author, version, about = "HDR tone reproduction core")]
#[command(long_about = "
Tone curve evaluation, curve validation and single-pixel processing
in the BT.2020 PQ working domain.

Examples:
  cph map 0.1 0.18 0.5 0.9              # Tone map PQ code values
  cph map --nits 100 1000 4000          # Tone map absolute luminance
  cph curve --samples 33 --curve rlog   # Print a curve table
  cph validate --params grade.json      # Check monotonicity and slope
  cph pixel 0.05 0.02 0.01 --space p3   # Run one linear pixel through
  cph params --pivot 0.9                # Show corrected parameters
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output; repeat for more log detail (-vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Tone map luminance values
    #[command(visible_alias = "m")]
    Map(MapArgs),

    /// Print the tone curve as a table
    #[command(visible_alias = "c")]
    Curve(CurveArgs),

    /// Check curve monotonicity and slope continuity
    #[command(visible_alias = "v")]
    Validate(ValidateArgs),

    /// Process a single pixel through a 1x1 frame
    #[command(visible_alias = "p")]
    Pixel(PixelArgs),

    /// Print effective parameters as JSON
    Params(ParamsArgs),
}

/// Parameter source shared by every command.
#[derive(Args, Clone, Default)]
struct ParamArgs {
    /// JSON parameter file; missing fields take defaults
    #[arg(long = "params", global = true, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Curve family (ppr, rlog)
    #[arg(long, global = true)]
    curve: Option<Curve>,

    /// Pivot in PQ units
    #[arg(long, global = true)]
    pivot: Option<f32>,

    /// Field override as name=value, e.g. gamma_s=1.4 (repeatable)
    #[arg(long = "set", global = true, value_name = "FIELD=VALUE")]
    set: Vec<String>,

    /// Strict gamut handling for DCI deliverables
    #[arg(long, global = true)]
    dci: bool,

    /// Sequential pixel loops
    #[arg(long, global = true)]
    deterministic: bool,
}

#[derive(Args)]
struct MapArgs {
    /// Input values (PQ code values, or cd/m2 with --nits)
    #[arg(required = true, allow_negative_numbers = true)]
    values: Vec<f32>,

    /// Inputs are absolute luminance in cd/m2
    #[arg(long)]
    nits: bool,
}

#[derive(Args)]
struct CurveArgs {
    /// Number of evenly spaced samples over [0, 1]
    #[arg(short = 'n', long, default_value = "17")]
    samples: usize,

    /// Comma-separated output with a header row
    #[arg(long)]
    csv: bool,
}

#[derive(Args)]
struct ValidateArgs {
    /// Monotonicity sample count
    #[arg(long, default_value_t = cph_tone::DEFAULT_SAMPLE_COUNT)]
    samples: usize,

    /// Extra probe points near the critical point
    #[arg(long, default_value_t = cph_tone::DEFAULT_PROBE_POINTS)]
    probes: usize,

    /// Finite-difference step for the slope check
    #[arg(long, default_value_t = cph_tone::DEFAULT_C1_EPSILON)]
    epsilon: f32,

    /// Largest accepted slope jump
    #[arg(long, default_value_t = cph_tone::DEFAULT_C1_THRESHOLD)]
    threshold: f32,
}

#[derive(Args)]
struct PixelArgs {
    /// Red
    #[arg(allow_negative_numbers = true)]
    r: f32,
    /// Green
    #[arg(allow_negative_numbers = true)]
    g: f32,
    /// Blue
    #[arg(allow_negative_numbers = true)]
    b: f32,

    /// Color space of the input pixel
    #[arg(short, long, default_value = "p3-d65")]
    space: ColorSpace,
}

#[derive(Args)]
struct ParamsArgs {
    /// Print the parameters as given, before correction
    #[arg(long)]
    raw: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let verbose = cli.verbose > 0;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Map(args) => commands::map::run(args, &cli.params, verbose),
        Commands::Curve(args) => commands::curve::run(args, &cli.params, verbose),
        Commands::Validate(args) => commands::validate::run(args, &cli.params, verbose),
        Commands::Pixel(args) => commands::pixel::run(args, &cli.params, verbose),
        Commands::Params(args) => commands::params::run(args, &cli.params, verbose),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_param_flags() {
        let cli = Cli::try_parse_from(["cph", "curve", "--curve", "rlog", "--set", "rlog_a=5", "--dci"]).unwrap();
        assert_eq!(cli.params.curve, Some(Curve::Rlog));
        assert_eq!(cli.params.set, vec!["rlog_a=5".to_string()]);
        assert!(cli.params.dci);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::try_parse_from(["cph", "-vv", "params"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_pixel_space() {
        let cli = Cli::try_parse_from(["cph", "pixel", "0.1", "-0.01", "0.0", "--space", "acescg"]).unwrap();
        let Commands::Pixel(args) = cli.command else {
            panic!("expected pixel");
        };
        assert_eq!(args.space, ColorSpace::AcesCg);
        assert_eq!(args.g, -0.01);
        assert!(Cli::try_parse_from(["cph", "pixel", "0", "0", "0", "--space", "xyz"]).is_err());
    }
}
