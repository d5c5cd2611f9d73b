//! Curve validation.

use crate::{ParamArgs, ValidateArgs};
use anyhow::{Result, bail};

/// Runs both curve checks; fails when either does.
pub fn run(args: ValidateArgs, params: &ParamArgs, verbose: bool) -> Result<()> {
    let curve = super::build_curve(params)?;

    let monotonic = curve.validate_monotonicity(args.samples, args.probes);
    let c1 = curve.c1_report(args.epsilon, args.threshold);

    println!("curve:          {}", curve.curve());
    println!("monotonic:      {}", if monotonic { "pass" } else { "FAIL" });
    println!(
        "c1 continuity:  {} (max gap {:.4} at x={:.4}, threshold {})",
        if c1.passed { "pass" } else { "FAIL" },
        c1.max_gap,
        c1.worst_x,
        args.threshold
    );
    if verbose {
        println!("samples:        {} + {} probes", args.samples, args.probes);
        println!("epsilon:        {}", args.epsilon);
    }

    if !(monotonic && c1.passed) {
        bail!("Curve validation failed");
    }
    Ok(())
}
