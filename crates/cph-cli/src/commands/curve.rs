//! Curve table output.

use crate::{CurveArgs, ParamArgs};
use anyhow::{Result, bail};
use cph_tone::ToneCurve;

/// Evenly spaced `(x, y)` pairs over [0, 1], endpoints included.
pub fn table(curve: &ToneCurve, samples: usize) -> Vec<(f32, f32)> {
    let last = (samples.max(2) - 1) as f32;
    (0..samples.max(2))
        .map(|i| {
            let x = i as f32 / last;
            (x, curve.map_luminance(x))
        })
        .collect()
}

/// Prints the curve table.
pub fn run(args: CurveArgs, params: &ParamArgs, verbose: bool) -> Result<()> {
    if args.samples < 2 {
        bail!("--samples must be at least 2");
    }
    let curve = super::build_curve(params)?;
    if verbose {
        println!("# {} critical point {:.4}", curve.curve(), curve.shape().critical_point());
    }

    if args.csv {
        println!("x,y");
    }
    for (x, y) in table(&curve, args.samples) {
        if args.csv {
            println!("{x:.6},{y:.6}");
        } else {
            println!("{x:.6}\t{y:.6}");
        }
    }
    Ok(())
}
