//! Tone map a list of luminance values.

use crate::{MapArgs, ParamArgs};
use anyhow::Result;
use cph_transfer::pq;

/// Prints `input -> output` per value.
///
/// With `--nits` the inputs are encoded to PQ first and the output is shown
/// in both PQ and cd/m2.
pub fn run(args: MapArgs, params: &ParamArgs, verbose: bool) -> Result<()> {
    let curve = super::build_curve(params)?;
    if verbose {
        println!("curve: {}", curve.curve());
    }

    for &v in &args.values {
        if args.nits {
            let x = pq::oetf(v);
            let y = curve.map_luminance(x);
            println!("{:>10.3} nits -> {:.6} ({:.3} nits)", v, y, pq::eotf(y));
        } else {
            println!("{:.6} -> {:.6}", v, curve.map_luminance(v));
        }
    }
    Ok(())
}
