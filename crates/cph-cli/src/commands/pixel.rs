//! Single-pixel processing.

use crate::{ParamArgs, PixelArgs};
use anyhow::{Context, Result};
use cph_core::Image;
use cph_pipeline::Processor;

/// Runs `r g b` through a 1x1 frame tagged with `--space`.
pub fn run(args: PixelArgs, params: &ParamArgs, verbose: bool) -> Result<()> {
    let (params, handler) = super::effective_params(params)?;
    let mut processor = Processor::new(params, handler).context("Failed to initialize processor")?;

    let frame = Image::from_vec(1, 1, 3, vec![args.r, args.g, args.b], args.space)
        .context("Invalid input pixel")?;
    let out = processor.process_frame(&frame).context("Processing failed")?;
    let px = out.data();

    println!("in  ({}): {:.6} {:.6} {:.6}", args.space, args.r, args.g, args.b);
    println!("out ({}): {:.6} {:.6} {:.6}", out.color_space, px[0], px[1], px[2]);

    let stats = processor.stats();
    if verbose {
        println!("gamut corrected: {}", stats.gamut_corrected > 0);
        println!("working maxrgb:  {:.6}", stats.pq.max_pq);
    }
    for event in processor.error_history() {
        eprintln!("{event}");
    }
    Ok(())
}
