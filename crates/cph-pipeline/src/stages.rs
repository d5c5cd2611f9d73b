//! Per-pixel stages of the working-domain pass.
//!
//! Each stage is a kernel over one interleaved pixel (`&mut [f32]`, RGB
//! first, optional alpha untouched) returning a count for bookkeeping.
//! [`run`] drives a kernel over a whole image, row-parallel when the
//! `parallel` feature is enabled and the caller allows it.

use cph_color::{Rgb, SaturationParams, apply_gamut_constraint, apply_saturation};
use cph_core::{ColorSpace, Image};
use cph_tone::ToneCurve;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs `kernel` over every pixel and sums its return values.
pub fn run<F>(img: &mut Image, parallel: bool, kernel: F) -> usize
where
    F: Fn(&mut [f32]) -> usize + Sync + Send,
{
    let channels = img.channels();
    let stride = img.row_stride();

    #[cfg(feature = "parallel")]
    if parallel {
        return img
            .data_mut()
            .par_chunks_mut(stride)
            .map(|row| row.chunks_exact_mut(channels).map(&kernel).sum::<usize>())
            .sum();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = (parallel, stride);

    img.data_mut().chunks_exact_mut(channels).map(&kernel).sum()
}

#[inline]
fn read_rgb(px: &[f32]) -> Rgb {
    Rgb::new(px[0], px[1], px[2])
}

#[inline]
fn write_rgb(px: &mut [f32], rgb: Rgb) {
    px[..3].copy_from_slice(&rgb.to_array());
}

/// MaxRGB tone mapping with proportional channel scaling.
///
/// Black pixels are left alone. Non-finite pixels are zeroed and counted.
#[inline]
pub fn tone_map_pixel(curve: &ToneCurve, px: &mut [f32]) -> usize {
    let rgb = read_rgb(px);
    if !rgb.is_finite() {
        write_rgb(px, Rgb::ZERO);
        return 1;
    }
    let max = rgb.max_element();
    if max <= 0.0 {
        return 0;
    }
    let scale = curve.map_luminance(max) / max;
    write_rgb(px, (rgb * scale).clamp01());
    0
}

/// Saturation (weighted by MaxRGB) then the working-domain gamut
/// constraint. Returns 1 if the gamut stage corrected the pixel.
#[inline]
pub fn color_pixel(sat: &SaturationParams, strict: bool, px: &mut [f32]) -> usize {
    let rgb = read_rgb(px);
    if !rgb.is_finite() {
        write_rgb(px, Rgb::ZERO);
        return 1;
    }
    let weight = rgb.max_element().clamp(0.0, 1.0);
    let rgb = apply_saturation(rgb, sat.sat_base, sat.sat_hi, sat.pivot, weight);
    let (rgb, corrected) = apply_gamut_constraint(rgb, ColorSpace::Bt2020Pq, strict);
    write_rgb(px, rgb.clamp01());
    usize::from(corrected)
}

/// Tone maps a working-domain image. Returns how many pixels were zeroed.
pub fn tone_map(curve: &ToneCurve, img: &mut Image, parallel: bool) -> usize {
    run(img, parallel, |px| tone_map_pixel(curve, px))
}

/// Saturation and gamut over a working-domain image. Returns how many pixels
/// the gamut stage corrected.
pub fn color(sat: &SaturationParams, strict: bool, img: &mut Image, parallel: bool) -> usize {
    run(img, parallel, |px| color_pixel(sat, strict, px))
}
