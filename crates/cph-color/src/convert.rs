//! Working-domain conversion.
//!
//! The working domain is BT.2020 primaries with PQ code values. Images in a
//! linear output space (normalized so 1.0 is 10000 cd/m2) are rotated into
//! the BT.2020 basis and PQ-encoded on the way in, and decoded and rotated
//! back on the way out.
//!
//! Both directions check the buffer invariants first and return an error
//! rather than converting a malformed image.

use crate::{Rgb, clamp_to_gamut};
use cph_core::{ColorSpace, Image, Result};
use cph_math::saturate;
use cph_primaries::{from_bt2020, to_bt2020};
use cph_transfer::pq;

/// One sample from `cs` into the working domain, saturated to [0, 1].
///
/// Non-finite samples become black.
pub fn to_working_rgb(rgb: Rgb, cs: ColorSpace) -> Rgb {
    if !rgb.is_finite() {
        return Rgb::ZERO;
    }
    let out = if cs.is_working() { rgb } else { pq::encode_rgb(to_bt2020(cs) * rgb) };
    out.map(saturate)
}

/// One working-domain sample into `cs`, clamped to that space's bounds.
pub fn from_working_rgb(rgb: Rgb, cs: ColorSpace) -> Rgb {
    if !rgb.is_finite() {
        return Rgb::ZERO;
    }
    let out = if cs.is_working() { rgb } else { from_bt2020(cs) * pq::decode_rgb(rgb) };
    clamp_to_gamut(out, cs)
}

fn convert_image(input: &Image, target: ColorSpace, f: impl Fn(Rgb) -> Rgb) -> Result<Image> {
    input.validate()?;
    let mut output = input.clone();
    output.color_space = target;
    for px in output.pixels_mut() {
        let rgb = f(Rgb::new(px[0], px[1], px[2]));
        px[..3].copy_from_slice(&rgb.to_array());
    }
    Ok(output)
}

/// Converts a validated image into the working domain.
///
/// # Example
///
/// ```rust
/// use cph_color::to_working;
/// use cph_core::{ColorSpace, Image};
///
/// let img = Image::from_vec(1, 1, 3, vec![0.01, 0.01, 0.01], ColorSpace::P3D65)?;
/// let work = to_working(&img)?;
/// assert_eq!(work.color_space, ColorSpace::Bt2020Pq);
/// assert!((work.data()[0] - 0.508).abs() < 1e-3);
/// # Ok::<(), cph_core::CoreError>(())
/// ```
pub fn to_working(input: &Image) -> Result<Image> {
    let src = input.color_space;
    convert_image(input, ColorSpace::Bt2020Pq, |rgb| to_working_rgb(rgb, src))
}

/// Converts a working-domain image into `target`.
pub fn from_working(input: &Image, target: ColorSpace) -> Result<Image> {
    convert_image(input, target, |rgb| from_working_rgb(rgb, target))
}
