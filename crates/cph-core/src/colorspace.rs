//! Color space tags and gamut bounds.
//!
//! The working domain is BT.2020 primaries with PQ-normalized code values.
//! Output spaces are linear-light and normalized so 1.0 is 10000 cd/m2.
//!
//! | Tag | Encoding | Bounds |
//! |-----|----------|--------|
//! | [`ColorSpace::Bt2020Pq`] | PQ [0,1] | [0, 1] |
//! | [`ColorSpace::P3D65`] | linear | [0, 1] |
//! | [`ColorSpace::Rec709`] | linear | [0, 1] |
//! | [`ColorSpace::AcesCg`] | linear | [-0.5, 2.0] |

use std::fmt;
use std::str::FromStr;

/// Per-channel gamut bounds, inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamutBounds {
    /// Lower bound for every channel.
    pub lower: f32,
    /// Upper bound for every channel.
    pub upper: f32,
}

impl GamutBounds {
    /// `[0, 1]`.
    pub const UNIT: Self = Self { lower: 0.0, upper: 1.0 };

    /// Scene-referred wide range used by ACEScg.
    pub const WIDE: Self = Self { lower: -0.5, upper: 2.0 };

    /// True if `v` lies inside the bounds.
    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        v >= self.lower && v <= self.upper
    }

    /// Clamps `v` into the bounds.
    #[inline]
    pub fn clamp(&self, v: f32) -> f32 {
        v.clamp(self.lower, self.upper)
    }
}

/// Color space identifier carried by samples and images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorSpace {
    /// BT.2020 primaries, PQ-normalized. The working domain.
    #[default]
    Bt2020Pq,
    /// Display P3 primaries, D65 white, linear.
    P3D65,
    /// Rec.709 primaries, D65 white, linear.
    Rec709,
    /// ACES AP1 primaries, ACES white, linear.
    AcesCg,
}

impl ColorSpace {
    /// Short stable name, also accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bt2020Pq => "bt2020-pq",
            Self::P3D65 => "p3-d65",
            Self::Rec709 => "rec709",
            Self::AcesCg => "acescg",
        }
    }

    /// All supported spaces.
    pub const fn all() -> &'static [Self] {
        &[Self::Bt2020Pq, Self::P3D65, Self::Rec709, Self::AcesCg]
    }

    /// Per-channel gamut bounds.
    pub const fn bounds(self) -> GamutBounds {
        match self {
            Self::AcesCg => GamutBounds::WIDE,
            Self::Bt2020Pq | Self::P3D65 | Self::Rec709 => GamutBounds::UNIT,
        }
    }

    /// True for the PQ-encoded working domain.
    #[inline]
    pub const fn is_working(self) -> bool {
        matches!(self, Self::Bt2020Pq)
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.to_ascii_lowercase().replace('_', "-");
        match key.as_str() {
            "bt2020-pq" | "bt2020" | "working" => Ok(Self::Bt2020Pq),
            "p3-d65" | "p3" | "display-p3" => Ok(Self::P3D65),
            "rec709" | "bt709" | "srgb-linear" => Ok(Self::Rec709),
            "acescg" | "aces-cg" | "ap1" => Ok(Self::AcesCg),
            _ => Err(format!("unknown color space '{}'", s)),
        }
    }
}
