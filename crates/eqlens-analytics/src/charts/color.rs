//! Chart colours and the temperature gradient

use std::fmt;

use serde::{Serialize, Serializer};

/// 8-bit RGB colour, serialised as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub const FLOWRATE: Rgb = Rgb::from_hex(0x3498db);
pub const PRESSURE: Rgb = Rgb::from_hex(0xe74c3c);
pub const TEMPERATURE: Rgb = Rgb::from_hex(0xf39c12);
pub const AVERAGE_MARKER: Rgb = Rgb::from_hex(0xc0392b);

/// Pastel palette for pie slices
const SLICE_PALETTE: [Rgb; 12] = [
    Rgb::from_hex(0x8dd3c7),
    Rgb::from_hex(0xffffb3),
    Rgb::from_hex(0xbebada),
    Rgb::from_hex(0xfb8072),
    Rgb::from_hex(0x80b1d3),
    Rgb::from_hex(0xfdb462),
    Rgb::from_hex(0xb3de69),
    Rgb::from_hex(0xfccde5),
    Rgb::from_hex(0xd9d9d9),
    Rgb::from_hex(0xbc80bd),
    Rgb::from_hex(0xccebc5),
    Rgb::from_hex(0xffed6f),
];

/// Qualitative palette for scatter series
const SERIES_PALETTE: [Rgb; 8] = [
    Rgb::from_hex(0x66c2a5),
    Rgb::from_hex(0xfc8d62),
    Rgb::from_hex(0x8da0cb),
    Rgb::from_hex(0xe78ac3),
    Rgb::from_hex(0xa6d854),
    Rgb::from_hex(0xffd92f),
    Rgb::from_hex(0xe5c494),
    Rgb::from_hex(0xb3b3b3),
];

/// Green to yellow to red
const GRADIENT: [(f64, Rgb); 5] = [
    (0.0, Rgb::from_hex(0x006837)),
    (0.25, Rgb::from_hex(0x66bd63)),
    (0.5, Rgb::from_hex(0xffffbf)),
    (0.75, Rgb::from_hex(0xfdae61)),
    (1.0, Rgb::from_hex(0xa50026)),
];

pub fn slice_color(index: usize) -> Rgb {
    SLICE_PALETTE[index % SLICE_PALETTE.len()]
}

pub fn series_color(index: usize) -> Rgb {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

/// Position of `value` in `[min, max]`, clamped to `[0, 1]`.
///
/// When `min == max` the upper bound is nudged by `1.0`.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let max = if min == max { max + 1.0 } else { max };
    // halved so ranges wider than f64::MAX stay finite
    ((value / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)).clamp(0.0, 1.0)
}

/// Colour at position `t` of the green-yellow-red gradient
pub fn gradient(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    for pair in GRADIENT.windows(2) {
        let (lo, lo_color) = pair[0];
        let (hi, hi_color) = pair[1];
        if t <= hi {
            return lo_color.lerp(hi_color, (t - lo) / (hi - lo));
        }
    }
    GRADIENT[GRADIENT.len() - 1].1
}
