use crate::error::{Error, ParseColorError, Result};
use image::Rgba;
use std::iter;

/// A single RGBA pixel or palette entry.
pub type Color = Rgba<u8>;

pub const OPAQUE: u8 = u8::MAX;
pub const TRANSPARENT: Color = Rgba([0, 0, 0, 0]);

const HEX_LEN: usize = 7;

/// Parses `#RRGGBB` (case-insensitive) into a fully opaque color.
pub fn hex_to_color(hex: &str) -> Result<Color, ParseColorError> {
    let digits = hex.strip_prefix('#').ok_or(ParseColorError::MissingHash)?;
    if hex.len() != HEX_LEN {
        return Err(ParseColorError::InvalidLength(hex.len()));
    }
    // from_str_radix would accept a leading sign
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseColorError::InvalidDigit(hex.to_string()));
    }
    let r = u8::from_str_radix(&digits[0..2], 16)?;
    let g = u8::from_str_radix(&digits[2..4], 16)?;
    let b = u8::from_str_radix(&digits[4..6], 16)?;
    Ok(Rgba([r, g, b, OPAQUE]))
}

/// Formats the RGB channels as uppercase `#RRGGBB`; alpha is dropped.
pub fn color_to_hex(color: Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

/// Squared euclidean distance over all four channels.
///
/// Only ever compared against other distances, so the square root is skipped.
#[inline]
pub fn distance(a: Color, b: Color) -> u32 {
    iter::zip(a.0, b.0)
        .map(|(x, y)| {
            let d = x.abs_diff(y) as u32;
            d * d
        })
        .sum()
}

/// HSL hue in degrees, in `[0, 360)`. Greys have hue 0.
pub fn hue(color: Color) -> f64 {
    let [r, g, b] = [color[0], color[1], color[2]].map(|c| c as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return 0.0;
    }
    let delta = max - min;
    let h = if max == r {
        60.0 * ((g - b) / delta + 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    h.rem_euclid(360.0)
}

/// Perceived brightness, `0.299R + 0.587G + 0.114B`.
#[inline]
pub fn luminance(color: Color) -> f64 {
    0.299 * color[0] as f64 + 0.587 * color[1] as f64 + 0.114 * color[2] as f64
}

/// Index of the first palette entry closest to `color`.
pub fn nearest(color: Color, palette: &[Color]) -> Option<usize> {
    palette
        .iter()
        .enumerate()
        .min_by_key(|&(_, p)| distance(color, *p))
        .map(|(i, _)| i)
}

/// Reads a reference palette, one `#RRGGBB` per line. Blank lines are skipped.
pub fn parse_palette(text: &str) -> Result<Vec<Color>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line, hex)| hex_to_color(hex).map_err(|source| Error::Palette { line, source }))
        .collect()
}
