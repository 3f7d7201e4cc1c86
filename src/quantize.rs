use crate::color::{nearest, Color, TRANSPARENT};
use crate::error::{Error, Result};
use image::{imageops::ColorMap, Pixel, Rgba, RgbaImage};
use rayon::prelude::*;

/// The small set of thread colors an image is repainted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPalette {
    colors: Vec<Color>,
}

impl TargetPalette {
    pub fn new(colors: Vec<Color>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::config("target palette is empty"));
        }
        Ok(Self { colors })
    }

    #[inline(always)]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Index of the first target at minimum distance from `color`.
    #[inline]
    pub fn nearest_index(&self, color: Color) -> usize {
        nearest(color, &self.colors).unwrap_or_default()
    }

    /// Replacement for one pixel. Transparent pixels come back as `(0,0,0,0)`.
    #[inline]
    pub fn map(&self, color: Color) -> Color {
        if color[3] == 0 {
            TRANSPARENT
        } else {
            self.colors[self.nearest_index(color)]
        }
    }
}

impl ColorMap for TargetPalette {
    type Color = Rgba<u8>;

    #[inline(always)]
    fn index_of(&self, color: &Self::Color) -> usize {
        self.nearest_index(*color)
    }

    #[inline(always)]
    fn lookup(&self, index: usize) -> Option<Self::Color> {
        self.colors.get(index).copied()
    }

    #[inline(always)]
    fn has_lookup(&self) -> bool {
        true
    }

    #[inline(always)]
    fn map_color(&self, color: &mut Self::Color) {
        *color = self.map(*color)
    }
}

/// Repaints every opaque pixel with its nearest target color.
///
/// The output has the dimensions of `img`. Transparent pixels are written as
/// `(0,0,0,0)`, every other pixel becomes an exact copy of a target color.
pub fn quantize(img: &RgbaImage, targets: &TargetPalette) -> Result<RgbaImage> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::config(format!(
            "cannot quantize a {width}x{height} image"
        )));
    }
    let mut output = img.clone();
    output
        .par_chunks_exact_mut(Rgba::<u8>::CHANNEL_COUNT as usize)
        .for_each(|channels| {
            let pixel = Rgba::from_slice_mut(channels);
            *pixel = targets.map(*pixel);
        });
    Ok(output)
}
