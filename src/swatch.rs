use crate::color::{Color, OPAQUE};
use crate::error::{Error, Result};
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Representative color of one thread swatch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwatchColor {
    pub path: PathBuf,
    pub color: Color,
}

/// Integer mean of the R, G and B channels over every pixel, fully opaque.
///
/// Alpha is neither averaged nor used as a weight.
pub fn average_color(img: &RgbaImage) -> Result<Color> {
    let count = img.width() as u64 * img.height() as u64;
    if count == 0 {
        return Err(Error::config("cannot average an empty swatch"));
    }
    let [r, g, b] = img
        .par_chunks_exact(4)
        .fold(
            || [0u64; 3],
            |mut sum, px| {
                sum.iter_mut().zip(px).for_each(|(s, &c)| *s += c as u64);
                sum
            },
        )
        .reduce(|| [0u64; 3], |a, b| [a[0] + b[0], a[1] + b[1], a[2] + b[2]]);
    Ok(Rgba([
        (r / count) as u8,
        (g / count) as u8,
        (b / count) as u8,
        OPAQUE,
    ]))
}

/// Decodes a swatch image and averages it.
pub fn average_file(path: &Path) -> Result<Color> {
    let img = image::open(path)?.to_rgba8();
    average_color(&img)
}

/// Averages a batch of swatch files.
///
/// A file that cannot be decoded is logged and left out, the rest of the
/// batch still runs.
pub fn average_files<I, P>(paths: I) -> Vec<SwatchColor>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .filter_map(|path| {
            let path = path.as_ref();
            match average_file(path) {
                Ok(color) => {
                    debug!(path = %path.display(), ?color, "averaged swatch");
                    Some(SwatchColor {
                        path: path.to_path_buf(),
                        color,
                    })
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping swatch");
                    None
                }
            }
        })
        .collect()
}
