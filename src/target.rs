use crate::color::{luminance, nearest, Color};
use crate::error::{Error, Result};
use crate::quantize::TargetPalette;
use image::RgbaImage;
use rand::Rng;
use std::ops::Range;
use tracing::debug;

/// Two slots of every target palette are taken by the tonal anchors.
const ANCHORS: usize = 2;

/// Opaque pixels column by column: x outer, y inner.
fn opaque_pixels(img: &RgbaImage) -> impl Iterator<Item = Color> + '_ {
    let (width, height) = img.dimensions();
    (0..width)
        .flat_map(move |x| (0..height).map(move |y| *img.get_pixel(x, y)))
        .filter(|p| p[3] != 0)
}

/// Lowest-luminance opaque pixel; the first one in column-major order wins ties.
pub fn darkest_pixel(img: &RgbaImage) -> Option<Color> {
    opaque_pixels(img)
        .map(|p| (luminance(p), p))
        .reduce(|best, cur| if cur.0 < best.0 { cur } else { best })
        .map(|(_, p)| p)
}

/// Highest-luminance opaque pixel; the first one in column-major order wins ties.
pub fn brightest_pixel(img: &RgbaImage) -> Option<Color> {
    opaque_pixels(img)
        .map(|p| (luminance(p), p))
        .reduce(|best, cur| if cur.0 > best.0 { cur } else { best })
        .map(|(_, p)| p)
}

/// Bounds of chunk `index` when `len` entries are split into `chunks` runs.
///
/// Runs are `len / chunks` long and the last one extends to `len`. When there
/// are fewer entries than chunks every chunk is a single entry, wrapping
/// around.
fn chunk_range(index: usize, chunks: usize, len: usize) -> Range<usize> {
    let size = len / chunks;
    if size == 0 {
        let start = index % len;
        return start..start + 1;
    }
    let start = index * size;
    let end = if index + 1 == chunks { len } else { start + size };
    start..end
}

/// Picks `k` colors of `reference` to repaint `img` with.
///
/// `reference` is expected in hue order. The first two picks are the
/// reference colors closest to the darkest and brightest opaque pixels. The
/// rest of the palette is cut into `k - 2` contiguous runs and one color is
/// drawn at random from each, so the picks spread across the hue wheel.
pub fn select_targets<R>(
    img: &RgbaImage,
    reference: &[Color],
    k: usize,
    rng: &mut R,
) -> Result<TargetPalette>
where
    R: Rng + ?Sized,
{
    if k <= ANCHORS {
        return Err(Error::config(format!(
            "target color count must be at least {}, got {k}",
            ANCHORS + 1
        )));
    }
    if reference.is_empty() {
        return Err(Error::config("reference palette is empty"));
    }
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::config(format!(
            "cannot select colors for a {width}x{height} image"
        )));
    }
    let (Some(darkest), Some(brightest)) = (darkest_pixel(img), brightest_pixel(img)) else {
        return Err(Error::config("image has no opaque pixels"));
    };

    let dark = nearest(darkest, reference).unwrap_or_default();
    let light = nearest(brightest, reference).unwrap_or_default();

    let remaining: Vec<Color> = reference
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != dark && i != light)
        .map(|(_, &c)| c)
        .collect();
    let pool: &[Color] = if remaining.is_empty() {
        reference
    } else {
        &remaining
    };

    let chunks = k - ANCHORS;
    debug!(
        k,
        reference = reference.len(),
        pool = pool.len(),
        chunk_size = pool.len() / chunks,
        "selecting target colors"
    );

    let mut colors = Vec::new();
    colors
        .try_reserve_exact(k)
        .map_err(|_| Error::config(format!("target color count {k} is too large")))?;
    colors.push(reference[dark]);
    colors.push(reference[light]);
    for index in 0..chunks {
        let range = chunk_range(index, chunks, pool.len());
        colors.push(pool[rng.gen_range(range)]);
    }
    TargetPalette::new(colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5717c4)
    }

    fn ramp(n: usize) -> Vec<Color> {
        (0..n)
            .map(|i| Rgba([(i * 255 / n.max(1)) as u8, 40, 200, 255]))
            .collect()
    }

    fn tonal_image() -> RgbaImage {
        RgbaImage::from_fn(4, 4, |x, y| {
            let v = (x * 60 + y * 5) as u8;
            Rgba([v, v, v, 255])
        })
    }

    #[test]
    fn chunk_ranges() {
        assert_eq!(chunk_range(0, 2, 6), 0..3);
        assert_eq!(chunk_range(1, 2, 6), 3..6);
        assert_eq!(chunk_range(0, 3, 7), 0..2);
        assert_eq!(chunk_range(2, 3, 7), 4..7);
        assert_eq!(chunk_range(0, 1, 5), 0..5);
        assert_eq!(chunk_range(3, 5, 2), 1..2);
    }

    #[test]
    fn extremes_skip_transparent_pixels() {
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([100, 100, 100, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 0]));
        img.put_pixel(2, 0, Rgba([10, 200, 10, 255]));
        assert_eq!(darkest_pixel(&img), Some(Rgba([10, 200, 10, 255])));
        assert_eq!(brightest_pixel(&img), Some(Rgba([10, 200, 10, 255])));

        let flat = RgbaImage::from_fn(2, 1, |x, _| Rgba([50, 50, 50, 255 - x as u8]));
        assert_eq!(darkest_pixel(&flat), Some(Rgba([50, 50, 50, 255])));
        assert_eq!(brightest_pixel(&flat), Some(Rgba([50, 50, 50, 255])));
    }

    #[test]
    fn luminance_ties_go_to_first_column() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([200, 200, 200, 255]));
        img.put_pixel(1, 0, Rgba([30, 30, 30, 255]));
        img.put_pixel(0, 1, Rgba([30, 30, 30, 128]));
        assert_eq!(darkest_pixel(&img), Some(Rgba([30, 30, 30, 128])));

        let mut img = RgbaImage::from_pixel(2, 2, Rgba([10, 10, 10, 255]));
        img.put_pixel(1, 0, Rgba([220, 220, 220, 255]));
        img.put_pixel(0, 1, Rgba([220, 220, 220, 64]));
        assert_eq!(brightest_pixel(&img), Some(Rgba([220, 220, 220, 64])));
    }

    #[test]
    fn returns_k_colors_from_reference() {
        let img = tonal_image();
        for len in [1, 2, 3, 5, 17, 200] {
            let reference = ramp(len);
            for k in [3, 4, 7, 12, 40] {
                let targets = select_targets(&img, &reference, k, &mut rng()).unwrap();
                assert_eq!(targets.len(), k, "len={len} k={k}");
                for c in targets.colors() {
                    assert!(reference.contains(c), "len={len} k={k} {c:?}");
                }
            }
        }
    }

    #[test]
    fn anchors_come_first() {
        let reference = vec![
            Rgba([250, 250, 250, 255]),
            Rgba([200, 10, 10, 255]),
            Rgba([5, 5, 5, 255]),
            Rgba([10, 10, 200, 255]),
        ];
        let targets = select_targets(&tonal_image(), &reference, 3, &mut rng()).unwrap();
        assert_eq!(targets.colors()[0], reference[2]);
        assert_eq!(targets.colors()[1], reference[0]);
        assert!([reference[1], reference[3]].contains(&targets.colors()[2]));
    }

    #[test]
    fn same_seed_same_targets() {
        let reference = ramp(120);
        let img = tonal_image();
        let a = select_targets(&img, &reference, 9, &mut rng()).unwrap();
        let b = select_targets(&img, &reference, 9, &mut rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_configuration() {
        let img = tonal_image();
        let reference = ramp(10);
        for k in [0, 1, 2] {
            assert!(matches!(
                select_targets(&img, &reference, k, &mut rng()),
                Err(Error::InvalidConfiguration(_))
            ));
        }
        assert!(matches!(
            select_targets(&img, &[], 5, &mut rng()),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            select_targets(&RgbaImage::new(0, 0), &reference, 5, &mut rng()),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            select_targets(&img, &reference, usize::MAX, &mut rng()),
            Err(Error::InvalidConfiguration(_))
        ));
        let hidden = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 0]));
        assert!(matches!(
            select_targets(&hidden, &reference, 5, &mut rng()),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
