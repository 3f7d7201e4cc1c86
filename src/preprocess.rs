use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Scales `img` to exactly `width` x `height` with a bilinear filter.
pub fn resize(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(img, width, height, FilterType::Triangle)
}

/// Crops away fully transparent rows and columns around the image.
///
/// An image without a single visible pixel trims down to 0x0.
pub fn trim_transparent(img: &RgbaImage) -> RgbaImage {
    let bounds = img
        .enumerate_pixels()
        .filter(|(_, _, p)| p[3] > 0)
        .fold(None::<(u32, u32, u32, u32)>, |bounds, (x, y, _)| {
            Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            })
        });
    match bounds {
        Some((x0, y0, x1, y1)) => {
            imageops::crop_imm(img, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
        }
        None => RgbaImage::new(0, 0),
    }
}
