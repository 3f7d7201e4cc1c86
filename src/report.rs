use crate::color::color_to_hex;
use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};
use serde::Serialize;
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PixelHex {
    pub x: u32,
    pub y: u32,
    pub hex: String,
}

/// Posterized image as handed to the pattern front end: the PNG inline and
/// the thread color of every stitch position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterizeReport {
    pub base64_png_image: String,
    pub pixels: Vec<PixelHex>,
}

impl PosterizeReport {
    pub fn from_image(img: &RgbaImage) -> Result<Self> {
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(Error::Encode)?;

        let (width, height) = img.dimensions();
        // column by column
        let pixels = (0..width)
            .flat_map(|x| (0..height).map(move |y| (x, y)))
            .map(|(x, y)| PixelHex {
                x,
                y,
                hex: color_to_hex(*img.get_pixel(x, y)),
            })
            .collect();

        Ok(Self {
            base64_png_image: STANDARD.encode(&png),
            pixels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pretty_assertions::assert_eq;

    #[test]
    fn lists_pixels_column_major() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 1, Rgba([0, 16, 255, 255]));

        let report = PosterizeReport::from_image(&img).unwrap();
        let cells: Vec<(u32, u32, &str)> = report
            .pixels
            .iter()
            .map(|p| (p.x, p.y, p.hex.as_str()))
            .collect();
        assert_eq!(
            cells,
            vec![
                (0, 0, "#FF0000"),
                (0, 1, "#0010FF"),
                (1, 0, "#000000"),
                (1, 1, "#FF0000"),
            ]
        );
    }

    #[test]
    fn embeds_decodable_png() {
        let img = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8 * 50, y as u8 * 90, 7, 255]));
        let report = PosterizeReport::from_image(&img).unwrap();

        let png = STANDARD.decode(&report.base64_png_image).unwrap();
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255]));
        let json = serde_json::to_value(PosterizeReport::from_image(&img).unwrap()).unwrap();
        assert!(json["base64PngImage"].is_string());
        assert_eq!(json["pixels"][0], serde_json::json!({"x": 0, "y": 0, "hex": "#010203"}));
    }
}
