//! Posterize images into embroidery thread colors.
//!
//! The reference palette is the full catalog of thread colors, sorted once
//! by hue with [`sort_by_hue`]. For each image [`select_targets`] picks a
//! handful of those threads and [`quantize`] repaints the image with them:
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use rand::{rngs::StdRng, SeedableRng};
//! use stitchfair::{quantize, select_targets, sort_by_hue};
//!
//! let threads = sort_by_hue(&[
//!     Rgba([0, 0, 255, 255]),
//!     Rgba([20, 20, 20, 255]),
//!     Rgba([255, 0, 0, 255]),
//!     Rgba([240, 240, 240, 255]),
//!     Rgba([0, 160, 0, 255]),
//! ]);
//! let img = RgbaImage::from_fn(4, 4, |x, _| Rgba([x as u8 * 80, 30, 30, 255]));
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let targets = select_targets(&img, &threads, 4, &mut rng).unwrap();
//! let posterized = quantize(&img, &targets).unwrap();
//!
//! assert_eq!(targets.len(), 4);
//! assert!(posterized.pixels().all(|p| targets.colors().contains(p)));
//! ```

pub mod color;
mod error;
pub mod hue;
pub mod preprocess;
pub mod quantize;
pub mod report;
pub mod swatch;
pub mod target;

pub use color::{color_to_hex, distance, hex_to_color, hue, parse_palette, Color};
pub use error::{Error, ParseColorError, Result};
pub use hue::{rank_palette, sort_by_hue, sort_hex_by_hue};
pub use quantize::{quantize, TargetPalette};
pub use report::PosterizeReport;
pub use swatch::{average_color, average_files, SwatchColor};
pub use target::select_targets;
