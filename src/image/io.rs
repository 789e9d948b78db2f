//! Convenience helpers for loading masks via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::BinaryImage;
use crate::util::{HuError, HuResult};
use std::path::Path;

/// Converts a decoded image to luminance and wraps it as a binary image.
pub fn binary_from_dynamic_image(img: &image::DynamicImage) -> HuResult<BinaryImage> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    BinaryImage::new(gray.into_raw(), width, height)
}

/// Loads an image from disk and converts it to a binary image.
pub fn load_binary_image<P: AsRef<Path>>(path: P) -> HuResult<BinaryImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| HuError::Decode {
        name: path.display().to_string(),
        reason: err.to_string(),
    })?;
    binary_from_dynamic_image(&img)
}
