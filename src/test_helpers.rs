//! Shared test utilities.
//!
//! Synthetic images are generated with the `image` crate so tests never
//! depend on binary fixtures checked into the repo.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let photo = tmp.path().join("wide.jpg");
//! create_test_jpeg(&photo, 160, 90);
//! ```

use image::{ImageBuffer, ImageFormat, Rgb, Rgba};
use std::path::Path;

/// Write a `width` × `height` gradient JPEG to `path`.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

/// Write a `width` × `height` PNG with an alpha channel to `path`.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, 64, (y % 256) as u8, 200])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}
