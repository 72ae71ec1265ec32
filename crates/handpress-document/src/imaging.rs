// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image I/O helpers shared by the extractors, the page writer, and the PDF
// assembler. Thin wrappers over the `image` crate that map failures into
// `HandpressError::ImageError` with the offending path attached.

use std::io::Cursor;
use std::path::Path;

use handpress_core::error::HandpressError;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, instrument};

/// Decode an image file; the format is detected from its contents.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open_image(path: impl AsRef<Path>) -> Result<DynamicImage, HandpressError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| {
        HandpressError::ImageError(format!("failed to open {}: {}", path.display(), err))
    })?;
    debug!(width = img.width(), height = img.height(), "Image loaded");
    Ok(img)
}

/// Write an image to disk. The format is inferred from the file extension.
pub fn save_image(image: &DynamicImage, path: impl AsRef<Path>) -> Result<(), HandpressError> {
    let path = path.as_ref();
    image.save(path).map_err(|err| {
        HandpressError::ImageError(format!("failed to save image to {}: {}", path.display(), err))
    })
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, HandpressError> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|err| HandpressError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Stretch an image to exactly `width` x `height`, ignoring aspect ratio.
/// Images already at that size are returned untouched.
pub fn resize_exact(image: DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() == width && image.height() == height {
        return image;
    }
    debug!(
        from_w = image.width(),
        from_h = image.height(),
        width,
        height,
        "Resizing image"
    );
    image.resize_exact(width, height, image::imageops::FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn png_bytes_decode_back() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 4, Rgb([10, 20, 30])));
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
    }

    #[test]
    fn resize_exact_ignores_aspect_ratio() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(100, 50));
        let resized = resize_exact(img, 20, 80);
        assert_eq!((resized.width(), resized.height()), (20, 80));
    }

    #[test]
    fn save_and_open_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.jpg");
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([255, 255, 255])));
        save_image(&img, &path).unwrap();

        let reopened = open_image(&path).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (16, 16));
    }

    #[test]
    fn open_missing_file_is_image_error() {
        assert!(matches!(
            open_image("/nonexistent/page.png"),
            Err(HandpressError::ImageError(_))
        ));
    }
}
