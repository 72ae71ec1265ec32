// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page image writer — draw wrapped lines onto a white canvas, left-aligned at
// the margin, one fixed line height apart, and save the result.

use std::path::Path;

use handpress_core::CanvasConfig;
use handpress_core::error::HandpressError;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use tracing::{debug, info, instrument};

use crate::imaging;
use crate::layout::height::{fit_height, line_top};
use crate::render::font::HandwritingFont;

const PAGE_PREFIX: &str = "page_";
const PAGE_EXTENSION: &str = ".jpg";
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

/// File name of the `page_number`-th page image (1-based).
///
/// Zero-padded so that lexicographic order is page order.
pub fn page_file_name(page_number: usize) -> String {
    format!("{PAGE_PREFIX}{page_number:04}{PAGE_EXTENSION}")
}

/// Whether `name` follows the page image naming pattern.
pub fn is_page_file_name(name: &str) -> bool {
    name.strip_prefix(PAGE_PREFIX)
        .and_then(|rest| rest.strip_suffix(PAGE_EXTENSION))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Rasterises one page of lines per call.
pub struct PageImageWriter {
    canvas: CanvasConfig,
    font: HandwritingFont,
}

impl PageImageWriter {
    pub fn new(canvas: CanvasConfig, font: HandwritingFont) -> Self {
        Self { canvas, font }
    }

    pub fn font(&self) -> &HandwritingFont {
        &self.font
    }

    /// Draw as many of `lines` as fit; return the image and the lines that
    /// did not fit, in order.
    pub fn render(&self, lines: &[String]) -> (RgbImage, Vec<String>) {
        let mut image = RgbImage::from_pixel(self.canvas.width, self.canvas.height, PAPER);
        let fit = fit_height(lines, &self.canvas);
        let ink = Rgb(self.canvas.ink);
        let x = self.canvas.margin as i32;

        for (index, line) in fit.placed.iter().enumerate() {
            let y = line_top(index, &self.canvas).round() as i32;
            draw_text_mut(&mut image, ink, x, y, self.font.scale(), self.font.face(), line);
        }

        debug!(
            drawn = fit.placed.len(),
            overflow = fit.overflow.len(),
            "Page rendered"
        );
        (image, fit.overflow.to_vec())
    }

    /// Render `lines` and save the image to `path` (format from extension).
    ///
    /// Returns the lines that did not fit.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), lines = lines.len()))]
    pub fn write_page(
        &self,
        lines: &[String],
        path: impl AsRef<Path>,
    ) -> Result<Vec<String>, HandpressError> {
        let (image, overflow) = self.render(lines);
        imaging::save_image(&DynamicImage::ImageRgb8(image), path.as_ref())?;
        info!(path = %path.as_ref().display(), "Page image saved");
        Ok(overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::system_test_font;

    fn writer(canvas: CanvasConfig) -> Option<PageImageWriter> {
        let path = system_test_font()?;
        let font = HandwritingFont::load(path, canvas.font_size).ok()?;
        Some(PageImageWriter::new(canvas, font))
    }

    fn small_canvas() -> CanvasConfig {
        CanvasConfig {
            width: 400,
            height: 300,
            margin: 20,
            font_size: 24.0,
            line_spacing: 6,
            ink: [0, 0, 255],
        }
    }

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn page_names_sort_in_page_order() {
        let mut names: Vec<String> = [12, 3, 100, 1].into_iter().map(page_file_name).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["page_0001.jpg", "page_0003.jpg", "page_0012.jpg", "page_0100.jpg"]
        );
    }

    #[test]
    fn page_name_pattern() {
        assert!(is_page_file_name(&page_file_name(7)));
        assert!(is_page_file_name("page_1.jpg"));
        assert!(!is_page_file_name("page_.jpg"));
        assert!(!is_page_file_name("page_0001.png"));
        assert!(!is_page_file_name("cover.jpg"));
        assert!(!is_page_file_name("page_one.jpg"));
    }

    #[test]
    fn render_draws_ink_and_returns_overflow() {
        let Some(writer) = writer(small_canvas()) else {
            eprintln!("no system font found; skipping");
            return;
        };
        // (300 - 20 - 20) / 30 = 8 lines fit.
        let input = lines(11);
        let (image, overflow) = writer.render(&input);

        assert_eq!(image.dimensions(), (400, 300));
        assert_eq!(overflow, input[8..].to_vec());
        assert!(image.pixels().any(|p| *p != PAPER), "expected ink on the page");
        // Margins stay blank.
        assert_eq!(*image.get_pixel(5, 5), PAPER);
        assert_eq!(*image.get_pixel(395, 295), PAPER);
    }

    #[test]
    fn too_short_canvas_draws_nothing() {
        let canvas = CanvasConfig {
            height: 60,
            ..small_canvas()
        };
        let Some(writer) = writer(canvas) else {
            eprintln!("no system font found; skipping");
            return;
        };
        let input = lines(2);
        let (image, overflow) = writer.render(&input);
        assert_eq!(overflow, input);
        assert!(image.pixels().all(|p| *p == PAPER));
    }

    #[test]
    fn write_page_saves_a_jpeg() {
        let Some(writer) = writer(small_canvas()) else {
            eprintln!("no system font found; skipping");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(page_file_name(1));

        let overflow = writer.write_page(&lines(3), &path).unwrap();
        assert!(overflow.is_empty());

        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (400, 300));
    }
}
