// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF rasteriser — render PDF pages to bitmaps via `pdfium-render`, for pages
// that have no character layer and must be read by a vision model.

use std::path::Path;

use handpress_core::error::HandpressError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info, instrument};

/// PDF points per inch (1 pt = 1/72 in).
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Renders PDF pages to images at a chosen resolution.
pub struct PdfRasterizer {
    pdfium: Pdfium,
}

impl PdfRasterizer {
    /// Bind to a pdfium library in the working directory, falling back to the
    /// system library.
    pub fn new() -> Result<Self, HandpressError> {
        Self::with_library_dir("./")
    }

    /// Bind to the pdfium library inside `dir`, falling back to the system
    /// library.
    pub fn with_library_dir(dir: impl AsRef<Path>) -> Result<Self, HandpressError> {
        let local = Pdfium::pdfium_platform_library_name_at_path(dir.as_ref());
        let bindings = Pdfium::bind_to_library(local)
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|err| {
                HandpressError::PdfError(format!("failed to bind pdfium library: {}", err))
            })?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Render every page of `path` at `dpi` and hand each image to `visit`
    /// with its 1-based page number, one page at a time.
    ///
    /// Returns the number of pages visited. Stops at the first error.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), dpi = dpi))]
    pub fn for_each_page<F>(
        &self,
        path: impl AsRef<Path>,
        dpi: u32,
        mut visit: F,
    ) -> Result<usize, HandpressError>
    where
        F: FnMut(u32, DynamicImage) -> Result<(), HandpressError>,
    {
        let path = path.as_ref();
        let document = self.pdfium.load_pdf_from_file(path, None).map_err(|err| {
            HandpressError::PdfError(format!("failed to load {}: {}", path.display(), err))
        })?;

        let page_count = document.pages().len() as usize;
        info!(page_count, dpi, "Rasterising PDF pages");

        for (index, page) in document.pages().iter().enumerate() {
            let page_number = (index + 1) as u32;
            let (target_w, target_h) =
                target_size(page.width().value, page.height().value, dpi);

            let render_config = PdfRenderConfig::new()
                .set_target_width(target_w)
                .set_target_height(target_h);

            let bitmap = page.render_with_config(&render_config).map_err(|err| {
                HandpressError::PdfError(format!("failed to render page {}: {}", page_number, err))
            })?;

            debug!(page_number, target_w, target_h, "Page rendered");
            visit(page_number, bitmap.as_image())?;
        }

        Ok(page_count)
    }
}

/// Pixel size of a page measured in points when rendered at `dpi`.
fn target_size(width_pts: f32, height_pts: f32, dpi: u32) -> (i32, i32) {
    let scale = dpi as f32 / PDF_POINTS_PER_INCH;
    (
        (width_pts * scale).round() as i32,
        (height_pts * scale).round() as i32,
    )
}
