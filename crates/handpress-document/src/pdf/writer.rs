// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF assembler — concatenate rendered page images into one multi-page PDF
// using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::{Path, PathBuf};

use handpress_core::error::HandpressError;
use image::DynamicImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::imaging;
use crate::render::page::is_page_file_name;

const MM_PER_INCH: f32 = 25.4;
/// Resolution used to convert image pixels to page millimetres.
pub const PAGE_DPI: f32 = 150.0;

/// Builds a PDF with one full-bleed page per image.
///
/// Each page is sized to its image at [`PAGE_DPI`], so a
/// 1240x1754 canvas at 150 DPI yields A4 pages.
pub struct PdfAssembler {
    /// Canonical page size in pixels, used when `resize` is set.
    page_width_px: u32,
    page_height_px: u32,
    /// Stretch every image to the canonical size before embedding.
    resize: bool,
    /// Title metadata embedded in the PDF.
    title: String,
}

impl PdfAssembler {
    /// Create an assembler for pages of `width` x `height` pixels at 150 DPI.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            page_width_px: width,
            page_height_px: height,
            resize: true,
            title: "Handwritten Document".into(),
        }
    }

    pub fn set_resize(&mut self, resize: bool) {
        self.resize = resize;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Page images in `dir`, sorted lexicographically by file name.
    pub fn collect_page_images(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, HandpressError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_page_file_name);
            if matches && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Encode `images` as a multi-page PDF, first image first.
    #[instrument(skip_all, fields(pages = images.len()))]
    pub fn assemble(&self, images: Vec<DynamicImage>) -> Result<Vec<u8>, HandpressError> {
        if images.is_empty() {
            return Err(HandpressError::PdfError(
                "cannot assemble a PDF without pages".into(),
            ));
        }

        let mut doc = PdfDocument::new(&self.title);
        let mut pages = Vec::with_capacity(images.len());

        for image in images {
            let image = if self.resize {
                imaging::resize_exact(image, self.page_width_px, self.page_height_px)
            } else {
                image
            };

            let (width, height) = (image.width(), image.height());
            let raw = RawImage {
                pixels: RawImageData::U8(image.to_rgb8().into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // At the page DPI the image covers the page exactly.
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(PAGE_DPI),
                    rotate: None,
                },
            }];

            pages.push(PdfPage::new(
                px_to_mm(width),
                px_to_mm(height),
                ops,
            ));
        }

        doc.with_pages(pages);
        debug!(pages = doc.pages.len(), "Pages placed");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf reported warnings");
        }
        Ok(output)
    }

    /// Assemble every page image found in `dir` into `output`.
    ///
    /// Returns the number of pages written, or `None` (with a warning and no
    /// file written) when the directory holds no page images.
    #[instrument(skip_all, fields(
        dir = %dir.as_ref().display(),
        output = %output.as_ref().display(),
    ))]
    pub fn assemble_dir(
        &self,
        dir: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<Option<usize>, HandpressError> {
        let files = Self::collect_page_images(dir.as_ref())?;
        if files.is_empty() {
            warn!("No page images found to assemble; PDF not written");
            return Ok(None);
        }

        let images = files
            .iter()
            .map(imaging::open_image)
            .collect::<Result<Vec<_>, _>>()?;
        let page_count = images.len();
        let bytes = self.assemble(images)?;

        let output = output.as_ref();
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output, &bytes)?;
        info!(path = %output.display(), pages = page_count, "PDF created");
        Ok(Some(page_count))
    }
}

fn px_to_mm(px: u32) -> Mm {
    Mm(px as f32 / PAGE_DPI * MM_PER_INCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::page::page_file_name;
    use image::{Rgb, RgbImage};

    fn blank(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
    }

    #[test]
    fn a4_canvas_maps_to_a4_millimetres() {
        assert!((px_to_mm(1240).0 - 209.97).abs() < 0.05);
        assert!((px_to_mm(1754).0 - 297.01).abs() < 0.05);
    }

    #[test]
    fn empty_directory_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pdf");

        let assembler = PdfAssembler::new(1240, 1754);
        let result = assembler.assemble_dir(dir.path(), &output).unwrap();

        assert_eq!(result, None);
        assert!(!output.exists());
    }

    #[test]
    fn missing_directory_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pdf");
        let assembler = PdfAssembler::new(1240, 1754);
        let result = assembler
            .assemble_dir(dir.path().join("absent"), &output)
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn collects_only_page_images_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for n in [10, 2, 1] {
            imaging::save_image(&blank(4, 4), dir.path().join(page_file_name(n))).unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        imaging::save_image(&blank(4, 4), dir.path().join("cover.jpg")).unwrap();

        let files = PdfAssembler::collect_page_images(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![page_file_name(1), page_file_name(2), page_file_name(10)]);
    }

    #[test]
    fn assembles_one_page_per_image() {
        let dir = tempfile::tempdir().unwrap();
        for n in 1..=3 {
            imaging::save_image(&blank(62, 88), dir.path().join(page_file_name(n))).unwrap();
        }
        let output = dir.path().join("pdf").join("handwritten.pdf");

        let mut assembler = PdfAssembler::new(124, 175);
        assembler.set_title("Test");
        let pages = assembler.assemble_dir(dir.path(), &output).unwrap();

        assert_eq!(pages, Some(3));
        let written = lopdf::Document::load(&output).unwrap();
        assert_eq!(written.get_pages().len(), 3);
    }

    #[test]
    fn assemble_without_images_is_an_error() {
        let assembler = PdfAssembler::new(100, 100);
        assert!(assembler.assemble(Vec::new()).is_err());
    }
}
