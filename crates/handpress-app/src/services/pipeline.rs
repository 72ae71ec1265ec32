// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion pipeline — resolve text, lay it out, write page images, and
// assemble the PDF.
//
// Strictly sequential: each stage finishes before the next begins and reads
// its predecessor's output exactly once.

use std::path::{Path, PathBuf};

use handpress_core::error::Result;
use handpress_core::{ApiKey, CanvasConfig, OverflowPolicy, PipelineConfig, SourceKind};
use handpress_document::layout::{fit_height, paginate, split_words};
use handpress_document::render::page_file_name;
use handpress_document::{
    HandwritingFont, InputDocument, LayoutEngine, PageImageWriter, PdfAssembler, TextMeasure,
    TextResolver,
};
use tracing::{debug, info, instrument, warn};

/// Anything that can draw a page of lines to a file and report the lines
/// that did not fit.
pub trait PageSink {
    fn write_page(&self, lines: &[String], path: &Path) -> Result<Vec<String>>;
}

impl PageSink for PageImageWriter {
    fn write_page(&self, lines: &[String], path: &Path) -> Result<Vec<String>> {
        PageImageWriter::write_page(self, lines, path)
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub source_kind: SourceKind,
    pub words: usize,
    pub pages_written: usize,
    /// `None` when there was nothing to assemble.
    pub pdf_path: Option<PathBuf>,
}

/// Result of the layout and output stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintResult {
    pub pages_written: usize,
    pub pdf_path: Option<PathBuf>,
}

pub struct Pipeline {
    config: PipelineConfig,
    api_key: Option<ApiKey>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, api_key: Option<ApiKey>) -> Self {
        Self { config, api_key }
    }

    /// Run every stage against the configured input.
    #[instrument(skip(self), fields(input = %self.config.input_path.display()))]
    pub fn run(&self) -> Result<RunSummary> {
        self.config.validate()?;

        let document = InputDocument::inspect(&self.config.input_path, self.config.input_type)?;
        info!(kind = %document.kind(), "Extraction strategy chosen");

        let resolver = TextResolver::new(
            self.config.vision.clone(),
            self.api_key.clone(),
            self.config.ocr_model_dir.clone(),
        );
        let raw_text = resolver.resolve(&document)?;
        let words = split_words(&raw_text).len();
        info!(words, "Text extracted");

        let font = HandwritingFont::load(&self.config.font_path, self.config.canvas.font_size)?;
        let writer = PageImageWriter::new(self.config.canvas, font);
        let painted = self.paint(&raw_text, writer.font(), &writer)?;

        Ok(RunSummary {
            source_kind: document.kind(),
            words,
            pages_written: painted.pages_written,
            pdf_path: painted.pdf_path,
        })
    }

    /// Lay out `text`, write its pages through `sink`, and assemble them.
    pub fn paint(
        &self,
        text: &str,
        measure: &dyn TextMeasure,
        sink: &impl PageSink,
    ) -> Result<PaintResult> {
        let engine = LayoutEngine::new(self.config.layout, self.config.canvas);
        let blocks = engine.blocks(text, measure);

        std::fs::create_dir_all(&self.config.output_dir)?;
        let removed = remove_stale_pages(&self.config.output_dir)?;
        if removed > 0 {
            debug!(removed, "Removed page images from an earlier run");
        }

        let pages_written = write_blocks(
            sink,
            blocks,
            &self.config.output_dir,
            &self.config.canvas,
            self.config.overflow,
        )?;
        info!(pages_written, "Handwritten pages saved");

        let mut assembler = PdfAssembler::new(self.config.canvas.width, self.config.canvas.height);
        assembler.set_resize(self.config.resize_pages);
        if let Some(stem) = self.config.input_path.file_stem() {
            assembler.set_title(stem.to_string_lossy());
        }
        let pdf_path = assembler
            .assemble_dir(&self.config.output_dir, &self.config.output_pdf)?
            .map(|_| self.config.output_pdf.clone());

        Ok(PaintResult {
            pages_written,
            pdf_path,
        })
    }
}

/// Write each block as one or more consecutive page images in `dir`.
///
/// Under [`OverflowPolicy::NewPage`] a block is split with [`paginate`], so
/// the lines a page cannot hold start the next page. Under
/// [`OverflowPolicy::Discard`] only the first page of each block is kept.
/// Returns the number of pages written.
pub fn write_blocks(
    sink: &impl PageSink,
    blocks: Vec<Vec<String>>,
    dir: &Path,
    canvas: &CanvasConfig,
    policy: OverflowPolicy,
) -> Result<usize> {
    let mut page_number = 0;

    for block in blocks {
        let pages = match policy {
            OverflowPolicy::NewPage => paginate(block, canvas)?,
            OverflowPolicy::Discard => first_page(block, canvas, page_number + 1),
        };

        for page in pages {
            page_number += 1;
            let path = dir.join(page_file_name(page_number));
            let overflow = sink.write_page(&page, &path)?;
            if !overflow.is_empty() {
                warn!(page_number, dropped = overflow.len(), "Page writer left lines undrawn");
            }
        }
    }

    Ok(page_number)
}

/// The lines of `block` that fit one page, or nothing if none fit.
fn first_page(block: Vec<String>, canvas: &CanvasConfig, page_number: usize) -> Vec<Vec<String>> {
    let fit = fit_height(&block, canvas);
    if !fit.overflow.is_empty() {
        warn!(page_number, dropped = fit.overflow.len(), "Overflow lines discarded");
    }
    if fit.placed.is_empty() {
        Vec::new()
    } else {
        vec![fit.placed.to_vec()]
    }
}

/// Delete page images left in `dir` by an earlier run.
pub fn remove_stale_pages(dir: &Path) -> Result<usize> {
    let stale = PdfAssembler::collect_page_images(dir)?;
    for path in &stale {
        std::fs::remove_file(path)?;
    }
    Ok(stale.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use handpress_core::{HandpressError, LayoutConfig, LayoutMode};
    use image::{DynamicImage, Rgb, RgbImage};
    use std::cell::RefCell;

    /// Records each page instead of drawing it; saves a blank image so the
    /// assembler has something to pick up.
    struct RecordingSink {
        canvas: CanvasConfig,
        pages: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl RecordingSink {
        fn new(canvas: CanvasConfig) -> Self {
            Self {
                canvas,
                pages: RefCell::new(Vec::new()),
            }
        }

        fn drawn(&self) -> Vec<Vec<String>> {
            self.pages.borrow().iter().map(|(_, lines)| lines.clone()).collect()
        }
    }

    impl PageSink for RecordingSink {
        fn write_page(&self, lines: &[String], path: &Path) -> Result<Vec<String>> {
            let fit = fit_height(lines, &self.canvas);
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            self.pages.borrow_mut().push((name, fit.placed.to_vec()));

            let blank = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
            DynamicImage::ImageRgb8(blank).save(path).unwrap();
            Ok(fit.overflow.to_vec())
        }
    }

    struct TenPx;

    impl TextMeasure for TenPx {
        fn text_width(&self, text: &str) -> f32 {
            text.chars().count() as f32 * 10.0
        }
    }

    /// 3 lines per page: (200 - 2*20) / 50 = 3.2.
    fn canvas() -> CanvasConfig {
        CanvasConfig {
            width: 200,
            height: 200,
            margin: 20,
            font_size: 40.0,
            line_spacing: 10,
            ink: [0, 0, 255],
        }
    }

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {i}")).collect()
    }

    fn config_in(dir: &Path) -> PipelineConfig {
        PipelineConfig {
            input_path: dir.join("letter.pdf"),
            output_dir: dir.join("pages"),
            output_pdf: dir.join("letter-handwritten.pdf"),
            canvas: canvas(),
            layout: LayoutConfig {
                mode: LayoutMode::FixedWordCount {
                    words_per_line: 2,
                    lines_per_page: 20,
                },
            },
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn overflow_continues_on_new_pages() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RecordingSink::new(canvas());

        let pages = write_blocks(
            &sink,
            vec![lines(7)],
            dir.path(),
            &canvas(),
            OverflowPolicy::NewPage,
        )
        .unwrap();

        assert_eq!(pages, 3);
        assert_eq!(sink.drawn().concat(), lines(7));
        let names: Vec<String> = sink.pages.borrow().iter().map(|(n, _)| n.clone()).collect();
        assert_eq!(names, vec!["page_0001.jpg", "page_0002.jpg", "page_0003.jpg"]);
    }

    #[test]
    fn each_block_starts_a_fresh_page() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RecordingSink::new(canvas());

        let blocks = vec![lines(2), lines(4)];
        let pages =
            write_blocks(&sink, blocks, dir.path(), &canvas(), OverflowPolicy::NewPage).unwrap();

        assert_eq!(pages, 3);
        let drawn = sink.drawn();
        assert_eq!(drawn[0], lines(2));
        assert_eq!(drawn[1], lines(3));
        assert_eq!(drawn[2], vec!["line 4".to_string()]);
    }

    #[test]
    fn discard_policy_drops_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RecordingSink::new(canvas());

        let blocks = vec![lines(7), lines(1)];
        let pages =
            write_blocks(&sink, blocks, dir.path(), &canvas(), OverflowPolicy::Discard).unwrap();

        assert_eq!(pages, 2);
        assert_eq!(sink.drawn(), vec![lines(3), lines(1)]);
    }

    #[test]
    fn canvas_too_short_is_an_error_not_a_loop() {
        let dir = tempfile::tempdir().unwrap();
        let tiny = CanvasConfig {
            height: 80,
            ..canvas()
        };
        let sink = RecordingSink::new(tiny);

        let policy = OverflowPolicy::NewPage;
        let result = write_blocks(&sink, vec![lines(2)], dir.path(), &tiny, policy);
        assert!(matches!(result, Err(HandpressError::Layout(_))));
        assert!(sink.drawn().is_empty());
    }

    #[test]
    fn discard_policy_skips_a_block_that_cannot_fit() {
        let dir = tempfile::tempdir().unwrap();
        let tiny = CanvasConfig {
            height: 80,
            ..canvas()
        };
        let sink = RecordingSink::new(tiny);

        let policy = OverflowPolicy::Discard;
        let pages = write_blocks(&sink, vec![lines(2)], dir.path(), &tiny, policy).unwrap();
        assert_eq!(pages, 0);
        assert!(sink.drawn().is_empty());
    }

    #[test]
    fn empty_text_writes_no_pages_and_no_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let output_pdf = config.output_pdf.clone();
        let pipeline = Pipeline::new(config, None);
        let sink = RecordingSink::new(canvas());

        let result = pipeline.paint("   \n ", &TenPx, &sink).unwrap();

        assert_eq!(
            result,
            PaintResult {
                pages_written: 0,
                pdf_path: None
            }
        );
        assert!(sink.drawn().is_empty());
        assert!(!output_pdf.exists());
    }

    #[test]
    fn paint_writes_pages_and_assembles_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let pipeline = Pipeline::new(config.clone(), None);
        let sink = RecordingSink::new(canvas());

        // 2 words per line, 3 lines per page: 9 words -> 5 lines -> 2 pages.
        let text = "the quick brown fox jumps over the lazy dog";
        let result = pipeline.paint(text, &TenPx, &sink).unwrap();

        assert_eq!(result.pages_written, 2);
        assert_eq!(result.pdf_path, Some(config.output_pdf.clone()));
        assert!(config.output_pdf.is_file());
        assert_eq!(
            sink.drawn(),
            vec![
                vec!["the quick", "brown fox", "jumps over"],
                vec!["the lazy", "dog"],
            ]
        );
    }

    #[test]
    fn stale_pages_from_an_earlier_run_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::create_dir_all(&config.output_dir).unwrap();
        for n in 1..=4 {
            let blank = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
            DynamicImage::ImageRgb8(blank)
                .save(config.output_dir.join(page_file_name(n)))
                .unwrap();
        }
        std::fs::write(config.output_dir.join("keep.txt"), "mine").unwrap();

        let pipeline = Pipeline::new(config.clone(), None);
        let sink = RecordingSink::new(canvas());
        let result = pipeline.paint("one two", &TenPx, &sink).unwrap();

        assert_eq!(result.pages_written, 1);
        let remaining = PdfAssembler::collect_page_images(&config.output_dir).unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(config.output_dir.join("keep.txt").exists());
    }

    #[test]
    fn run_rejects_invalid_config_before_touching_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.canvas.margin = 500;
        let pipeline = Pipeline::new(config, None);
        assert!(matches!(pipeline.run(), Err(HandpressError::Config(_))));
    }
}
