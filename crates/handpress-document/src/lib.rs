// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// handpress-document — Document processing for the Handpress pipeline.
//
// Provides PDF operations (text-layer inspection, text extraction, page
// rasterisation, multi-page assembly), text recognition (local OCR and a
// hosted vision model), the layout engine that wraps and paginates text, and
// the page image writer that draws it onto a fixed-size canvas.

pub mod extract;
pub mod imaging;
pub mod layout;
pub mod pdf;
pub mod render;
pub mod scan;

// Re-export the primary structs so callers can use `handpress_document::PdfAssembler` etc.
pub use extract::{InputDocument, PageReader, PageSource, TextExtractor, TextResolver};
pub use layout::{LayoutEngine, TextMeasure};
pub use pdf::raster::PdfRasterizer;
pub use pdf::reader::PdfTextReader;
pub use pdf::writer::PdfAssembler;
pub use render::font::HandwritingFont;
pub use render::page::PageImageWriter;
pub use scan::vision::VisionClient;

#[cfg(feature = "ocr")]
pub use scan::ocr::OcrEngine;
