// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — inspect the character layer of an existing PDF and extract its
// text using the `lopdf` crate.

use std::path::Path;

use handpress_core::error::HandpressError;
use lopdf::Document;
use tracing::{debug, info, instrument};

/// Reads the text layer of an existing PDF file.
pub struct PdfTextReader {
    document: Document,
}

impl PdfTextReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HandpressError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            HandpressError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, HandpressError> {
        let document = Document::load_mem(data).map_err(|err| {
            HandpressError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Whether any page exposes non-whitespace text.
    ///
    /// Stops at the first page with text, so a typed document is classified
    /// after reading a single page.
    pub fn has_text_layer(&self) -> Result<bool, HandpressError> {
        for page_number in self.page_numbers() {
            if !self.page_text(page_number)?.trim().is_empty() {
                debug!(page_number, "Text layer found");
                return Ok(true);
            }
        }
        Ok(false)
    }

    // -- Extraction -----------------------------------------------------------

    /// Text of a single page (1-indexed).
    pub fn page_text(&self, page_number: u32) -> Result<String, HandpressError> {
        self.document.extract_text(&[page_number]).map_err(|err| {
            HandpressError::PdfError(format!(
                "failed to extract text from page {}: {}",
                page_number, err
            ))
        })
    }

    /// Concatenated text of every page, in page order.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn extract_text(&self) -> Result<String, HandpressError> {
        let mut text = String::new();
        for page_number in self.page_numbers() {
            text.push_str(&self.page_text(page_number)?);
        }
        debug!(chars = text.len(), "PDF text extracted");
        Ok(text)
    }

    /// Page numbers in ascending order. lopdf keys pages 1-indexed.
    fn page_numbers(&self) -> Vec<u32> {
        self.document.get_pages().keys().copied().collect()
    }
}
