// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Handwriting font — a TrueType/OpenType face loaded with `ab_glyph` at a
// fixed pixel size. It measures text for the layout engine and supplies
// glyphs to the page writer, so wrapping and drawing agree on widths.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use handpress_core::error::HandpressError;
use imageproc::drawing::text_size;
use tracing::{info, instrument};

use crate::layout::TextMeasure;

pub struct HandwritingFont {
    font: FontVec,
    scale: PxScale,
}

impl HandwritingFont {
    /// Load a font file and fix its size to `font_size` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`HandpressError::Font`] if the file is missing or is not a
    /// parseable font.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), font_size = font_size))]
    pub fn load(path: impl AsRef<Path>, font_size: f32) -> Result<Self, HandpressError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|err| {
            HandpressError::Font(format!("cannot read font {}: {}", path.display(), err))
        })?;
        let font = FontVec::try_from_vec(data).map_err(|err| {
            HandpressError::Font(format!("invalid font {}: {}", path.display(), err))
        })?;
        info!("Font loaded");
        Ok(Self::with_face(font, font_size))
    }

    /// Parse font data already in memory.
    pub fn from_bytes(data: Vec<u8>, font_size: f32) -> Result<Self, HandpressError> {
        let font = FontVec::try_from_vec(data)
            .map_err(|err| HandpressError::Font(format!("invalid font data: {}", err)))?;
        Ok(Self::with_face(font, font_size))
    }

    fn with_face(font: FontVec, font_size: f32) -> Self {
        Self {
            font,
            scale: PxScale::from(font_size),
        }
    }

    pub fn face(&self) -> &FontVec {
        &self.font
    }

    pub fn scale(&self) -> PxScale {
        self.scale
    }
}

impl TextMeasure for HandwritingFont {
    fn text_width(&self, text: &str) -> f32 {
        text_size(self.scale, &self.font, text).0 as f32
    }
}
