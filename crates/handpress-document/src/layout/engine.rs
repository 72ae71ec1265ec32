// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout engine — the single entry point that turns raw text into blocks of
// lines, one block per page request, according to the configured mode.

use handpress_core::{CanvasConfig, LayoutConfig, LayoutMode};
use tracing::{debug, instrument};

use super::fixed::{chunk_words, format_fixed, paginate_fixed};
use super::wrap::wrap_greedy;
use super::{TextMeasure, split_words};

/// Lays text out for a fixed canvas.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine {
    mode: LayoutMode,
    canvas: CanvasConfig,
}

impl LayoutEngine {
    pub fn new(layout: LayoutConfig, canvas: CanvasConfig) -> Self {
        Self {
            mode: layout.mode,
            canvas,
        }
    }

    /// Split `text` into blocks of lines. Each block starts a new page; a
    /// block taller than the canvas continues on further pages when drawn.
    ///
    /// Fixed mode yields pages of `lines_per_page` lines of `words_per_line`
    /// words. Measured mode yields one block per `words_per_chunk` words,
    /// wrapped to the usable canvas width. Text without words yields no
    /// blocks.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub fn blocks(&self, text: &str, measure: &dyn TextMeasure) -> Vec<Vec<String>> {
        let words = split_words(text);

        let blocks = match self.mode {
            LayoutMode::FixedWordCount {
                words_per_line,
                lines_per_page,
            } => paginate_fixed(format_fixed(&words, words_per_line), lines_per_page),
            LayoutMode::MeasuredWidth { words_per_chunk } => {
                let max_width = self.canvas.usable_width();
                chunk_words(&words, words_per_chunk)
                    .iter()
                    .map(|chunk| wrap_greedy(chunk, measure, max_width))
                    .collect()
            }
        };

        debug!(
            words = words.len(),
            blocks = blocks.len(),
            lines = blocks.iter().map(Vec::len).sum::<usize>(),
            "Layout complete"
        );
        blocks
    }
}
