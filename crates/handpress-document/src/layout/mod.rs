// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module — turns a flat text stream into lines and pages.
//
// Two passes exist behind one `LayoutEngine`:
//
// - fixed word count: N words per line, M lines per page, no measuring;
// - measured width: chunks of K words, each wrapped greedily so that every
//   line fits the canvas width as measured by the active font.
//
// Height fitting is separate (`height`), since line height is uniform.

pub mod engine;
pub mod fixed;
pub mod height;
pub mod wrap;

pub use engine::LayoutEngine;
pub use height::{HeightFit, fit_height, paginate};
pub use wrap::wrap_greedy;

/// Measures the rendered width of a run of text, in pixels.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f32;
}

/// Split text into words: maximal runs of non-whitespace.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}
