// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Height fitting — how many already-wrapped lines fit between the top and
// bottom margins of a canvas.

use handpress_core::CanvasConfig;
use handpress_core::error::HandpressError;

/// Result of fitting lines onto one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightFit<'a, T> {
    /// Lines that fit, in input order.
    pub placed: &'a [T],
    /// Every line from the first one that did not fit, in input order.
    pub overflow: &'a [T],
}

/// Walk `lines` from the top margin, placing each while
/// `y + line_height <= canvas_height - margin`. The first line that would
/// cross the bottom margin and everything after it are overflow.
pub fn fit_height<'a, T>(lines: &'a [T], canvas: &CanvasConfig) -> HeightFit<'a, T> {
    let line_height = canvas.line_height();
    let bottom = canvas.height as f32 - canvas.margin as f32;

    let mut y = canvas.margin as f32;
    let mut placed = 0;
    for _ in lines {
        if y + line_height > bottom {
            break;
        }
        y += line_height;
        placed += 1;
    }

    let (placed, overflow) = lines.split_at(placed);
    HeightFit { placed, overflow }
}

/// y coordinate of the top of the `index`-th line on a page.
pub fn line_top(index: usize, canvas: &CanvasConfig) -> f32 {
    canvas.margin as f32 + index as f32 * canvas.line_height()
}

/// Split `lines` into consecutive pages by repeated height fitting.
///
/// Fails when lines remain but the canvas cannot hold even one of them.
pub fn paginate(
    lines: Vec<String>,
    canvas: &CanvasConfig,
) -> Result<Vec<Vec<String>>, HandpressError> {
    let mut pages = Vec::new();
    let mut rest = lines.as_slice();

    while !rest.is_empty() {
        let fit = fit_height(rest, canvas);
        if fit.placed.is_empty() {
            return Err(HandpressError::Layout(format!(
                "a {}px line does not fit a {}px canvas with {}px margins",
                canvas.line_height(),
                canvas.height,
                canvas.margin
            )));
        }
        pages.push(fit.placed.to_vec());
        rest = fit.overflow;
    }

    Ok(pages)
}
