// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rendering — handwriting font loading and rasterising laid-out lines onto
// fixed-size page images with `imageproc`.

pub mod font;
pub mod page;

pub use font::HandwritingFont;
pub use page::{PageImageWriter, page_file_name};

/// Locate a TrueType font installed on the test machine.
#[cfg(test)]
pub(crate) fn system_test_font() -> Option<std::path::PathBuf> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    std::env::var_os("HANDPRESS_TEST_FONT")
        .map(std::path::PathBuf::from)
        .into_iter()
        .chain(CANDIDATES.iter().map(std::path::PathBuf::from))
        .find(|path| path.is_file())
}
