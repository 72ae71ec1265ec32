// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognition for pages without a character layer: a local OCR engine
// for plain images and a hosted vision model for scanned PDF pages.

#[cfg(feature = "ocr")]
pub mod ocr;
pub mod vision;

#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;
pub use vision::VisionClient;
