// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — text-layer reading, page rasterisation, and assembling page
// images into a PDF.

pub mod raster;
pub mod reader;
pub mod writer;

pub use raster::PdfRasterizer;
pub use reader::PdfTextReader;
pub use writer::PdfAssembler;
