// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Handpress.

use thiserror::Error;

/// Top-level error type for all Handpress operations.
#[derive(Debug, Error)]
pub enum HandpressError {
    // -- Input / extraction --
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    #[error("vision model request failed: {0}")]
    Vision(String),

    #[error("missing credential: {0}")]
    MissingCredential(String),

    // -- Layout / rendering --
    #[error("font error: {0}")]
    Font(String),

    #[error("layout failed: {0}")]
    Layout(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HandpressError>;
