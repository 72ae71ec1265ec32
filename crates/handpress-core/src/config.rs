// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration. Fixed at invocation and passed explicitly into each
// component; nothing here is read from global state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HandpressError, Result};
use crate::types::DocumentType;

/// Environment variable holding the hosted vision model credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Fixed instruction sent with every scanned page.
pub const DEFAULT_VISION_PROMPT: &str = "Extract all typed text from this scanned document page.";

/// Complete settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Forces the input type; inferred from the file extension when `None`.
    pub input_type: Option<DocumentType>,
    /// The document to convert.
    pub input_path: PathBuf,
    /// TrueType/OpenType handwriting font.
    pub font_path: PathBuf,
    /// Directory receiving the per-page images.
    pub output_dir: PathBuf,
    /// Path of the assembled PDF.
    pub output_pdf: PathBuf,
    pub layout: LayoutConfig,
    pub canvas: CanvasConfig,
    pub vision: VisionConfig,
    /// Directory holding the OCR models; the ocrs cache directory when `None`.
    pub ocr_model_dir: Option<PathBuf>,
    /// Resize every page image to the canvas size before assembly.
    pub resize_pages: bool,
    pub overflow: OverflowPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_type: None,
            input_path: PathBuf::from("input.pdf"),
            font_path: PathBuf::from("daniel.ttf"),
            output_dir: PathBuf::from("outputs"),
            output_pdf: PathBuf::from("outputs/handwritten.pdf"),
            layout: LayoutConfig::default(),
            canvas: CanvasConfig::default(),
            vision: VisionConfig::default(),
            ocr_model_dir: None,
            resize_pages: true,
            overflow: OverflowPolicy::NewPage,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|err| {
            HandpressError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject settings that would make layout impossible.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.canvas.validate()?;
        if self.vision.render_dpi == 0 {
            return Err(HandpressError::Config("render DPI must be positive".into()));
        }
        Ok(())
    }
}

/// Which layout pass turns text into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutMode {
    /// Pure counting: N words per line, M lines per page.
    FixedWordCount {
        words_per_line: usize,
        lines_per_page: usize,
    },
    /// Chunks of K words, each wrapped greedily to the measured canvas width.
    MeasuredWidth { words_per_chunk: usize },
}

impl LayoutMode {
    pub const DEFAULT_WORDS_PER_LINE: usize = 7;
    pub const DEFAULT_LINES_PER_PAGE: usize = 20;
    pub const DEFAULT_WORDS_PER_CHUNK: usize = 200;

    pub fn fixed() -> Self {
        Self::FixedWordCount {
            words_per_line: Self::DEFAULT_WORDS_PER_LINE,
            lines_per_page: Self::DEFAULT_LINES_PER_PAGE,
        }
    }

    pub fn measured() -> Self {
        Self::MeasuredWidth {
            words_per_chunk: Self::DEFAULT_WORDS_PER_CHUNK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::measured(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        match self.mode {
            LayoutMode::FixedWordCount {
                words_per_line,
                lines_per_page,
            } => {
                if words_per_line == 0 || lines_per_page == 0 {
                    return Err(HandpressError::Config(
                        "words per line and lines per page must be positive".into(),
                    ));
                }
            }
            LayoutMode::MeasuredWidth { words_per_chunk } => {
                if words_per_chunk == 0 {
                    return Err(HandpressError::Config(
                        "words per chunk must be positive".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Fixed-size drawing surface for one page image. All values are pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub font_size: f32,
    pub line_spacing: u32,
    /// RGB ink colour.
    pub ink: [u8; 3],
}

impl Default for CanvasConfig {
    /// A4 at roughly 150 DPI with blue ink.
    fn default() -> Self {
        Self {
            width: 1240,
            height: 1754,
            margin: 100,
            font_size: 32.0,
            line_spacing: 10,
            ink: [0, 0, 255],
        }
    }
}

impl CanvasConfig {
    /// Width available to text (canvas width minus both margins).
    pub fn usable_width(&self) -> f32 {
        u64::from(self.width).saturating_sub(self.both_margins()) as f32
    }

    /// Pixels taken by two margins, widened so a huge margin cannot overflow.
    fn both_margins(&self) -> u64 {
        2 * u64::from(self.margin)
    }

    /// Vertical advance per line: font size plus spacing.
    pub fn line_height(&self) -> f32 {
        self.font_size + self.line_spacing as f32
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HandpressError::Config("canvas size must be positive".into()));
        }
        if self.font_size.is_nan() || self.font_size <= 0.0 {
            return Err(HandpressError::Config(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }
        let margins = self.both_margins();
        if margins >= u64::from(self.width) || margins >= u64::from(self.height) {
            return Err(HandpressError::Config(format!(
                "margin {} leaves no usable area on a {}x{} canvas",
                self.margin, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// What happens to lines that do not fit on a page image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Continue the overflow on additional pages.
    NewPage,
    /// Drop the overflow with a warning.
    Discard,
}

/// Hosted vision model used for scanned PDFs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Base URL of the generative language REST API.
    pub endpoint: String,
    pub model: String,
    pub prompt: String,
    /// Rasterisation resolution for scanned pages.
    pub render_dpi: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: "gemini-2.0-flash".into(),
            prompt: DEFAULT_VISION_PROMPT.into(),
            render_dpi: 300,
        }
    }
}

/// Credential for the hosted vision model. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Read the key from [`API_KEY_ENV`]; `None` when unset or blank.
    pub fn from_env() -> Option<Self> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Self)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}
