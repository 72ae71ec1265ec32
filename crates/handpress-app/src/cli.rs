// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments. Every flag is an override on top of the JSON config
// file (or the built-in defaults when no file is given).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use handpress_core::error::Result;
use handpress_core::{DocumentType, LayoutMode, OverflowPolicy, PipelineConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// N words per line, M lines per page.
    Fixed,
    /// Chunks of K words wrapped to the measured page width.
    Measured,
}

/// Turn a PDF or image into handwriting-style pages and a PDF.
#[derive(Debug, Parser)]
#[command(name = "handpress", version, about)]
pub struct Cli {
    /// Input document (PDF, JPEG, PNG or TIFF).
    pub input: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Input type; `image` means PNG. Inferred from the extension otherwise.
    #[arg(long)]
    pub input_type: Option<DocumentType>,

    /// Handwriting TrueType font.
    #[arg(short, long)]
    pub font: Option<PathBuf>,

    /// Directory for the page images.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Path of the assembled PDF.
    #[arg(short, long)]
    pub output_pdf: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    #[arg(long)]
    pub words_per_chunk: Option<usize>,

    #[arg(long)]
    pub words_per_line: Option<usize>,

    #[arg(long)]
    pub lines_per_page: Option<usize>,

    /// Canvas width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    #[arg(long)]
    pub margin: Option<u32>,

    #[arg(long)]
    pub font_size: Option<f32>,

    /// Extra pixels between consecutive lines.
    #[arg(long)]
    pub line_spacing: Option<u32>,

    /// Ink colour as `#rrggbb`.
    #[arg(long, value_parser = parse_hex_color)]
    pub ink: Option<[u8; 3]>,

    /// Keep page images at their drawn size inside the PDF.
    #[arg(long)]
    pub no_resize: bool,

    /// Drop lines that do not fit on a page instead of starting a new one.
    #[arg(long)]
    pub discard_overflow: bool,

    /// Directory holding the OCR detection and recognition models.
    #[arg(long)]
    pub ocr_models: Option<PathBuf>,

    #[arg(long)]
    pub vision_model: Option<String>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Load the config file if one was named, then apply every override.
    pub fn into_config(self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if self.input_type.is_some() {
            config.input_type = self.input_type;
        }
        if let Some(font) = &self.font {
            config.font_path = font.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(pdf) = &self.output_pdf {
            config.output_pdf = pdf.clone();
        }

        config.layout.mode = self.layout_mode(config.layout.mode);

        let canvas = &mut config.canvas;
        if let Some(width) = self.width {
            canvas.width = width;
        }
        if let Some(height) = self.height {
            canvas.height = height;
        }
        if let Some(margin) = self.margin {
            canvas.margin = margin;
        }
        if let Some(size) = self.font_size {
            canvas.font_size = size;
        }
        if let Some(spacing) = self.line_spacing {
            canvas.line_spacing = spacing;
        }
        if let Some(ink) = self.ink {
            canvas.ink = ink;
        }

        if self.no_resize {
            config.resize_pages = false;
        }
        if self.discard_overflow {
            config.overflow = OverflowPolicy::Discard;
        }
        if let Some(dir) = &self.ocr_models {
            config.ocr_model_dir = Some(dir.clone());
        }
        if let Some(model) = &self.vision_model {
            config.vision.model = model.clone();
        }
    }

    /// Switching mode starts from that mode's defaults; counts given on the
    /// command line apply only to the mode they belong to.
    fn layout_mode(&self, current: LayoutMode) -> LayoutMode {
        let mut mode = match (self.mode, current) {
            (None, mode) => mode,
            (Some(ModeArg::Fixed), mode @ LayoutMode::FixedWordCount { .. }) => mode,
            (Some(ModeArg::Fixed), _) => LayoutMode::fixed(),
            (Some(ModeArg::Measured), mode @ LayoutMode::MeasuredWidth { .. }) => mode,
            (Some(ModeArg::Measured), _) => LayoutMode::measured(),
        };

        match &mut mode {
            LayoutMode::FixedWordCount {
                words_per_line,
                lines_per_page,
            } => {
                if let Some(n) = self.words_per_line {
                    *words_per_line = n;
                }
                if let Some(m) = self.lines_per_page {
                    *lines_per_page = m;
                }
            }
            LayoutMode::MeasuredWidth { words_per_chunk } => {
                if let Some(k) = self.words_per_chunk {
                    *words_per_chunk = k;
                }
            }
        }
        mode
    }
}

fn parse_hex_color(value: &str) -> std::result::Result<[u8; 3], String> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("expected #rrggbb, got `{}`", value));
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("handpress").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_flags_keeps_defaults() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let config = parse(&[
            "letter.pdf",
            "--font",
            "fonts/quill.ttf",
            "--width",
            "800",
            "--ink",
            "#102030",
            "--no-resize",
            "--discard-overflow",
            "--vision-model",
            "gemini-1.5-pro",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.input_path, PathBuf::from("letter.pdf"));
        assert_eq!(config.font_path, PathBuf::from("fonts/quill.ttf"));
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.canvas.ink, [0x10, 0x20, 0x30]);
        assert!(!config.resize_pages);
        assert_eq!(config.overflow, OverflowPolicy::Discard);
        assert_eq!(config.vision.model, "gemini-1.5-pro");
    }

    #[test]
    fn image_input_type_means_png() {
        let cli = parse(&["scan.bin", "--input-type", "image"]);
        assert_eq!(cli.input_type, Some(DocumentType::Png));
    }

    #[test]
    fn switching_to_fixed_mode_uses_its_counts() {
        let config = parse(&["--mode", "fixed", "--words-per-line", "3", "--words-per-chunk", "9"])
            .into_config()
            .unwrap();
        assert_eq!(
            config.layout.mode,
            LayoutMode::FixedWordCount {
                words_per_line: 3,
                lines_per_page: LayoutMode::DEFAULT_LINES_PER_PAGE,
            }
        );
    }

    #[test]
    fn chunk_size_applies_to_measured_mode() {
        let config = parse(&["--words-per-chunk", "50"]).into_config().unwrap();
        assert_eq!(
            config.layout.mode,
            LayoutMode::MeasuredWidth { words_per_chunk: 50 }
        );
    }

    #[test]
    fn config_file_is_the_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handpress.json");
        let mut saved = PipelineConfig::default();
        saved.canvas.margin = 60;
        saved.output_dir = PathBuf::from("out/pages");
        saved.save(&path).unwrap();

        let config = parse(&["--config", path.to_str().unwrap(), "--margin", "80"])
            .into_config()
            .unwrap();
        assert_eq!(config.canvas.margin, 80);
        assert_eq!(config.output_dir, PathBuf::from("out/pages"));
    }

    #[test]
    fn hex_colours() {
        assert_eq!(parse_hex_color("#0000ff").unwrap(), [0, 0, 255]);
        assert_eq!(parse_hex_color("FF8000").unwrap(), [255, 128, 0]);
        assert!(parse_hex_color("#00f").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
        assert!(Cli::try_parse_from(["handpress", "--ink", "blue"]).is_err());
    }
}
