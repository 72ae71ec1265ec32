// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local OCR for plain image inputs, using the `ocrs` crate (a pure-Rust OCR
// engine whose neural network models run on `rten`).
//
// # Feature Gate
//
// Only compiled with the `ocr` feature:
//
// ```toml
// handpress-document = { path = "crates/handpress-document", features = ["ocr"] }
// ```
//
// # Model Setup
//
// Two model files are required:
//
// - `text-detection.rten` — locates text regions in the image.
// - `text-recognition.rten` — decodes characters from detected regions.
//
// Running `ocrs-cli` once downloads both into `$XDG_CACHE_HOME/ocrs`
// (typically `~/.cache/ocrs`), which is where `OcrConfig::default()` looks.

use std::path::{Path, PathBuf};

use handpress_core::error::HandpressError;
use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// `$XDG_CACHE_HOME/ocrs`, else `~/.cache/ocrs`, else `./ocrs-models`.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Locations of the two OCR model files.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Both models inside `dir`, under their well-known file names.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// `dir` when given, the default cache directory otherwise.
    pub fn from_optional_dir(dir: Option<&Path>) -> Self {
        dir.map(Self::from_dir).unwrap_or_default()
    }

    /// Check that both model files exist.
    pub fn validate(&self) -> Result<(), HandpressError> {
        for (role, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(HandpressError::OcrError(format!(
                    "{} model not found at {}; run `ocrs-cli` once to download models",
                    role,
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Extracts text from raster images. Load once, reuse for many images.
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    /// Load both models and initialise the engine.
    ///
    /// # Errors
    ///
    /// Returns [`HandpressError::OcrError`] if model files are missing or corrupt.
    ///
    /// `ocrs` and `rten` are very slow in debug builds; build in release mode.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: &OcrConfig) -> Result<Self, HandpressError> {
        config.validate()?;

        info!("Loading OCR models");
        let detection_model = load_model(&config.detection_model_path)?;
        let recognition_model = load_model(&config.recognition_model_path)?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| {
            HandpressError::OcrError(format!("failed to initialise OCR engine: {}", err))
        })?;

        Ok(Self { engine })
    }

    /// Recognise all text in `image`, one output line per detected text line.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn recognize_text(&self, image: &DynamicImage) -> Result<String, HandpressError> {
        info!("Starting OCR text recognition");

        // ocrs expects RGB8.
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            HandpressError::OcrError(format!(
                "failed to create image source ({}x{}): {}",
                width, height, err
            ))
        })?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| HandpressError::OcrError(format!("OCR preprocessing failed: {}", err)))?;

        let text = self.engine.get_text(&input).map_err(|err| {
            HandpressError::OcrError(format!("OCR text recognition failed: {}", err))
        })?;

        debug!(lines = text.lines().count(), chars = text.len(), "OCR complete");
        Ok(text)
    }
}

fn load_model(path: &Path) -> Result<Model, HandpressError> {
    Model::load_file(path).map_err(|err| {
        HandpressError::OcrError(format!("failed to load model {}: {}", path.display(), err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_well_known_names() {
        let config = OcrConfig::default();
        assert!(config.detection_model_path.ends_with(DETECTION_MODEL_FILENAME));
        assert!(config.recognition_model_path.ends_with(RECOGNITION_MODEL_FILENAME));
    }

    #[test]
    fn explicit_dir_overrides_cache() {
        let config = OcrConfig::from_optional_dir(Some(Path::new("/opt/models")));
        assert_eq!(
            config.detection_model_path,
            PathBuf::from("/opt/models/text-detection.rten")
        );
        assert_eq!(
            config.recognition_model_path,
            PathBuf::from("/opt/models/text-recognition.rten")
        );
    }

    #[test]
    fn missing_models_fail_validation() {
        let config = OcrConfig::from_dir("/nonexistent/ocr-models");
        assert!(matches!(config.validate(), Err(HandpressError::OcrError(_))));
        assert!(OcrEngine::new(&config).is_err());
    }
}
