// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text source resolution — classify an input as a typed PDF, a scanned PDF,
// or a plain image, then route it to the matching extraction strategy.
//
// Every strategy is a single pass over the document. Failures from the
// underlying library or service propagate unchanged; there is no fallback
// from one strategy to another.

use std::path::{Path, PathBuf};

use handpress_core::error::{HandpressError, Result};
use handpress_core::{ApiKey, DocumentType, SourceKind, VisionConfig, config::API_KEY_ENV};
use image::DynamicImage;
use tracing::{debug, info, instrument, warn};

use crate::pdf::{PdfRasterizer, PdfTextReader};
use crate::scan::VisionClient;

/// An input file together with how its text must be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    path: PathBuf,
    document_type: DocumentType,
    kind: SourceKind,
}

impl InputDocument {
    /// Determine the document type (from `type_override` or the file
    /// extension) and, for PDFs, whether a text layer is present.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn inspect(path: impl AsRef<Path>, type_override: Option<DocumentType>) -> Result<Self> {
        let path = path.as_ref();
        let document_type = type_override
            .or_else(|| DocumentType::from_path(path))
            .ok_or_else(|| {
                HandpressError::UnsupportedDocument(format!(
                    "cannot tell the type of {} from its extension",
                    path.display()
                ))
            })?;

        let kind = if document_type.is_pdf() {
            info!("Checking PDF content");
            classify_pdf(&PdfTextReader::open(path)?)?
        } else {
            SourceKind::RawImage
        };

        debug!(?document_type, ?kind, "Input classified");
        Ok(Self {
            path: path.to_path_buf(),
            document_type,
            kind,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Whether the document carries machine-readable text.
    pub fn has_text(&self) -> bool {
        self.kind == SourceKind::TypedText
    }
}

/// Typed if any page has non-whitespace text, scanned otherwise.
pub fn classify_pdf(reader: &PdfTextReader) -> Result<SourceKind> {
    if reader.has_text_layer()? {
        Ok(SourceKind::TypedText)
    } else {
        Ok(SourceKind::ScannedImage)
    }
}

/// A strategy that reads all text out of one document.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Reads the character layer of a typed PDF.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        PdfTextReader::open(path)?.extract_text()
    }
}

/// Yields the pages of a PDF as images, in page order.
pub trait PageSource {
    /// Hand each page to `visit` with its 1-based number; returns the page
    /// count.
    fn visit_pages(
        &self,
        path: &Path,
        dpi: u32,
        visit: &mut dyn FnMut(u32, DynamicImage) -> Result<()>,
    ) -> Result<usize>;
}

impl PageSource for PdfRasterizer {
    fn visit_pages(
        &self,
        path: &Path,
        dpi: u32,
        visit: &mut dyn FnMut(u32, DynamicImage) -> Result<()>,
    ) -> Result<usize> {
        self.for_each_page(path, dpi, visit)
    }
}

/// Reads the text off one page image.
pub trait PageReader {
    fn read_page(&self, image: &DynamicImage) -> Result<String>;
}

impl PageReader for VisionClient {
    fn read_page(&self, image: &DynamicImage) -> Result<String> {
        self.extract_image_text(image)
    }
}

/// Rasterises every page of a scanned PDF and has each one read. Page texts
/// are joined in page order, each followed by a newline.
pub struct ScannedPdfExtractor<S = PdfRasterizer, R = VisionClient> {
    source: S,
    reader: R,
    dpi: u32,
}

impl<S: PageSource, R: PageReader> ScannedPdfExtractor<S, R> {
    pub fn new(source: S, reader: R, dpi: u32) -> Self {
        Self {
            source,
            reader,
            dpi,
        }
    }
}

impl<S: PageSource, R: PageReader> TextExtractor for ScannedPdfExtractor<S, R> {
    fn extract(&self, path: &Path) -> Result<String> {
        let mut text = String::new();
        let pages = self.source.visit_pages(path, self.dpi, &mut |page_number, image| {
            debug!(page_number, "Reading scanned page");
            text.push_str(&self.reader.read_page(&image)?);
            text.push('\n');
            Ok(())
        })?;
        info!(pages, chars = text.len(), "Scanned PDF read");
        Ok(text)
    }
}

/// Runs local OCR on a plain image.
#[cfg(feature = "ocr")]
pub struct ImageOcrExtractor {
    engine: crate::scan::OcrEngine,
}

#[cfg(feature = "ocr")]
impl ImageOcrExtractor {
    pub fn new(engine: crate::scan::OcrEngine) -> Self {
        Self { engine }
    }
}

#[cfg(feature = "ocr")]
impl TextExtractor for ImageOcrExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let image = crate::imaging::open_image(path)?;
        self.engine.recognize_text(&image)
    }
}

/// Builds the extractor for a classified document and runs it.
///
/// External services are only set up for the branch actually taken, so a
/// typed PDF needs neither pdfium, OCR models, nor a credential.
pub struct TextResolver {
    vision: VisionConfig,
    api_key: Option<ApiKey>,
    ocr_model_dir: Option<PathBuf>,
}

impl TextResolver {
    pub fn new(
        vision: VisionConfig,
        api_key: Option<ApiKey>,
        ocr_model_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            vision,
            api_key,
            ocr_model_dir,
        }
    }

    pub fn ocr_model_dir(&self) -> Option<&Path> {
        self.ocr_model_dir.as_deref()
    }

    /// Extract the raw text of `document`.
    #[instrument(skip_all, fields(path = %document.path().display(), kind = %document.kind()))]
    pub fn resolve(&self, document: &InputDocument) -> Result<String> {
        let extractor = self.extractor_for(document.kind())?;
        extractor.extract(document.path())
    }

    /// The extraction strategy for `kind`.
    pub fn extractor_for(&self, kind: SourceKind) -> Result<Box<dyn TextExtractor>> {
        match kind {
            SourceKind::TypedText => {
                info!("Text layer found; extracting directly");
                Ok(Box::new(PdfTextExtractor))
            }
            SourceKind::ScannedImage => {
                warn!("No text layer found; using hosted vision model");
                let api_key = self.api_key.clone().ok_or_else(|| {
                    HandpressError::MissingCredential(format!(
                        "{} must be set to read scanned PDFs",
                        API_KEY_ENV
                    ))
                })?;
                let dpi = self.vision.render_dpi;
                let vision = VisionClient::new(self.vision.clone(), api_key);
                Ok(Box::new(ScannedPdfExtractor::new(
                    PdfRasterizer::new()?,
                    vision,
                    dpi,
                )))
            }
            SourceKind::RawImage => self.image_extractor(),
        }
    }

    #[cfg(feature = "ocr")]
    fn image_extractor(&self) -> Result<Box<dyn TextExtractor>> {
        info!("Image input; running local OCR");
        let config = crate::scan::ocr::OcrConfig::from_optional_dir(self.ocr_model_dir());
        let engine = crate::scan::OcrEngine::new(&config)?;
        Ok(Box::new(ImageOcrExtractor::new(engine)))
    }

    #[cfg(not(feature = "ocr"))]
    fn image_extractor(&self) -> Result<Box<dyn TextExtractor>> {
        Err(HandpressError::UnsupportedDocument(
            "image input requires the `ocr` feature".into(),
        ))
    }
}
