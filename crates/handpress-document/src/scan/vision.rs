// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hosted vision model client — sends one scanned page image with a fixed
// instruction to the Gemini `generateContent` REST endpoint and returns the
// text it reads back.
//
// Calls are synchronous and made once per page: no batching, no retry.

use base64::Engine;
use handpress_core::error::HandpressError;
use handpress_core::{ApiKey, DocumentType, VisionConfig};
use image::DynamicImage;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::imaging;

const API_KEY_HEADER: &str = "x-goog-api-key";

// -- Wire format --------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: Blob },
}

#[derive(Debug, Serialize)]
struct Blob {
    mime_type: &'static str,
    /// Base64-encoded bytes.
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

// -- Client -------------------------------------------------------------------

/// Blocking client for one vision model.
pub struct VisionClient {
    http: Client,
    config: VisionConfig,
    api_key: ApiKey,
}

impl VisionClient {
    pub fn new(config: VisionConfig, api_key: ApiKey) -> Self {
        Self {
            http: Client::new(),
            config,
            api_key,
        }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Full `generateContent` URL for the configured model.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Read the text of one page image.
    pub fn extract_image_text(&self, image: &DynamicImage) -> Result<String, HandpressError> {
        let png = imaging::encode_png(image)?;
        self.extract_png_text(&png)
    }

    /// Send PNG bytes with the configured prompt; return the model's text.
    #[instrument(skip_all, fields(model = %self.config.model, png_bytes = png.len()))]
    pub fn extract_png_text(&self, png: &[u8]) -> Result<String, HandpressError> {
        let request = build_request(&self.config.prompt, png);

        info!("Sending page to vision model");
        let response = self
            .http
            .post(self.endpoint_url())
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&request)
            .send()
            .map_err(|err| HandpressError::Vision(format!("request failed: {}", err)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| HandpressError::Vision(format!("failed to read response: {}", err)))?;

        if !status.is_success() {
            return Err(HandpressError::Vision(describe_failure(status.as_u16(), &body)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|err| HandpressError::Vision(format!("malformed response: {}", err)))?;
        let text = response_text(parsed)?;
        debug!(chars = text.len(), "Vision model replied");
        Ok(text)
    }
}

fn build_request<'a>(prompt: &'a str, png: &[u8]) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![
                Part::Text { text: prompt },
                Part::InlineData {
                    inline_data: Blob {
                        mime_type: DocumentType::Png.mime_type(),
                        data: base64::engine::general_purpose::STANDARD.encode(png),
                    },
                },
            ],
        }],
    }
}

/// Concatenated text parts of the first candidate.
///
/// A reply whose text parts are all empty (a blank page) yields `""`; only a
/// reply with no candidate or no text part at all is an error.
fn response_text(response: GenerateResponse) -> Result<String, HandpressError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| HandpressError::Vision("response contained no candidates".into()))?;

    let texts: Vec<String> = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if texts.is_empty() {
        return Err(HandpressError::Vision("response contained no text".into()));
    }
    Ok(texts.concat())
}

fn describe_failure(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(kind) => format!("HTTP {}: {} ({})", status, envelope.error.message, kind),
            None => format!("HTTP {}: {}", status, envelope.error.message),
        },
        Err(_) => format!("HTTP {}: {}", status, body.trim()),
    }
}
