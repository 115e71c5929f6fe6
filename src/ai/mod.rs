pub mod prompts;
mod gemini;

pub use gemini::{DEFAULT_BASE_URL, GeminiGateway};

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::encoder::EncodedImage;

/// One piece of a multimodal request.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    /// Base64 image payload with its media type.
    InlineData { mime_type: String, data: String },
}

impl From<&EncodedImage> for Part {
    fn from(image: &EncodedImage) -> Self {
        Part::InlineData {
            mime_type: image.mime_type.clone(),
            data: image.data.clone(),
        }
    }
}

/// A structured-generation request: content parts plus the shape the
/// model must answer with.
///
/// Build these through the constructors in [`prompts`]; every request pairs an
/// instruction with a response schema.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub parts: Vec<Part>,
    /// Declarative response schema (OpenAPI subset as accepted by Gemini).
    pub response_schema: Value,
}

impl GenerationRequest {
    /// Image followed by an instruction.
    pub fn with_image(image: &EncodedImage, instruction: &str, response_schema: Value) -> Self {
        Self {
            parts: vec![Part::from(image), Part::Text(instruction.to_string())],
            response_schema,
        }
    }

    /// Text prompt only.
    pub fn text(prompt: String, response_schema: Value) -> Self {
        Self {
            parts: vec![Part::Text(prompt)],
            response_schema,
        }
    }

    /// Concatenated text parts, handy for logging and assertions.
    pub fn prompt_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::InlineData { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Trait for structured-generation backends.
///
/// The library ships with [`GeminiGateway`]. Implementations perform a
/// single round trip with no retry, and return `Ok(None)` when the model
/// produced no text at all.
#[async_trait::async_trait]
pub trait AiGateway: Send + Sync {
    /// The display name of this backend (e.g., "Gemini").
    fn name(&self) -> &str;
    /// Send the request and return the model's raw text output.
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>>;
}

/// Failures of the response-parsing step.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("No response from AI")]
    MissingResponse,
    #[error("AI response is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("AI response does not match the expected {expected} shape: {source}")]
    ShapeMismatch {
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse the model's raw text into the expected type.
///
/// Empty or whitespace-only text is [`ParseError::MissingResponse`] and is
/// never handed to the JSON parser. Text that is not JSON is
/// [`ParseError::Malformed`]; JSON that does not fit `T` (missing field, wrong
/// type, unknown enum value) is [`ParseError::ShapeMismatch`].
pub fn parse_structured<T: DeserializeOwned>(
    text: Option<&str>,
    expected: &'static str,
) -> Result<T, ParseError> {
    let text = match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Err(ParseError::MissingResponse),
    };
    log::debug!("Raw AI response:\n{text}");

    let value: Value = serde_json::from_str(text).map_err(ParseError::Malformed)?;
    serde_json::from_value(value)
        .map_err(|source| ParseError::ShapeMismatch { expected, source })
}
