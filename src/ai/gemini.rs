use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{Value, json};

use super::{AiGateway, GenerationRequest, Part};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini `generateContent` backend with schema-constrained JSON output.
///
/// One client per process is enough; share it by reference. No request
/// timeout is set, so a hung call lasts as long as the transport allows.
pub struct GeminiGateway {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiGateway {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url,
            client: Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request URL. The API key travels in the `x-goog-api-key` header so it
    /// never shows up in transport error messages.
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Request body for `generateContent`.
pub(crate) fn build_body(request: &GenerationRequest) -> Value {
    let parts: Vec<Value> = request
        .parts
        .iter()
        .map(|part| match part {
            Part::Text(text) => json!({ "text": text }),
            Part::InlineData { mime_type, data } => json!({
                "inline_data": {
                    "mime_type": mime_type,
                    "data": data
                }
            }),
        })
        .collect();

    json!({
        "contents": [
            { "parts": parts }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.response_schema
        }
    })
}

/// Concatenate the text parts of the first candidate.
///
/// `None` when there is no candidate or it carries no text.
pub(crate) fn extract_text(response: &Value) -> Option<String> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect();
    if text.is_empty() { None } else { Some(text) }
}

#[async_trait::async_trait]
impl AiGateway for GeminiGateway {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>> {
        let body = build_body(request);
        log::debug!(
            "Gemini request: model={}, {} part(s), {} bytes",
            self.model,
            request.parts.len(),
            body.to_string().len()
        );

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("Gemini request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("Failed to read Gemini response")?;

        if !status.is_success() {
            anyhow::bail!("Gemini API error ({}): {}", status, text);
        }

        let json: Value =
            serde_json::from_str(&text).context("Failed to parse Gemini response JSON")?;

        if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
            log::warn!("Gemini blocked the prompt: {reason}");
        }

        Ok(extract_text(&json))
    }
}
