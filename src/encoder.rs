//! Image → base64 payload for inline request data.
//!
//! Only the payload is sent; any `data:<mime>;base64,` prefix is stripped.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

/// Errors raised while preparing an image.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Image is empty: {0}")]
    Empty(String),
}

/// A base64 image payload together with its media type.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    /// Base64 payload without any data-URL prefix.
    pub data: String,
    pub mime_type: String,
}

impl EncodedImage {
    /// Rebuild the `data:` URL form of this image.
    pub fn to_data_url(&self) -> String {
        to_data_url(&self.mime_type, &self.data)
    }
}

/// Read an image file and encode it.
///
/// The media type is sniffed from the file contents, falling back to the
/// extension and then to `image/jpeg`.
pub fn encode_file(path: &Path) -> Result<EncodedImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    if bytes.is_empty() {
        return Err(EncodeError::Empty(path.display().to_string()).into());
    }

    let mime_type = detect_mime_type(&bytes, Some(path));
    log::debug!(
        "Encoding {} ({} bytes, {mime_type})",
        path.display(),
        bytes.len()
    );

    Ok(EncodedImage {
        data: encode_bytes(&bytes),
        mime_type: mime_type.to_string(),
    })
}

/// Base64-encode raw bytes (standard alphabet, padded).
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a payload, accepting either a bare payload or a full data URL.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(strip_data_url_prefix(encoded))
        .context("Invalid base64 payload")
}

/// Return the payload portion of a data URL.
///
/// Input with no `data:` prefix is returned unchanged.
pub fn strip_data_url_prefix(encoded: &str) -> &str {
    match encoded.strip_prefix("data:") {
        Some(rest) => match rest.split_once(',') {
            Some((_, payload)) => payload,
            None => encoded,
        },
        None => encoded,
    }
}

/// Build `data:<mime>;base64,<payload>`.
pub fn to_data_url(mime_type: &str, payload: &str) -> String {
    format!("data:{mime_type};base64,{payload}")
}

/// Guess the media type of an image from its bytes, then its extension.
pub fn detect_mime_type(bytes: &[u8], path: Option<&Path>) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }
    path.and_then(|p| image::ImageFormat::from_path(p).ok())
        .map(|format| format.to_mime_type())
        .unwrap_or("image/jpeg")
}
