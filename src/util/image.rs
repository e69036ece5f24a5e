//! Server-side verification of uploaded images.
//!
//! Clients submit images as base64 data URLs. The declared media type is
//! checked against an allowlist and against the decoded payload's magic
//! bytes, and the decoded size is capped, before anything reaches storage.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::debug;

/// Maximum decoded image size accepted by the server (matches the client cap).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Not a valid image data URL")]
    InvalidDataUrl,
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("Failed to decode image payload: {0}")]
    DecodeFailed(String),
    #[error("Image is {size} bytes, exceeding the {max} byte limit")]
    TooLarge { size: usize, max: usize },
    #[error("Image payload does not match declared type {0}")]
    ContentMismatch(String),
}

/// A decoded, verified image ready for object storage.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub extension: &'static str,
}

/// Media types accepted for upload, with the file extension used for object keys.
fn allowed_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some(".png"),
        "image/jpeg" | "image/jpg" => Some(".jpg"),
        "image/gif" => Some(".gif"),
        "image/webp" => Some(".webp"),
        _ => None,
    }
}

/// Sniff the media type from the payload's magic bytes.
pub fn sniff_content_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    None
}

/// Two declared types that map to the same extension count as the same family.
fn same_family(declared: &str, sniffed: &str) -> bool {
    allowed_extension(declared) == allowed_extension(sniffed)
}

/// Parse and verify a `data:image/...;base64,...` payload.
pub fn parse_data_url(data_url: &str) -> Result<DecodedImage, ImageError> {
    let rest = data_url.strip_prefix("data:").ok_or(ImageError::InvalidDataUrl)?;

    let (header, payload) = rest.split_once(',').ok_or(ImageError::InvalidDataUrl)?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or(ImageError::InvalidDataUrl)?
        .trim();

    let extension = allowed_extension(media_type)
        .ok_or_else(|| ImageError::UnsupportedMediaType(media_type.to_string()))?;

    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge {
            size: bytes.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    // The declared type must agree with what the bytes actually are.
    let sniffed = sniff_content_type(&bytes)
        .ok_or_else(|| ImageError::ContentMismatch(media_type.to_string()))?;
    if !same_family(media_type, sniffed) {
        return Err(ImageError::ContentMismatch(media_type.to_string()));
    }

    debug!(
        "Decoded {} image ({} bytes)",
        sniffed,
        bytes.len()
    );

    Ok(DecodedImage {
        bytes,
        content_type: sniffed.to_string(),
        extension,
    })
}
