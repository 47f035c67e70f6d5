//! Profile picture handling
//!
//! Attached bytes are checked against an explicit contract (recognized
//! image format, configured size ceiling) instead of being accepted
//! silently. Preview derivation produces a base64 data URL and runs off
//! the event loop.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::{Error, Result};
use crate::types::{ImageFormat, PictureData};

/// Detect the image format from the magic bytes.
pub fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]) {
        return Some(ImageFormat::Png);
    }
    if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        return Some(ImageFormat::Jpeg);
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some(ImageFormat::Gif);
    }
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some(ImageFormat::Webp);
    }
    None
}

/// Check an attached byte stream against the picture contract.
pub fn check_picture(bytes: &[u8], max_bytes: usize) -> Result<ImageFormat> {
    if bytes.len() > max_bytes {
        return Err(Error::PictureTooLarge {
            size_bytes: bytes.len(),
            max_bytes,
        });
    }

    sniff_format(bytes).ok_or_else(|| {
        Error::picture_unsupported("byte stream is not a PNG, JPEG, GIF, or WebP image")
    })
}

/// Derive the base64 data URL preview for an attached picture.
///
/// The encode runs on the blocking pool so large images never stall the
/// event loop.
pub async fn derive_preview(picture: PictureData) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let encoded = BASE64.encode(&picture.bytes);
        format!("data:{};base64,{}", picture.format.mime_type(), encoded)
    })
    .await
    .map_err(|e| Error::PictureDecodeFailed {
        message: e.to_string(),
    })
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
