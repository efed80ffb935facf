//! Clipboard paste pipeline for image notes.
//!
//! Filters paste payloads by MIME type, decodes them to natural
//! dimensions and produces the data URI the image note stores.

use base64::{Engine, engine::general_purpose::STANDARD};
use corkboard_core::geometry;
use kurbo::Size;
use thiserror::Error;

/// Largest side a pasted image note may have; bigger pastes are scaled
/// down proportionally before entering the store.
pub const MAX_PASTED_IMAGE_SIDE: f64 = 300.0;

/// Paste pipeline errors.
#[derive(Debug, Error)]
pub enum PasteError {
    #[error("Unsupported clipboard type: {0}")]
    UnsupportedMime(String),
    #[error("Image decode failed: {0}")]
    Decode(String),
}

/// A decoded paste payload ready for `add_image_note`.
#[derive(Debug, Clone)]
pub struct PastedImage {
    /// Base64 data URI embedding the original bytes.
    pub data_uri: String,
    /// Natural pixel dimensions of the decoded image.
    pub natural_size: Size,
}

impl PastedImage {
    /// Display size after applying the paste bound.
    pub fn display_size(&self) -> Size {
        geometry::fit_dimensions(self.natural_size, MAX_PASTED_IMAGE_SIDE)
    }
}

/// Check if a clipboard item's MIME type is an image.
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Decode pasted bytes into a displayable image source.
pub fn decode_pasted_image(mime: &str, bytes: &[u8]) -> Result<PastedImage, PasteError> {
    if !is_image_mime(mime) {
        return Err(PasteError::UnsupportedMime(mime.to_string()));
    }

    let decoded =
        image::load_from_memory(bytes).map_err(|err| PasteError::Decode(err.to_string()))?;

    Ok(PastedImage {
        data_uri: format!("data:{mime};base64,{}", STANDARD.encode(bytes)),
        natural_size: Size::new(decoded.width() as f64, decoded.height() as f64),
    })
}
