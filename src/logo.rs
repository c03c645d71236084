//! Logo overlay state and data URL handling.
//!
//! An uploaded logo is kept as a `data:<mime>;base64,<payload>` string, the
//! same embeddable form a browser file reader produces. The renderer decodes
//! it back into pixels on every render.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat};

use crate::error::{QreatorError, Result};

/// Whether a logo is wanted, and the logo itself once one is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogoState {
    enabled: bool,
    data_url: Option<String>,
}

impl LogoState {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn data_url(&self) -> Option<&str> {
        self.data_url.as_deref()
    }

    /// Turning the logo off always drops the loaded image.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.data_url = None;
        }
    }

    /// Replaces the current logo. Ignored while disabled.
    ///
    /// Returns `true` if the state changed.
    pub fn set_data_url(&mut self, data_url: Option<String>) -> bool {
        if !self.enabled || self.data_url == data_url {
            return false;
        }
        self.data_url = data_url;
        true
    }

    /// The overlay to hand to the renderer: only when enabled and loaded.
    pub fn overlay(&self) -> Option<&str> {
        if self.enabled {
            self.data_url.as_deref().filter(|url| !url.is_empty())
        } else {
            None
        }
    }
}

/// Encodes raw file bytes as a data URL, sniffing the MIME type from the content.
///
/// # Example
///
/// ```
/// use qreator::logo::to_data_url;
///
/// let url = to_data_url(b"plain bytes");
/// assert!(url.starts_with("data:application/octet-stream;base64,"));
/// ```
pub fn to_data_url(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Splits a base64 data URL and returns its decoded payload.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| QreatorError::Logo("not a data URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| QreatorError::Logo("data URL has no payload".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(QreatorError::Logo(format!("unsupported data URL encoding: {meta}")));
    }
    STANDARD
        .decode(payload)
        .map_err(|err| QreatorError::Logo(err.to_string()))
}

/// Decodes a data URL into an image. The MIME type in the URL is advisory;
/// the format is detected from the payload.
pub fn decode_logo(data_url: &str) -> Result<DynamicImage> {
    let bytes = decode_data_url(data_url)?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Encodes an image as a PNG data URL.
pub fn image_to_data_url(image: &DynamicImage) -> Result<String> {
    let mut bytes = Vec::new();
    image.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(to_data_url(&bytes))
}
