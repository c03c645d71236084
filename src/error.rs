//! Error types for qreator.
//!
//! Everything fallible in the crate returns [`Result`], built on the single
//! [`QreatorError`] enum. The [`PreviewController`](crate::controller::PreviewController)
//! is the boundary where these errors stop: they become an inline validation
//! message, a blank preview slot, or a toast.

use thiserror::Error;

/// The main error type for qreator operations.
#[derive(Debug, Error)]
pub enum QreatorError {
    /// The content could not be encoded into a QR symbol (usually too long).
    #[error("QR encoding error: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// Raster encoding, decoding or scaling failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// A color string was not `#rgb` or `#rrggbb`.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// The logo data URL was malformed or its payload could not be decoded.
    #[error("Logo error: {0}")]
    Logo(String),

    /// The system clipboard refused the write or could not be opened.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// The render configuration cannot produce a visible symbol.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<arboard::Error> for QreatorError {
    fn from(err: arboard::Error) -> Self {
        QreatorError::Clipboard(err.to_string())
    }
}

/// A specialized `Result` type for qreator operations.
pub type Result<T> = std::result::Result<T, QreatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = QreatorError::InvalidColor("#12".to_string());
        assert_eq!(err.to_string(), "Invalid color: #12");

        let err = QreatorError::Clipboard("locked".to_string());
        assert_eq!(err.to_string(), "Clipboard error: locked");
    }

    #[test]
    fn test_io_conversion() {
        fn read_missing() -> Result<Vec<u8>> {
            Ok(std::fs::read("/definitely/not/here.png")?)
        }
        assert!(matches!(read_missing(), Err(QreatorError::Io(_))));
    }
}
