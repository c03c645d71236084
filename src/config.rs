//! Runtime configuration.
//!
//! Every field has a default matching the stock page layout, so an empty TOML
//! document (or no file at all) yields a usable [`QreatorConfig`].

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QreatorConfig {
    /// Tracing filter used by [`init_tracing`](crate::observability::init_tracing)
    /// when `RUST_LOG` is not set. Defaults to `"info"`.
    pub trace_level: Option<String>,
    pub preview: PreviewConfig,
    pub logo: LogoConfig,
    pub toast: ToastConfig,
    pub export: ExportConfig,
}

/// Canvas sizes of the preview slots, in pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
    pub thumbnail_size: u32,
}

/// Logo overlay placement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    /// Share of the symbol's recoverable area the logo may cover.
    pub size_ratio: f32,
    /// Padding in pixels between the logo and the surrounding dots.
    pub margin: u32,
    /// Skip dots that would sit underneath the logo.
    pub hide_background_dots: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub duration_ms: u64,
}

/// Where downloads land.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: PathBuf,
    /// File stem; the extension comes from the export format.
    pub file_name: String,
}

impl Default for QreatorConfig {
    fn default() -> Self {
        Self {
            trace_level: Some("info".to_string()),
            preview: PreviewConfig::default(),
            logo: LogoConfig::default(),
            toast: ToastConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 206,
            height: 206,
            thumbnail_size: 48,
        }
    }
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            size_ratio: 0.4,
            margin: 8,
            hide_background_dots: true,
        }
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self { duration_ms: 2000 }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_name: "qr-code".to_string(),
        }
    }
}

impl ToastConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl QreatorConfig {
    /// Parses a TOML document. Missing keys fall back to their defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use qreator::config::QreatorConfig;
    ///
    /// let config = QreatorConfig::from_toml_str("[preview]\nwidth = 300\n").unwrap();
    /// assert_eq!(config.preview.width, 300);
    /// assert_eq!(config.preview.height, 206);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QreatorError;

    #[test]
    fn test_empty_document_is_default() {
        let config = QreatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, QreatorConfig::default());
        assert_eq!(config.toast.duration(), Duration::from_secs(2));
        assert_eq!(config.export.file_name, "qr-code");
    }

    #[test]
    fn test_partial_sections() {
        let config = QreatorConfig::from_toml_str(
            r#"
            trace_level = "debug"

            [logo]
            margin = 4

            [export]
            directory = "out"
            "#,
        )
        .unwrap();

        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.logo.margin, 4);
        assert_eq!(config.logo.size_ratio, 0.4);
        assert_eq!(config.export.directory, PathBuf::from("out"));
        assert_eq!(config.export.file_name, "qr-code");
    }

    #[test]
    fn test_malformed_document() {
        let err = QreatorConfig::from_toml_str("[preview\nwidth = ").unwrap_err();
        assert!(matches!(err, QreatorError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qreator.toml");
        std::fs::write(&path, "[toast]\nduration_ms = 500\n").unwrap();

        let config = QreatorConfig::load(&path).unwrap();
        assert_eq!(config.toast.duration(), Duration::from_millis(500));
    }
}
