//! # qreator
//!
//! Styled QR code previews with a preset palette, logo overlays, PNG download
//! and clipboard copy.
//!
//! `qreator` is the state and rendering core of a QR generator page. A host UI
//! forwards keystrokes and clicks to a [`PreviewController`], runs the render
//! jobs it queues, and displays the mounted surfaces and toast messages.
//! Symbol encoding is done by the `qrcode` crate; rasters, codecs and logo
//! scaling by `image`.
//!
//! ## Features
//!
//! - Loose input validation: URLs or any text without markup.
//! - Rounded dots, extra-rounded corner squares and round corner dots.
//! - Five preset color styles, each with its own thumbnail preview.
//! - Optional centered logo with the modules underneath hidden.
//! - Download as PNG (JPEG and SVG export also available on artifacts).
//! - Copy to the system clipboard with a surface re-encode fallback.
//! - Stale renders never mark the preview ready.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qreator = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Generate, restyle and download:
//!
//! ```rust,no_run
//! use qreator::PreviewController;
//!
//! let mut controller = PreviewController::with_defaults();
//! controller.set_input("https://example.com");
//! controller.generate();
//! controller.select_style(2);
//! controller.render_pending();
//!
//! if let Some(path) = controller.download() {
//!     println!("saved {}", path.display());
//! }
//! ```
//!
//! Render one code directly:
//!
//! ```rust
//! use qreator::render::{RenderConfig, Renderer, StyledRenderer};
//! use qreator::helper::ExportFormat;
//!
//! let artifact = StyledRenderer::new()
//!     .render(&RenderConfig::new("Hello, World!", 206, 206))
//!     .unwrap();
//! let png = artifact.export(ExportFormat::Png).unwrap();
//! assert!(!png.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`controller`]: Page state and the user-facing operations.
//! - [`render`]: Rendering adapter trait and the styled renderer.
//! - [`helper`]: Export utilities (PNG/JPEG encoding, SVG, files).
//! - [`slot`]: Per-preview render generations, surfaces and handles.
//! - [`validate`], [`style`], [`logo`], [`toast`], [`clipboard`]: the pieces
//!   the controller is built from.
//! - [`config`], [`observability`], [`error`]: configuration, tracing setup
//!   and the error type.

#![forbid(unsafe_code)]

pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod helper;
pub mod logo;
pub mod observability;
pub mod render;
pub mod slot;
pub mod style;
pub mod toast;
pub mod validate;

pub use controller::PreviewController;
pub use error::{QreatorError, Result};
