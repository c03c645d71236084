//! Clipboard access for copying rendered codes as images.
//!
//! [`ClipboardSink`] is the seam the controller writes through. The system
//! implementation wraps the `arboard` crate; PNG bytes are decoded to RGBA
//! before they are handed over, since that is the form arboard accepts.
//!
//! # Example
//!
//! ```ignore
//! use qreator::clipboard::{ClipboardSink, SystemClipboard};
//!
//! if let Ok(mut clipboard) = SystemClipboard::new() {
//!     clipboard.write_png(&png_bytes).ok();
//! }
//! ```
//!
//! # Platform Notes
//!
//! - **Windows**: Uses the Win32 clipboard API
//! - **macOS**: Uses NSPasteboard
//! - **Linux**: Uses X11 selections or Wayland data-control protocol

use arboard::ImageData;
use std::borrow::Cow;

use crate::error::Result;

/// Something that can take a PNG image.
pub trait ClipboardSink {
    fn write_png(&mut self, png: &[u8]) -> Result<()>;
}

/// The system clipboard.
///
/// Create it when needed and drop it after use. Clipboard operations are best
/// done from the main/UI thread.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Opens the system clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard is unavailable or locked by another
    /// process.
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_png(&mut self, png: &[u8]) -> Result<()> {
        let rgba = image::load_from_memory_with_format(png, image::ImageFormat::Png)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        self.inner.set_image(ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Owned(rgba.into_raw()),
        })?;
        Ok(())
    }
}
