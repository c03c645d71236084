//! The rendering adapter.
//!
//! A [`Renderer`] turns a [`RenderConfig`] into an [`Artifact`]. The default
//! [`StyledRenderer`] asks the `qrcode` crate for the module matrix and paints
//! it with the house style:
//!
//! - dots are "rounded": a module corner is rounded off when neither side
//!   touching that corner has a dark neighbour, so lone modules become
//!   circles and runs become pills;
//! - the three finder patterns are drawn as an extra-rounded ring plus a
//!   round center dot, both in the corners color;
//! - an optional logo sits in the middle, with the modules under it hidden.
//!
//! Error correction is fixed at level Q so a logo covering part of the
//! symbol still scans.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::LogoConfig;
use crate::error::{QreatorError, Result};
use crate::helper::{self, ExportFormat};
use crate::logo;
use crate::style::SelectedStyle;

/// Share of codewords level Q can recover.
const EC_RECOVERY: f32 = 0.25;

/// Finder pattern edge, in modules.
const FINDER: usize = 7;

/// Everything that determines one render. Two equal configs produce
/// identical artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub content: String,
    pub width: u32,
    pub height: u32,
    pub style: SelectedStyle,
    /// Logo as a base64 data URL.
    pub logo: Option<String>,
    pub logo_options: LogoConfig,
}

impl RenderConfig {
    /// A config with the default style and no logo.
    pub fn new(content: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            content: content.into(),
            width,
            height,
            style: SelectedStyle::default(),
            logo: None,
            logo_options: LogoConfig::default(),
        }
    }

    pub fn with_style(mut self, style: SelectedStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_logo(mut self, logo: Option<String>, options: LogoConfig) -> Self {
        self.logo = logo;
        self.logo_options = options;
        self
    }
}

/// Produces artifacts from configurations.
///
/// Implementations must not share output between calls; every call returns a
/// fresh artifact owned by the caller.
pub trait Renderer {
    fn render(&self, config: &RenderConfig) -> Result<Artifact>;
}

/*---- Symbol geometry ----*/

/// The dark/light module grid of an encoded symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    count: usize,
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Encodes `content` at error correction level Q, picking the smallest version.
    pub fn encode(content: &str) -> Result<Self> {
        let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::Q)?;
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == qrcode::Color::Dark)
            .collect();
        Ok(Self {
            count: code.width(),
            modules,
        })
    }

    /// Modules per side.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the module at (x, y). Anything outside the symbol is light.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let n = self.count as i32;
        (0..n).contains(&x) && (0..n).contains(&y) && self.modules[(y * n + x) as usize]
    }

    /// True inside one of the three 7x7 finder patterns.
    pub fn is_finder(&self, x: usize, y: usize) -> bool {
        let far = self.count.saturating_sub(FINDER);
        (x < FINDER && y < FINDER) || (x >= far && y < FINDER) || (x < FINDER && y >= far)
    }

    /// Top-left module of each finder pattern.
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.count - FINDER;
        [(0, 0), (far, 0), (0, far)]
    }
}

/// Pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Where the logo goes and which modules it hides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    /// Hidden window size in modules, centered in the symbol.
    pub hide_x: usize,
    pub hide_y: usize,
    /// Pixel area the scaled logo occupies.
    pub rect: Rect,
    pub hide_background_dots: bool,
}

/// Pixel layout of a symbol within the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub count: usize,
    /// Module edge in pixels.
    pub dot: u32,
    pub x0: u32,
    pub y0: u32,
    pub logo: Option<LogoPlacement>,
}

impl Layout {
    /// Fits `count` modules into the canvas, centered, with whole-pixel modules.
    pub fn new(count: usize, width: u32, height: u32) -> Result<Self> {
        let dot = width.min(height) / count as u32;
        if dot == 0 {
            return Err(QreatorError::Render(format!(
                "{width}x{height} canvas cannot hold {count} modules"
            )));
        }
        let side = dot * count as u32;
        Ok(Self {
            count,
            dot,
            x0: (width - side) / 2,
            y0: (height - side) / 2,
            logo: None,
        })
    }

    /// Reserves a centered area for a logo of the given pixel size.
    ///
    /// The area is bounded by `size_ratio` of what level Q can recover; the
    /// window is kept odd-sized so it stays centered on the odd module grid.
    /// Leaves the layout unchanged when nothing fits.
    pub fn place_logo(&mut self, logo_width: u32, logo_height: u32, options: &LogoConfig) {
        if logo_width == 0 || logo_height == 0 {
            return;
        }
        let k = logo_height as f32 / logo_width as f32;
        let max_hidden = (options.size_ratio * EC_RECOVERY * (self.count * self.count) as f32).floor() as usize;

        // Largest odd window that fits inside the symbol.
        let odd_max = if self.count % 2 == 0 { self.count - 1 } else { self.count };
        let odd_height = |hx: usize| {
            let hy = ((hx as f32 * k).ceil() as usize).max(1);
            let hy = if hy % 2 == 0 { hy + 1 } else { hy };
            hy.min(odd_max)
        };

        let mut hide_x = ((max_hidden as f32 / k).sqrt().floor() as usize).min(odd_max);
        if hide_x % 2 == 0 {
            hide_x = hide_x.saturating_sub(1);
        }
        let mut hide_y = odd_height(hide_x);
        while hide_x > 1 && hide_x * hide_y > max_hidden {
            hide_x -= 2;
            hide_y = odd_height(hide_x);
        }
        if hide_x == 0 || hide_x * hide_y > max_hidden {
            return;
        }

        let margin = options.margin * 2;
        let box_w = (hide_x as u32 * self.dot).saturating_sub(margin);
        let box_h = (hide_y as u32 * self.dot).saturating_sub(margin);
        if box_w == 0 || box_h == 0 {
            return;
        }
        let scale = (box_w as f32 / logo_width as f32).min(box_h as f32 / logo_height as f32);
        let width = ((logo_width as f32 * scale).round() as u32).clamp(1, box_w);
        let height = ((logo_height as f32 * scale).round() as u32).clamp(1, box_h);

        let side = self.dot * self.count as u32;
        self.logo = Some(LogoPlacement {
            hide_x,
            hide_y,
            rect: Rect {
                x: self.x0 + side.saturating_sub(width) / 2,
                y: self.y0 + side.saturating_sub(height) / 2,
                width,
                height,
            },
            hide_background_dots: options.hide_background_dots,
        });
    }

    /// True when a logo hides the module at (x, y).
    pub fn is_hidden(&self, x: usize, y: usize) -> bool {
        match self.logo {
            Some(placement) if placement.hide_background_dots => {
                let sx = self.count.saturating_sub(placement.hide_x) / 2;
                let sy = self.count.saturating_sub(placement.hide_y) / 2;
                (sx..sx + placement.hide_x).contains(&x) && (sy..sy + placement.hide_y).contains(&y)
            }
            _ => false,
        }
    }

    /// Pixel origin of module (x, y).
    pub fn module_origin(&self, x: usize, y: usize) -> (u32, u32) {
        (self.x0 + x as u32 * self.dot, self.y0 + y as u32 * self.dot)
    }
}

/// Which corners of a dot are rounded: top-left, top-right, bottom-right, bottom-left.
pub type Corners = [bool; 4];

/// Dark modules painted as dots (not part of a finder, not under the logo).
pub fn is_dot(matrix: &QrMatrix, layout: &Layout, x: i32, y: i32) -> bool {
    let n = matrix.count() as i32;
    if !(0..n).contains(&x) || !(0..n).contains(&y) {
        return false;
    }
    let (ux, uy) = (x as usize, y as usize);
    matrix.get_module(x, y) && !matrix.is_finder(ux, uy) && !layout.is_hidden(ux, uy)
}

/// Rounds a corner when both sides meeting at it are free.
pub fn dot_corners(matrix: &QrMatrix, layout: &Layout, x: usize, y: usize) -> Corners {
    let (x, y) = (x as i32, y as i32);
    let left = is_dot(matrix, layout, x - 1, y);
    let right = is_dot(matrix, layout, x + 1, y);
    let top = is_dot(matrix, layout, x, y - 1);
    let bottom = is_dot(matrix, layout, x, y + 1);
    [!top && !left, !top && !right, !bottom && !right, !bottom && !left]
}

fn inside_rounded_rect(px: f32, py: f32, x: f32, y: f32, w: f32, h: f32, r: f32) -> bool {
    if px < x || py < y || px >= x + w || py >= y + h {
        return false;
    }
    let cx = px.clamp(x + r, x + w - r);
    let cy = py.clamp(y + r, y + h - r);
    (px - cx).powi(2) + (py - cy).powi(2) <= r * r
}

fn inside_dot(px: f32, py: f32, x: f32, y: f32, size: f32, corners: Corners) -> bool {
    let r = size / 2.0;
    let (cx, cy) = (x + r, y + r);
    let corner = match (px < cx, py < cy) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    };
    !corners[corner] || (px - cx).powi(2) + (py - cy).powi(2) <= r * r
}

/*---- Artifacts ----*/

/// Vector description kept alongside the raster for SVG export.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub matrix: QrMatrix,
    pub layout: Layout,
}

/// One rendered QR visual.
#[derive(Debug, Clone)]
pub struct Artifact {
    config: RenderConfig,
    image: Arc<RgbaImage>,
    symbol: Option<Symbol>,
}

impl Artifact {
    /// Wraps a raster produced by a renderer that keeps no vector data.
    pub fn from_raster(config: RenderConfig, image: RgbaImage) -> Self {
        Self {
            config,
            image: Arc::new(image),
            symbol: None,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Shared pixels, for mounting into a surface.
    pub fn pixels(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.image)
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        self.symbol.as_ref()
    }

    /// Raw bytes in the given format.
    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>> {
        match format {
            ExportFormat::Svg => {
                let symbol = self.symbol.as_ref().ok_or_else(|| {
                    QreatorError::Render("artifact has no vector data".to_string())
                })?;
                Ok(helper::to_svg_string(symbol, &self.config).into_bytes())
            }
            raster => helper::encode_image(&self.image, raster),
        }
    }

    /// Writes `<directory>/<name>.<ext>`, creating the directory if needed.
    pub fn save(&self, directory: &Path, name: &str, format: ExportFormat) -> Result<PathBuf> {
        let bytes = self.export(format)?;
        helper::write_file(&bytes, directory, name, format)
    }
}

/*---- Default renderer ----*/

/// Paints rounded dots, extra-rounded corners and an optional logo.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyledRenderer;

impl StyledRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for StyledRenderer {
    fn render(&self, config: &RenderConfig) -> Result<Artifact> {
        let _span = tracing::trace_span!("render", width = config.width, height = config.height).entered();

        let matrix = QrMatrix::encode(&config.content)?;
        let mut layout = Layout::new(matrix.count(), config.width, config.height)?;

        let logo = config.logo.as_deref().and_then(|url| match logo::decode_logo(url) {
            Ok(logo) => Some(logo),
            Err(err) => {
                tracing::warn!(error = %err, "logo not decodable, rendering without it");
                None
            }
        });
        if let Some(logo) = &logo {
            layout.place_logo(logo.width(), logo.height(), &config.logo_options);
        }

        let mut canvas = RgbaImage::from_pixel(
            config.width,
            config.height,
            config.style.background_color.to_rgba(),
        );
        paint_dots(&mut canvas, &matrix, &layout, config.style.dots_color.to_rgba());
        paint_finders(&mut canvas, &matrix, &layout, config.style.corners_color.to_rgba());
        if let (Some(logo), Some(placement)) = (&logo, layout.logo) {
            paint_logo(&mut canvas, logo, placement.rect);
        }

        tracing::trace!(count = matrix.count(), dot = layout.dot, "symbol painted");
        Ok(Artifact {
            config: config.clone(),
            image: Arc::new(canvas),
            symbol: Some(Symbol { matrix, layout }),
        })
    }
}

fn paint_dots(canvas: &mut RgbaImage, matrix: &QrMatrix, layout: &Layout, color: Rgba<u8>) {
    let size = layout.dot as f32;
    for y in 0..matrix.count() {
        for x in 0..matrix.count() {
            if !is_dot(matrix, layout, x as i32, y as i32) {
                continue;
            }
            let corners = dot_corners(matrix, layout, x, y);
            let (ox, oy) = layout.module_origin(x, y);
            for py in oy..oy + layout.dot {
                for px in ox..ox + layout.dot {
                    let (fx, fy) = (px as f32 + 0.5, py as f32 + 0.5);
                    if inside_dot(fx, fy, ox as f32, oy as f32, size, corners) {
                        canvas.put_pixel(px, py, color);
                    }
                }
            }
        }
    }
}

fn paint_finders(canvas: &mut RgbaImage, matrix: &QrMatrix, layout: &Layout, color: Rgba<u8>) {
    let d = layout.dot as f32;
    let side = layout.dot * FINDER as u32;
    for (mx, my) in matrix.finder_origins() {
        let (ox, oy) = layout.module_origin(mx, my);
        let (x, y) = (ox as f32, oy as f32);
        let (cx, cy) = (x + 3.5 * d, y + 3.5 * d);
        for py in oy..oy + side {
            for px in ox..ox + side {
                let (fx, fy) = (px as f32 + 0.5, py as f32 + 0.5);
                let ring = inside_rounded_rect(fx, fy, x, y, 7.0 * d, 7.0 * d, 2.5 * d)
                    && !inside_rounded_rect(fx, fy, x + d, y + d, 5.0 * d, 5.0 * d, 1.5 * d);
                let center = (fx - cx).powi(2) + (fy - cy).powi(2) <= (1.5 * d).powi(2);
                if ring || center {
                    canvas.put_pixel(px, py, color);
                }
            }
        }
    }
}

fn paint_logo(canvas: &mut RgbaImage, logo: &DynamicImage, rect: Rect) {
    let scaled = imageops::resize(&logo.to_rgba8(), rect.width, rect.height, FilterType::Lanczos3);
    imageops::overlay(canvas, &scaled, rect.x as i64, rect.y as i64);
}
