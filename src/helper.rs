use image::{DynamicImage, ImageFormat, RgbaImage};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::render::{dot_corners, is_dot, Corners, RenderConfig, Symbol};

/// Output formats an artifact can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Svg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Svg => "svg",
        }
    }
}

/*---- Utilities ----*/

/// Encodes a raster as PNG or JPEG bytes. JPEG drops the alpha channel.
///
/// # Example
///
/// ```
/// use image::RgbaImage;
/// use qreator::helper::{encode_image, ExportFormat};
///
/// let png = encode_image(&RgbaImage::new(8, 8), ExportFormat::Png).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
pub fn encode_image(image: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut bytes);
    match format {
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            DynamicImage::ImageRgb8(rgb).write_to(&mut cursor, ImageFormat::Jpeg)?;
        }
        _ => {
            DynamicImage::ImageRgba8(image.clone()).write_to(&mut cursor, ImageFormat::Png)?;
        }
    }
    Ok(bytes)
}

/// Writes `bytes` to `<directory_path>/<filename>.<ext>`.
///
/// The directory is created if it does not exist.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be created or the file written.
pub fn write_file(bytes: &[u8], directory_path: &Path, filename: &str, format: ExportFormat) -> Result<PathBuf> {
    let file_path = directory_path.join(format!("{}.{}", filename, format.extension()));

    // Check if the directory exists, create it if it doesn't
    if !directory_path.exists() {
        fs::create_dir_all(directory_path)?;
    }

    fs::write(&file_path, bytes)?;
    Ok(file_path)
}

// Returns a string of SVG code drawing the styled symbol at the same pixel
// geometry as the raster render. The string always uses Unix newlines (\n).
pub fn to_svg_string(symbol: &Symbol, config: &RenderConfig) -> String {
    let Symbol { matrix, layout } = symbol;
    let style = &config.style;
    let d = layout.dot as f32;

    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    let _ = writeln!(
        result,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{1}\" viewBox=\"0 0 {0} {1}\" stroke=\"none\">",
        config.width, config.height
    );
    let _ = writeln!(result, "\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>", style.background_color);

    result += "\t<path d=\"";
    let mut first = true;
    for y in 0..matrix.count() {
        for x in 0..matrix.count() {
            if !is_dot(matrix, layout, x as i32, y as i32) {
                continue;
            }
            if !first {
                result += " ";
            }
            first = false;
            let (ox, oy) = layout.module_origin(x, y);
            dot_path(&mut result, ox as f32, oy as f32, d, dot_corners(matrix, layout, x, y));
        }
    }
    let _ = writeln!(result, "\" fill=\"{}\"/>", style.dots_color);

    for (mx, my) in matrix.finder_origins() {
        let (ox, oy) = layout.module_origin(mx, my);
        let (x, y) = (ox as f32, oy as f32);
        result += "\t<path fill-rule=\"evenodd\" d=\"";
        rounded_rect_path(&mut result, x, y, 7.0 * d, 2.5 * d);
        result += " ";
        rounded_rect_path(&mut result, x + d, y + d, 5.0 * d, 1.5 * d);
        let _ = writeln!(result, "\" fill=\"{}\"/>", style.corners_color);
        let _ = writeln!(
            result,
            "\t<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
            x + 3.5 * d,
            y + 3.5 * d,
            1.5 * d,
            style.corners_color
        );
    }

    if let (Some(url), Some(placement)) = (config.logo.as_deref(), layout.logo) {
        let rect = placement.rect;
        let _ = writeln!(
            result,
            "\t<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" href=\"{}\"/>",
            rect.x, rect.y, rect.width, rect.height, url
        );
    }

    result += "</svg>\n";
    result
}

// One module, going clockwise from the top edge; rounded corners become
// quarter arcs of radius size/2.
fn dot_path(out: &mut String, x: f32, y: f32, size: f32, corners: Corners) {
    let r = size / 2.0;
    let cut = |rounded: bool| if rounded { r } else { 0.0 };
    let [tl, tr, br, bl] = corners;

    let _ = write!(out, "M{},{}", x + cut(tl), y);
    let _ = write!(out, "H{}", x + size - cut(tr));
    if tr {
        let _ = write!(out, "A{r},{r} 0 0 1 {},{}", x + size, y + r);
    }
    let _ = write!(out, "V{}", y + size - cut(br));
    if br {
        let _ = write!(out, "A{r},{r} 0 0 1 {},{}", x + size - r, y + size);
    }
    let _ = write!(out, "H{}", x + cut(bl));
    if bl {
        let _ = write!(out, "A{r},{r} 0 0 1 {},{}", x, y + size - r);
    }
    let _ = write!(out, "V{}", y + cut(tl));
    if tl {
        let _ = write!(out, "A{r},{r} 0 0 1 {},{}", x + r, y);
    }
    out.push('z');
}

fn rounded_rect_path(out: &mut String, x: f32, y: f32, size: f32, r: f32) {
    let _ = write!(
        out,
        "M{},{}H{}A{r},{r} 0 0 1 {},{}V{}A{r},{r} 0 0 1 {},{}H{}A{r},{r} 0 0 1 {},{}V{}A{r},{r} 0 0 1 {},{}z",
        x + r,
        y,
        x + size - r,
        x + size,
        y + r,
        y + size - r,
        x + size - r,
        y + size,
        x + r,
        x,
        y + size - r,
        y + r,
        x + r,
        y,
    );
}
