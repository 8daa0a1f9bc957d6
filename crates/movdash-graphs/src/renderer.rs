//! Chart rendering trait and output helpers

use crate::types::{ChartSpec, FontConfig};
use movdash_common::{OutputFormat, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// Whether a backend for `format` can rasterize text in this build.
///
/// SVG writes `<text>` elements itself; bitmaps need the `ttf` feature.
pub fn text_supported(format: OutputFormat) -> bool {
    match format {
        OutputFormat::Svg => true,
        OutputFormat::Png => cfg!(feature = "ttf"),
    }
}

/// Anything that can be drawn onto a plotters drawing area
pub trait ChartRenderer {
    /// Standalone pixel size
    fn size(&self) -> (u32, u32);

    /// Chart settings whose style drives background and text
    fn spec(&self) -> &ChartSpec;

    /// Draw into `area`, which is already sized and filled
    fn draw<DB>(&self, area: &DrawingArea<DB, Shift>, text_visible: bool) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        parse_hex_color(color_str)
    }

    fn background_color(&self) -> RGBColor {
        self.parse_color(&self.spec().style.background_color)
    }

    fn primary_color(&self) -> RGBColor {
        self.parse_color(&self.spec().style.primary_color)
    }

    fn grid_color(&self) -> RGBColor {
        self.parse_color(&self.spec().style.grid_color)
    }

    /// Text style for `font`; fully transparent when the backend cannot draw text
    fn text_style<'a>(&self, font: &'a FontConfig, text_visible: bool) -> TextStyle<'a> {
        let font = (font.family.as_str(), font.size).into_font();
        if text_visible {
            font.color(&RGBColor(33, 33, 33))
        } else {
            font.color(&TRANSPARENT)
        }
    }

    /// Render to `path` as SVG or PNG
    fn render_to_file(&self, path: &Path, format: OutputFormat) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let text_visible = text_supported(format);
        if !text_visible {
            warn!("PNG output without the ttf feature: labels are not drawn");
        }

        match format {
            OutputFormat::Svg => {
                let root = SVGBackend::new(path, self.size()).into_drawing_area();
                self.render_on(&root, text_visible)?;
            }
            OutputFormat::Png => {
                let root = BitMapBackend::new(path, self.size()).into_drawing_area();
                self.render_on(&root, text_visible)?;
            }
        }

        info!("Rendered {} to {}", format, path.display());
        Ok(())
    }

    /// Render to an in-memory SVG document
    fn render_to_svg_string(&self) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size()).into_drawing_area();
            self.render_on(&root, true)?;
        }
        Ok(svg)
    }

    /// Fill, draw and flush a root area
    fn render_on<DB>(&self, root: &DrawingArea<DB, Shift>, text_visible: bool) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&self.background_color())?;
        self.draw(root, text_visible)?;
        root.present()?;
        Ok(())
    }
}

/// Parse `#RRGGBB`; anything else falls back to black
pub fn parse_hex_color(color_str: &str) -> RGBColor {
    if let Some(hex) = color_str.strip_prefix('#') {
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return RGBColor(r, g, b);
            }
        }
    }
    RGBColor(0, 0, 0)
}

/// Upper bound of the count axis: 10 for empty data, otherwise 10% headroom
pub fn count_axis_max(max_count: usize) -> usize {
    if max_count == 0 {
        return 10;
    }
    max_count + max_count.div_ceil(10)
}

/// Hour label in 24-hour form
pub fn format_hour_24(hour: u32) -> String {
    format!("{:02}:00", hour)
}
