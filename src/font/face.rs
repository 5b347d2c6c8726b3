// MFont
// copyright zipxing@hotmail.com 2022～2025
//
// Font faces: the rasterizer seam and its fontdue implementation

use crate::error::{FontError, Result};
use crate::glyph::RasterGlyph;
use fontdue::{Font, FontSettings, Metrics};
use std::path::Path;

/// Something that turns a character into a coverage bitmap.
///
/// Metrics come back in 26.6 fixed point so every backend goes through the
/// same integer conversion.
pub trait Rasterizer {
    fn rasterize(&self, ch: char, pixel_size: u32) -> RasterGlyph;

    /// false when the face maps `ch` to the missing glyph
    fn has_glyph(&self, _ch: char) -> bool {
        true
    }
}

/// A TTF/OTF face loaded with fontdue
pub struct FontFace {
    font: Font,
}

impl FontFace {
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| FontError::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(path, &data)
    }

    pub fn from_bytes(path: &Path, data: &[u8]) -> Result<Self> {
        let font = Font::from_bytes(data, FontSettings::default()).map_err(|e| {
            FontError::FontLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        Ok(FontFace { font })
    }
}

/// Convert fontdue pixel metrics to a 26.6 raster glyph.
///
/// fontdue gives `xmin` as the left bearing and `ymin` as the distance from
/// the baseline to the bitmap bottom (negative for descenders), so the top
/// bearing is `ymin + height`.
pub(crate) fn raster_from_metrics(metrics: &Metrics, coverage: Vec<u8>) -> RasterGlyph {
    RasterGlyph {
        width: metrics.width as u32,
        height: metrics.height as u32,
        coverage,
        advance: (metrics.advance_width * 64.0).round() as i64,
        bearing_x: i64::from(metrics.xmin) * 64,
        bearing_y: (i64::from(metrics.ymin) + metrics.height as i64) * 64,
    }
}

impl Rasterizer for FontFace {
    fn rasterize(&self, ch: char, pixel_size: u32) -> RasterGlyph {
        let (metrics, bitmap) = self.font.rasterize(ch, pixel_size as f32);
        raster_from_metrics(&metrics, bitmap)
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.font.lookup_glyph_index(ch) != 0
    }
}
