// MFont
// copyright zipxing@hotmail.com 2022～2025

//! Glyph records: one bitmap plus placement metrics per character and size.
//!
//! Rasterized glyphs are stored as 2-channel luma+alpha images with the
//! coverage value in both channels, the layout the atlas compositor expects.
//! Icons keep the RGBA pixels of their source image.

use crate::util::{f26d6_to_int, Rect, Size};
use image::{DynamicImage, GrayAlphaImage, RgbaImage};
use log::warn;

/// Side of the transparent block used for empty glyphs
pub const PLACEHOLDER_SIZE: u32 = 4;

/// Where a glyph record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphOrigin {
    /// Rendered from the font (possibly blank, like a space)
    Rasterized,
    /// Outside the size set's filter: 4x4 transparent, zero metrics
    Excluded,
    /// Pre-rendered icon image
    Icon,
}

/// Raw rasterizer output for one character.
///
/// Metrics are 26.6 fixed point, FreeType style: `bearing_y` is the
/// distance from the baseline up to the top of the bitmap.
#[derive(Debug, Clone, Default)]
pub struct RasterGlyph {
    pub width: u32,
    pub height: u32,
    /// one coverage byte per pixel, row major
    pub coverage: Vec<u8>,
    pub advance: i64,
    pub bearing_x: i64,
    pub bearing_y: i64,
}

#[derive(Debug, Clone)]
pub struct GlyphRecord {
    pub bitmap: DynamicImage,
    pub x_offset: i16,
    pub y_offset: i16,
    pub advance: i16,
    /// atlas position, `None` until packing succeeded
    pub packed: Option<Rect>,
    pub origin: GlyphOrigin,
}

fn transparent_block() -> DynamicImage {
    DynamicImage::ImageLumaA8(GrayAlphaImage::new(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE))
}

fn to_i16(v: i64) -> i16 {
    v.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
}

impl GlyphRecord {
    /// Slot filler for characters a size set does not render
    pub fn excluded() -> Self {
        GlyphRecord {
            bitmap: transparent_block(),
            x_offset: 0,
            y_offset: 0,
            advance: 0,
            packed: None,
            origin: GlyphOrigin::Excluded,
        }
    }

    /// Build a record from rasterizer output.
    ///
    /// An empty bitmap (space and friends) becomes a 4x4 transparent block
    /// so the packer always gets a real rectangle; metrics are kept.
    pub fn from_raster(raster: &RasterGlyph) -> Self {
        let pixels = raster.width as usize * raster.height as usize;
        let bitmap = if pixels == 0 {
            transparent_block()
        } else if raster.coverage.len() < pixels {
            warn!(
                "{}x{} glyph has {} coverage bytes, using a blank block",
                raster.width,
                raster.height,
                raster.coverage.len()
            );
            transparent_block()
        } else {
            let la: Vec<u8> = raster.coverage[..pixels]
                .iter()
                .flat_map(|&a| [a, a])
                .collect();
            GrayAlphaImage::from_raw(raster.width, raster.height, la)
                .map(DynamicImage::ImageLumaA8)
                .unwrap_or_else(transparent_block)
        };

        GlyphRecord {
            bitmap,
            x_offset: to_i16(f26d6_to_int(raster.bearing_x)),
            y_offset: to_i16(f26d6_to_int(raster.bearing_y)),
            advance: to_i16(f26d6_to_int(raster.advance)),
            packed: None,
            origin: GlyphOrigin::Rasterized,
        }
    }

    pub fn icon(image: RgbaImage, x_offset: i16, y_offset: i16, advance: i16) -> Self {
        GlyphRecord {
            bitmap: DynamicImage::ImageRgba8(image),
            x_offset,
            y_offset,
            advance,
            packed: None,
            origin: GlyphOrigin::Icon,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.bitmap.width(), self.bitmap.height())
    }

    pub fn is_placeholder(&self) -> bool {
        self.origin == GlyphOrigin::Excluded
    }

    /// true when every pixel has zero alpha
    pub fn is_transparent(&self) -> bool {
        self.bitmap.to_rgba8().pixels().all(|p| p.0[3] == 0)
    }
}
