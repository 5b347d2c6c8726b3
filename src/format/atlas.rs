// MFont
// copyright zipxing@hotmail.com 2022～2025
//
// Texture atlas composition

use crate::error::{FontError, Result};
use crate::glyph::GlyphRecord;
use image::{GenericImage, RgbaImage};
use log::info;
use std::path::{Path, PathBuf};

/// Copy every packed glyph bitmap into a fresh transparent RGBA image.
///
/// The glyph pixels replace whatever the rectangle held. Records without a
/// packed rectangle are skipped.
pub fn compose_atlas<'a, I>(width: u32, height: u32, glyphs: I) -> Result<RgbaImage>
where
    I: IntoIterator<Item = &'a GlyphRecord>,
{
    let mut atlas = RgbaImage::new(width, height);
    let mut count = 0usize;
    for glyph in glyphs {
        let rect = match glyph.packed {
            Some(r) => r,
            None => continue,
        };
        let rgba = glyph.bitmap.to_rgba8();
        if rgba.dimensions() != (rect.width, rect.height) {
            return Err(FontError::InvalidFormat(format!(
                "glyph bitmap {}x{} does not match packed rect {}x{}",
                rgba.width(),
                rgba.height(),
                rect.width,
                rect.height
            )));
        }
        atlas.copy_from(&rgba, rect.x, rect.y)?;
        count += 1;
    }
    info!("atlas {}x{}: {} glyphs composed", width, height, count);
    Ok(atlas)
}

/// Where the atlas PNG actually lands: `.bctex` becomes `.png`
pub fn png_path(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("bctex") => path.with_extension("png"),
        _ => path.to_path_buf(),
    }
}

/// Save as PNG, returning the path written
pub fn save_atlas(atlas: &RgbaImage, path: &Path) -> Result<PathBuf> {
    let out = png_path(path);
    atlas.save_with_format(&out, image::ImageFormat::Png)?;
    info!("atlas saved to {}", out.display());
    Ok(out)
}
