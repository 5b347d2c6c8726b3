// MFont
// copyright zipxing@hotmail.com 2022～2025

//! Binary artifacts of a font build.
//!
//! - [`muct`]: glyph table shared by every size
//! - [`mfnt`]: one descriptor per registered size
//! - [`atlas`]: the RGBA texture holding all packed glyphs
//!
//! The descriptors reference the other two files by path, see
//! [`OutputPaths`].

pub mod atlas;
pub mod mfnt;
pub mod muct;

use std::path::{Path, PathBuf};

/// Marker in the descriptor template replaced by the requested size
pub const SIZE_MARKER: &str = "{}";

/// Output locations plus the path strings embedded in the descriptors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub glyph_table: PathBuf,
    /// descriptor file name with `{}` standing for the requested size
    pub descriptor_template: String,
    pub texture: PathBuf,
    pub glyph_table_in_game: Option<String>,
    pub texture_in_game: Option<String>,
}

impl OutputPaths {
    pub fn new<P: Into<PathBuf>, T: Into<PathBuf>>(
        glyph_table: P,
        descriptor_template: &str,
        texture: T,
    ) -> Self {
        OutputPaths {
            glyph_table: glyph_table.into(),
            descriptor_template: descriptor_template.to_string(),
            texture: texture.into(),
            glyph_table_in_game: None,
            texture_in_game: None,
        }
    }

    pub fn descriptor_path(&self, size: u32) -> PathBuf {
        PathBuf::from(
            self.descriptor_template
                .replace(SIZE_MARKER, &size.to_string()),
        )
    }

    /// File the atlas PNG is written to
    pub fn texture_png_path(&self) -> PathBuf {
        atlas::png_path(&self.texture)
    }

    /// Texture path stored in every descriptor
    pub fn texture_ref(&self) -> String {
        self.texture_in_game
            .clone()
            .unwrap_or_else(|| path_string(&self.texture))
    }

    /// Glyph table path stored in every descriptor
    pub fn glyph_table_ref(&self) -> String {
        self.glyph_table_in_game
            .clone()
            .unwrap_or_else(|| path_string(&self.glyph_table))
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_template() {
        let out = OutputPaths::new("out/font.buct", "out/font_{}.bfont", "out/font.bctex");
        assert_eq!(out.descriptor_path(24), PathBuf::from("out/font_24.bfont"));
        assert_eq!(out.texture_png_path(), PathBuf::from("out/font.png"));
    }

    #[test]
    fn test_in_game_overrides() {
        let mut out = OutputPaths::new("out/font.buct", "f{}.bfont", "out/font.bctex");
        assert_eq!(out.texture_ref(), "out/font.bctex");
        assert_eq!(out.glyph_table_ref(), "out/font.buct");

        out.texture_in_game = Some("system/fonts/font.bctex".to_string());
        out.glyph_table_in_game = Some("system/fonts/font.buct".to_string());
        assert_eq!(out.texture_ref(), "system/fonts/font.bctex");
        assert_eq!(out.glyph_table_ref(), "system/fonts/font.buct");
    }
}
