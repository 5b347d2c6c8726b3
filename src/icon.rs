// MFont
// copyright zipxing@hotmail.com 2022～2025

//! Reserved icon code points.
//!
//! Icons are pre-rendered images shipped next to the tool, one PNG per code
//! point named after its lowercase 4-digit hex value (`1811.png`). Their
//! metrics are fixed by the table below and never come from the TTF.

use crate::error::{FontError, Result};
use crate::glyph::GlyphRecord;
use log::debug;
use std::path::{Path, PathBuf};

/// Icon metrics table: (code point, x offset, y offset, advance)
pub const ICONS: &[(u32, i16, i16, i16)] = &[
    (0x1800, -1, 30, 34),
    (0x1801, -1, 30, 34),
    (0x1802, -1, 30, 34),
    (0x1803, -1, 30, 34),
    (0x1804, -1, 30, 34),
    (0x1805, -1, 30, 34),
    (0x1806, -1, 30, 34),
    (0x1807, -1, 30, 34),
    (0x1808, -1, 30, 34),
    (0x1809, -1, 30, 34),
    (0x180a, -1, 30, 34),
    (0x180b, -1, 30, 34),
    (0x180c, -1, 30, 34),
    (0x180d, -1, 30, 34),
    (0x180e, -1, 30, 34),
    (0x180f, -1, 30, 34),
    (0x1810, -1, 30, 34),
    (0x1811, -1, 39, 52),
    (0x1812, -1, 30, 34),
    (0x1813, -1, 30, 34),
    (0x1815, -1, 30, 34),
    (0x1816, -1, 39, 52),
    (0x1817, -1, 39, 52),
    (0x1818, -1, 39, 52),
    (0x1819, -1, 39, 52),
    (0x181a, -1, 39, 52),
    (0x181b, -1, 39, 52),
    (0x181c, -1, 39, 52),
    (0x181d, -1, 36, 47),
    (0x181e, -1, 59, 92),
    (0x181f, -1, 59, 92),
    (0x1820, -1, 59, 92),
    (0x1821, -1, 36, 47),
    (0x1822, -1, 59, 92),
    (0x1823, -1, 59, 92),
    (0x1824, -1, 59, 92),
    (0x1825, -1, 39, 52),
    (0x1826, -1, 59, 92),
    (0x1827, -1, 59, 92),
    (0x1828, -1, 59, 92),
    (0x1829, -1, 30, 34),
    (0x182a, -1, 39, 52),
    (0x182e, -1, 30, 34),
    (0x182f, -14, 41, 32),
    (0x1830, -14, 41, 32),
    (0x1832, -1, 30, 34),
    (0x1834, -14, 41, 32),
    (0x1837, -1, 30, 34),
    (0x1838, -1, 30, 34),
    (0x1839, -1, 30, 34),
    (0x1840, -1, 30, 34),
    (0x1841, -1, 30, 34),
];

/// true for code points listed in [`ICONS`]
pub fn is_icon(ch: char) -> bool {
    ICONS.iter().any(|(cp, ..)| *cp == ch as u32)
}

/// Image path of an icon inside `dir`
pub fn icon_path(dir: &Path, code_point: u32) -> PathBuf {
    dir.join(format!("{:04x}.png", code_point))
}

#[derive(Debug, Clone)]
pub struct IconGlyph {
    pub code_point: char,
    pub record: GlyphRecord,
}

/// Loaded icons, kept in table-definition order
#[derive(Debug, Clone, Default)]
pub struct IconRegistry {
    icons: Vec<IconGlyph>,
}

impl IconRegistry {
    /// Load every icon of [`ICONS`] from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let mut registry = IconRegistry::default();
        for &(cp, x_offset, y_offset, advance) in ICONS {
            let path = icon_path(dir, cp);
            if !path.is_file() {
                return Err(FontError::IconNotFound {
                    code_point: cp,
                    path,
                });
            }
            let image = image::open(&path)?.to_rgba8();
            debug!("icon U+{:04X}: {}x{}", cp, image.width(), image.height());
            registry.insert(cp, GlyphRecord::icon(image, x_offset, y_offset, advance))?;
        }
        Ok(registry)
    }

    /// Add one icon; the code point must be present in [`ICONS`]
    pub fn insert(&mut self, code_point: u32, record: GlyphRecord) -> Result<()> {
        let ch = char::from_u32(code_point)
            .filter(|c| is_icon(*c))
            .ok_or(FontError::IconNotFound {
                code_point,
                path: PathBuf::new(),
            })?;
        self.icons.retain(|i| i.code_point != ch);
        self.icons.push(IconGlyph {
            code_point: ch,
            record,
        });
        // table order is ascending code point order
        self.icons.sort_by_key(|i| i.code_point);
        Ok(())
    }

    pub fn contains(&self, ch: char) -> bool {
        self.icons.iter().any(|i| i.code_point == ch)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn into_glyphs(self) -> Vec<IconGlyph> {
        self.icons
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_table_is_sorted_and_unique() {
        assert!(ICONS.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(ICONS.len(), 52);
    }

    #[test]
    fn test_is_icon() {
        assert!(is_icon('\u{1800}'));
        assert!(is_icon('\u{1841}'));
        assert!(!is_icon('\u{1814}'));
        assert!(!is_icon('A'));
    }

    #[test]
    fn test_icon_path_format() {
        assert_eq!(icon_path(Path::new("icons"), 0x180a), Path::new("icons").join("180a.png"));
    }

    #[test]
    fn test_load_missing_dir_names_first_icon() {
        let dir = std::env::temp_dir().join("mfont_icon_missing_dir");
        match IconRegistry::load(&dir) {
            Err(FontError::IconNotFound { code_point, .. }) => assert_eq!(code_point, 0x1800),
            other => panic!("expected icon not found, got {:?}", other),
        }
    }

    #[test]
    fn test_insert_rejects_unknown_code_point() {
        let mut reg = IconRegistry::default();
        assert!(reg.is_empty());
        let rec = GlyphRecord::icon(RgbaImage::new(2, 2), -1, 30, 34);
        assert!(matches!(
            reg.insert(0x1814, rec.clone()),
            Err(FontError::IconNotFound { code_point: 0x1814, .. })
        ));
        reg.insert(0x1811, rec.clone()).unwrap();
        reg.insert(0x1811, rec).unwrap();
        assert_eq!(reg.len(), 1);
        assert!(!reg.is_empty());
        assert!(reg.contains('\u{1811}'));
        assert!(!reg.contains('\u{1812}'));
    }
}
