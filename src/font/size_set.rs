// MFont
// copyright zipxing@hotmail.com 2022～2025
//
// One registered pixel size

use super::face::Rasterizer;
use crate::glyph::GlyphRecord;
use crate::icon::is_icon;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

/// Index of a glyph record inside the collection
pub type GlyphId = usize;

/// Rasterization grows the requested size by this many pixels
pub const SIZE_PADDING: u32 = 4;

/// What a size set produces for one character
#[derive(Debug)]
pub enum GlyphSource {
    /// A record owned by this size
    Record(GlyphRecord),
    /// The shared icon glyph for this code point
    Icon(char),
}

/// Rasterization state for one requested pixel size.
///
/// Holds one slot per character of the collection. Slots point into the
/// collection's glyph list so icons can be shared between sizes.
pub struct FontSizeSet {
    size: u32,
    face: Rc<dyn Rasterizer>,
    filter: Option<BTreeSet<char>>,
    use_icons: bool,
    slots: BTreeMap<char, GlyphId>,
}

impl fmt::Debug for FontSizeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSizeSet")
            .field("size", &self.size)
            .field("filter", &self.filter.as_ref().map(|s| s.len()))
            .field("use_icons", &self.use_icons)
            .field("slots", &self.slots.len())
            .finish()
    }
}

impl FontSizeSet {
    /// An empty filter means the same as no filter: every character renders.
    pub fn new(
        size: u32,
        face: Rc<dyn Rasterizer>,
        filter: Option<BTreeSet<char>>,
        use_icons: bool,
    ) -> Self {
        FontSizeSet {
            size,
            face,
            filter: filter.filter(|f| !f.is_empty()),
            use_icons,
            slots: BTreeMap::new(),
        }
    }

    /// Requested size, the key the set is registered under
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Size handed to the rasterizer and stored in the descriptor
    pub fn pixel_size(&self) -> u32 {
        self.size + SIZE_PADDING
    }

    pub fn filter(&self) -> Option<&BTreeSet<char>> {
        self.filter.as_ref()
    }

    pub fn use_icons(&self) -> bool {
        self.use_icons
    }

    /// true if `ch` gets a real glyph at this size
    pub fn admits(&self, ch: char) -> bool {
        self.filter.as_ref().map_or(true, |f| f.contains(&ch))
    }

    pub fn rasterize(&self, ch: char) -> GlyphSource {
        if self.use_icons && is_icon(ch) {
            return GlyphSource::Icon(ch);
        }
        if !self.admits(ch) {
            return GlyphSource::Record(GlyphRecord::excluded());
        }
        if !self.face.has_glyph(ch) {
            if self.filter.is_some() {
                warn!("size {}: font has no glyph for U+{:04X}", self.size, ch as u32);
            } else {
                debug!("size {}: font has no glyph for U+{:04X}", self.size, ch as u32);
            }
        }
        let raster = self.face.rasterize(ch, self.pixel_size());
        GlyphSource::Record(GlyphRecord::from_raster(&raster))
    }

    pub fn slot(&self, ch: char) -> Option<GlyphId> {
        self.slots.get(&ch).copied()
    }

    pub(crate) fn insert_slot(&mut self, ch: char, id: GlyphId) {
        self.slots.insert(ch, id);
    }

    /// Number of characters with a slot, icons included
    pub fn glyph_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::glyph::{GlyphOrigin, RasterGlyph};
    use std::cell::Cell;

    /// Deterministic stand-in for a real font: glyph size follows the
    /// character code and pixel size, space renders empty.
    pub struct BoxFont {
        pub calls: Cell<usize>,
    }

    impl BoxFont {
        pub fn new() -> Self {
            BoxFont { calls: Cell::new(0) }
        }
    }

    impl Rasterizer for BoxFont {
        fn rasterize(&self, ch: char, pixel_size: u32) -> RasterGlyph {
            self.calls.set(self.calls.get() + 1);
            if ch == ' ' {
                return RasterGlyph {
                    advance: i64::from(pixel_size / 3) * 64,
                    ..RasterGlyph::default()
                };
            }
            let width = pixel_size / 2 + (ch as u32 % 5);
            let height = pixel_size - (ch as u32 % 3);
            RasterGlyph {
                width,
                height,
                coverage: vec![0xFF; (width * height) as usize],
                advance: i64::from(width + 1) * 64,
                bearing_x: 64,
                bearing_y: i64::from(height) * 64,
            }
        }
    }

    fn set(filter: Option<&str>, use_icons: bool) -> (Rc<BoxFont>, FontSizeSet) {
        let face = Rc::new(BoxFont::new());
        let filter = filter.map(|s| s.chars().collect());
        let set = FontSizeSet::new(16, face.clone(), filter, use_icons);
        (face, set)
    }

    #[test]
    fn test_pixel_size_padding() {
        let (_, s) = set(None, false);
        assert_eq!(s.size(), 16);
        assert_eq!(s.pixel_size(), 20);
    }

    #[test]
    fn test_no_filter_never_placeholder() {
        let (face, s) = set(None, false);
        for ch in "AZaz09 中!".chars() {
            match s.rasterize(ch) {
                GlyphSource::Record(g) => assert_ne!(g.origin, GlyphOrigin::Excluded),
                GlyphSource::Icon(_) => panic!("no icons requested"),
            }
        }
        assert_eq!(face.calls.get(), 9);
    }

    #[test]
    fn test_empty_filter_means_all() {
        let (_, s) = set(Some(""), false);
        assert!(s.filter().is_none());
        assert!(s.admits('Q'));
    }

    #[test]
    fn test_filtered_out_is_placeholder_without_rasterizing() {
        let (face, s) = set(Some("AB"), false);
        match s.rasterize('C') {
            GlyphSource::Record(g) => {
                assert!(g.is_placeholder());
                assert_eq!((g.size().width, g.size().height), (4, 4));
                assert_eq!((g.x_offset, g.y_offset, g.advance), (0, 0, 0));
                assert!(g.is_transparent());
            }
            GlyphSource::Icon(_) => panic!("not an icon"),
        }
        assert_eq!(face.calls.get(), 0);

        match s.rasterize('A') {
            GlyphSource::Record(g) => {
                assert!(!g.is_placeholder());
                assert_eq!(g.size().height, 20 - ('A' as u32 % 3));
            }
            GlyphSource::Icon(_) => panic!("not an icon"),
        }
        assert_eq!(face.calls.get(), 1);
    }

    #[test]
    fn test_space_is_blank_block_with_advance() {
        let (_, s) = set(None, false);
        match s.rasterize(' ') {
            GlyphSource::Record(g) => {
                assert_eq!(g.origin, GlyphOrigin::Rasterized);
                assert_eq!((g.size().width, g.size().height), (4, 4));
                assert_eq!(g.advance, 6);
            }
            GlyphSource::Icon(_) => panic!("not an icon"),
        }
    }

    #[test]
    fn test_icon_opt_in() {
        let (face, with) = set(None, true);
        assert!(matches!(with.rasterize('\u{1811}'), GlyphSource::Icon('\u{1811}')));
        assert_eq!(face.calls.get(), 0);

        let (_, without) = set(None, false);
        assert!(matches!(without.rasterize('\u{1811}'), GlyphSource::Record(_)));
    }
}
