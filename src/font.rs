// MFont
// copyright zipxing@hotmail.com 2022～2025

//! Font collection: the characters, sizes and icons of one build.
//!
//! A [`FontCollection`] owns every glyph record in a single arena. Each
//! registered [`FontSizeSet`] maps characters to ids in that arena, which
//! lets several sizes point at the same icon record so the icon is packed
//! and drawn only once.
//!
//! Typical use:
//!
//! ```no_run
//! use mfont::font::FontCollection;
//! use mfont::format::OutputPaths;
//!
//! let mut fc = FontCollection::new("font.ttf", 1024, 1024);
//! fc.register_size(24, None, None, false)?;
//! fc.add_characters("Hello".chars())?;
//! fc.save(&OutputPaths::new("font.buct", "font_{}.bfont", "font.bctex"))?;
//! # Ok::<(), mfont::error::FontError>(())
//! ```

mod face;
mod size_set;

pub use face::{FontFace, Rasterizer};
pub use size_set::{FontSizeSet, GlyphId, GlyphSource, SIZE_PADDING};

use crate::error::{FontError, Result};
use crate::format::{
    atlas,
    mfnt::{self, FontDescriptor, GlyphEntry, MfntHeader},
    muct, OutputPaths,
};
use crate::glyph::GlyphRecord;
use crate::icon::{is_icon, IconRegistry};
use crate::pack::{self, IconPolicy, PackOptions};
use image::RgbaImage;
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Largest atlas side; packed coordinates are stored as i16
pub const MAX_ATLAS_SIDE: u32 = i16::MAX as u32;

pub struct FontCollection {
    font_path: PathBuf,
    width: u32,
    height: u32,
    options: PackOptions,
    /// distinct characters in insertion order
    chars: Vec<char>,
    known: HashSet<char>,
    sets: BTreeMap<u32, FontSizeSet>,
    glyphs: Vec<GlyphRecord>,
    /// loaded icons in table order
    icons: Vec<(char, GlyphId)>,
    faces: HashMap<PathBuf, Rc<dyn Rasterizer>>,
    packed: bool,
}

/// Rasterize `ch` into `set`, appending the record to the arena
fn fill_slot(
    glyphs: &mut Vec<GlyphRecord>,
    icons: &[(char, GlyphId)],
    set: &mut FontSizeSet,
    ch: char,
) {
    match set.rasterize(ch) {
        GlyphSource::Record(record) => {
            debug!(
                "size {} U+{:04X}: {}x{} off ({}, {}) adv {}",
                set.size(),
                ch as u32,
                record.size().width,
                record.size().height,
                record.x_offset,
                record.y_offset,
                record.advance
            );
            set.insert_slot(ch, glyphs.len());
            glyphs.push(record);
        }
        GlyphSource::Icon(c) => {
            if let Some((_, id)) = icons.iter().find(|(ic, _)| *ic == c) {
                set.insert_slot(c, *id);
            }
        }
    }
}

impl FontCollection {
    /// `font_path` is the face used by sizes without their own override
    pub fn new<P: Into<PathBuf>>(font_path: P, width: u32, height: u32) -> Self {
        FontCollection {
            font_path: font_path.into(),
            width,
            height,
            options: PackOptions::default(),
            chars: vec![],
            known: HashSet::new(),
            sets: BTreeMap::new(),
            glyphs: vec![],
            icons: vec![],
            faces: HashMap::new(),
            packed: false,
        }
    }

    pub fn with_options(mut self, options: PackOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Store the icons in the arena and hand them to every opted-in size.
    ///
    /// Loading a second registry replaces the first one.
    pub fn set_icons(&mut self, registry: IconRegistry) {
        if registry.is_empty() {
            warn!("empty icon registry, sizes using icons get none");
        }
        self.icons.clear();
        for icon in registry.into_glyphs() {
            self.icons.push((icon.code_point, self.glyphs.len()));
            self.glyphs.push(icon.record);
        }
        for set in self.sets.values_mut().filter(|s| s.use_icons()) {
            for &(ch, id) in &self.icons {
                set.insert_slot(ch, id);
            }
        }
        self.packed = false;
        info!("{} icons loaded", self.icons.len());
    }

    pub fn icon_count(&self) -> usize {
        self.icons.len()
    }

    /// Make `face` the rasterizer for `path`, bypassing file loading
    pub fn add_face<P: Into<PathBuf>>(&mut self, path: P, face: Rc<dyn Rasterizer>) {
        self.faces.insert(path.into(), face);
    }

    fn face(&mut self, path: &Path) -> Result<Rc<dyn Rasterizer>> {
        if let Some(face) = self.faces.get(path) {
            return Ok(face.clone());
        }
        let face: Rc<dyn Rasterizer> = Rc::new(FontFace::open(path)?);
        info!("font loaded: {}", path.display());
        self.faces.insert(path.to_path_buf(), face.clone());
        Ok(face)
    }

    /// Register a pixel size.
    ///
    /// `filter` limits the characters that get real glyphs at this size,
    /// `font_override` selects another TTF, `use_icons` opts into the icon
    /// set. Characters added earlier are rasterized immediately.
    pub fn register_size(
        &mut self,
        size: u32,
        filter: Option<BTreeSet<char>>,
        font_override: Option<&Path>,
        use_icons: bool,
    ) -> Result<()> {
        let path = font_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.font_path.clone());
        let face = self.face(&path)?;
        self.register_size_with_face(size, face, filter, use_icons);
        Ok(())
    }

    /// [`register_size`](Self::register_size) with an already loaded face
    pub fn register_size_with_face(
        &mut self,
        size: u32,
        face: Rc<dyn Rasterizer>,
        filter: Option<BTreeSet<char>>,
        use_icons: bool,
    ) {
        let mut set = FontSizeSet::new(size, face, filter, use_icons);
        for &ch in &self.chars {
            fill_slot(&mut self.glyphs, &self.icons, &mut set, ch);
        }
        if use_icons {
            for &(ch, id) in &self.icons {
                set.insert_slot(ch, id);
            }
        }
        info!(
            "size {} registered (raster {}px, filter {}, icons {})",
            size,
            set.pixel_size(),
            set.filter().map_or("none".to_string(), |f| f.len().to_string()),
            use_icons
        );
        if self.sets.insert(size, set).is_some() {
            warn!("size {} registered twice, previous set replaced", size);
        }
        self.packed = false;
    }

    /// Add one character to every size.
    ///
    /// Returns false when nothing was added: the character is already
    /// present or is a reserved icon code point.
    pub fn add_character(&mut self, ch: char) -> Result<bool> {
        if ch as u32 > 0xFFFF {
            return Err(FontError::UnsupportedCodePoint(ch));
        }
        if is_icon(ch) {
            debug!("U+{:04X} is reserved for icons, skipped", ch as u32);
            return Ok(false);
        }
        if !self.known.insert(ch) {
            return Ok(false);
        }
        self.chars.push(ch);
        for set in self.sets.values_mut() {
            fill_slot(&mut self.glyphs, &self.icons, set, ch);
        }
        self.packed = false;
        Ok(true)
    }

    /// Add characters in order, returning how many were new
    pub fn add_characters<I: IntoIterator<Item = char>>(&mut self, chars: I) -> Result<usize> {
        let mut added = 0;
        for ch in chars {
            if self.add_character(ch)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Characters in insertion order, icons excluded
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Registered sizes, ascending
    pub fn sizes(&self) -> impl Iterator<Item = u32> + '_ {
        self.sets.keys().copied()
    }

    pub fn size_set(&self, size: u32) -> Option<&FontSizeSet> {
        self.sets.get(&size)
    }

    pub fn glyph(&self, id: GlyphId) -> Option<&GlyphRecord> {
        self.glyphs.get(id)
    }

    /// Glyph of `ch` at `size`
    pub fn glyph_for(&self, size: u32, ch: char) -> Option<&GlyphRecord> {
        self.sets
            .get(&size)
            .and_then(|s| s.slot(ch))
            .and_then(|id| self.glyphs.get(id))
    }

    /// Glyph table order: regular characters by code point, then icons
    pub fn canonical_order(&self) -> Vec<char> {
        let mut order = self.chars.clone();
        order.sort_unstable();
        order.extend(self.icons.iter().map(|(ch, _)| *ch));
        order
    }

    pub fn is_packed(&self) -> bool {
        self.packed
    }

    /// Glyph ids handed to the packer, each id once
    fn pack_list(&self) -> Vec<GlyphId> {
        let order = self.canonical_order();
        let mut seen = HashSet::new();
        let mut ids = vec![];
        for set in self.sets.values() {
            for &ch in &order {
                if let Some(id) = set.slot(ch) {
                    if seen.insert(id) {
                        ids.push(id);
                    }
                }
            }
        }
        if self.options.icon_policy == IconPolicy::Always {
            for &(_, id) in &self.icons {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// Place every glyph of every size in the atlas.
    ///
    /// On failure no record keeps a position.
    pub fn pack(&mut self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FontError::Config(format!(
                "atlas size {}x{} has a zero side",
                self.width, self.height
            )));
        }
        if self.width > MAX_ATLAS_SIDE || self.height > MAX_ATLAS_SIDE {
            return Err(FontError::Config(format!(
                "atlas size {}x{} exceeds {}",
                self.width, self.height, MAX_ATLAS_SIDE
            )));
        }

        self.packed = false;
        for glyph in self.glyphs.iter_mut() {
            glyph.packed = None;
        }

        let ids = self.pack_list();
        let sizes: Vec<_> = ids.iter().map(|&id| self.glyphs[id].size()).collect();
        let rects = pack::pack(self.width, self.height, &sizes, &self.options)?;
        for (&id, rect) in ids.iter().zip(rects) {
            self.glyphs[id].packed = Some(rect);
        }
        self.packed = true;

        info!(
            "{} glyphs packed into {}x{} ({:?}, {:?})",
            ids.len(),
            self.width,
            self.height,
            self.options.algorithm,
            self.options.order
        );
        Ok(())
    }

    fn ensure_packed(&self) -> Result<()> {
        match self.canonical_order().first() {
            Some(&ch) if !self.packed => Err(FontError::NotPacked(ch)),
            _ => Ok(()),
        }
    }

    pub fn write_glyph_table<W: Write>(&self, w: &mut W) -> Result<()> {
        muct::write_glyph_table(w, &self.canonical_order())
    }

    /// Descriptor contents for `size`; needs a successful [`pack`](Self::pack)
    pub fn descriptor(
        &self,
        size: u32,
        texture_ref: &str,
        glyph_table_ref: &str,
    ) -> Result<FontDescriptor> {
        let set = self.sets.get(&size).ok_or(FontError::UnknownSize(size))?;
        self.ensure_packed()?;

        let mut glyphs = Vec::with_capacity(set.glyph_count());
        for ch in self.canonical_order() {
            let id = match set.slot(ch) {
                Some(id) => id,
                None => break,
            };
            let record = &self.glyphs[id];
            let rect = record.packed.ok_or(FontError::NotPacked(ch))?;
            glyphs.push(GlyphEntry {
                x: rect.x as i16,
                y: rect.y as i16,
                w: rect.width as i16,
                h: rect.height as i16,
                x_offset: record.x_offset,
                y_offset: record.y_offset,
                advance: record.advance,
            });
        }

        let font_size = i16::try_from(set.pixel_size())
            .map_err(|_| FontError::Config(format!("font size {} too large", size)))?;
        Ok(FontDescriptor {
            texture_width: self.width as i32,
            texture_height: self.height as i32,
            font_size,
            texture_path: texture_ref.to_string(),
            glyph_table_path: glyph_table_ref.to_string(),
            glyphs,
        })
    }

    pub fn write_descriptor<W: Write + Seek>(
        &self,
        w: &mut W,
        size: u32,
        texture_ref: &str,
        glyph_table_ref: &str,
    ) -> Result<MfntHeader> {
        let desc = self.descriptor(size, texture_ref, glyph_table_ref)?;
        mfnt::write_descriptor(w, &desc)
    }

    pub fn compose_atlas(&self) -> Result<RgbaImage> {
        self.ensure_packed()?;
        atlas::compose_atlas(self.width, self.height, &self.glyphs)
    }

    /// Pack, then write the glyph table, one descriptor per size and the
    /// atlas. A packing failure writes nothing.
    pub fn save(&mut self, out: &OutputPaths) -> Result<()> {
        self.pack()?;

        let texture_ref = out.texture_ref();
        let glyph_table_ref = out.glyph_table_ref();

        create_parent(&out.glyph_table)?;
        let mut w = BufWriter::new(File::create(&out.glyph_table)?);
        self.write_glyph_table(&mut w)?;
        w.flush()?;
        info!("glyph table saved to {}", out.glyph_table.display());

        for size in self.sizes() {
            let path = out.descriptor_path(size);
            create_parent(&path)?;
            let mut w = BufWriter::new(File::create(&path)?);
            let header = self.write_descriptor(&mut w, size, &texture_ref, &glyph_table_ref)?;
            w.flush()?;
            info!(
                "size {}: {} glyphs, descriptor saved to {}",
                size,
                header.glyph_count,
                path.display()
            );
        }

        let png = out.texture_png_path();
        create_parent(&png)?;
        atlas::save_atlas(&self.compose_atlas()?, &png)?;
        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(fs::create_dir_all(dir)?),
        _ => Ok(()),
    }
}
