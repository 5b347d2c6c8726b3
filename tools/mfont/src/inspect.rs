// MFont
// copyright zipxing@hotmail.com 2022～2025

// inspect subcommand: dump a MUCT or MFNT file

use mfont::error::{FontError, Result};
use mfont::format::{mfnt, muct};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

pub fn mfont_inspect(path: &Path) -> Result<()> {
    let mut r = BufReader::new(File::open(path)?);
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    r.seek(SeekFrom::Start(0))?;

    match &magic {
        m if m == muct::MAGIC => print_glyph_table(&muct::read_glyph_table(&mut r)?),
        m if m == mfnt::MAGIC => {
            let (header, desc) = mfnt::read_descriptor(&mut r)?;
            print_descriptor(&header, &desc);
        }
        _ => {
            return Err(FontError::InvalidFormat(format!(
                "{}: unknown magic {:?}",
                path.display(),
                magic
            )))
        }
    }
    Ok(())
}

fn print_glyph_table(table: &muct::GlyphTable) {
    println!("MUCT version {:?}, {} glyphs", table.version, table.entries.len());
    for e in &table.entries {
        let ch = char::from_u32(u32::from(e.code_point)).unwrap_or(char::REPLACEMENT_CHARACTER);
        println!("  U+{:04X} {:?} -> {}", e.code_point, ch, e.index);
    }
}

fn print_descriptor(header: &mfnt::MfntHeader, desc: &mfnt::FontDescriptor) {
    println!("MFNT version {:?}", header.version);
    println!("  font size     {}", header.font_size);
    println!(
        "  texture       {}x{} {}",
        desc.texture_width, desc.texture_height, desc.texture_path
    );
    println!("  glyph table   {}", desc.glyph_table_path);
    println!(
        "  offsets       texture {:#x}, glyphs {:#x}, glyph table {:#x}",
        header.texture_path_offset, header.glyph_data_offset, header.glyph_table_path_offset
    );
    println!("  {} glyphs:", header.glyph_count);
    for (i, g) in desc.glyphs.iter().enumerate() {
        println!(
            "  {:5} pos ({}, {}) size {}x{} off ({}, {}) adv {}",
            i, g.x, g.y, g.w, g.h, g.x_offset, g.y_offset, g.advance
        );
    }
}
