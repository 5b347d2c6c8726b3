// MFont
// copyright zipxing@hotmail.com 2022～2025
//
// MUCT glyph table: maps code points to glyph indices

use crate::error::{FontError, Result};
use std::io::{Read, Seek, SeekFrom, Write};

pub const MAGIC: &[u8; 4] = b"MUCT";
pub const VERSION: [u8; 4] = [1, 0, 4, 0];
/// Header length, also the offset of the entry table
pub const HEADER_SIZE: i64 = 0x18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphTableEntry {
    pub code_point: u16,
    pub index: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphTable {
    pub version: [u8; 4],
    pub entries: Vec<GlyphTableEntry>,
}

/// Write the table for `chars`, already in canonical order
pub fn write_glyph_table<W: Write>(w: &mut W, chars: &[char]) -> Result<()> {
    let count = i32::try_from(chars.len())
        .map_err(|_| FontError::InvalidFormat(format!("{} glyphs", chars.len())))?;

    w.write_all(MAGIC)?;
    w.write_all(&VERSION)?;
    w.write_all(&count.to_le_bytes())?;
    w.write_all(&(-1i32).to_le_bytes())?;
    w.write_all(&HEADER_SIZE.to_le_bytes())?;

    for (i, ch) in chars.iter().enumerate() {
        let cp = u16::try_from(*ch as u32).map_err(|_| FontError::UnsupportedCodePoint(*ch))?;
        w.write_all(&cp.to_le_bytes())?;
        w.write_all(&(-1i16).to_le_bytes())?;
        w.write_all(&(i as i32).to_le_bytes())?;
    }
    Ok(())
}

fn read_array<R: Read, const N: usize>(r: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

pub fn read_glyph_table<R: Read + Seek>(r: &mut R) -> Result<GlyphTable> {
    let start = r.stream_position()?;
    let magic: [u8; 4] = read_array(r)?;
    if &magic != MAGIC {
        return Err(FontError::InvalidFormat(format!("bad MUCT magic {:?}", magic)));
    }
    let version: [u8; 4] = read_array(r)?;
    let count = i32::from_le_bytes(read_array(r)?);
    let _reserved = i32::from_le_bytes(read_array(r)?);
    let offset = i64::from_le_bytes(read_array(r)?);
    if count < 0 || offset < HEADER_SIZE {
        return Err(FontError::InvalidFormat(format!(
            "MUCT count {} offset {:#x}",
            count, offset
        )));
    }

    r.seek(SeekFrom::Start(start + offset as u64))?;
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let code_point = u16::from_le_bytes(read_array(r)?);
        let _reserved = i16::from_le_bytes(read_array(r)?);
        let index = i32::from_le_bytes(read_array(r)?);
        entries.push(GlyphTableEntry { code_point, index });
    }
    Ok(GlyphTable { version, entries })
}
