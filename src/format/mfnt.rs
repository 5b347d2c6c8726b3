// MFont
// copyright zipxing@hotmail.com 2022～2025
//
// MFNT font descriptor: one file per registered size

use crate::error::{FontError, Result};
use crate::util::align_padding;
use std::io::{Read, Seek, SeekFrom, Write};

pub const MAGIC: &[u8; 4] = b"MFNT";
pub const VERSION: [u8; 4] = [1, 0, 10, 0];
pub const HEADER_SIZE: i64 = 0x38;
/// Glyph records start on this boundary
pub const GLYPH_DATA_ALIGN: u64 = 0x10;
pub const PADDING_BYTE: u8 = 0xFF;

const UNK1: i32 = 2;
const UNK2: i16 = -1;
const UNK3: i32 = -1;

/// Fixed-size header; offsets are relative to the start of the descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MfntHeader {
    pub version: [u8; 4],
    pub texture_path_offset: i64,
    pub texture_width: i32,
    pub texture_height: i32,
    pub font_size: i16,
    pub glyph_count: i32,
    pub glyph_data_offset: i64,
    pub glyph_table_path_offset: i64,
}

/// One glyph record: atlas rectangle plus metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphEntry {
    pub x: i16,
    pub y: i16,
    pub w: i16,
    pub h: i16,
    pub x_offset: i16,
    pub y_offset: i16,
    pub advance: i16,
}

/// Everything a descriptor file holds, minus the derived offsets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontDescriptor {
    pub texture_width: i32,
    pub texture_height: i32,
    pub font_size: i16,
    pub texture_path: String,
    pub glyph_table_path: String,
    pub glyphs: Vec<GlyphEntry>,
}

impl MfntHeader {
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(MAGIC)?;
        w.write_all(&self.version)?;
        w.write_all(&self.texture_path_offset.to_le_bytes())?;
        w.write_all(&self.texture_width.to_le_bytes())?;
        w.write_all(&self.texture_height.to_le_bytes())?;
        w.write_all(&UNK1.to_le_bytes())?;
        w.write_all(&UNK2.to_le_bytes())?;
        w.write_all(&self.font_size.to_le_bytes())?;
        w.write_all(&self.glyph_count.to_le_bytes())?;
        w.write_all(&UNK3.to_le_bytes())?;
        w.write_all(&self.glyph_data_offset.to_le_bytes())?;
        w.write_all(&self.glyph_table_path_offset.to_le_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let magic: [u8; 4] = read_array(r)?;
        if &magic != MAGIC {
            return Err(FontError::InvalidFormat(format!("bad MFNT magic {:?}", magic)));
        }
        let version = read_array(r)?;
        let texture_path_offset = i64::from_le_bytes(read_array(r)?);
        let texture_width = i32::from_le_bytes(read_array(r)?);
        let texture_height = i32::from_le_bytes(read_array(r)?);
        let _unk1 = i32::from_le_bytes(read_array(r)?);
        let _unk2 = i16::from_le_bytes(read_array(r)?);
        let font_size = i16::from_le_bytes(read_array(r)?);
        let glyph_count = i32::from_le_bytes(read_array(r)?);
        let _unk3 = i32::from_le_bytes(read_array(r)?);
        let glyph_data_offset = i64::from_le_bytes(read_array(r)?);
        let glyph_table_path_offset = i64::from_le_bytes(read_array(r)?);
        Ok(MfntHeader {
            version,
            texture_path_offset,
            texture_width,
            texture_height,
            font_size,
            glyph_count,
            glyph_data_offset,
            glyph_table_path_offset,
        })
    }
}

impl GlyphEntry {
    fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        for v in [self.x, self.y, self.w, self.h, self.x_offset, self.y_offset, self.advance] {
            w.write_all(&v.to_le_bytes())?;
        }
        Ok(())
    }

    fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let mut v = [0i16; 7];
        for slot in v.iter_mut() {
            *slot = i16::from_le_bytes(read_array(r)?);
        }
        Ok(GlyphEntry {
            x: v[0],
            y: v[1],
            w: v[2],
            h: v[3],
            x_offset: v[4],
            y_offset: v[5],
            advance: v[6],
        })
    }
}

fn read_array<R: Read, const N: usize>(r: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

fn write_cstr<W: Write>(w: &mut W, s: &str) -> Result<()> {
    if s.as_bytes().contains(&0) {
        return Err(FontError::InvalidFormat(format!("path {:?} contains NUL", s)));
    }
    w.write_all(s.as_bytes())?;
    w.write_all(&[0])?;
    Ok(())
}

fn read_cstr<R: Read>(r: &mut R) -> Result<String> {
    let mut bytes = Vec::new();
    loop {
        let [b] = read_array::<R, 1>(r)?;
        if b == 0 {
            break;
        }
        bytes.push(b);
    }
    String::from_utf8(bytes).map_err(|e| FontError::InvalidFormat(e.to_string()))
}

fn seek_from<S: Seek>(s: &mut S, start: u64, offset: i64) -> Result<()> {
    let offset = u64::try_from(offset)
        .map_err(|_| FontError::InvalidFormat(format!("negative offset {}", offset)))?;
    s.seek(SeekFrom::Start(start + offset))?;
    Ok(())
}

fn relative<S: Seek>(s: &mut S, start: u64) -> Result<u64> {
    Ok(s.stream_position()? - start)
}

/// Write a descriptor at the current stream position.
///
/// The header goes out first with placeholder offsets; once the body is
/// written the stream seeks back and the header is rewritten with the real
/// ones. The stream is left positioned at the end of the descriptor.
pub fn write_descriptor<W: Write + Seek>(w: &mut W, desc: &FontDescriptor) -> Result<MfntHeader> {
    let start = w.stream_position()?;
    let glyph_count = i32::try_from(desc.glyphs.len())
        .map_err(|_| FontError::InvalidFormat(format!("{} glyphs", desc.glyphs.len())))?;

    let mut header = MfntHeader {
        version: VERSION,
        texture_path_offset: HEADER_SIZE,
        texture_width: desc.texture_width,
        texture_height: desc.texture_height,
        font_size: desc.font_size,
        glyph_count,
        glyph_data_offset: 0,
        glyph_table_path_offset: 0,
    };
    header.write_to(w)?;

    header.texture_path_offset = relative(w, start)? as i64;
    write_cstr(w, &desc.texture_path)?;

    let pad = align_padding(relative(w, start)?, GLYPH_DATA_ALIGN);
    w.write_all(&vec![PADDING_BYTE; pad as usize])?;

    header.glyph_data_offset = relative(w, start)? as i64;
    for glyph in &desc.glyphs {
        glyph.write_to(w)?;
    }

    header.glyph_table_path_offset = relative(w, start)? as i64;
    write_cstr(w, &desc.glyph_table_path)?;

    let end = w.stream_position()?;
    w.seek(SeekFrom::Start(start))?;
    header.write_to(w)?;
    w.seek(SeekFrom::Start(end))?;

    Ok(header)
}

/// Parse a descriptor starting at the current stream position
pub fn read_descriptor<R: Read + Seek>(r: &mut R) -> Result<(MfntHeader, FontDescriptor)> {
    let start = r.stream_position()?;
    let header = MfntHeader::read_from(r)?;
    if header.glyph_count < 0 {
        return Err(FontError::InvalidFormat(format!(
            "negative glyph count {}",
            header.glyph_count
        )));
    }

    seek_from(r, start, header.texture_path_offset)?;
    let texture_path = read_cstr(r)?;

    seek_from(r, start, header.glyph_data_offset)?;
    let mut glyphs = Vec::with_capacity(header.glyph_count as usize);
    for _ in 0..header.glyph_count {
        glyphs.push(GlyphEntry::read_from(r)?);
    }

    seek_from(r, start, header.glyph_table_path_offset)?;
    let glyph_table_path = read_cstr(r)?;

    Ok((
        header,
        FontDescriptor {
            texture_width: header.texture_width,
            texture_height: header.texture_height,
            font_size: header.font_size,
            texture_path,
            glyph_table_path,
            glyphs,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> FontDescriptor {
        FontDescriptor {
            texture_width: 256,
            texture_height: 128,
            font_size: 20,
            texture_path: "a.png".to_string(),
            glyph_table_path: "font.buct".to_string(),
            glyphs: vec![
                GlyphEntry {
                    x: 0,
                    y: 0,
                    w: 10,
                    h: 18,
                    x_offset: 1,
                    y_offset: 15,
                    advance: 11,
                },
                GlyphEntry {
                    x: 10,
                    y: 0,
                    w: 4,
                    h: 4,
                    x_offset: 0,
                    y_offset: 0,
                    advance: 0,
                },
            ],
        }
    }

    #[test]
    fn test_offsets_and_padding() {
        let mut cur = Cursor::new(Vec::new());
        let header = write_descriptor(&mut cur, &sample()).unwrap();
        let buf = cur.into_inner();

        assert_eq!(header.texture_path_offset, 0x38);
        // "a.png\0" ends at 0x3E, padded to 0x40
        assert_eq!(header.glyph_data_offset, 0x40);
        assert_eq!(header.glyph_table_path_offset, 0x40 + 2 * 14);
        assert_eq!(buf.len(), 0x40 + 2 * 14 + "font.buct".len() + 1);

        assert_eq!(&buf[0..4], b"MFNT");
        assert_eq!(&buf[4..8], &[1, 0, 10, 0]);
        assert_eq!(&buf[8..16], &0x38i64.to_le_bytes());
        assert_eq!(&buf[16..20], &256i32.to_le_bytes());
        assert_eq!(&buf[20..24], &128i32.to_le_bytes());
        assert_eq!(&buf[24..28], &2i32.to_le_bytes());
        assert_eq!(&buf[28..30], &[0xFF, 0xFF]);
        assert_eq!(&buf[30..32], &20i16.to_le_bytes());
        assert_eq!(&buf[32..36], &2i32.to_le_bytes());
        assert_eq!(&buf[36..40], &[0xFF; 4]);
        assert_eq!(&buf[40..48], &0x40i64.to_le_bytes());
        assert_eq!(&buf[48..56], &0x5Ci64.to_le_bytes());
        assert_eq!(&buf[0x38..0x3E], b"a.png\0");
        assert_eq!(&buf[0x3E..0x40], &[0xFF, 0xFF]);
        assert_eq!(&buf[0x40..0x42], &0i16.to_le_bytes());
        assert_eq!(&buf[0x44..0x46], &10i16.to_le_bytes());
        assert_eq!(*buf.last().unwrap(), 0);
    }

    #[test]
    fn test_no_padding_when_aligned() {
        let mut desc = sample();
        // 0x38 + 7 + 1 = 0x40
        desc.texture_path = "tex.png".to_string();
        let mut cur = Cursor::new(Vec::new());
        let header = write_descriptor(&mut cur, &desc).unwrap();
        assert_eq!(header.glyph_data_offset, 0x40);
    }

    #[test]
    fn test_read_back() {
        let desc = sample();
        let mut cur = Cursor::new(Vec::new());
        let written = write_descriptor(&mut cur, &desc).unwrap();
        cur.set_position(0);
        let (header, back) = read_descriptor(&mut cur).unwrap();
        assert_eq!(header, written);
        assert_eq!(back, desc);
    }

    #[test]
    fn test_offsets_relative_to_start() {
        let mut cur = Cursor::new(vec![0xAA; 5]);
        cur.set_position(5);
        let header = write_descriptor(&mut cur, &sample()).unwrap();
        assert_eq!(header.glyph_data_offset, 0x40);
        assert_eq!(cur.position() as usize, cur.get_ref().len());
        cur.set_position(5);
        let (_, back) = read_descriptor(&mut cur).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_nul_in_path_rejected() {
        let mut desc = sample();
        desc.texture_path = "bad\0path".to_string();
        let res = write_descriptor(&mut Cursor::new(Vec::new()), &desc);
        assert!(matches!(res, Err(FontError::InvalidFormat(_))));
    }
}
