// MFont
// copyright zipxing@hotmail.com 2022～2025

//! Utilities: atlas rectangles, 26.6 fixed point conversion,
//! stream alignment and UTF-16 character files.

use crate::error::{FontError, Result};
use encoding_rs::{Encoding, UTF_16LE};
use std::path::Path;

/// Width and height of a rectangle waiting to be packed
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Size {
        Size { width, height }
    }

    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// A placed rectangle inside the atlas, top-left origin
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(self) -> u32 {
        self.y + self.height
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn intersects(self, other: Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// true if `self` lies completely within `other`
    pub fn contained_in(self, other: Rect) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.right() <= other.right()
            && self.bottom() <= other.bottom()
    }
}

/// Convert a 26.6 fixed point value to whole pixels, truncating toward zero.
pub fn f26d6_to_int(val: i64) -> i64 {
    let ret = (val.abs() & 0x7FFF_FFC0) >> 6;
    if val < 0 {
        -ret
    } else {
        ret
    }
}

/// Bytes needed to bring `value` up to a multiple of `alignment`
pub fn align_padding(value: u64, alignment: u64) -> u64 {
    (alignment - value % alignment) % alignment
}

/// Decode a character file: the BOM picks UTF-8, UTF-16BE or UTF-16LE,
/// unmarked text is UTF-16LE. Malformed input is an error.
pub fn decode_text(bytes: &[u8]) -> std::result::Result<String, String> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_16LE, 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .map(|text| text.into_owned())
        .ok_or_else(|| format!("malformed {} text", encoding.name()))
}

/// Read a character file and return its characters, line breaks removed
pub fn read_char_file(path: &Path) -> Result<Vec<char>> {
    let bytes = std::fs::read(path).map_err(|e| FontError::FilterRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let text = decode_text(&bytes).map_err(|reason| FontError::FilterRead {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(text
        .chars()
        .filter(|c| *c != '\n' && *c != '\r' && *c != '\u{FEFF}')
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f26d6_to_int() {
        assert_eq!(f26d6_to_int(-1600), -25);
        assert_eq!(f26d6_to_int(1600), 25);
        assert_eq!(f26d6_to_int(0), 0);
        // fractional part is dropped, not rounded
        assert_eq!(f26d6_to_int(127), 1);
        assert_eq!(f26d6_to_int(-127), -1);
        assert_eq!(f26d6_to_int(63), 0);
    }

    #[test]
    fn test_align_padding() {
        assert_eq!(align_padding(0x38, 0x10), 8);
        assert_eq!(align_padding(0x40, 0x10), 0);
        assert_eq!(align_padding(0x41, 0x10), 15);
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0, 0, 4, 4);
        assert!(a.intersects(Rect::new(3, 3, 2, 2)));
        assert!(!a.intersects(Rect::new(4, 0, 2, 2)));
        assert!(Rect::new(1, 1, 2, 2).contained_in(a));
        assert!(!Rect::new(3, 3, 2, 2).contained_in(a));
    }

    #[test]
    fn test_decode_utf16_le_with_bom() {
        let bytes = [0xFF, 0xFE, b'A', 0, 0x2D, 0x4E, b'\n', 0];
        assert_eq!(decode_text(&bytes).unwrap(), "A中\n");
    }

    #[test]
    fn test_decode_utf16_be_with_bom() {
        let bytes = [0xFE, 0xFF, 0, b'A', 0, b'B'];
        assert_eq!(decode_text(&bytes).unwrap(), "AB");
    }

    #[test]
    fn test_decode_utf8_bom() {
        let bytes = [0xEF, 0xBB, 0xBF, b'x', b'y'];
        assert_eq!(decode_text(&bytes).unwrap(), "xy");
    }

    #[test]
    fn test_decode_rejects_lone_surrogate() {
        let bytes = [0xFF, 0xFE, 0x00, 0xD8];
        assert!(decode_text(&bytes).is_err());
        // dangling half code unit
        assert!(decode_text(&[0xFF, 0xFE, b'A', 0, b'B']).is_err());
    }

    #[test]
    fn test_decode_unmarked_is_utf16_le() {
        assert_eq!(decode_text(&[b'A', 0, 0x2D, 0x4E]).unwrap(), "A中");
        // UTF-8 without a BOM is not sniffed
        assert_eq!(decode_text(b"AB").unwrap(), "\u{4241}");
        assert_eq!(decode_text(&[]).unwrap(), "");
    }
}
