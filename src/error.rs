// MFont
// copyright zipxing@hotmail.com 2022～2025

//! Error type shared by every stage of the font build.

use std::path::PathBuf;

/// Crate result alias
pub type Result<T> = std::result::Result<T, FontError>;

/// Errors raised while building a bitmap font
#[derive(Debug)]
pub enum FontError {
    /// Underlying I/O failure (file read/write, seek)
    Io(std::io::Error),
    /// Image decode or encode failure (icons, atlas)
    Image(image::ImageError),
    /// The TTF could not be read or parsed
    FontLoad { path: PathBuf, reason: String },
    /// Character set or filter file could not be read
    FilterRead { path: PathBuf, reason: String },
    /// An icon code point has no image on disk
    IconNotFound { code_point: u32, path: PathBuf },
    /// The glyphs do not fit in one atlas page
    CapacityExceeded {
        placed: usize,
        total: usize,
        width: u32,
        height: u32,
    },
    /// A zero sized rectangle was handed to the packer
    InvalidRect { index: usize },
    /// The on-disk formats only store 16-bit code points
    UnsupportedCodePoint(char),
    /// No font size set registered for this size
    UnknownSize(u32),
    /// A glyph was serialized before `pack()` succeeded
    NotPacked(char),
    /// A binary file failed to parse
    InvalidFormat(String),
    /// Job file or command line configuration problem
    Config(String),
}

impl std::fmt::Display for FontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontError::Io(e) => write!(f, "I/O error: {}", e),
            FontError::Image(e) => write!(f, "image error: {}", e),
            FontError::FontLoad { path, reason } => {
                write!(f, "failed to load font {}: {}", path.display(), reason)
            }
            FontError::FilterRead { path, reason } => {
                write!(f, "failed to read character file {}: {}", path.display(), reason)
            }
            FontError::IconNotFound { code_point, path } => {
                write!(f, "icon U+{:04X} not found at {}", code_point, path.display())
            }
            FontError::CapacityExceeded {
                placed,
                total,
                width,
                height,
            } => write!(
                f,
                "atlas capacity exceeded: only {} of {} glyphs fit in {}x{}, \
                 reduce the character set with size filters or enlarge the atlas",
                placed, total, width, height
            ),
            FontError::InvalidRect { index } => {
                write!(f, "rectangle #{} has a zero dimension", index)
            }
            FontError::UnsupportedCodePoint(ch) => {
                write!(f, "code point U+{:04X} does not fit in 16 bits", *ch as u32)
            }
            FontError::UnknownSize(size) => write!(f, "font size {} is not registered", size),
            FontError::NotPacked(ch) => {
                write!(f, "glyph U+{:04X} has no atlas position, run pack() first", *ch as u32)
            }
            FontError::InvalidFormat(msg) => write!(f, "invalid file format: {}", msg),
            FontError::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FontError::Io(e) => Some(e),
            FontError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FontError {
    fn from(err: std::io::Error) -> FontError {
        FontError::Io(err)
    }
}

impl From<image::ImageError> for FontError {
    fn from(err: image::ImageError) -> FontError {
        FontError::Image(err)
    }
}
