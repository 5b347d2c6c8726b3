// MFont
// copyright zipxing@hotmail.com 2022～2025

//! MFont turns a TrueType font and a character set into a bitmap font for
//! the game engine.
//!
//! One build produces three files that reference each other:
//!
//! - a glyph table (`MUCT`) mapping every code point to a glyph index,
//! - one font descriptor (`MFNT`) per pixel size, with the atlas rectangle
//!   and metrics of each glyph,
//! - an RGBA texture atlas (PNG) holding every glyph of every size.
//!
//! Each size can limit the characters it renders with a filter file, use
//! its own TTF, and opt into a set of pre-rendered icons that are shared
//! between sizes. All glyphs of all sizes are packed into a single atlas;
//! if they do not fit, nothing is written.
//!
//! The modules, from the bottom up: util, error, glyph, pack, icon, font,
//! format, config and log. The `mfont` binary wraps [`config::Job`].

pub mod config;

pub mod error;

pub mod font;

pub mod format;

pub mod glyph;

pub mod icon;

pub mod log;

pub mod pack;

pub mod util;

pub use error::{FontError, Result};
pub use font::FontCollection;
pub use format::OutputPaths;
pub use pack::PackOptions;
