// MFont
// copyright zipxing@hotmail.com 2022～2025

//! Rectangle packing for the glyph atlas.
//!
//! One call places a whole batch of glyph rectangles into a single bin of
//! fixed size. There is only ever one atlas page: if any rectangle fails
//! to find a spot the batch fails with [`FontError::CapacityExceeded`].
//!
//! Three heuristics are available, selected through [`PackOptions`]:
//!
//! - **Skyline bottom-left** (default): keeps the upper contour of the
//!   placed rectangles and drops each rectangle as low as possible.
//! - **MaxRects best-area-fit**: tracks maximal free rectangles.
//! - **Guillotine best-short-side-fit**: splits the chosen free rectangle
//!   into two along the shorter leftover axis.
//!
//! Rectangles are never rotated. With the same sizes, order and options
//! the output is identical on every run.

use crate::error::{FontError, Result};
use crate::util::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

mod guillotine;
mod maxrects;
mod skyline;

pub use guillotine::GuillotineBin;
pub use maxrects::MaxRectsBin;
pub use skyline::SkylineBin;

/// A single bin that accepts rectangles one at a time
pub trait BinPacker {
    /// Place a rectangle, returning its position or `None` when it fits nowhere
    fn insert(&mut self, size: Size) -> Option<Rect>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackAlgorithm {
    #[default]
    Skyline,
    MaxRects,
    Guillotine,
}

/// Order in which rectangles are offered to the bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackOrder {
    /// Largest area first; equal areas keep their input order
    #[default]
    DescendingArea,
    Insertion,
}

/// Which icon glyphs take atlas space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconPolicy {
    /// Only icons referenced by at least one size set
    #[default]
    Referenced,
    /// Every loaded icon, used or not
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PackOptions {
    pub algorithm: PackAlgorithm,
    pub order: PackOrder,
    pub icon_policy: IconPolicy,
}

impl FromStr for PackAlgorithm {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "skyline" => Ok(PackAlgorithm::Skyline),
            "max-rects" | "maxrects" => Ok(PackAlgorithm::MaxRects),
            "guillotine" => Ok(PackAlgorithm::Guillotine),
            _ => Err(FontError::Config(format!("unknown pack algorithm '{}'", s))),
        }
    }
}

impl FromStr for PackOrder {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "descending-area" | "area" => Ok(PackOrder::DescendingArea),
            "insertion" => Ok(PackOrder::Insertion),
            _ => Err(FontError::Config(format!("unknown pack order '{}'", s))),
        }
    }
}

fn new_bin(algorithm: PackAlgorithm, width: u32, height: u32) -> Box<dyn BinPacker> {
    match algorithm {
        PackAlgorithm::Skyline => Box::new(SkylineBin::new(width, height)),
        PackAlgorithm::MaxRects => Box::new(MaxRectsBin::new(width, height)),
        PackAlgorithm::Guillotine => Box::new(GuillotineBin::new(width, height)),
    }
}

/// Indices of `sizes` in the order they are offered to the bin
pub fn placement_order(sizes: &[Size], order: PackOrder) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..sizes.len()).collect();
    if order == PackOrder::DescendingArea {
        // stable: ties keep input order
        idx.sort_by(|a, b| sizes[*b].area().cmp(&sizes[*a].area()));
    }
    idx
}

/// Pack every rectangle of `sizes` into one `width` x `height` bin.
///
/// The returned rectangles are in the same order as `sizes`.
pub fn pack(width: u32, height: u32, sizes: &[Size], opts: &PackOptions) -> Result<Vec<Rect>> {
    if let Some(index) = sizes.iter().position(|s| s.width == 0 || s.height == 0) {
        return Err(FontError::InvalidRect { index });
    }

    let mut bin = new_bin(opts.algorithm, width, height);
    let mut placed = vec![Rect::default(); sizes.len()];

    for (n, &i) in placement_order(sizes, opts.order).iter().enumerate() {
        match bin.insert(sizes[i]) {
            Some(rect) => placed[i] = rect,
            None => {
                return Err(FontError::CapacityExceeded {
                    placed: n,
                    total: sizes.len(),
                    width,
                    height,
                })
            }
        }
    }

    Ok(placed)
}
