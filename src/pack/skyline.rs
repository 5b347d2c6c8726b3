// MFont
// copyright zipxing@hotmail.com 2022～2025
//
// Skyline bin packer, bottom-left heuristic

use super::BinPacker;
use crate::util::{Rect, Size};

/// One horizontal segment of the skyline contour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SkylineNode {
    x: u32,
    y: u32,
    width: u32,
}

/// Skyline bin packer.
///
/// The skyline is the list of segments forming the top edge of everything
/// placed so far, sorted by `x` and covering the full bin width. A new
/// rectangle goes where its top edge ends up lowest; ties prefer the
/// narrower starting segment.
pub struct SkylineBin {
    width: u32,
    height: u32,
    skyline: Vec<SkylineNode>,
}

impl SkylineBin {
    pub fn new(width: u32, height: u32) -> Self {
        SkylineBin {
            width,
            height,
            skyline: vec![SkylineNode { x: 0, y: 0, width }],
        }
    }

    /// y at which a rectangle starting at segment `index` would rest
    fn rest_height(&self, index: usize, size: Size) -> Option<u32> {
        let x = self.skyline[index].x;
        if x + size.width > self.width {
            return None;
        }

        let mut y = self.skyline[index].y;
        let mut width_left = size.width;
        let mut i = index;
        while width_left > 0 {
            let node = self.skyline.get(i)?;
            y = y.max(node.y);
            if y + size.height > self.height {
                return None;
            }
            width_left = width_left.saturating_sub(node.width);
            i += 1;
        }
        Some(y)
    }

    fn find_bottom_left(&self, size: Size) -> Option<(usize, Rect)> {
        let mut best_top = u32::MAX;
        let mut best_width = u32::MAX;
        let mut best = None;

        for (i, node) in self.skyline.iter().enumerate() {
            if let Some(y) = self.rest_height(i, size) {
                let top = y + size.height;
                if top < best_top || (top == best_top && node.width < best_width) {
                    best_top = top;
                    best_width = node.width;
                    best = Some((i, Rect::new(node.x, y, size.width, size.height)));
                }
            }
        }

        best
    }

    fn add_level(&mut self, index: usize, rect: Rect) {
        self.skyline.insert(
            index,
            SkylineNode {
                x: rect.x,
                y: rect.bottom(),
                width: rect.width,
            },
        );

        // trim the segments now hidden under the new one
        let i = index + 1;
        while i < self.skyline.len() {
            let prev = self.skyline[i - 1];
            let prev_right = prev.x + prev.width;
            let node = &mut self.skyline[i];
            if node.x >= prev_right {
                break;
            }
            let shrink = prev_right - node.x;
            if node.width <= shrink {
                self.skyline.remove(i);
            } else {
                node.x += shrink;
                node.width -= shrink;
                break;
            }
        }

        self.merge();
    }

    fn merge(&mut self) {
        let mut i = 0;
        while i + 1 < self.skyline.len() {
            if self.skyline[i].y == self.skyline[i + 1].y {
                self.skyline[i].width += self.skyline[i + 1].width;
                self.skyline.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }
}

impl BinPacker for SkylineBin {
    fn insert(&mut self, size: Size) -> Option<Rect> {
        let (index, rect) = self.find_bottom_left(size)?;
        self.add_level(index, rect);
        Some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skyline_covers_bin_width() {
        let mut bin = SkylineBin::new(16, 16);
        for size in [Size::new(5, 3), Size::new(7, 9), Size::new(2, 2), Size::new(6, 1)] {
            assert!(bin.insert(size).is_some());
            let total: u32 = bin.skyline.iter().map(|n| n.width).sum();
            assert_eq!(total, 16);
            assert!(bin.skyline.windows(2).all(|w| w[0].x + w[0].width == w[1].x));
            assert!(bin.skyline.windows(2).all(|w| w[0].y != w[1].y));
        }
    }

    #[test]
    fn test_prefers_lowest_top() {
        let mut bin = SkylineBin::new(8, 8);
        assert_eq!(bin.insert(Size::new(4, 6)), Some(Rect::new(0, 0, 4, 6)));
        assert_eq!(bin.insert(Size::new(4, 2)), Some(Rect::new(4, 0, 4, 2)));
        // lands on the lower right column rather than the tall left one
        assert_eq!(bin.insert(Size::new(4, 3)), Some(Rect::new(4, 2, 4, 3)));
        assert_eq!(bin.insert(Size::new(8, 2)), Some(Rect::new(0, 6, 8, 2)));
        // the gap under the full-width row is no longer reachable
        assert_eq!(bin.insert(Size::new(1, 1)), None);
    }

    #[test]
    fn test_spanning_segments() {
        let mut bin = SkylineBin::new(8, 8);
        bin.insert(Size::new(2, 3));
        bin.insert(Size::new(2, 1));
        // must rest on the taller segment it spans
        assert_eq!(bin.insert(Size::new(6, 2)), Some(Rect::new(2, 1, 6, 2)));
    }

    #[test]
    fn test_too_large() {
        let mut bin = SkylineBin::new(8, 8);
        assert_eq!(bin.insert(Size::new(9, 1)), None);
        assert_eq!(bin.insert(Size::new(1, 9)), None);
        assert_eq!(bin.insert(Size::new(8, 8)), Some(Rect::new(0, 0, 8, 8)));
        assert_eq!(bin.insert(Size::new(1, 1)), None);
    }
}
