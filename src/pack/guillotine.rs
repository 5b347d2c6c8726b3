// MFont
// copyright zipxing@hotmail.com 2022～2025
//
// Guillotine bin packer, best-short-side-fit heuristic

use super::BinPacker;
use crate::util::{Rect, Size};

/// Guillotine bin packing.
///
/// The chosen free rectangle is the one whose shorter leftover side is
/// smallest (ties: smaller longer side). It is then cut in two along the
/// shorter leftover axis.
pub struct GuillotineBin {
    free_rects: Vec<Rect>,
}

impl GuillotineBin {
    pub fn new(width: u32, height: u32) -> Self {
        GuillotineBin {
            free_rects: vec![Rect::new(0, 0, width, height)],
        }
    }
}

impl BinPacker for GuillotineBin {
    fn insert(&mut self, size: Size) -> Option<Rect> {
        let mut best_idx = None;
        let mut best_short = u32::MAX;
        let mut best_long = u32::MAX;

        for (i, r) in self.free_rects.iter().enumerate() {
            if r.width >= size.width && r.height >= size.height {
                let leftover_w = r.width - size.width;
                let leftover_h = r.height - size.height;
                let short = leftover_w.min(leftover_h);
                let long = leftover_w.max(leftover_h);
                if short < best_short || (short == best_short && long < best_long) {
                    best_idx = Some(i);
                    best_short = short;
                    best_long = long;
                }
            }
        }

        let idx = best_idx?;
        // tie-breaking depends on free list order
        let r = self.free_rects.remove(idx);
        let leftover_w = r.width - size.width;
        let leftover_h = r.height - size.height;

        if leftover_w < leftover_h {
            if leftover_w > 0 {
                self.free_rects
                    .push(Rect::new(r.x + size.width, r.y, leftover_w, size.height));
            }
            if leftover_h > 0 {
                self.free_rects
                    .push(Rect::new(r.x, r.y + size.height, r.width, leftover_h));
            }
        } else {
            if leftover_h > 0 {
                self.free_rects
                    .push(Rect::new(r.x, r.y + size.height, size.width, leftover_h));
            }
            if leftover_w > 0 {
                self.free_rects
                    .push(Rect::new(r.x + size.width, r.y, leftover_w, r.height));
            }
        }

        Some(Rect::new(r.x, r.y, size.width, size.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_along_short_axis() {
        let mut bin = GuillotineBin::new(16, 8);
        assert_eq!(bin.insert(Size::new(4, 4)), Some(Rect::new(0, 0, 4, 4)));
        // leftover_w = 12, leftover_h = 4: horizontal cut keeps the right side tall
        assert_eq!(
            bin.free_rects,
            vec![Rect::new(0, 4, 4, 4), Rect::new(4, 0, 12, 8)]
        );
        assert_eq!(bin.insert(Size::new(4, 4)), Some(Rect::new(0, 4, 4, 4)));
        assert_eq!(bin.free_rects, vec![Rect::new(4, 0, 12, 8)]);
    }

    #[test]
    fn test_free_rects_never_overlap() {
        let mut bin = GuillotineBin::new(32, 32);
        for i in 0..12 {
            bin.insert(Size::new(3 + i % 5, 2 + i % 7));
            for (a, ra) in bin.free_rects.iter().enumerate() {
                for rb in bin.free_rects.iter().skip(a + 1) {
                    assert!(!ra.intersects(*rb));
                }
            }
        }
    }
}
