// MFont
// copyright zipxing@hotmail.com 2022～2025
//
// MaxRects bin packer, best-area-fit heuristic

use super::BinPacker;
use crate::util::{Rect, Size};

/// MaxRects bin packing
///
/// Keeps a list of maximal free rectangles. Placing a rectangle splits
/// every free rectangle it overlaps into up to four pieces, then drops
/// the pieces contained in another free rectangle.
pub struct MaxRectsBin {
    free_rects: Vec<Rect>,
}

impl MaxRectsBin {
    pub fn new(width: u32, height: u32) -> Self {
        MaxRectsBin {
            free_rects: vec![Rect::new(0, 0, width, height)],
        }
    }

    /// Free rectangle leaving the smallest unused area, first one wins ties
    fn find_best_area_fit(&self, size: Size) -> Option<Rect> {
        let mut best_area_fit = u64::MAX;
        let mut best_rect = None;

        for rect in &self.free_rects {
            if size.width <= rect.width && size.height <= rect.height {
                let area_fit = rect.size().area() - size.area();
                if area_fit < best_area_fit {
                    best_area_fit = area_fit;
                    best_rect = Some(Rect::new(rect.x, rect.y, size.width, size.height));
                }
            }
        }

        best_rect
    }

    fn place_rectangle(&mut self, used: Rect) {
        let mut split = Vec::new();
        self.free_rects.retain(|free| {
            if !free.intersects(used) {
                return true;
            }
            split_free_node(*free, used, &mut split);
            false
        });
        self.free_rects.extend(split);
        self.prune_free_list();
    }

    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free_rects.len() {
            let mut removed_i = false;
            let mut j = i + 1;
            while j < self.free_rects.len() {
                if self.free_rects[i].contained_in(self.free_rects[j]) {
                    self.free_rects.remove(i);
                    removed_i = true;
                    break;
                } else if self.free_rects[j].contained_in(self.free_rects[i]) {
                    self.free_rects.remove(j);
                } else {
                    j += 1;
                }
            }
            if !removed_i {
                i += 1;
            }
        }
    }
}

/// Pieces of `free` left uncovered by `used` (the two are known to overlap)
fn split_free_node(free: Rect, used: Rect, out: &mut Vec<Rect>) {
    // top
    if used.y > free.y {
        out.push(Rect::new(free.x, free.y, free.width, used.y - free.y));
    }
    // bottom
    if used.bottom() < free.bottom() {
        out.push(Rect::new(
            free.x,
            used.bottom(),
            free.width,
            free.bottom() - used.bottom(),
        ));
    }
    // left
    if used.x > free.x {
        out.push(Rect::new(free.x, free.y, used.x - free.x, free.height));
    }
    // right
    if used.right() < free.right() {
        out.push(Rect::new(
            used.right(),
            free.y,
            free.right() - used.right(),
            free.height,
        ));
    }
}

impl BinPacker for MaxRectsBin {
    fn insert(&mut self, size: Size) -> Option<Rect> {
        let rect = self.find_best_area_fit(size)?;
        self.place_rectangle(rect);
        Some(rect)
    }
}
