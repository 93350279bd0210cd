use std::collections::HashSet;

use crate::model::{Rect, Size};

/// Spatially partitions a page into a fixed grid of blocks so collision
/// queries only touch slots that could plausibly overlap.
///
/// Pure bookkeeping: `add`/`remove` never reject anything, and a slot
/// reported by `for_near_slots`/`for_slots_on_y_line` may still turn out not
/// to actually overlap the query rect — callers must re-check.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    block_size: Size,
    x_blocks: u32,
    y_blocks: u32,
    page_width: u32,
    blocks: Vec<Vec<u64>>,
}

impl SpatialIndex {
    pub fn new(page_size: Size, block_size: Size) -> Self {
        let x_blocks = block_count(page_size.width, block_size.width);
        let y_blocks = block_count(page_size.height, block_size.height);
        Self {
            block_size,
            x_blocks,
            y_blocks,
            page_width: page_size.width,
            blocks: vec![Vec::new(); (x_blocks * y_blocks) as usize],
        }
    }

    /// Registers `slot_id`'s rect in every block it touches.
    pub fn add(&mut self, slot_id: u64, rect: &Rect) {
        self.for_touched_blocks_mut(rect, |block| block.push(slot_id));
    }

    /// Removes `slot_id` from every block it was registered in.
    pub fn remove(&mut self, slot_id: u64, rect: &Rect) {
        self.for_touched_blocks_mut(rect, |block| block.retain(|&id| id != slot_id));
    }

    /// Visits every distinct slot-id in any block `query` touches, in
    /// unspecified order, stopping as soon as `visitor` returns `true`.
    /// Returns whether `visitor` ever returned `true`.
    pub fn for_near_slots(&self, query: &Rect, mut visitor: impl FnMut(u64) -> bool) -> bool {
        let mut seen = HashSet::new();
        self.for_touched_blocks(query, |block| {
            for &slot_id in block {
                if seen.insert(slot_id) && visitor(slot_id) {
                    return true;
                }
            }
            false
        })
    }

    /// Equivalent to `for_near_slots({0, y, page_width, 1}, visitor)`.
    pub fn for_slots_on_y_line(&self, y: u32, visitor: impl FnMut(u64) -> bool) -> bool {
        let line = Rect::new(0, y, self.page_width, 1);
        self.for_near_slots(&line, visitor)
    }

    /// Flat block index covering pixel `(x, y)`. Public for debug overlays
    /// built by embedders; not used on the hot path internally.
    pub fn block_index(&self, x: u32, y: u32) -> usize {
        let col = x / self.block_size.width;
        let row = y / self.block_size.height;
        (row * self.x_blocks + col) as usize
    }

    fn block_range(&self, rect: &Rect) -> (u32, u32, u32, u32) {
        let left = rect.x / self.block_size.width;
        let right = rect.end_x() / self.block_size.width;
        let top = rect.y / self.block_size.height;
        let bottom = rect.end_y() / self.block_size.height;
        (left, right, top, bottom)
    }

    fn for_touched_blocks_mut(&mut self, rect: &Rect, mut f: impl FnMut(&mut Vec<u64>)) {
        let (left, right, top, bottom) = self.block_range(rect);
        for row in top..=bottom {
            for col in left..=right {
                let idx = (row * self.x_blocks + col) as usize;
                f(&mut self.blocks[idx]);
            }
        }
    }

    fn for_touched_blocks(&self, rect: &Rect, mut f: impl FnMut(&Vec<u64>) -> bool) -> bool {
        let (left, right, top, bottom) = self.block_range(rect);
        for row in top..=bottom {
            for col in left..=right {
                let idx = (row * self.x_blocks + col) as usize;
                if f(&self.blocks[idx]) {
                    return true;
                }
            }
        }
        false
    }
}

fn block_count(total: u32, block: u32) -> u32 {
    let whole = total / block;
    let bonus = if total - whole * block > 0 { 1 } else { 0 };
    whole + bonus
}
