use std::collections::HashMap;

use tracing::{instrument, trace};

use crate::model::{overlap, Rect, Size, Slot};
use crate::spatial_index::SpatialIndex;
use crate::y_priority_cache::YPriorityCache;

/// Result of a claim attempt. Not finding room is a normal outcome, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    Found(Slot),
    NotFound,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found(_))
    }
}

/// Per-page online bin-packer. Guarantees no overlap between live slots, all
/// slots in bounds, strictly monotonic claim indices, and that the spatial
/// index / y-priority cache always exactly reflect the live slot set.
#[derive(Debug)]
pub struct RectangleOrganizer {
    page_size: Size,
    next_index: u64,
    slots: HashMap<u64, Slot>,
    spatial_index: SpatialIndex,
    y_cache: YPriorityCache,
}

impl RectangleOrganizer {
    pub fn new(page_size: Size, spatial_block_size: Size) -> Self {
        Self {
            page_size,
            next_index: 0,
            slots: HashMap::new(),
            spatial_index: SpatialIndex::new(page_size, spatial_block_size),
            y_cache: YPriorityCache::new(page_size.height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: u64) -> Option<&Slot> {
        self.slots.get(&index)
    }

    /// Attempts to place a rect of `size` on this page.
    #[instrument(skip(self), fields(page_w = self.page_size.width, page_h = self.page_size.height))]
    pub fn try_claim(&mut self, size: Size) -> SearchResult {
        if size.is_zero_area() || size.width > self.page_size.width || size.height > self.page_size.height {
            return SearchResult::NotFound;
        }

        if self.is_empty() {
            let slot = Slot {
                rect: Rect::new(0, 0, size.width, size.height),
                index: self.next_claim_index(),
            };
            self.register(slot);
            return SearchResult::Found(slot);
        }

        let mut found_rect: Option<Rect> = None;
        let page_size = self.page_size;
        let spatial_index = &self.spatial_index;
        let slots = &self.slots;
        let y_cache = &self.y_cache;
        y_cache.for_y_in_priority_order(|y| {
            trace!(y, "probing candidate y");
            if let Some(rect) = search(spatial_index, slots, page_size, y, size) {
                found_rect = Some(rect);
                true
            } else {
                false
            }
        });

        match found_rect {
            Some(rect) => {
                let slot = Slot {
                    rect,
                    index: self.next_claim_index(),
                };
                self.register(slot);
                SearchResult::Found(slot)
            }
            None => SearchResult::NotFound,
        }
    }

    /// Releases a previously claimed slot. Returns `false` for an unknown
    /// index without side effects.
    #[instrument(skip(self))]
    pub fn release(&mut self, index: u64) -> bool {
        let Some(slot) = self.slots.remove(&index) else {
            return false;
        };
        self.spatial_index.remove(slot.index, &slot.rect);
        self.y_cache.decrement(slot.rect.end_y() + 1);
        self.y_cache.decrement(slot.rect.y);
        true
    }

    fn next_claim_index(&mut self) -> u64 {
        let idx = self.next_index;
        self.next_index += 1;
        idx
    }

    fn register(&mut self, slot: Slot) {
        self.spatial_index.add(slot.index, &slot.rect);
        self.y_cache.increment(slot.rect.end_y() + 1);
        self.y_cache.increment(slot.rect.y);
        self.slots.insert(slot.index, slot);
    }
}

/// Candidate-x enumeration for a fixed `y`: try `x = 0`, then every existing
/// slot's left edge and one-past-right edge on this y-line, in that order.
/// First non-overlapping in-bounds candidate wins.
fn search(
    spatial_index: &SpatialIndex,
    slots: &HashMap<u64, Slot>,
    page_size: Size,
    y: u32,
    size: Size,
) -> Option<Rect> {
    let mut result = None;
    for_x_options(spatial_index, slots, y, |x| {
        let rect = Rect::new(x, y, size.width, size.height);
        if is_open(spatial_index, slots, page_size, &rect) {
            trace!(x, y, "claim candidate accepted");
            result = Some(rect);
            true
        } else {
            false
        }
    });
    result
}

fn for_x_options(
    spatial_index: &SpatialIndex,
    slots: &HashMap<u64, Slot>,
    y: u32,
    mut visitor: impl FnMut(u32) -> bool,
) {
    if visitor(0) {
        return;
    }
    spatial_index.for_slots_on_y_line(y, |slot_id| {
        let Some(slot) = slots.get(&slot_id) else {
            return false;
        };
        if slot.rect.x > 0 && visitor(slot.rect.x) {
            return true;
        }
        visitor(slot.rect.end_x() + 1)
    });
}

fn is_open(
    spatial_index: &SpatialIndex,
    slots: &HashMap<u64, Slot>,
    page_size: Size,
    rect: &Rect,
) -> bool {
    if !rect.in_bounds(page_size) {
        return false;
    }
    !spatial_index.for_near_slots(rect, |slot_id| {
        slots
            .get(&slot_id)
            .map(|s| overlap(rect, &s.rect))
            .unwrap_or(false)
    })
}
