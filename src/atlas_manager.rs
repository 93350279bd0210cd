use tracing::{debug, instrument};

use crate::config::AtlasManagerOptions;
use crate::model::{Size, Slot};
use crate::organizer::{RectangleOrganizer, SearchResult};
use crate::provider::PixelWriter;

/// One texture page: an opaque pixel canvas plus the bin-packing
/// domain that manages it. The canvas is whatever [`PixelWriter`]
/// implementation the embedder supplies — this crate never reads or writes
/// its pixels directly outside of [`crate::text_block::TextBlock`]'s render
/// pass.
#[derive(Debug)]
pub struct Page<W> {
    pub size: Size,
    organizer: RectangleOrganizer,
    canvas: W,
}

impl<W: PixelWriter> Page<W> {
    fn new(size: Size, spatial_block_size: Size, canvas: W) -> Self {
        Self {
            size,
            organizer: RectangleOrganizer::new(size, spatial_block_size),
            canvas,
        }
    }

    pub fn canvas(&self) -> &W {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut W {
        &mut self.canvas
    }
}

/// Outcome of [`AtlasManager::find_placement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Found { slot: Slot, page_id: usize },
    NotFound,
}

impl Placement {
    pub fn is_found(&self) -> bool {
        matches!(self, Placement::Found { .. })
    }
}

/// Owns N pages and routes claims to them, last-successful-page-first.
/// Exploits temporal locality: consecutive inserts of similar sizes tend to
/// land on the same page.
#[derive(Debug)]
pub struct AtlasManager<W> {
    pages: Vec<Page<W>>,
    last_used: usize,
}

impl<W: PixelWriter> AtlasManager<W> {
    /// Builds `options.texture_count` pages, each sized `options.texture_size`,
    /// with a canvas produced by `make_canvas` for each page size in turn.
    pub fn new(
        options: AtlasManagerOptions,
        mut make_canvas: impl FnMut(Size) -> W,
    ) -> crate::error::Result<Self> {
        options.validate()?;
        let pages = (0..options.texture_count)
            .map(|_| {
                Page::new(
                    options.texture_size,
                    options.spatial_block_size,
                    make_canvas(options.texture_size),
                )
            })
            .collect();
        Ok(Self {
            pages,
            last_used: 0,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, id: usize) -> Option<&Page<W>> {
        self.pages.get(id)
    }

    pub fn page_mut(&mut self, id: usize) -> Option<&mut Page<W>> {
        self.pages.get_mut(id)
    }

    /// Tries `pages[last_used]` first; on failure, tries the rest in index
    /// order and updates `last_used` on the first success.
    #[instrument(skip(self))]
    pub fn find_placement(&mut self, size: Size) -> Placement {
        if let SearchResult::Found(slot) = self.pages[self.last_used].organizer.try_claim(size) {
            debug!(page_id = self.last_used, "placed on last-used page");
            return Placement::Found {
                slot,
                page_id: self.last_used,
            };
        }

        for (id, page) in self.pages.iter_mut().enumerate() {
            if id == self.last_used {
                continue;
            }
            if let SearchResult::Found(slot) = page.organizer.try_claim(size) {
                debug!(page_id = id, "placed on fallback page");
                self.last_used = id;
                return Placement::Found { slot, page_id: id };
            }
        }

        debug!("no page could fit the requested size");
        Placement::NotFound
    }

    /// Releases a slot previously returned for `page_id`. Returns `false`
    /// for an unknown page or an unknown slot index.
    #[instrument(skip(self))]
    pub fn release_rect(&mut self, page_id: usize, slot_index: u64) -> bool {
        match self.pages.get_mut(page_id) {
            Some(page) => page.organizer.release(slot_index),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect as ModelRect;
    use crate::model::Rgba8;

    #[derive(Debug)]
    struct FakeCanvas {
        size: Size,
    }

    impl PixelWriter for FakeCanvas {
        fn size(&self) -> Size {
            self.size
        }
        fn set_pixel(&mut self, _x: u32, _y: u32, _color: Rgba8) {}
        fn write(&mut self, _pixels: &[Rgba8], _rect: ModelRect) {}
        fn commit(&mut self) {}
    }

    fn opts(size: u32, count: u32) -> AtlasManagerOptions {
        AtlasManagerOptions::builder()
            .texture_size(Size::new(size, size))
            .texture_count(count)
            .build()
    }

    fn new_mgr(options: AtlasManagerOptions) -> crate::error::Result<AtlasManager<FakeCanvas>> {
        AtlasManager::new(options, |size| FakeCanvas { size })
    }

    #[test]
    fn single_page_routes_every_claim() {
        let mut mgr = new_mgr(opts(100, 1)).unwrap();
        let p1 = mgr.find_placement(Size::new(10, 10));
        assert!(matches!(p1, Placement::Found { page_id: 0, .. }));
    }

    #[test]
    fn falls_back_to_second_page_when_full() {
        let mut mgr = new_mgr(opts(10, 2)).unwrap();
        let first = mgr.find_placement(Size::new(10, 10));
        assert!(matches!(first, Placement::Found { page_id: 0, .. }));
        let second = mgr.find_placement(Size::new(10, 10));
        assert!(matches!(second, Placement::Found { page_id: 1, .. }));
    }

    #[test]
    fn last_used_sticks_across_claims() {
        let mut mgr = new_mgr(opts(10, 3)).unwrap();
        mgr.find_placement(Size::new(10, 10)); // fills page 0
        let overflow = mgr.find_placement(Size::new(10, 10)); // must move to page 1
        assert!(matches!(overflow, Placement::Found { page_id: 1, .. }));
        mgr.release_rect(0, 0);
        // last_used is now page 1; a claim that fits page 1 should not move back to 0
        let third = mgr.find_placement(Size::new(5, 5));
        assert!(matches!(third, Placement::Found { page_id: 1, .. }));
    }

    #[test]
    fn not_found_when_no_page_fits() {
        let mut mgr = new_mgr(opts(10, 1)).unwrap();
        assert_eq!(mgr.find_placement(Size::new(20, 20)), Placement::NotFound);
    }

    #[test]
    fn release_unknown_page_is_false() {
        let mut mgr = new_mgr(opts(10, 1)).unwrap();
        assert!(!mgr.release_rect(5, 0));
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(new_mgr(opts(10, 0)).is_err());
        let zero_size = AtlasManagerOptions::builder()
            .texture_size(Size::new(0, 10))
            .texture_count(1)
            .build();
        assert!(new_mgr(zero_size).is_err());
    }
}
