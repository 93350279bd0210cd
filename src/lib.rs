//! A text-atlas allocator: packs variable-sized text rectangles into a fixed
//! set of texture pages, and a streaming line-breaker that turns glyph
//! advances into wrapped line metrics.
//!
//! - [`RectangleOrganizer`] is a 2D online bin-packer for one page, backed by
//!   a [`SpatialIndex`] and a [`YPriorityCache`] for sub-linear candidate search.
//! - [`TextLayout`] is a pure, streaming word-wrap line-breaker.
//! - [`AtlasManager`] routes claims across N pages.
//! - [`TextBlock`] ties both together: measure, claim, render, release on drop.
//!
//! Font rasterization and pixel output are supplied by the embedder via the
//! [`FontProvider`] and [`PixelWriter`] traits; this crate never touches a
//! font file or a GPU/PNG backend directly.

pub mod atlas_manager;
pub mod config;
pub mod error;
pub mod model;
pub mod organizer;
pub mod provider;
pub mod spatial_index;
pub mod style_walk;
pub mod text_block;
pub mod text_layout;
pub mod y_priority_cache;

pub use atlas_manager::{AtlasManager, Page, Placement};
pub use config::{AtlasManagerOptions, AtlasManagerOptionsBuilder};
pub use error::{AtlasError, Result};
pub use model::{
    AntialiasMode, CharLayout, LineMetrics, Rect, Size, Slot, Style, StyleRange,
    TextBlockMetrics, TextOptions,
};
pub use organizer::{RectangleOrganizer, SearchResult};
pub use provider::{FontProvider, GlyphMetrics, PixelWriter};
pub use spatial_index::SpatialIndex;
pub use style_walk::StyleRangeWalker;
pub use text_block::{SharedAtlas, TextBlock};
pub use text_layout::TextLayout;
pub use y_priority_cache::YPriorityCache;

/// Convenience prelude for common types.
pub mod prelude {
    pub use crate::atlas_manager::{AtlasManager, Page, Placement};
    pub use crate::config::{AtlasManagerOptions, AtlasManagerOptionsBuilder};
    pub use crate::error::{AtlasError, Result};
    pub use crate::model::{
        AntialiasMode, CharLayout, LineMetrics, Rect, Size, Slot, Style, StyleRange,
        TextBlockMetrics, TextOptions,
    };
    pub use crate::organizer::{RectangleOrganizer, SearchResult};
    pub use crate::provider::{FontProvider, GlyphMetrics, PixelWriter};
    pub use crate::spatial_index::SpatialIndex;
    pub use crate::style_walk::StyleRangeWalker;
    pub use crate::text_block::{SharedAtlas, TextBlock};
    pub use crate::text_layout::TextLayout;
    pub use crate::y_priority_cache::YPriorityCache;
}
