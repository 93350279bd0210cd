use std::cell::RefCell;
use std::rc::Rc;

use tracing::{instrument, warn};

use crate::atlas_manager::{AtlasManager, Placement};
use crate::error::{AtlasError, Result};
use crate::model::{Rect, Size, StyleRange, TextBlockMetrics, TextOptions};
use crate::provider::{FontProvider, PixelWriter};
use crate::style_walk::StyleRangeWalker;
use crate::text_layout::TextLayout;

/// A shared, interior-mutable handle to an [`AtlasManager`]. The manager is
/// a single-threaded cooperative resource: many
/// [`TextBlock`]s may hold a reference to the same manager, each free to
/// release itself at any time, so aliasing is expressed with `Rc<RefCell<_>>`
/// rather than a borrow-checked exclusive reference.
pub type SharedAtlas<W> = Rc<RefCell<AtlasManager<W>>>;

/// Orchestrates one piece of placed, rendered text end to end:
/// lays the text out with [`TextLayout`], resolves per-character style with
/// [`StyleRangeWalker`], claims a slot from a [`SharedAtlas`], and rasterizes
/// glyphs into it via the caller's [`FontProvider`]/[`PixelWriter`].
///
/// Move-only: a `TextBlock` owns its claim and releases it from its page on
/// drop. Rust never runs `Drop` on a value that has been moved out of, so no
/// moved-from sentinel is needed; `released` only guards the narrower case of
/// an explicit `release()` call followed by the value's own drop.
#[derive(Debug)]
pub struct TextBlock<W> {
    atlas: SharedAtlas<W>,
    page_id: usize,
    slot_rect: Rect,
    slot_index: u64,
    metrics: TextBlockMetrics,
    released: bool,
}

impl<W: PixelWriter> TextBlock<W> {
    /// Lays out `text`, claims a slot on `atlas` large enough to hold it, and
    /// renders it through `font`.
    ///
    /// Returns `Err` if `options.style_ranges` is malformed: out of bounds, or
    /// not well-nested (ranges must form a proper stack).
    /// Returns `Ok(None)` if no page in `atlas` has room; this is the
    /// ordinary "atlas is full" outcome, not an error.
    #[instrument(skip(atlas, font, options))]
    pub fn new(
        atlas: SharedAtlas<W>,
        text: &str,
        max_width: u32,
        mut options: TextOptions,
        font: &mut dyn FontProvider,
    ) -> Result<Option<Self>> {
        options.style_ranges.sort_by_key(|r| r.start);
        let char_count = text.chars().count();
        validate_ranges(&options.style_ranges, char_count)?;

        let (metrics, chars) = layout_pass(text, char_count, max_width, &options, font);

        let placement = atlas.borrow_mut().find_placement(metrics.size);
        let (slot, page_id) = match placement {
            Placement::Found { slot, page_id } => (slot, page_id),
            Placement::NotFound => return Ok(None),
        };

        render_pass(
            &atlas,
            page_id,
            slot.rect,
            &options,
            &chars,
            &metrics,
            font,
        );

        Ok(Some(Self {
            atlas,
            page_id,
            slot_rect: slot.rect,
            slot_index: slot.index,
            metrics,
            released: false,
        }))
    }

    pub fn page_id(&self) -> usize {
        self.page_id
    }

    pub fn slot_rect(&self) -> Rect {
        self.slot_rect
    }

    pub fn metrics(&self) -> &TextBlockMetrics {
        &self.metrics
    }

    /// Releases the claimed slot immediately rather than waiting for drop.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if !self
            .atlas
            .borrow_mut()
            .release_rect(self.page_id, self.slot_index)
        {
            warn!(
                page_id = self.page_id,
                slot_index = self.slot_index,
                "text block's slot was already gone at release time"
            );
        }
    }
}

impl<W: PixelWriter> Drop for TextBlock<W> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.atlas
            .borrow_mut()
            .release_rect(self.page_id, self.slot_index);
    }
}

/// Applies a signed bitmap offset to an unsigned pixel coordinate, clamping
/// at zero rather than wrapping (a glyph's `bitmap_left`/`bitmap_top` may be
/// negative, but it never pushes a glyph outside its claimed slot in
/// practice since the font provider sized the slot in the first place).
fn offset(base: u32, delta: i32) -> u32 {
    (base as i32 + delta).max(0) as u32
}

/// Checks that `ranges` (already sorted by `start`) are in bounds and form a
/// proper stack: a range may only nest fully inside the innermost
/// still-open range, never partially overlap it.
fn validate_ranges(ranges: &[StyleRange], text_len: usize) -> Result<()> {
    let mut open_ends: Vec<usize> = Vec::new();
    for r in ranges {
        if r.end() > text_len {
            return Err(AtlasError::InvalidStyleRanges(format!(
                "range [{}, {}) exceeds text length {}",
                r.start,
                r.end(),
                text_len
            )));
        }
        while matches!(open_ends.last(), Some(&end) if r.start >= end) {
            open_ends.pop();
        }
        if let Some(&end) = open_ends.last() {
            if r.end() > end {
                return Err(AtlasError::InvalidStyleRanges(format!(
                    "range [{}, {}) is not well-nested inside the range ending at {}",
                    r.start,
                    r.end(),
                    end
                )));
            }
        }
        open_ends.push(r.end());
    }
    Ok(())
}

/// Runs the text through [`TextLayout`], reporting each character's measured
/// size under the style active at that position, and returns the resulting
/// metrics alongside the finalized per-character layout for the render pass.
fn layout_pass(
    text: &str,
    char_count: usize,
    max_width: u32,
    options: &TextOptions,
    font: &mut dyn FontProvider,
) -> (TextBlockMetrics, Vec<crate::model::CharLayout>) {
    let mut walker = StyleRangeWalker::new(options.base_style, char_count, &options.style_ranges);
    let mut layout = TextLayout::new(Size::new(max_width, 0));

    font.set_style(&options.base_style);
    for ch in text.chars() {
        let (style, changed) = walker.advance();
        if changed {
            font.set_style(&style);
        }
        let glyph = font.glyph_metrics(ch);
        layout.next_char(
            ch,
            Size::new(glyph.advance_width, glyph.font_height),
            glyph.kerning_from_previous,
        );
    }

    let metrics = layout.metrics();
    (metrics, layout.chars().to_vec())
}

/// Walks the finalized layout a second time, this time driving the font
/// provider for bitmaps and writing them into the claimed slot. Pen position
/// is recomputed per line using the same kerning-suppression rule as
/// [`TextLayout`], but wrap decisions are not re-run: each character's line
/// is already fixed by the metrics pass.
fn render_pass<W: PixelWriter>(
    atlas: &SharedAtlas<W>,
    page_id: usize,
    rect: Rect,
    options: &TextOptions,
    chars: &[crate::model::CharLayout],
    metrics: &TextBlockMetrics,
    font: &mut dyn FontProvider,
) {
    let mut line_tops = Vec::with_capacity(metrics.lines.len());
    let mut acc = 0u32;
    for line in &metrics.lines {
        line_tops.push(acc);
        acc += line.height;
    }

    let mut mgr = atlas.borrow_mut();
    let Some(page) = mgr.page_mut(page_id) else {
        return;
    };
    let canvas = page.canvas_mut();

    let background = vec![options.background; (rect.width * rect.height) as usize];
    canvas.write(&background, rect);

    font.set_style(&options.base_style);
    let mut walker = StyleRangeWalker::new(options.base_style, chars.len(), &options.style_ranges);
    let mut pen_x = 0u32;
    let mut current_line = usize::MAX;
    for c in chars {
        let (style, changed) = walker.advance();
        if changed {
            font.set_style(&style);
        }

        if c.line != current_line {
            pen_x = 0;
            current_line = c.line;
        }
        let kerning = if pen_x == 0 { 0 } else { c.kerning };
        let x = pen_x + kerning;
        let y = line_tops.get(c.line).copied().unwrap_or(0);
        pen_x = x + c.size.width;

        let glyph = font.glyph_metrics(c.ch);
        if let Some(bitmap) = font.glyph_bitmap(c.ch) {
            let dst_x = offset(rect.x + x, glyph.bitmap_left);
            let dst_y = offset(rect.y + y, glyph.bitmap_top);
            canvas.write(
                &bitmap,
                Rect::new(dst_x, dst_y, c.size.width, c.size.height),
            );
        }
    }

    canvas.commit();
}
