use crate::model::{Rect, Rgba8, Style};

/// Per-glyph measurements the font provider supplies for a `(style, char)`
/// pair. All measurements are whole pixels; the provider rounds any
/// font-internal fractional units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub advance_width: u32,
    pub font_height: u32,
    pub kerning_from_previous: u32,
    pub bitmap_left: i32,
    pub bitmap_top: i32,
}

/// External collaborator that rasterizes glyphs. Deliberately out of scope
/// for this crate's implementation — embedders supply a concrete
/// implementation backed by FreeType, DirectWrite, or any other backend.
///
/// Must be deterministic across a process lifetime for any given
/// `(font, size, char)`.
pub trait FontProvider {
    /// Invoked once before measuring/rendering any character under a new
    /// style (the base style at stream start, then once per style-range
    /// push/pop).
    fn set_style(&mut self, style: &Style);

    /// Measurements for `ch` under the style most recently passed to
    /// `set_style`. A provider failure (missing glyph, font load error) is
    /// reported by returning a zero-sized glyph, which the core treats as
    /// legal and contributing 0 to layout.
    fn glyph_metrics(&mut self, ch: char) -> GlyphMetrics;

    /// Raw alpha-coverage (or RGBA, backend-defined) bitmap for `ch`, sized
    /// `advance_width x font_height` or smaller per `bitmap_left`/`bitmap_top`
    /// offsets already reported by `glyph_metrics`. Returns `None` for glyphs
    /// with no visible ink (e.g. space).
    fn glyph_bitmap(&mut self, ch: char) -> Option<Vec<Rgba8>>;
}

/// External collaborator that receives pixel writes for a rendered page.
/// Deliberately out of scope for this crate's implementation — the
/// core never interprets alpha (premultiplied vs. straight) itself.
pub trait PixelWriter {
    fn size(&self) -> crate::model::Size;

    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8);

    /// Bulk rectangular write; `pixels` is row-major, `rect.width * rect.height` long.
    fn write(&mut self, pixels: &[Rgba8], rect: Rect);

    /// Finalizes a render pass (e.g. flush to GPU or to a PNG for offline use).
    fn commit(&mut self);
}
