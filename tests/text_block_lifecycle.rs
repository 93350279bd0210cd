use std::cell::RefCell;
use std::rc::Rc;

use text_atlas::model::Rgba8;
use text_atlas::prelude::*;

#[test]
fn text_block_claims_renders_and_releases_on_drop() {
    let atlas = new_atlas(64, 64, 1);
    let options = plain_options();
    let mut font = FixedFont::new(6, 10);

    {
        let block = TextBlock::new(atlas.clone(), "hi", 80, options.clone(), &mut font)
            .expect("style ranges are well formed")
            .expect("a 64x64 page has room for two 6x10 glyphs");
        assert_eq!(block.slot_rect(), Rect::new(0, 0, 12, 10));
        assert!(!atlas.borrow().page(0).unwrap().canvas().writes.is_empty());
    }

    // the block above was dropped; its slot must be free again
    let second = TextBlock::new(atlas.clone(), "hi", 80, options, &mut font)
        .unwrap()
        .expect("slot should have been released on drop");
    assert_eq!(second.slot_rect(), Rect::new(0, 0, 12, 10));
}

#[test]
fn malformed_style_ranges_reject_construction() {
    let atlas = new_atlas(64, 64, 1);
    let mut font = FixedFont::new(6, 10);
    let mut options = plain_options();
    options.style_ranges.push(StyleRange {
        style: options.base_style,
        start: 0,
        length: 3,
    });
    options.style_ranges.push(StyleRange {
        style: options.base_style,
        start: 2,
        length: 4,
    });
    let result = TextBlock::new(atlas, "hello!", 80, options, &mut font);
    assert!(result.is_err());
}

fn new_atlas(w: u32, h: u32, count: u32) -> SharedAtlas<FakeCanvas> {
    let options = AtlasManagerOptions::builder()
        .texture_size(Size::new(w, h))
        .texture_count(count)
        .build();
    let mgr = AtlasManager::new(options, FakeCanvas::new).unwrap();
    Rc::new(RefCell::new(mgr))
}

fn plain_options() -> TextOptions {
    TextOptions {
        base_style: Style {
            font: text_atlas::model::FontHandle(1),
            size: 12.0,
            foreground: Rgba8::BLACK,
        },
        antialias_mode: AntialiasMode::Grayscale,
        style_ranges: Vec::new(),
        background: Rgba8::TRANSPARENT,
    }
}

struct FakeCanvas {
    size: Size,
    writes: Vec<Rect>,
}

impl FakeCanvas {
    fn new(size: Size) -> Self {
        Self {
            size,
            writes: Vec::new(),
        }
    }
}

impl PixelWriter for FakeCanvas {
    fn size(&self) -> Size {
        self.size
    }
    fn set_pixel(&mut self, _x: u32, _y: u32, _color: Rgba8) {}
    fn write(&mut self, _pixels: &[Rgba8], rect: Rect) {
        self.writes.push(rect);
    }
    fn commit(&mut self) {}
}

struct FixedFont {
    width: u32,
    height: u32,
    style: Style,
}

impl FixedFont {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            style: Style {
                font: text_atlas::model::FontHandle(0),
                size: 12.0,
                foreground: Rgba8::BLACK,
            },
        }
    }
}

impl FontProvider for FixedFont {
    fn set_style(&mut self, style: &Style) {
        self.style = *style;
    }
    fn glyph_metrics(&mut self, _ch: char) -> text_atlas::provider::GlyphMetrics {
        text_atlas::provider::GlyphMetrics {
            advance_width: self.width,
            font_height: self.height,
            kerning_from_previous: 0,
            bitmap_left: 0,
            bitmap_top: 0,
        }
    }
    fn glyph_bitmap(&mut self, ch: char) -> Option<Vec<Rgba8>> {
        if ch == ' ' {
            None
        } else {
            Some(vec![self.style.foreground; (self.width * self.height) as usize])
        }
    }
}
