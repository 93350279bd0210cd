use text_atlas::prelude::*;

#[test]
fn overflow_moves_to_the_next_page() {
    let options = AtlasManagerOptions::builder()
        .texture_size(Size::new(16, 16))
        .texture_count(2)
        .build();
    let mut mgr: AtlasManager<RecordingCanvas> =
        AtlasManager::new(options, RecordingCanvas::new).unwrap();

    let first = mgr.find_placement(Size::new(16, 16));
    assert!(matches!(first, Placement::Found { page_id: 0, .. }));

    let second = mgr.find_placement(Size::new(16, 16));
    assert!(matches!(second, Placement::Found { page_id: 1, .. }));

    let third = mgr.find_placement(Size::new(16, 16));
    assert_eq!(third, Placement::NotFound);
}

#[test]
fn invalid_options_are_rejected_before_any_page_is_built() {
    let options = AtlasManagerOptions::builder()
        .texture_size(Size::new(0, 16))
        .texture_count(1)
        .build();
    let result: text_atlas::Result<AtlasManager<RecordingCanvas>> =
        AtlasManager::new(options, RecordingCanvas::new);
    assert!(result.is_err());
}

struct RecordingCanvas {
    size: Size,
}

impl RecordingCanvas {
    fn new(size: Size) -> Self {
        Self { size }
    }
}

impl PixelWriter for RecordingCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn set_pixel(&mut self, _x: u32, _y: u32, _color: text_atlas::model::Rgba8) {}

    fn write(&mut self, _pixels: &[text_atlas::model::Rgba8], _rect: Rect) {}

    fn commit(&mut self) {}
}
