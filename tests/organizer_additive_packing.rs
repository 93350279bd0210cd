use text_atlas::prelude::*;

#[test]
fn additive_packing_follows_candidate_order() {
    let mut org = RectangleOrganizer::new(Size::new(100, 100), Size::new(128, 16));

    let a = claim(&mut org, 10, 10).expect("first claim always lands at origin");
    assert_eq!(a, Rect::new(0, 0, 10, 10));

    assert!(claim(&mut org, 95, 95).is_none(), "too tall for the remaining row");

    let b = claim(&mut org, 10, 10).expect("fits beside the first rect");
    assert_eq!(b, Rect::new(10, 0, 10, 10));

    let c = claim(&mut org, 81, 20).expect("fits on the next y line");
    assert_eq!(c, Rect::new(0, 10, 81, 20));
}

#[test]
fn dense_packing_never_overlaps() {
    let mut org = RectangleOrganizer::new(Size::new(64, 64), Size::new(128, 16));
    let mut placed = Vec::new();
    while let SearchResult::Found(slot) = org.try_claim(Size::new(6, 6)) {
        placed.push(slot.rect);
    }
    assert!(placed.len() > 4, "a 64x64 page should fit more than four 6x6 rects");
    assert!(disjoint(&placed));
}

fn claim(org: &mut RectangleOrganizer, w: u32, h: u32) -> Option<Rect> {
    match org.try_claim(Size::new(w, h)) {
        SearchResult::Found(slot) => Some(slot.rect),
        SearchResult::NotFound => None,
    }
}

fn disjoint(rects: &[Rect]) -> bool {
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if overlaps(&rects[i], &rects[j]) {
                return false;
            }
        }
    }
    true
}

fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.end_x() < b.x || b.end_x() < a.x || a.end_y() < b.y || b.end_y() < a.y)
}
