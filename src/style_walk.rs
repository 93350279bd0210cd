use crate::model::{Style, StyleRange};

/// Walks a text stream applying style-range overrides with stack discipline.
/// Ranges must be well-nested and sorted by `start` ascending before
/// construction — [`crate::text_block::TextBlock`] sorts them.
pub struct StyleRangeWalker<'a> {
    stack: Vec<(Style, usize)>, // (style, end-exclusive)
    ranges: &'a [StyleRange],
    next_range: usize,
    position: usize,
    pending_change: bool,
}

impl<'a> StyleRangeWalker<'a> {
    pub fn new(base_style: Style, text_len: usize, ranges: &'a [StyleRange]) -> Self {
        Self {
            stack: vec![(base_style, text_len)],
            ranges,
            next_range: 0,
            position: 0,
            pending_change: false,
        }
    }

    /// Returns `(active_style, style_changed)` for the next character and
    /// advances the internal cursor past it. `style_changed` is true when
    /// the active style differs from the one reported for the previous
    /// character — either a range pushed before this character, or a range
    /// popped after the previous one.
    pub fn advance(&mut self) -> (Style, bool) {
        let i = self.position;
        let mut changed = self.pending_change;
        self.pending_change = false;

        while self.next_range < self.ranges.len() && self.ranges[self.next_range].start == i {
            let range = self.ranges[self.next_range];
            self.stack.push((range.style, range.end()));
            self.next_range += 1;
            changed = true;
        }

        let style = self.stack.last().expect("base style always present").0;

        while self.stack.len() > 1 && self.stack.last().unwrap().1 <= i + 1 {
            self.stack.pop();
            self.pending_change = true;
        }

        self.position += 1;
        (style, changed)
    }
}
