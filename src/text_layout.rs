use tracing::trace;

use crate::model::{CharLayout, LineMetrics, Size, TextBlockMetrics};

/// A character that may legally terminate a line under the wrap rule.
fn is_word_divider(ch: char) -> bool {
    ch == ' ' || ch == '\t' || ch == '-'
}

/// Pure streaming line-breaker. Consumes `(char, size, kerning)`
/// triples in reading order and produces per-line metrics with word wrap,
/// pen kerning, and mid-word fallback. Knows nothing about style, fonts, or
/// rendering — see [`crate::text_block::TextBlock`] for the orchestrator
/// that drives this alongside a [`crate::provider::FontProvider`].
#[derive(Debug, Clone)]
pub struct TextLayout {
    max_width: u32,
    pen_x: u32,
    current_line: usize,
    chars: Vec<CharLayout>,
}

impl TextLayout {
    pub fn new(max_size: Size) -> Self {
        Self {
            max_width: max_size.width,
            pen_x: 0,
            current_line: 0,
            chars: Vec::new(),
        }
    }

    /// Feeds the next character. `kerning` is the signed-as-unsigned
    /// adjustment the font provider reports relative to the previous glyph;
    /// it is suppressed at line starts.
    pub fn next_char(&mut self, ch: char, size: Size, kerning: u32) {
        self.chars.push(CharLayout {
            ch,
            size,
            kerning,
            line: self.current_line,
        });
        self.pen_x += size.width + self.kerning_offset(kerning);
        self.check_wrap();
    }

    /// Computes aggregate metrics after the stream has ended.
    ///
    /// Sums *every* char's width rather than taking a per-line maximum, and
    /// does not subtract the kerning suppressed at line starts; several
    /// scenarios in `tests/` depend on the exact clamped result.
    pub fn metrics(&self) -> TextBlockMetrics {
        let mut lines = vec![LineMetrics::default(); self.current_line + 1];
        let mut total_width: u32 = 0;
        for c in &self.chars {
            total_width += c.size.width;
            let lm = &mut lines[c.line];
            lm.height = lm.height.max(c.size.height);
            lm.chars += 1;
        }
        for lm in &mut lines {
            lm.baseline = lm.height;
        }
        let height: u32 = lines.iter().map(|l| l.height).sum();
        TextBlockMetrics {
            size: Size::new(total_width.min(self.max_width), height),
            lines,
        }
    }

    pub fn char_count(&self) -> usize {
        self.chars.len()
    }

    /// The finalized per-character layout, after all wraps have been
    /// resolved. Used by [`crate::text_block::TextBlock`]'s render pass to
    /// recover each glyph's line assignment without re-running wrap
    /// detection.
    pub fn chars(&self) -> &[CharLayout] {
        &self.chars
    }

    fn kerning_offset(&self, kerning: u32) -> u32 {
        if self.pen_x == 0 {
            0
        } else {
            kerning
        }
    }

    fn is_first_char_on_line(&self, index: usize) -> bool {
        if index == 0 {
            return true;
        }
        self.chars[index].line > self.chars[index - 1].line
    }

    fn check_wrap(&mut self) {
        let index = self.chars.len() - 1;
        if !self.is_first_char_on_line(index) && self.pen_x > self.max_width {
            self.wrap();
        }
    }

    fn wrap(&mut self) {
        let word_size = self.wrap_char_count();
        if word_size == 0 {
            return;
        }
        let first_char_index = self.chars.len() - word_size;
        if self.is_first_char_on_line(first_char_index) {
            // The whole line is one unbreakable word; fall back to breaking
            // only the last character.
            self.wrap_from(self.chars.len() - 1);
        } else {
            self.wrap_from(first_char_index);
        }
    }

    fn wrap_from(&mut self, index: usize) {
        self.current_line += 1;
        self.pen_x = 0;
        trace!(line = self.current_line, from = index, "wrapping");
        for i in index..self.chars.len() {
            self.chars[i].line = self.current_line;
            let offset = self.kerning_offset(self.chars[i].kerning);
            self.pen_x += self.chars[i].size.width + offset;
        }
    }

    /// How many trailing characters to move to the next line.
    ///
    /// A single dangling divider hangs off the end of the current line (the
    /// caller's pen may still read as over-width, but no wrap is needed). A
    /// run of 2+ dividers wraps only the last character, so the run can
    /// stretch across the right edge. Otherwise walk back to the nearest
    /// divider boundary; if none is found before the start of the line, fall
    /// back to a mid-word break of just the last character.
    fn wrap_char_count(&self) -> usize {
        let trailing = self.trailing_divider_count();
        if trailing == 1 {
            return 0;
        }
        if trailing > 1 {
            return 1;
        }

        let mut count = 0usize;
        let mut i = self.chars.len();
        while i > 0 {
            let index = i - 1;
            if index > 0 && self.chars[index].line > self.chars[index - 1].line {
                count += 1;
                break;
            }
            if is_word_divider(self.chars[index].ch) {
                break;
            }
            count += 1;
            i -= 1;
        }
        count
    }

    /// A trailing divider run never counts its first member: the scan stops
    /// one character short of the start of the line, so a line beginning
    /// with a divider never underflows past index 0. Several tests depend
    /// on this exact boundary.
    ///
    /// `wrap_char_count` is only reached once at least two characters have
    /// been buffered (the first character on a line never triggers a wrap),
    /// so the starting index here is always >= 1 and the defensive
    /// `index == 0` breaks below are unreachable in practice; they exist
    /// only to guard against an unsigned underflow.
    fn trailing_divider_count(&self) -> usize {
        let mut count = 0usize;
        let mut index = self.chars.len() - 1;
        loop {
            if !is_word_divider(self.chars[index].ch) {
                break;
            }
            count += 1;
            if index == 0 {
                break;
            }
            index -= 1;
            if index == 0 {
                break;
            }
        }
        count
    }
}
