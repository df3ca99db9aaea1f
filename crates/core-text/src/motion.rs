//! Line and column helpers over rune offsets.
//!
//! Lines are delimited by `\n`. A buffer always has at least one line; a trailing
//! newline starts an (empty) final line. These helpers are pure reads over a
//! `TextBuffer` and clamp every offset they receive.

use crate::TextBuffer;

impl TextBuffer {
    /// Number of lines (`\n` count + 1).
    pub fn line_count(&self) -> usize {
        self.iter().filter(|c| *c == '\n').count() + 1
    }

    /// Zero-based line index containing `pos`.
    pub fn line_of(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        self.iter().take(pos).filter(|c| *c == '\n').count()
    }

    /// Offset of the first rune of the line containing `pos`.
    pub fn line_start(&self, pos: usize) -> usize {
        let mut i = pos.min(self.len());
        while i > 0 {
            if self.rune_at(i - 1) == Some('\n') {
                break;
            }
            i -= 1;
        }
        i
    }

    /// Offset of the `\n` terminating the line containing `pos`, or `len()` on the last line.
    pub fn line_end(&self, pos: usize) -> usize {
        let len = self.len();
        let mut i = pos.min(len);
        while i < len {
            if self.rune_at(i) == Some('\n') {
                break;
            }
            i += 1;
        }
        i
    }

    /// Offset where `line` begins. Lines past the end clamp to the last line.
    pub fn line_start_of(&self, line: usize) -> usize {
        if line == 0 {
            return 0;
        }
        let mut seen = 0usize;
        let mut last_start = 0usize;
        for (i, c) in self.iter().enumerate() {
            if c == '\n' {
                seen += 1;
                last_start = i + 1;
                if seen == line {
                    return last_start;
                }
            }
        }
        last_start
    }

    /// Rune length of `line`, excluding its newline.
    pub fn line_len(&self, line: usize) -> usize {
        let start = self.line_start_of(line);
        self.line_end(start) - start
    }

    /// Column (rune distance from line start) of `pos`.
    pub fn column_of(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        pos - self.line_start(pos)
    }

    /// Offset one past the end of `line` including its newline when present.
    pub fn line_end_inclusive(&self, line: usize) -> usize {
        let end = self.line_end(self.line_start_of(line));
        if end < self.len() { end + 1 } else { end }
    }
}
