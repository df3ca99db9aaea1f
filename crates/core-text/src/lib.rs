//! Gap-buffer text storage addressed by Unicode code point (rune) offsets.
//!
//! All public positions are rune indices, never byte offsets. Every entry point
//! clamps its arguments to the buffer bounds instead of panicking so callers
//! higher up (editor operations, the input dispatcher) can pass arithmetic
//! results through without pre-validation.
//!
//! Storage layout:
//!
//! ```text
//!  [ runes-before-gap | gap (unused) | runes-after-gap ]
//!    0..gap_start       gap_start..gap_end  gap_end..buf.len()
//! ```
//!
//! The logical text is `buf[..gap_start]` followed by `buf[gap_end..]`. Edits
//! relocate the gap to the edit point first, so a run of edits clustered
//! around one position (interactive typing) costs amortized O(1) each.

use std::fmt;
use tracing::trace;

pub mod motion;
pub mod search;

pub use search::{Direction, find_in_dir};

/// Initial gap size (in runes) for fresh buffers.
const DEFAULT_GAP: usize = 64;

/// Lower bound for gap growth; the gap grows to at least this, or to the current
/// logical length (geometric growth), or to the requested size, whichever is largest.
const MIN_GAP_GROW: usize = 64;

/// Filler rune for the unused gap region. Never observable through the public API.
const GAP_FILL: char = '\0';

/// An ordered, mutable sequence of Unicode code points backed by a gap buffer.
#[derive(Clone)]
pub struct TextBuffer {
    buf: Vec<char>,
    gap_start: usize,
    gap_end: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Create an empty buffer with a default-sized gap.
    pub fn new() -> Self {
        Self {
            buf: vec![GAP_FILL; DEFAULT_GAP],
            gap_start: 0,
            gap_end: DEFAULT_GAP,
        }
    }

    /// Construct a buffer from an in-memory string slice. The gap is placed at the end.
    pub fn from_text(content: &str) -> Self {
        let runes: Vec<char> = content.chars().collect();
        Self::from_runes(&runes)
    }

    /// Construct a buffer from a rune slice. The gap is placed at the end.
    pub fn from_runes(runes: &[char]) -> Self {
        let mut buf = Vec::with_capacity(runes.len() + DEFAULT_GAP);
        buf.extend_from_slice(runes);
        buf.resize(runes.len() + DEFAULT_GAP, GAP_FILL);
        Self {
            buf,
            gap_start: runes.len(),
            gap_end: runes.len() + DEFAULT_GAP,
        }
    }

    /// Number of runes in the logical text.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len() - self.gap_len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Rune at logical index `i`, or `None` when `i >= len()`.
    pub fn rune_at(&self, i: usize) -> Option<char> {
        if i >= self.len() {
            return None;
        }
        if i < self.gap_start {
            Some(self.buf[i])
        } else {
            Some(self.buf[i + self.gap_len()])
        }
    }

    /// Runes in `[a, b)`, clamped to the buffer. Empty when `b <= a`.
    pub fn slice(&self, a: usize, b: usize) -> Vec<char> {
        let len = self.len();
        let a = a.min(len);
        let b = b.min(len);
        if b <= a {
            return Vec::new();
        }
        self.iter().skip(a).take(b - a).collect()
    }

    /// Same as [`slice`](Self::slice) but collected into a `String`.
    pub fn slice_string(&self, a: usize, b: usize) -> String {
        self.slice(a, b).into_iter().collect()
    }

    /// Materialize the full contents (used for search, snapshots and rendering).
    pub fn all_runes(&self) -> Vec<char> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.buf[..self.gap_start]);
        out.extend_from_slice(&self.buf[self.gap_end..]);
        out
    }

    /// Iterate the logical runes in order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.buf[..self.gap_start]
            .iter()
            .chain(self.buf[self.gap_end..].iter())
            .copied()
    }

    /// Insert `runes` so the first inserted rune lands at `pos` (clamped to `[0, len]`).
    pub fn insert(&mut self, pos: usize, runes: &[char]) {
        if runes.is_empty() {
            return;
        }
        let pos = pos.min(self.len());
        self.move_gap(pos);
        self.ensure_gap(runes.len());
        let end = self.gap_start + runes.len();
        self.buf[self.gap_start..end].copy_from_slice(runes);
        self.gap_start = end;
    }

    /// Convenience wrapper inserting the runes of a `&str`.
    pub fn insert_str(&mut self, pos: usize, text: &str) {
        let runes: Vec<char> = text.chars().collect();
        self.insert(pos, &runes);
    }

    /// Delete runes in `[a, b)`. Both ends are clamped; no-op when the clamped range is empty.
    pub fn delete(&mut self, a: usize, b: usize) {
        let len = self.len();
        let a = a.min(len);
        let b = b.min(len);
        if b <= a {
            return;
        }
        self.move_gap(a);
        // Runes right after the gap are now exactly [a, b); widening the gap drops them.
        self.gap_end += b - a;
    }

    /// Relocate the gap so that it starts at logical offset `pos`.
    fn move_gap(&mut self, pos: usize) {
        let pos = pos.min(self.len());
        if pos == self.gap_start {
            return;
        }
        if pos < self.gap_start {
            let moved = self.gap_start - pos;
            let dest = self.gap_end - moved;
            self.buf.copy_within(pos..self.gap_start, dest);
            self.gap_start = pos;
            self.gap_end = dest;
        } else {
            let moved = pos - self.gap_start;
            self.buf
                .copy_within(self.gap_end..self.gap_end + moved, self.gap_start);
            self.gap_start += moved;
            self.gap_end += moved;
        }
    }

    /// Grow the gap (in place, at its end) until it can hold `needed` runes.
    fn ensure_gap(&mut self, needed: usize) {
        let gap = self.gap_len();
        if gap >= needed {
            return;
        }
        let target = needed.max(MIN_GAP_GROW).max(self.len());
        let extra = target - gap;
        self.buf.splice(
            self.gap_end..self.gap_end,
            std::iter::repeat_n(GAP_FILL, extra),
        );
        self.gap_end += extra;
        trace!(target: "text.gap", len = self.len(), gap = self.gap_len(), "gap_grow");
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.iter() {
            fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("text", &self.to_string())
            .field("gap_start", &self.gap_start)
            .field("gap_len", &self.gap_len())
            .finish()
    }
}

impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for TextBuffer {}

/// Rune classification helpers shared by word-oriented editing operations.
pub mod word {
    /// Word runes: letters, digits and underscore.
    pub fn is_word_rune(c: char) -> bool {
        c == '_' || c.is_alphanumeric()
    }

    /// Whitespace test used by "smart" word deletion.
    pub fn is_space_rune(c: char) -> bool {
        c.is_whitespace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_buffer_and_read_runes() {
        let b = TextBuffer::from_text("héllo");
        assert_eq!(b.len(), 5);
        assert_eq!(b.rune_at(1), Some('é'));
        assert_eq!(b.rune_at(5), None);
        assert_eq!(b.to_string(), "héllo");
    }

    #[test]
    fn insert_middle_and_ends() {
        let mut b = TextBuffer::from_text("ac");
        b.insert(1, &['b']);
        b.insert(0, &['>']);
        b.insert(99, &['<']);
        assert_eq!(b.to_string(), ">abc<");
    }

    #[test]
    fn delete_clamps_out_of_range() {
        let mut b = TextBuffer::from_text("hello world");
        b.delete(5, 500);
        assert_eq!(b.to_string(), "hello");
        b.delete(3, 1);
        assert_eq!(b.to_string(), "hello");
        b.delete(0, 1);
        assert_eq!(b.to_string(), "ello");
    }

    #[test]
    fn slice_is_clamped_and_empty_when_inverted() {
        let b = TextBuffer::from_text("abcdef");
        assert_eq!(b.slice(2, 4), vec!['c', 'd']);
        assert_eq!(b.slice(4, 2), Vec::<char>::new());
        assert_eq!(b.slice_string(3, 100), "def");
    }

    #[test]
    fn gap_moves_back_and_forth() {
        let mut b = TextBuffer::from_text("0123456789");
        b.insert(2, &['a']);
        b.insert(9, &['b']);
        b.delete(0, 1);
        b.insert(5, &['c']);
        assert_eq!(b.to_string(), "1a234c567b89");
        assert_eq!(b.all_runes().len(), b.len());
    }

    #[test]
    fn gap_grows_for_large_inserts() {
        let mut b = TextBuffer::new();
        let big: Vec<char> = std::iter::repeat_n('x', 1000).collect();
        b.insert(0, &big);
        b.insert(500, &['y']);
        assert_eq!(b.len(), 1001);
        assert_eq!(b.rune_at(500), Some('y'));
        assert_eq!(b.rune_at(1000), Some('x'));
    }

    #[test]
    fn clustered_typing_then_backspace() {
        let mut b = TextBuffer::from_text("start end");
        let mut pos = 6;
        for c in "middle ".chars() {
            b.insert(pos, &[c]);
            pos += 1;
        }
        b.delete(pos - 1, pos);
        assert_eq!(b.to_string(), "start middleend");
    }

    #[test]
    fn equality_ignores_gap_placement() {
        let mut a = TextBuffer::from_text("abc");
        a.insert(0, &['z']);
        a.delete(0, 1);
        let b = TextBuffer::from_text("abc");
        assert_eq!(a, b);
    }

    #[test]
    fn word_classification() {
        assert!(word::is_word_rune('a'));
        assert!(word::is_word_rune('_'));
        assert!(word::is_word_rune('9'));
        assert!(word::is_word_rune('ß'));
        assert!(!word::is_word_rune('!'));
        assert!(!word::is_word_rune(' '));
    }
}
