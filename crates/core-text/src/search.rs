//! Direction-aware, case-insensitive substring search over rune sequences.
//!
//! One primitive serves two callers with different anchoring rules:
//! * live Leap refinement re-searches from a fixed origin on every keystroke;
//! * Leap Again / search-next step from one rune past (or strictly before) the caret.
//!
//! The function is stateless and total: out-of-range starts are clamped and a
//! miss is reported as `None`, never as an error.

use tracing::trace;

/// Search (and Leap) direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }
}

/// Compare two runes under simple case folding.
#[inline]
pub fn fold_eq(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase()) || a.to_uppercase().eq(b.to_uppercase())
}

fn matches_at(haystack: &[char], needle: &[char], pos: usize) -> bool {
    needle
        .iter()
        .zip(&haystack[pos..pos + needle.len()])
        .all(|(n, h)| fold_eq(*n, *h))
}

/// Find `needle` in `haystack` starting at `start`, scanning in `dir`.
///
/// * Empty needle: matches at `start` clamped to `[0, haystack.len()]`.
/// * Forward: candidates `start, start+1, ...`; on a miss with `wrap`, rescans from 0.
/// * Backward: candidates strictly before `start` down to 0; on a miss with `wrap`,
///   rescans from the last valid start (`haystack.len() - needle.len()`).
pub fn find_in_dir(
    haystack: &[char],
    needle: &[char],
    start: usize,
    dir: Direction,
    wrap: bool,
) -> Option<usize> {
    let start = start.min(haystack.len());
    if needle.is_empty() {
        return Some(start);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    let last = haystack.len() - needle.len();
    let found = match dir {
        Direction::Forward => {
            let first = (start..=last).find(|&p| matches_at(haystack, needle, p));
            match first {
                Some(p) => Some(p),
                None if wrap => (0..=last).find(|&p| matches_at(haystack, needle, p)),
                None => None,
            }
        }
        Direction::Backward => {
            let first = if start == 0 {
                None
            } else {
                let begin = (start - 1).min(last);
                (0..=begin).rev().find(|&p| matches_at(haystack, needle, p))
            };
            match first {
                Some(p) => Some(p),
                None if wrap => (0..=last).rev().find(|&p| matches_at(haystack, needle, p)),
                None => None,
            }
        }
    };
    trace!(target: "text.search", needle_len = needle.len(), start, ?dir, wrap, ?found, "find_in_dir");
    found
}
