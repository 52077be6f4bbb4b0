//! Unicode-safe helpers for working with UTF-8 strings.

use unicode_width::UnicodeWidthStr;

/// Byte index of the character boundary before `byte_idx` (0 at the start).
pub fn prev_boundary(s: &str, byte_idx: usize) -> usize {
    s[..byte_idx.min(s.len())]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte index of the character boundary after `byte_idx` (`s.len()` at the end).
pub fn next_boundary(s: &str, byte_idx: usize) -> usize {
    let idx = byte_idx.min(s.len());
    s[idx..]
        .chars()
        .next()
        .map(|c| idx + c.len_utf8())
        .unwrap_or(s.len())
}

/// Terminal column width of the text before `byte_idx`.
pub fn width_before(s: &str, byte_idx: usize) -> usize {
    s[..byte_idx.min(s.len())].width()
}
