//! Byte/character offset handling.
//!
//! Regex matches and `str` slicing work in bytes; every span this crate
//! exposes is in characters. Mixing the two silently corrupts spans as soon
//! as a sentence contains a non-ASCII character:
//!
//! ```text
//!   Text:   "ab €50"
//!   bytes:   a=0 b=1 ' '=2 €=3..5 5=6 0=7
//!   chars:   a=0 b=1 ' '=2 €=3    5=4 0=5
//! ```
//!
//! The helpers here convert at the boundary so the rest of the crate only
//! ever sees character offsets.

/// Number of characters in `text`.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Slice `text` by a half-open character range `[char_start, char_end)`.
///
/// Out-of-range offsets are clamped to the end of the text.
#[must_use]
pub fn char_slice(text: &str, char_start: usize, char_end: usize) -> &str {
    let (byte_start, byte_end) = chars_to_bytes(text, char_start, char_end);
    if byte_start >= byte_end {
        return "";
    }
    &text[byte_start..byte_end]
}

/// Character at position `char_idx`, if any.
#[must_use]
pub fn char_at(text: &str, char_idx: usize) -> Option<char> {
    text.chars().nth(char_idx)
}

/// Convert a half-open character range to a half-open byte range.
#[must_use]
pub fn chars_to_bytes(text: &str, char_start: usize, char_end: usize) -> (usize, usize) {
    let mut byte_start = text.len();
    let mut byte_end = text.len();

    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        if char_idx == char_start {
            byte_start = byte_idx;
        }
        if char_idx == char_end {
            byte_end = byte_idx;
            break;
        }
    }

    (byte_start, byte_end)
}

/// Byte → char lookup for converting many regex matches over one sentence.
///
/// ASCII sentences need no table.
pub struct SpanConverter {
    table: Option<Vec<usize>>,
    chars: usize,
}

impl SpanConverter {
    /// Build the lookup for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                table: None,
                chars: text.len(),
            };
        }

        let mut table = Vec::with_capacity(text.len() + 1);
        let mut chars = 0;
        for ch in text.chars() {
            table.extend(std::iter::repeat(chars).take(ch.len_utf8()));
            chars += 1;
        }
        table.push(chars);
        Self {
            table: Some(table),
            chars,
        }
    }

    /// Character offset of `byte_idx`; past-the-end bytes map to the
    /// character count.
    #[must_use]
    pub fn byte_to_char(&self, byte_idx: usize) -> usize {
        match &self.table {
            None => byte_idx.min(self.chars),
            Some(table) => table.get(byte_idx).copied().unwrap_or(self.chars),
        }
    }

    /// Half-open character range of a half-open byte range.
    #[must_use]
    pub fn range(&self, byte_start: usize, byte_end: usize) -> (usize, usize) {
        (self.byte_to_char(byte_start), self.byte_to_char(byte_end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_roundtrip() {
        let text = "set alarm for 7 am";
        assert_eq!(SpanConverter::new(text).range(14, 18), (14, 18));
        assert_eq!(chars_to_bytes(text, 14, 18), (14, 18));
        assert_eq!(char_slice(text, 14, 18), "7 am");
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "ab €50";
        // '€' is 3 bytes
        assert_eq!(SpanConverter::new(text).range(3, 8), (3, 6));
        assert_eq!(chars_to_bytes(text, 3, 6), (3, 8));
        assert_eq!(char_slice(text, 3, 6), "€50");
        assert_eq!(char_at(text, 3), Some('€'));
    }

    #[test]
    fn test_converter_every_boundary() {
        let text = "café costs €50";
        let conv = SpanConverter::new(text);
        for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
            assert_eq!(conv.byte_to_char(byte_idx), char_idx);
        }
        assert_eq!(conv.byte_to_char(text.len()), char_len(text));
        assert_eq!(conv.byte_to_char(text.len() + 4), char_len(text));
    }

    #[test]
    fn test_char_slice_clamps() {
        assert_eq!(char_slice("abc", 1, 10), "bc");
        assert_eq!(char_slice("abc", 5, 10), "");
    }
}
