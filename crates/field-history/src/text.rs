use unicode_segmentation::UnicodeSegmentation;

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Character offset one extended grapheme cluster before `char_offset`.
pub(crate) fn prev_grapheme_offset(text: &str, char_offset: usize) -> usize {
    let byte = char_to_byte(text, char_offset);
    match text[..byte].graphemes(true).next_back() {
        Some(cluster) => char_offset - char_len(cluster),
        None => char_offset,
    }
}

/// Character offset one extended grapheme cluster after `char_offset`.
pub(crate) fn next_grapheme_offset(text: &str, char_offset: usize) -> usize {
    let byte = char_to_byte(text, char_offset);
    match text[byte..].graphemes(true).next() {
        Some(cluster) => char_offset + char_len(cluster),
        None => char_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grapheme_offsets_step_over_whole_clusters() {
        // "e" + combining acute, then a family emoji built from 5 scalars.
        let text = "ae\u{301}👨\u{200d}👩\u{200d}👧z";
        assert_eq!(prev_grapheme_offset(text, 3), 1);
        assert_eq!(next_grapheme_offset(text, 1), 3);
        assert_eq!(next_grapheme_offset(text, 3), 8);
        assert_eq!(prev_grapheme_offset(text, 8), 3);
    }

    #[test]
    fn grapheme_offsets_stop_at_text_edges() {
        assert_eq!(prev_grapheme_offset("abc", 0), 0);
        assert_eq!(next_grapheme_offset("abc", 3), 3);
    }

    #[test]
    fn char_to_byte_handles_multibyte_text() {
        let text = "你好a";
        assert_eq!(char_to_byte(text, 1), 3);
        assert_eq!(char_to_byte(text, 3), text.len());
    }
}
