use unicode_width::UnicodeWidthChar;

pub fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count == char_idx {
            return byte_idx;
        }
    }
    text.len()
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn split_text(text: &str, offset: usize) -> (String, String) {
    let byte_idx = char_to_byte_idx(text, offset);
    let left = text[..byte_idx].to_string();
    let right = text[byte_idx..].to_string();
    (left, right)
}

/// Removes the chars in `start..end`. Bounds are clamped to the text.
pub(crate) fn remove_char_range(text: &mut String, start: usize, end: usize) {
    let len = char_len(text);
    let end = end.min(len);
    let start = start.min(end);
    let from = char_to_byte_idx(text, start);
    let to = char_to_byte_idx(text, end);
    text.drain(from..to);
}

// Invisible format chars that editors use as cursor anchors.
const INVISIBLE_FORMAT: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

// Zero-width chars count only when they carry content, like combining marks
// or soft hyphens. Control chars count.
fn is_rendered(ch: char) -> bool {
    ch.width() != Some(0) || !INVISIBLE_FORMAT.contains(&ch)
}

pub(crate) fn rendered_len(text: &str) -> usize {
    text.chars().filter(|ch| is_rendered(*ch)).count()
}

pub(crate) fn is_rendered_empty(text: &str) -> bool {
    rendered_len(text) == 0
}
