//! Character stream preparation.

use unicode_normalization::UnicodeNormalization;

/// Turns raw text into the flat character stream the packer consumes.
///
/// The text is NFC-normalized so precomposed characters are measured as one
/// glyph, and every whitespace run (newlines, tabs, repeated spaces) becomes
/// a single `' '`. Leading and trailing whitespace is kept as one space each.
pub fn prepare_stream(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.nfc() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else if !ch.is_control() {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Repeats `stream`, separated by single spaces, until it holds at least
/// `min_len` characters. An empty stream stays empty.
pub fn repeat_stream(stream: &[char], min_len: usize) -> Vec<char> {
    if stream.is_empty() {
        return Vec::new();
    }
    let mut out = stream.to_vec();
    while out.len() < min_len {
        if out.last() != Some(&' ') && stream.first() != Some(&' ') {
            out.push(' ');
        }
        out.extend_from_slice(stream);
    }
    out
}
