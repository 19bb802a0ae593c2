use crate::fonts::FontSet;
use crate::model::FontSpec;

/// Rendered in place of a blank text body.
pub const PLACEHOLDER: &str = "-";

/// Split `text` into lines no wider than `max_width` when set in `font`.
///
/// Explicit newlines are kept (blank lines become empty strings), runs of
/// whitespace collapse to a single space, and words are packed greedily. A
/// word wider than `max_width` gets a line of its own and is not broken.
/// Blank input yields `["-"]`.
pub fn wrap(text: &str, font: FontSpec, max_width: f32, fonts: &FontSet) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![PLACEHOLDER.to_string()];
    }
    let space_w = fonts.text_width(font, " ");
    let mut lines = Vec::new();
    for logical in text.split('\n') {
        let logical = logical.trim_end_matches('\r');
        let mut current = String::new();
        let mut current_w = 0.0f32;
        for word in logical.split_whitespace() {
            let word_w = fonts.text_width(font, word);
            if current.is_empty() {
                current.push_str(word);
                current_w = word_w;
            } else if current_w + space_w + word_w <= max_width {
                current.push(' ');
                current.push_str(word);
                current_w += space_w + word_w;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_w = word_w;
            }
        }
        lines.push(current);
    }
    lines
}
