//! Cursor-aware word insertion.
//!
//! Pure text transformation used when a suggestion chip is accepted. The
//! caller re-arms the debouncer with the returned text so suggestions
//! refresh for the new context.

/// Insert `word` into `text` at byte offset `cursor`.
///
/// The text after the cursor is never altered. A leading space is added iff
/// the text before the cursor is non-empty and does not already end in
/// whitespace; a trailing space is always added. Returns the new text and
/// the new cursor, positioned right after the inserted word and its
/// trailing space.
pub fn insert_word(text: &str, cursor: usize, word: &str) -> (String, usize) {
    let before = &text[..cursor];
    let after = &text[cursor..];

    let needs_space = !before.is_empty() && !before.ends_with(|c: char| c.is_whitespace());
    let token = if needs_space { format!(" {} ", word) } else { format!("{} ", word) };

    let new_cursor = before.len() + token.len();
    (format!("{}{}{}", before, token, after), new_cursor)
}
