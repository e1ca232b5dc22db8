//! Text normalization: whitespace cleanup, word tokenization and word counts.
//!
//! All functions are pure. A "word" is a maximal run of alphanumeric characters or `_`.


/// Trims and collapses internal whitespace runs to a single space.
pub fn clean(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lowercases the cleaned text and returns its word tokens in order.
pub fn tokenize(text: &str) -> Vec<String> {
    let buffer = clean(text).to_lowercase();
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in buffer.char_indices() {
        if is_word_char(c) {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            tokens.push(buffer[s..i].to_string());
        }
    }
    if let Some(s) = start {
        tokens.push(buffer[s..].to_string());
    }

    tokens
}

/// Number of tokens produced by [`tokenize`].
pub fn count_words(text: &str) -> usize {
    tokenize(text).len()
}
