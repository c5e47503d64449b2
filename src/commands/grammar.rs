//! Chat command grammars.
//!
//! ```text
//! invocation := "!" keyword [" " ...]
//! add        := "!" word " " keyword " " free-text
//! delete     := "!" word " " keyword
//! word, keyword := [A-Za-z0-9]+
//! ```

use super::COMMAND_PREFIX;

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Keyword of an invocation: the text after the prefix, up to the first space.
pub fn invocation_keyword(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(COMMAND_PREFIX)?;
    let keyword = rest.split(' ').next().unwrap_or_default();
    (!keyword.is_empty()).then_some(keyword)
}

/// Match `!<word> <keyword> <free-text>`, returning `(keyword, free_text)`.
///
/// The free text may be empty (`!addcom foo ` adds an empty response) but
/// must not span lines.
pub fn parse_add(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix(COMMAND_PREFIX)?;
    let (word, rest) = rest.split_once(' ')?;
    let (keyword, free_text) = rest.split_once(' ')?;

    (is_word(word) && is_word(keyword) && !free_text.contains('\n')).then_some((keyword, free_text))
}

/// Match `!<word> <keyword>`, returning the keyword.
pub fn parse_delete(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(COMMAND_PREFIX)?;
    let (word, keyword) = rest.split_once(' ')?;

    (is_word(word) && is_word(keyword)).then_some(keyword)
}
