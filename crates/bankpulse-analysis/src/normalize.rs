//! Raw review text cleaning.

use std::sync::LazyLock;

use regex::Regex;

use crate::stopwords::is_stopword;

static NON_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").expect("valid regex"));

/// Clean a raw review for keyword extraction.
///
/// Drops everything except ASCII letters and whitespace, lower-cases,
/// removes English stopwords and joins the remaining tokens with single
/// spaces. Returns `""` for text with no content words.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    let letters_only = NON_LETTER_RE.replace_all(raw, "");
    letters_only
        .to_lowercase()
        .split_whitespace()
        .filter(|token| !is_stopword(token))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_digits_and_punctuation() {
        assert_eq!(clean_text("App crashed 3 times!!"), "app crashed times");
    }

    #[test]
    fn removes_stopwords_and_lowercases() {
        assert_eq!(
            clean_text("The LOGIN is very slow"),
            "login slow"
        );
    }

    #[test]
    fn apostrophes_are_removed_not_split() {
        assert_eq!(clean_text("I can't login"), "cant login");
    }

    #[test]
    fn empty_and_symbol_only_input_is_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("👍 100%"), "");
    }
}
