//! Keyword extraction for theme tagging.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AnalysisError;
use crate::stopwords::is_stopword;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]+").expect("valid regex"));

/// Turns cleaned review text into an ordered list of lower-cased keyword lemmas.
///
/// Any `Fn(&str) -> Result<Vec<String>, AnalysisError>` is an extractor, so
/// callers can plug in an NLP service or a test stub directly.
pub trait KeywordExtractor {
    /// # Errors
    ///
    /// Implementations return an error when the text cannot be processed; the
    /// tagger skips that review.
    fn extract_keywords(&self, text: &str) -> Result<Vec<String>, AnalysisError>;
}

impl<F> KeywordExtractor for F
where
    F: Fn(&str) -> Result<Vec<String>, AnalysisError>,
{
    fn extract_keywords(&self, text: &str) -> Result<Vec<String>, AnalysisError> {
        self(text)
    }
}

/// Dictionary-free extractor: alphabetic tokens longer than two letters,
/// stopwords removed, with plural suffixes folded to a base form.
///
/// Tokens keep their order of appearance and duplicates are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalExtractor;

impl KeywordExtractor for LexicalExtractor {
    fn extract_keywords(&self, text: &str) -> Result<Vec<String>, AnalysisError> {
        let lowered = text.to_lowercase();
        Ok(WORD_RE
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| token.len() > 2 && !is_stopword(token))
            .map(lemmatize)
            .collect())
    }
}

/// Fold common English plural forms onto their singular.
fn lemmatize(token: &str) -> String {
    if token.len() > 4 {
        if let Some(stem) = token.strip_suffix("ies") {
            return format!("{stem}y");
        }
        for suffix in ["sses", "shes", "ches", "xes"] {
            if token.ends_with(suffix) {
                return token[..token.len() - 2].to_string();
            }
        }
    }
    if token.len() > 3
        && token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("is")
    {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<String> {
        LexicalExtractor.extract_keywords(text).unwrap()
    }

    #[test]
    fn keeps_content_words_in_order() {
        assert_eq!(extract("app crash freeze"), vec!["app", "crash", "freeze"]);
        assert_eq!(
            extract("great login experience"),
            vec!["great", "login", "experience"]
        );
    }

    #[test]
    fn drops_short_words_and_stopwords() {
        assert_eq!(extract("it is so ok to pay"), vec!["pay"]);
    }

    #[test]
    fn lowercases_and_ignores_non_letters() {
        assert_eq!(extract("Login FAILED!! 404"), vec!["login", "failed"]);
    }

    #[test]
    fn folds_plurals() {
        assert_eq!(
            extract("crashes freezes transfers replies passes"),
            vec!["crash", "freeze", "transfer", "reply", "pass"]
        );
    }

    #[test]
    fn leaves_ss_and_us_endings_alone() {
        assert_eq!(extract("access status"), vec!["access", "status"]);
    }

    #[test]
    fn keeps_duplicates() {
        assert_eq!(extract("slow slow app"), vec!["slow", "slow", "app"]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(extract("").is_empty());
    }

    #[test]
    fn closures_are_extractors() {
        let stub = |text: &str| -> Result<Vec<String>, AnalysisError> {
            Ok(text.split(',').map(str::to_string).collect())
        };
        assert_eq!(
            stub.extract_keywords("login,slow").unwrap(),
            vec!["login", "slow"]
        );
    }
}
