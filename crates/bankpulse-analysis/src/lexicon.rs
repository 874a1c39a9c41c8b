//! Offline lexicon classifier for banking-app reviews.

use crate::classifier::BatchClassifier;
use crate::error::AnalysisError;
use crate::types::{RawPrediction, SentimentLabel};

/// Review-domain word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The summed polarity is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("good", 0.3),
    ("great", 0.4),
    ("excellent", 0.5),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("love", 0.5),
    ("best", 0.5),
    ("nice", 0.3),
    ("easy", 0.3),
    ("fast", 0.3),
    ("smooth", 0.3),
    ("convenient", 0.4),
    ("reliable", 0.4),
    ("helpful", 0.4),
    ("simple", 0.2),
    ("secure", 0.3),
    ("thanks", 0.3),
    ("recommend", 0.4),
    ("perfect", 0.5),
    ("works", 0.2),
    // Negative signals
    ("bad", -0.4),
    ("worst", -0.6),
    ("terrible", -0.6),
    ("horrible", -0.6),
    ("poor", -0.4),
    ("slow", -0.3),
    ("crash", -0.5),
    ("crashes", -0.5),
    ("crashed", -0.5),
    ("freeze", -0.4),
    ("freezes", -0.4),
    ("bug", -0.3),
    ("bugs", -0.3),
    ("error", -0.4),
    ("failed", -0.4),
    ("fails", -0.4),
    ("stuck", -0.4),
    ("useless", -0.6),
    ("annoying", -0.4),
    ("disappointed", -0.5),
];

/// Polarity of `text` in `[-1.0, 1.0]`.
///
/// Splits on whitespace, trims non-letters, lower-cases, sums matching
/// weights and clamps. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_polarity(text: &str) -> f64 {
    let mut score = 0.0_f64;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if let Some(&(_, weight)) = LEXICON.iter().find(|(lex_word, _)| *lex_word == w) {
            score += weight;
        }
    }
    score.clamp(-1.0, 1.0)
}

/// Map a polarity onto a label and a confidence in `[0.5, 1.0]`.
fn to_prediction(polarity: f64) -> RawPrediction {
    let label = if polarity > 0.0 {
        SentimentLabel::Positive
    } else if polarity < 0.0 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };
    RawPrediction::new(label.as_str(), 0.5 + polarity.abs() / 2.0)
}

/// Lexicon-backed [`BatchClassifier`] that needs no model server.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconClassifier;

impl BatchClassifier for LexiconClassifier {
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<RawPrediction>, AnalysisError> {
        Ok(texts
            .iter()
            .map(|text| to_prediction(lexicon_polarity(text)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(lexicon_polarity(""), 0.0);
    }

    #[test]
    fn unknown_text_is_zero() {
        assert_eq!(lexicon_polarity("the quick brown fox"), 0.0);
    }

    #[test]
    fn positive_keyword_is_positive() {
        let score = lexicon_polarity("this app is great");
        assert!(score > 0.0, "expected positive score, got {score}");
    }

    #[test]
    fn negative_keyword_is_negative() {
        let score = lexicon_polarity("app crashed again");
        assert!(score < 0.0, "expected negative score, got {score}");
    }

    #[test]
    fn clamps_to_one() {
        let text = "great excellent best love recommend perfect amazing";
        assert_eq!(lexicon_polarity(text), 1.0);
    }

    #[test]
    fn clamps_to_negative_one() {
        let text = "worst terrible horrible useless crash freeze";
        assert_eq!(lexicon_polarity(text), -1.0);
    }

    #[test]
    fn punctuation_stripped_from_words() {
        assert!(lexicon_polarity("Great!") > 0.0);
    }

    #[test]
    fn prediction_labels_follow_sign() {
        assert_eq!(to_prediction(0.4).label, "POSITIVE");
        assert_eq!(to_prediction(-0.4).label, "NEGATIVE");
        let neutral = to_prediction(0.0);
        assert_eq!(neutral.label, "NEUTRAL");
        assert_eq!(neutral.score, 0.5);
        assert_eq!(to_prediction(-1.0).score, 1.0);
    }

    #[tokio::test]
    async fn classifies_every_text_in_order() {
        let texts = vec![
            "love it".to_string(),
            "keeps crashing, useless".to_string(),
            "ok".to_string(),
        ];
        let predictions = LexiconClassifier.classify_batch(&texts).await.unwrap();
        let labels: Vec<&str> = predictions.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["POSITIVE", "NEGATIVE", "NEUTRAL"]);
        assert!(predictions.iter().all(|p| (0.0..=1.0).contains(&p.score)));
    }
}
