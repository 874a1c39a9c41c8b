use std::collections::BTreeMap;

use bankpulse_core::Theme;
use serde::{Deserialize, Serialize};

/// Sentiment polarity attached to a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Parse a classifier label. Only the exact upper-case names are accepted.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "POSITIVE" => Some(Self::Positive),
            "NEGATIVE" => Some(Self::Negative),
            "NEUTRAL" => Some(Self::Neutral),
            _ => None,
        }
    }

    /// Fixed numeric encoding used for averaging: 1.0 / 0.0 / 0.5.
    #[must_use]
    pub fn numeric(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => 0.0,
            Self::Neutral => 0.5,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(label, score)` pair as returned by a classifier backend, before the
/// label has been validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    pub label: String,
    pub score: f64,
}

impl RawPrediction {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Sentiment attached to a single review.
///
/// Fields are read-only outside this crate so `numeric` cannot drift from `label`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub(crate) review_id: String,
    pub(crate) label: SentimentLabel,
    /// Classifier confidence in `[0.0, 1.0]`.
    pub(crate) score: f64,
    /// `label.numeric()`, stored for direct aggregation.
    pub(crate) numeric: f64,
    /// `true` when this is a neutral fallback rather than a real prediction.
    pub(crate) degraded: bool,
}

impl SentimentResult {
    pub(crate) fn new(review_id: String, label: SentimentLabel, score: f64, degraded: bool) -> Self {
        Self {
            review_id,
            label,
            score,
            numeric: label.numeric(),
            degraded,
        }
    }

    /// Neutral placeholder substituted when a batch cannot be classified.
    pub(crate) fn fallback(review_id: String) -> Self {
        Self::new(review_id, SentimentLabel::Neutral, 0.5, true)
    }

    #[must_use]
    pub fn review_id(&self) -> &str {
        &self.review_id
    }

    #[must_use]
    pub fn label(&self) -> SentimentLabel {
        self.label
    }

    /// Classifier confidence in `[0.0, 1.0]`.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Numeric form of [`label`](Self::label) used in aggregation.
    #[must_use]
    pub fn numeric(&self) -> f64 {
        self.numeric
    }

    /// `true` when this is a neutral fallback rather than a real prediction.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

/// Output of the sentiment stage: one result per review, in input order.
#[derive(Debug, Clone, Default)]
pub struct SentimentReport {
    pub results: Vec<SentimentResult>,
    /// Zero-based indices of batches that fell back to neutral results.
    pub failed_batches: Vec<usize>,
    pub batch_count: usize,
}

impl SentimentReport {
    /// Number of results produced by the fallback path.
    #[must_use]
    pub fn degraded_count(&self) -> usize {
        self.results.iter().filter(|r| r.degraded).count()
    }
}

/// One theme tag on one review. A review tagged with several themes yields
/// several assignments sharing the same keyword list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeAssignment {
    pub review_id: String,
    pub bank: String,
    pub theme: Theme,
    /// All keywords extracted from the review, in extraction order.
    pub keywords: Vec<String>,
    pub sentiment_label: Option<SentimentLabel>,
    pub sentiment_score: Option<f64>,
}

impl ThemeAssignment {
    /// Sentiment label for reporting, `"UNKNOWN"` when the review was never classified.
    #[must_use]
    pub fn sentiment_label_str(&self) -> &'static str {
        self.sentiment_label.map_or("UNKNOWN", SentimentLabel::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankSentimentSummary {
    pub bank: String,
    pub mean_sentiment_numeric: f64,
    pub review_count: usize,
}

/// Per-bank and per-(bank, rating) mean sentiment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentSummary {
    /// One row per bank, ordered by bank name.
    pub banks: Vec<BankSentimentSummary>,
    /// Sparse: only (bank, rating) cells with at least one review are present.
    pub by_rating: BTreeMap<(String, u8), f64>,
}

impl SentimentSummary {
    #[must_use]
    pub fn bank_mean(&self, bank: &str) -> Option<f64> {
        self.banks
            .iter()
            .find(|b| b.bank == bank)
            .map(|b| b.mean_sentiment_numeric)
    }

    #[must_use]
    pub fn rating_mean(&self, bank: &str, rating: u8) -> Option<f64> {
        self.by_rating.get(&(bank.to_string(), rating)).copied()
    }
}

/// Count of theme assignments per (bank, theme).
///
/// Dense over observed banks x observed themes: a bank that never produced a
/// theme some other bank produced reports `Some(0)`. Themes nobody produced
/// are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeFrequencyTable {
    pub(crate) banks: Vec<String>,
    pub(crate) themes: Vec<Theme>,
    pub(crate) counts: BTreeMap<(String, Theme), usize>,
}

impl ThemeFrequencyTable {
    /// Observed banks, sorted.
    #[must_use]
    pub fn banks(&self) -> &[String] {
        &self.banks
    }

    /// Observed themes, in canonical theme order.
    #[must_use]
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Count for a cell, or `None` if the bank or theme was never observed.
    #[must_use]
    pub fn get(&self, bank: &str, theme: Theme) -> Option<usize> {
        self.counts.get(&(bank.to_string(), theme)).copied()
    }

    /// All cells in bank-then-theme order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, Theme, usize)> + '_ {
        self.counts
            .iter()
            .map(|((bank, theme), count)| (bank.as_str(), *theme, *count))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
