use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Every batch failed, so the sentiment stage has no real results.
    #[error("sentiment classification failed for all {batches} batches")]
    ClassificationExhausted { batches: usize },

    /// The classifier produced a label outside POSITIVE/NEGATIVE/NEUTRAL.
    #[error("unknown sentiment label '{label}' for review {review_id}")]
    UnknownSentimentLabel { review_id: String, label: String },

    /// One batch failed and was replaced with neutral fallbacks.
    #[error("batch {batch} classification failed: {reason}")]
    BatchClassification { batch: usize, reason: String },

    /// Keyword extraction failed for one review, which is skipped.
    #[error("keyword extraction failed for review {review_id}: {reason}")]
    KeywordExtraction { review_id: String, reason: String },

    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The classifier server is shedding load (HTTP 429). `retry_after` is the
    /// server's `Retry-After` hint when it sent one.
    #[error("classifier overloaded")]
    Overloaded { retry_after: Option<Duration> },

    #[error("classifier error: {0}")]
    Classifier(String),

    #[error("keyword extractor error: {0}")]
    Extractor(String),
}
