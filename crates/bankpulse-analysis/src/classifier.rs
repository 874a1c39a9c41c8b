//! Batched sentiment classification with per-batch fault isolation.

use std::future::Future;
use std::time::Duration;

use bankpulse_core::{AppConfig, Review};
use futures::stream::{self, StreamExt};

use crate::error::AnalysisError;
use crate::types::{RawPrediction, SentimentLabel, SentimentReport, SentimentResult};

const DEFAULT_BATCH_SIZE: usize = 32;
const DEFAULT_MAX_CONCURRENT_BATCHES: usize = 4;
const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_secs(60);

/// A text-classification backend that labels texts in bulk.
///
/// Implementations must return exactly one prediction per input text, in
/// input order. They are shared across concurrently running batches, so they
/// must be stateless or internally synchronized.
pub trait BatchClassifier: Send + Sync {
    fn classify_batch(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<RawPrediction>, AnalysisError>> + Send;
}

/// Batching and scheduling knobs for [`classify`].
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    pub batch_size: usize,
    pub max_concurrent_batches: usize,
    /// Per-batch deadline. `None` waits indefinitely.
    pub batch_timeout: Option<Duration>,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrent_batches: DEFAULT_MAX_CONCURRENT_BATCHES,
            batch_timeout: Some(DEFAULT_BATCH_TIMEOUT),
        }
    }
}

impl ClassifyOptions {
    /// Options from application config. A timeout of `0` disables the deadline.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            max_concurrent_batches: config.max_concurrent_batches,
            batch_timeout: (config.batch_timeout_secs > 0).then(|| config.batch_timeout()),
        }
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

enum Accumulated {
    Predicted(RawPrediction),
    Fallback,
}

/// Classify every review's raw text, returning one result per review in input order.
///
/// Reviews are split into contiguous batches of at most `options.batch_size`.
/// Up to `options.max_concurrent_batches` batches run at once and are merged
/// back by batch index. A batch that errors, times out, returns the wrong
/// number of predictions, or returns a score outside `[0, 1]` is replaced by
/// neutral fallbacks (`NEUTRAL`, 0.5, `degraded = true`) and the run carries on.
///
/// # Errors
///
/// - [`AnalysisError::InvalidBatchSize`] if `batch_size` is 0.
/// - [`AnalysisError::ClassificationExhausted`] if every batch failed.
/// - [`AnalysisError::UnknownSentimentLabel`] if the backend returned a label
///   outside POSITIVE/NEGATIVE/NEUTRAL.
pub async fn classify<C: BatchClassifier>(
    classifier: &C,
    reviews: &[Review],
    options: &ClassifyOptions,
) -> Result<SentimentReport, AnalysisError> {
    if options.batch_size == 0 {
        return Err(AnalysisError::InvalidBatchSize);
    }
    if reviews.is_empty() {
        return Ok(SentimentReport::default());
    }

    let batch_count = reviews.len().div_ceil(options.batch_size);
    let max_concurrent = options.max_concurrent_batches.max(1);

    let mut outcomes: Vec<(usize, Result<Vec<RawPrediction>, AnalysisError>)> =
        stream::iter(reviews.chunks(options.batch_size).enumerate())
            .map(|(index, batch)| async move {
                (
                    index,
                    run_batch(classifier, index, batch, options.batch_timeout).await,
                )
            })
            .buffer_unordered(max_concurrent)
            .collect()
            .await;
    outcomes.sort_by_key(|(index, _)| *index);

    let mut accumulated: Vec<Accumulated> = Vec::with_capacity(reviews.len());
    let mut failed_batches = Vec::new();

    for ((index, outcome), batch) in outcomes
        .into_iter()
        .zip(reviews.chunks(options.batch_size))
    {
        match outcome {
            Ok(predictions) => {
                accumulated.extend(predictions.into_iter().map(Accumulated::Predicted));
            }
            Err(e) => {
                tracing::warn!(
                    batch = index,
                    size = batch.len(),
                    error = %e,
                    "batch classification failed; substituting neutral fallback"
                );
                failed_batches.push(index);
                accumulated.extend(batch.iter().map(|_| Accumulated::Fallback));
            }
        }
    }

    if failed_batches.len() == batch_count {
        return Err(AnalysisError::ClassificationExhausted {
            batches: batch_count,
        });
    }

    let results = reviews
        .iter()
        .zip(accumulated)
        .map(|(review, item)| match item {
            Accumulated::Predicted(prediction) => {
                let label = SentimentLabel::parse(&prediction.label).ok_or_else(|| {
                    AnalysisError::UnknownSentimentLabel {
                        review_id: review.id.clone(),
                        label: prediction.label.clone(),
                    }
                })?;
                Ok(SentimentResult::new(
                    review.id.clone(),
                    label,
                    prediction.score,
                    false,
                ))
            }
            Accumulated::Fallback => Ok(SentimentResult::fallback(review.id.clone())),
        })
        .collect::<Result<Vec<_>, AnalysisError>>()?;

    tracing::info!(
        reviews = results.len(),
        batches = batch_count,
        failed_batches = failed_batches.len(),
        "sentiment classification complete"
    );

    Ok(SentimentReport {
        results,
        failed_batches,
        batch_count,
    })
}

/// Run one batch through the classifier and check the shape of its output.
async fn run_batch<C: BatchClassifier>(
    classifier: &C,
    index: usize,
    batch: &[Review],
    timeout: Option<Duration>,
) -> Result<Vec<RawPrediction>, AnalysisError> {
    let texts: Vec<String> = batch.iter().map(|r| r.review_text.clone()).collect();

    let call = classifier.classify_batch(&texts);
    let outcome = match timeout {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
            AnalysisError::BatchClassification {
                batch: index,
                reason: format!("timed out after {}ms", limit.as_millis()),
            }
        })?,
        None => call.await,
    };

    let predictions = outcome.map_err(|e| AnalysisError::BatchClassification {
        batch: index,
        reason: e.to_string(),
    })?;

    if predictions.len() != texts.len() {
        return Err(AnalysisError::BatchClassification {
            batch: index,
            reason: format!(
                "classifier returned {} predictions for {} texts",
                predictions.len(),
                texts.len()
            ),
        });
    }

    if let Some(bad) = predictions
        .iter()
        .find(|p| !(0.0..=1.0).contains(&p.score))
    {
        return Err(AnalysisError::BatchClassification {
            batch: index,
            reason: format!("score {} outside [0, 1]", bad.score),
        });
    }

    Ok(predictions)
}
