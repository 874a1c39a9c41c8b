//! Analysis pipeline orchestration.

use bankpulse_core::{Review, ThemeTaxonomy};

use crate::aggregate::{aggregate_sentiment, aggregate_themes};
use crate::classifier::{classify, BatchClassifier, ClassifyOptions};
use crate::error::AnalysisError;
use crate::keywords::KeywordExtractor;
use crate::tagger::{tag_reviews_cooperative, ThemeTagReport};
use crate::types::{SentimentReport, SentimentSummary, ThemeFrequencyTable};

/// Everything one analysis run produces.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub sentiment: SentimentReport,
    pub themes: ThemeTagReport,
    pub sentiment_summary: SentimentSummary,
    pub theme_table: ThemeFrequencyTable,
}

impl AnalysisReport {
    /// Reviews that received a neutral fallback instead of a real prediction.
    #[must_use]
    pub fn degraded_count(&self) -> usize {
        self.sentiment.degraded_count()
    }

    /// Reviews dropped from theme tagging because keyword extraction failed.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.themes.skipped.len()
    }
}

/// Run sentiment classification and theme tagging over `reviews`.
///
/// 1. Classify review text in batches while tagging cleaned text with themes.
/// 2. Attach each review's sentiment to its theme assignments.
/// 3. Reduce sentiment per bank and per (bank, rating).
/// 4. Count themes per bank.
///
/// # Errors
///
/// Returns [`AnalysisError`] when the sentiment stage fails as a whole (see
/// [`classify`]). Per-batch and per-review failures are recovered and counted
/// in the report.
pub async fn run_analysis<C, E>(
    reviews: &[Review],
    classifier: &C,
    extractor: &E,
    taxonomy: &ThemeTaxonomy,
    options: &ClassifyOptions,
) -> Result<AnalysisReport, AnalysisError>
where
    C: BatchClassifier,
    E: KeywordExtractor + ?Sized,
{
    tracing::info!(reviews = reviews.len(), "starting review analysis");

    let (sentiment, mut themes) = tokio::join!(
        classify(classifier, reviews, options),
        tag_reviews_cooperative(reviews, &[], extractor, taxonomy),
    );
    let sentiment = sentiment?;

    themes.attach_sentiment(&sentiment.results);

    let sentiment_summary = aggregate_sentiment(reviews.iter().zip(&sentiment.results));
    let theme_table = aggregate_themes(&themes.assignments);

    let report = AnalysisReport {
        sentiment,
        themes,
        sentiment_summary,
        theme_table,
    };

    tracing::info!(
        reviews = reviews.len(),
        banks = report.sentiment_summary.banks.len(),
        degraded = report.degraded_count(),
        skipped = report.skipped_count(),
        "review analysis complete"
    );

    Ok(report)
}
