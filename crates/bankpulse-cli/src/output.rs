//! CSV writers for analysis results.

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::Context;
use bankpulse_analysis::{
    AnalysisReport, BankSentimentSummary, SentimentResult, SentimentSummary, ThemeAssignment,
    ThemeFrequencyTable,
};
use bankpulse_core::Review;

pub(crate) const REVIEWS_WITH_SENTIMENT: &str = "reviews_with_sentiment.csv";
pub(crate) const REVIEW_THEMES: &str = "review_themes.csv";
pub(crate) const BANK_SENTIMENT: &str = "bank_sentiment.csv";
pub(crate) const RATING_SENTIMENT: &str = "rating_sentiment.csv";
pub(crate) const THEME_DISTRIBUTION: &str = "theme_distribution.csv";

/// Write all five result files into `output_dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub(crate) fn write_outputs(
    output_dir: &Path,
    reviews: &[Review],
    report: &AnalysisReport,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    write_reviews_with_sentiment(
        create(output_dir, REVIEWS_WITH_SENTIMENT)?,
        reviews,
        &report.sentiment.results,
    )?;
    write_review_themes(
        create(output_dir, REVIEW_THEMES)?,
        &report.themes.assignments,
    )?;
    write_bank_sentiment(
        create(output_dir, BANK_SENTIMENT)?,
        &report.sentiment_summary.banks,
    )?;
    write_rating_sentiment(
        create(output_dir, RATING_SENTIMENT)?,
        &report.sentiment_summary,
    )?;
    write_theme_distribution(create(output_dir, THEME_DISTRIBUTION)?, &report.theme_table)?;

    tracing::info!(dir = %output_dir.display(), "analysis outputs written");
    Ok(())
}

fn create(dir: &Path, name: &str) -> anyhow::Result<File> {
    let path = dir.join(name);
    File::create(&path).with_context(|| format!("failed to create {}", path.display()))
}

pub(crate) fn write_reviews_with_sentiment<W: io::Write>(
    writer: W,
    reviews: &[Review],
    results: &[SentimentResult],
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "review_id",
        "bank",
        "rating",
        "date",
        "source",
        "review",
        "sentiment_label",
        "sentiment_score",
        "sentiment_numeric",
        "degraded",
    ])?;
    for (review, result) in reviews.iter().zip(results) {
        writer.write_record([
            review.id.clone(),
            review.bank.clone(),
            review.rating.to_string(),
            review.date.format("%Y-%m-%d").to_string(),
            review.source.clone(),
            review.review_text.clone(),
            result.label().to_string(),
            format!("{:.4}", result.score()),
            result.numeric().to_string(),
            result.is_degraded().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_review_themes<W: io::Write>(
    writer: W,
    assignments: &[ThemeAssignment],
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "review_id",
        "bank",
        "theme",
        "keywords",
        "sentiment_label",
        "sentiment_score",
    ])?;
    for a in assignments {
        writer.write_record([
            a.review_id.clone(),
            a.bank.clone(),
            a.theme.to_string(),
            a.keywords.join(" "),
            a.sentiment_label_str().to_string(),
            a.sentiment_score
                .map(|s| format!("{s:.4}"))
                .unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_bank_sentiment<W: io::Write>(
    writer: W,
    banks: &[BankSentimentSummary],
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["bank", "mean_sentiment_numeric", "review_count"])?;
    for b in banks {
        writer.write_record([
            b.bank.clone(),
            format!("{:.4}", b.mean_sentiment_numeric),
            b.review_count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_rating_sentiment<W: io::Write>(
    writer: W,
    summary: &SentimentSummary,
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["bank", "rating", "mean_sentiment_numeric"])?;
    for ((bank, rating), mean) in &summary.by_rating {
        writer.write_record([bank.clone(), rating.to_string(), format!("{mean:.4}")])?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_theme_distribution<W: io::Write>(
    writer: W,
    table: &ThemeFrequencyTable,
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["bank", "theme", "count"])?;
    for (bank, theme, count) in table.rows() {
        writer.write_record([bank.to_string(), theme.to_string(), count.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
