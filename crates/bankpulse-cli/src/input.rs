//! Reviews CSV loading.

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::Context;
use bankpulse_analysis::clean_text;
use bankpulse_core::Review;
use chrono::NaiveDate;
use serde::Deserialize;

pub(crate) const REQUIRED_COLUMNS: [&str; 4] = ["review", "rating", "date", "bank"];
const CLEANED_COLUMN: &str = "cleaned_review";
const DEFAULT_SOURCE: &str = "Google Play";

#[derive(Debug, Deserialize)]
struct ReviewRow {
    review: String,
    rating: i64,
    date: NaiveDate,
    bank: String,
    source: Option<String>,
    review_id: Option<String>,
    cleaned_review: Option<String>,
}

/// Fail unless every required column is present in `headers`.
pub(crate) fn check_required_columns(headers: &csv::StringRecord) -> anyhow::Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == column) {
            anyhow::bail!("input is missing required column '{column}'");
        }
    }
    Ok(())
}

/// Load reviews from the CSV at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, has no header row, or lacks
/// a required column. Malformed or invalid rows are logged and skipped.
pub(crate) fn load_reviews(path: &Path) -> anyhow::Result<Vec<Review>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_reviews(file)
}

/// Parse reviews from CSV data.
///
/// Rows without a `review_id` get their zero-based data row position as id.
/// Without a `cleaned_review` column the review text is cleaned here; a blank
/// cell in an existing column is kept blank. Rows whose rating is outside
/// `1..=5`, whose bank is blank, or that fail to parse are skipped with a
/// warning.
pub(crate) fn read_reviews<R: io::Read>(reader: R) -> anyhow::Result<Vec<Review>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = reader.headers().context("failed to read CSV header")?.clone();
    check_required_columns(&headers)?;
    let has_cleaned_column = headers.iter().any(|h| h == CLEANED_COLUMN);

    let mut reviews = Vec::new();
    let mut skipped = 0usize;

    for (position, result) in reader.deserialize::<ReviewRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(row = position, error = %e, "skipping unparseable review row");
                skipped += 1;
                continue;
            }
        };

        let Some(review) = into_review(position, row, has_cleaned_column) else {
            skipped += 1;
            continue;
        };
        reviews.push(review);
    }

    tracing::info!(loaded = reviews.len(), skipped, "reviews loaded");
    Ok(reviews)
}

fn into_review(position: usize, row: ReviewRow, has_cleaned_column: bool) -> Option<Review> {
    let Ok(rating) = u8::try_from(row.rating) else {
        tracing::warn!(
            row = position,
            rating = row.rating,
            "skipping review with out-of-range rating"
        );
        return None;
    };

    let cleaned_text = if has_cleaned_column {
        Some(row.cleaned_review.unwrap_or_default())
    } else {
        Some(clean_text(&row.review))
    };
    let review = Review {
        id: row
            .review_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| position.to_string()),
        bank: row.bank.trim().to_string(),
        review_text: row.review,
        cleaned_text,
        rating,
        date: row.date,
        source: row.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
    };

    if review.is_valid() {
        Some(review)
    } else {
        tracing::warn!(
            row = position,
            bank = %review.bank,
            rating = review.rating,
            "skipping review with blank bank or out-of-range rating"
        );
        None
    }
}

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;
