//! Per-bank reductions of sentiment results and theme assignments.

use std::collections::{BTreeMap, BTreeSet};

use bankpulse_core::{Review, Theme};

use crate::types::{
    BankSentimentSummary, SentimentResult, SentimentSummary, ThemeAssignment, ThemeFrequencyTable,
};

#[derive(Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Mean sentiment per bank and per (bank, rating).
///
/// Takes each result paired with the review it was computed for. Banks only
/// appear when they have at least one review, so no mean is ever NaN.
pub fn aggregate_sentiment<'a, I>(rows: I) -> SentimentSummary
where
    I: IntoIterator<Item = (&'a Review, &'a SentimentResult)>,
{
    let mut per_bank: BTreeMap<&str, MeanAccumulator> = BTreeMap::new();
    let mut per_rating: BTreeMap<(&str, u8), MeanAccumulator> = BTreeMap::new();

    for (review, result) in rows {
        per_bank
            .entry(review.bank.as_str())
            .or_default()
            .push(result.numeric);
        per_rating
            .entry((review.bank.as_str(), review.rating))
            .or_default()
            .push(result.numeric);
    }

    let banks = per_bank
        .into_iter()
        .map(|(bank, acc)| BankSentimentSummary {
            bank: bank.to_string(),
            mean_sentiment_numeric: acc.mean(),
            review_count: acc.count,
        })
        .collect();

    let by_rating = per_rating
        .into_iter()
        .map(|((bank, rating), acc)| ((bank.to_string(), rating), acc.mean()))
        .collect();

    SentimentSummary { banks, by_rating }
}

/// Count assignments per (bank, theme), zero-filling observed banks x observed themes.
pub fn aggregate_themes(assignments: &[ThemeAssignment]) -> ThemeFrequencyTable {
    let mut counts: BTreeMap<(String, Theme), usize> = BTreeMap::new();
    let mut banks: BTreeSet<&str> = BTreeSet::new();
    let mut themes: BTreeSet<Theme> = BTreeSet::new();

    for assignment in assignments {
        banks.insert(assignment.bank.as_str());
        themes.insert(assignment.theme);
        *counts
            .entry((assignment.bank.clone(), assignment.theme))
            .or_insert(0) += 1;
    }

    for bank in &banks {
        for theme in &themes {
            counts.entry(((*bank).to_string(), *theme)).or_insert(0);
        }
    }

    ThemeFrequencyTable {
        banks: banks.into_iter().map(str::to_string).collect(),
        themes: themes.into_iter().collect(),
        counts,
    }
}
