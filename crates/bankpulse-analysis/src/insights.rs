//! Satisfaction drivers and pain points per bank.

use std::collections::HashMap;

use bankpulse_core::Review;

use crate::stopwords::is_stopword;

const DRIVER_MIN_RATING: u8 = 4;
const PAIN_POINT_MAX_RATING: u8 = 2;

/// Most frequent words in high- and low-rated reviews of one bank.
#[derive(Debug, Clone, PartialEq)]
pub struct BankInsight {
    pub bank: String,
    /// `(word, count)` from reviews rated 4 or 5, most frequent first.
    pub drivers: Vec<(String, usize)>,
    /// `(word, count)` from reviews rated 1 or 2, most frequent first.
    pub pain_points: Vec<(String, usize)>,
}

/// Top `top_n` driver and pain-point words for `bank`.
///
/// The bank name matches case-insensitively. Returns `None` when no review
/// belongs to the bank.
#[must_use]
pub fn bank_insights(reviews: &[Review], bank: &str, top_n: usize) -> Option<BankInsight> {
    let bank_reviews: Vec<&Review> = reviews
        .iter()
        .filter(|r| r.bank.eq_ignore_ascii_case(bank))
        .collect();
    let first = bank_reviews.first()?;

    let drivers = top_words(
        bank_reviews
            .iter()
            .filter(|r| r.rating >= DRIVER_MIN_RATING)
            .map(|r| r.cleaned()),
        top_n,
    );
    let pain_points = top_words(
        bank_reviews
            .iter()
            .filter(|r| r.rating <= PAIN_POINT_MAX_RATING)
            .map(|r| r.cleaned()),
        top_n,
    );

    Some(BankInsight {
        bank: first.bank.clone(),
        drivers,
        pain_points,
    })
}

fn normalize_word(raw: &str) -> Option<String> {
    let word: String = raw
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '!' | '?' | '(' | ')' | '[' | ']'))
        .collect::<String>()
        .to_lowercase();
    (word.chars().count() > 2 && !is_stopword(&word)).then_some(word)
}

/// Count words across `texts`; ties keep first-appearance order.
fn top_words<'a, I>(texts: I, top_n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for word in texts
        .into_iter()
        .flat_map(str::split_whitespace)
        .filter_map(normalize_word)
    {
        let next_rank = counts.len();
        counts.entry(word).or_insert((0, next_rank)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first_seen))| (word, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(top_n)
        .map(|(word, count, _)| (word, count))
        .collect()
}
