use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A single app-store review for one bank's mobile app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Opaque identifier. Loaders fall back to the row position when the
    /// source has none.
    pub id: String,
    pub bank: String,
    /// Raw review text as scraped.
    pub review_text: String,
    /// Normalized text used for keyword extraction. `None` when the source
    /// carried no cleaned text at all.
    pub cleaned_text: Option<String>,
    /// Star rating, `1..=5`.
    pub rating: u8,
    pub date: NaiveDate,
    /// Where the review came from, e.g. `"Google Play"`.
    pub source: String,
}

impl Review {
    /// Returns `true` when the review satisfies the ingest invariants:
    /// a non-blank bank and a rating within `1..=5`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.bank.trim().is_empty() && (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }

    /// Cleaned text, or `""` when absent.
    #[must_use]
    pub fn cleaned(&self) -> &str {
        self.cleaned_text.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(bank: &str, rating: u8) -> Review {
        Review {
            id: "0".to_string(),
            bank: bank.to_string(),
            review_text: "fine".to_string(),
            cleaned_text: None,
            rating,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            source: "Google Play".to_string(),
        }
    }

    #[test]
    fn valid_review_passes() {
        assert!(review("CBE", 3).is_valid());
    }

    #[test]
    fn rating_out_of_range_is_invalid() {
        assert!(!review("CBE", 0).is_valid());
        assert!(!review("CBE", 6).is_valid());
    }

    #[test]
    fn blank_bank_is_invalid() {
        assert!(!review("  ", 4).is_valid());
    }

    #[test]
    fn missing_cleaned_text_reads_as_empty() {
        assert_eq!(review("BOA", 2).cleaned(), "");
    }

    #[test]
    fn review_serializes_with_iso_date() {
        let json = serde_json::to_value(review("BOA", 5)).unwrap();
        assert_eq!(json["date"], "2025-06-01");
        assert_eq!(json["rating"], 5);
    }
}
