//! Multi-label theme tagging from extracted keywords.

use std::collections::HashMap;

use bankpulse_core::{Review, Theme, ThemeTaxonomy};

use crate::error::AnalysisError;
use crate::keywords::KeywordExtractor;
use crate::types::{SentimentResult, ThemeAssignment};

/// Theme assignments for a set of reviews plus the reviews that could not be tagged.
#[derive(Debug, Clone, Default)]
pub struct ThemeTagReport {
    pub assignments: Vec<ThemeAssignment>,
    /// Ids of reviews skipped because keyword extraction failed.
    pub skipped: Vec<String>,
}

impl ThemeTagReport {
    /// Copy sentiment label and score onto assignments whose review has a result.
    ///
    /// If review ids repeat, the first result for an id wins.
    pub fn attach_sentiment(&mut self, results: &[SentimentResult]) {
        let lookup = sentiment_lookup(results);
        for assignment in &mut self.assignments {
            if let Some(result) = lookup.get(assignment.review_id.as_str()) {
                assignment.sentiment_label = Some(result.label);
                assignment.sentiment_score = Some(result.score);
            }
        }
    }
}

fn sentiment_lookup(results: &[SentimentResult]) -> HashMap<&str, &SentimentResult> {
    let mut lookup = HashMap::with_capacity(results.len());
    for result in results {
        lookup.entry(result.review_id.as_str()).or_insert(result);
    }
    lookup
}

/// Tag one review with every taxonomy theme whose triggers intersect its keywords.
///
/// Blank or missing cleaned text short-circuits to an empty keyword list
/// without calling the extractor. When no theme matches, a single
/// [`Theme::Other`] assignment is produced. Each assignment carries the full
/// keyword list and, when `sentiment` is given, its label and score.
/// Assignments come out in canonical theme order.
///
/// # Errors
///
/// Returns [`AnalysisError::KeywordExtraction`] if the extractor fails.
pub fn tag_review<E: KeywordExtractor + ?Sized>(
    review: &Review,
    sentiment: Option<&SentimentResult>,
    extractor: &E,
    taxonomy: &ThemeTaxonomy,
) -> Result<Vec<ThemeAssignment>, AnalysisError> {
    let text = review.cleaned().trim();
    let keywords = if text.is_empty() {
        Vec::new()
    } else {
        extractor
            .extract_keywords(text)
            .map_err(|e| AnalysisError::KeywordExtraction {
                review_id: review.id.clone(),
                reason: e.to_string(),
            })?
    };

    let mut matched: Vec<Theme> = taxonomy
        .iter()
        .filter(|(_, triggers)| keywords.iter().any(|k| triggers.contains(k)))
        .map(|(theme, _)| theme)
        .collect();
    if matched.is_empty() {
        matched.push(Theme::Other);
    }

    Ok(matched
        .into_iter()
        .map(|theme| ThemeAssignment {
            review_id: review.id.clone(),
            bank: review.bank.clone(),
            theme,
            keywords: keywords.clone(),
            sentiment_label: sentiment.map(|s| s.label),
            sentiment_score: sentiment.map(|s| s.score),
        })
        .collect())
}

/// Reviews tagged between yields in [`tag_reviews_cooperative`].
const TAG_YIELD_EVERY: usize = 16;

/// Tag every review, skipping (and logging) reviews whose extraction fails.
///
/// `sentiments` is matched to reviews by id; pass an empty slice to tag
/// without sentiment and attach it later via [`ThemeTagReport::attach_sentiment`].
pub fn tag_reviews<E: KeywordExtractor + ?Sized>(
    reviews: &[Review],
    sentiments: &[SentimentResult],
    extractor: &E,
    taxonomy: &ThemeTaxonomy,
) -> ThemeTagReport {
    let lookup = sentiment_lookup(sentiments);
    let mut report = ThemeTagReport::default();

    for review in reviews {
        tag_into(&mut report, review, &lookup, extractor, taxonomy);
    }

    log_tagging_complete(reviews.len(), &report);
    report
}

/// Same output as [`tag_reviews`], but yields to the runtime every few
/// reviews so it can share a task with in-flight classification requests.
pub async fn tag_reviews_cooperative<E: KeywordExtractor + ?Sized>(
    reviews: &[Review],
    sentiments: &[SentimentResult],
    extractor: &E,
    taxonomy: &ThemeTaxonomy,
) -> ThemeTagReport {
    let lookup = sentiment_lookup(sentiments);
    let mut report = ThemeTagReport::default();

    for chunk in reviews.chunks(TAG_YIELD_EVERY) {
        for review in chunk {
            tag_into(&mut report, review, &lookup, extractor, taxonomy);
        }
        tokio::task::yield_now().await;
    }

    log_tagging_complete(reviews.len(), &report);
    report
}

fn tag_into<E: KeywordExtractor + ?Sized>(
    report: &mut ThemeTagReport,
    review: &Review,
    lookup: &HashMap<&str, &SentimentResult>,
    extractor: &E,
    taxonomy: &ThemeTaxonomy,
) {
    let sentiment = lookup.get(review.id.as_str()).copied();
    match tag_review(review, sentiment, extractor, taxonomy) {
        Ok(assignments) => report.assignments.extend(assignments),
        Err(e) => {
            tracing::error!(review_id = %review.id, error = %e, "skipping review in theme tagging");
            report.skipped.push(review.id.clone());
        }
    }
}

fn log_tagging_complete(reviews: usize, report: &ThemeTagReport) {
    tracing::info!(
        reviews,
        assignments = report.assignments.len(),
        skipped = report.skipped.len(),
        "theme tagging complete"
    );
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::keywords::LexicalExtractor;
    use crate::types::SentimentLabel;

    fn review(id: &str, cleaned: Option<&str>) -> Review {
        Review {
            id: id.to_string(),
            bank: "BOA".to_string(),
            review_text: cleaned.unwrap_or_default().to_string(),
            cleaned_text: cleaned.map(str::to_string),
            rating: 3,
            date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            source: "Google Play".to_string(),
        }
    }

    fn split_commas(text: &str) -> Result<Vec<String>, AnalysisError> {
        Ok(text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn themes(assignments: &[ThemeAssignment]) -> Vec<Theme> {
        assignments.iter().map(|a| a.theme).collect()
    }

    #[test]
    fn login_and_slow_match_two_themes_without_other() {
        let taxonomy = ThemeTaxonomy::default();
        let assignments =
            tag_review(&review("1", Some("login,slow")), None, &split_commas, &taxonomy).unwrap();
        assert_eq!(
            themes(&assignments),
            vec![Theme::AccountAccess, Theme::AppPerformance]
        );
        for a in &assignments {
            assert_eq!(a.keywords, vec!["login", "slow"]);
        }
    }

    #[test]
    fn no_keywords_yields_single_other() {
        let taxonomy = ThemeTaxonomy::default();
        let assignments = tag_review(&review("1", Some("")), None, &split_commas, &taxonomy).unwrap();
        assert_eq!(themes(&assignments), vec![Theme::Other]);
        assert!(assignments[0].keywords.is_empty());
    }

    #[test]
    fn missing_cleaned_text_yields_other_without_calling_extractor() {
        let taxonomy = ThemeTaxonomy::default();
        let panicking = |_: &str| -> Result<Vec<String>, AnalysisError> {
            panic!("extractor must not be called for blank text")
        };
        let assignments = tag_review(&review("1", None), None, &panicking, &taxonomy).unwrap();
        assert_eq!(themes(&assignments), vec![Theme::Other]);
    }

    #[test]
    fn unmatched_keywords_yield_other_with_keywords_kept() {
        let taxonomy = ThemeTaxonomy::default();
        let assignments =
            tag_review(&review("1", Some("great,experience")), None, &split_commas, &taxonomy)
                .unwrap();
        assert_eq!(themes(&assignments), vec![Theme::Other]);
        assert_eq!(assignments[0].keywords, vec!["great", "experience"]);
    }

    #[test]
    fn full_keyword_list_is_attached_to_every_theme() {
        let taxonomy = ThemeTaxonomy::default();
        let assignments = tag_review(
            &review("1", Some("menu,support,nice")),
            None,
            &split_commas,
            &taxonomy,
        )
        .unwrap();
        assert_eq!(
            themes(&assignments),
            vec![Theme::UserInterface, Theme::CustomerSupport]
        );
        assert!(assignments
            .iter()
            .all(|a| a.keywords == vec!["menu", "support", "nice"]));
    }

    #[test]
    fn sentiment_fields_are_copied_when_present() {
        let taxonomy = ThemeTaxonomy::default();
        let sentiment =
            SentimentResult::new("1".to_string(), SentimentLabel::Negative, 0.9, false);
        let assignments = tag_review(
            &review("1", Some("crash")),
            Some(&sentiment),
            &split_commas,
            &taxonomy,
        )
        .unwrap();
        assert_eq!(assignments[0].sentiment_label, Some(SentimentLabel::Negative));
        assert_eq!(assignments[0].sentiment_score, Some(0.9));
    }

    #[test]
    fn extraction_failure_skips_only_that_review() {
        let taxonomy = ThemeTaxonomy::default();
        let flaky = |text: &str| -> Result<Vec<String>, AnalysisError> {
            if text.contains("boom") {
                Err(AnalysisError::Extractor("parser crashed".to_string()))
            } else {
                split_commas(text)
            }
        };
        let reviews = vec![
            review("a", Some("login")),
            review("b", Some("boom")),
            review("c", Some("")),
        ];
        let report = tag_reviews(&reviews, &[], &flaky, &taxonomy);
        assert_eq!(report.skipped, vec!["b"]);
        assert_eq!(report.assignments.len(), 2);
        assert_eq!(report.assignments[0].theme, Theme::AccountAccess);
        assert_eq!(report.assignments[1].theme, Theme::Other);
        assert_eq!(report.assignments[1].sentiment_label_str(), "UNKNOWN");
    }

    #[test]
    fn attach_sentiment_fills_matching_review_ids() {
        let taxonomy = ThemeTaxonomy::default();
        let reviews = vec![review("a", Some("app crash")), review("b", Some("fine"))];
        let mut report = tag_reviews(&reviews, &[], &LexicalExtractor, &taxonomy);
        let results = vec![SentimentResult::new(
            "a".to_string(),
            SentimentLabel::Negative,
            0.8,
            false,
        )];
        report.attach_sentiment(&results);
        assert_eq!(report.assignments[0].sentiment_label, Some(SentimentLabel::Negative));
        assert_eq!(report.assignments[1].sentiment_label, None);
    }

    #[tokio::test]
    async fn cooperative_tagging_matches_blocking_tagging() {
        let taxonomy = ThemeTaxonomy::default();
        let reviews: Vec<Review> = (0..40)
            .map(|i| {
                let text = if i % 3 == 0 { "slow login" } else { "nice support" };
                review(&i.to_string(), Some(text))
            })
            .collect();
        let sentiments = vec![SentimentResult::new(
            "3".to_string(),
            SentimentLabel::Positive,
            0.7,
            false,
        )];

        let blocking = tag_reviews(&reviews, &sentiments, &LexicalExtractor, &taxonomy);
        let cooperative =
            tag_reviews_cooperative(&reviews, &sentiments, &LexicalExtractor, &taxonomy).await;
        assert_eq!(blocking.assignments, cooperative.assignments);
        assert_eq!(blocking.skipped, cooperative.skipped);
    }

    #[test]
    fn tagging_is_repeatable() {
        let taxonomy = ThemeTaxonomy::default();
        let reviews = vec![
            review("a", Some("slow login transfer menu")),
            review("b", Some("update help")),
        ];
        let first = tag_reviews(&reviews, &[], &LexicalExtractor, &taxonomy);
        let second = tag_reviews(&reviews, &[], &LexicalExtractor, &taxonomy);
        assert_eq!(first.assignments, second.assignments);
        assert_eq!(
            themes(&first.assignments),
            vec![
                Theme::AccountAccess,
                Theme::TransactionIssues,
                Theme::AppPerformance,
                Theme::UserInterface,
                Theme::CustomerSupport,
                Theme::Features,
            ]
        );
    }
}
