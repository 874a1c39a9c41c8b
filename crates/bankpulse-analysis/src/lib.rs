//! Review analysis pipeline for bankpulse.
//!
//! Classifies review sentiment in fault-isolated batches through a pluggable
//! [`BatchClassifier`], tags reviews with taxonomy themes from extracted
//! keywords, and reduces both into per-bank summary tables.

pub mod aggregate;
pub mod classifier;
pub mod error;
pub mod insights;
pub mod keywords;
pub mod lexicon;
pub mod normalize;
pub mod pipeline;
pub mod tagger;
pub mod tei;
pub mod types;

mod retry;
mod stopwords;

pub use aggregate::{aggregate_sentiment, aggregate_themes};
pub use classifier::{classify, BatchClassifier, ClassifyOptions};
pub use error::AnalysisError;
pub use insights::{bank_insights, BankInsight};
pub use keywords::{KeywordExtractor, LexicalExtractor};
pub use lexicon::LexiconClassifier;
pub use normalize::clean_text;
pub use pipeline::{run_analysis, AnalysisReport};
pub use tagger::{tag_review, tag_reviews, tag_reviews_cooperative, ThemeTagReport};
pub use tei::TeiClassifier;
pub use types::{
    BankSentimentSummary, RawPrediction, SentimentLabel, SentimentReport, SentimentResult,
    SentimentSummary, ThemeAssignment, ThemeFrequencyTable,
};
