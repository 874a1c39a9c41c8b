//! TEI (Text Embeddings Inference) client for sequence classification.
//!
//! Talks to a TEI deployment serving a sentiment model (for example
//! `distilbert-base-uncased-finetuned-sst-2-english`) through its `/predict`
//! endpoint.
//!
//! TEI reads a two-element `inputs` array as one sentence pair rather than a
//! batch of two, so two-text batches are sent as two single-text requests.

use std::time::Duration;

use bankpulse_core::AppConfig;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::classifier::BatchClassifier;
use crate::error::AnalysisError;
use crate::retry::retry_with_backoff;
use crate::types::RawPrediction;

const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

#[derive(Serialize)]
struct PredictRequest<'a> {
    inputs: &'a [String],
    truncate: bool,
}

/// One entry of TEI's per-input ranking.
#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// TEI HTTP classifier.
#[derive(Debug, Clone)]
pub struct TeiClassifier {
    client: reqwest::Client,
    url: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl TeiClassifier {
    /// Create a client for the TEI server at `tei_url`.
    #[must_use]
    pub fn new(tei_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/predict", tei_url.trim_end_matches('/')),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        }
    }

    /// Create a client from `BANKPULSE_CLASSIFIER_*` settings.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Classifier`] if no classifier URL is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, AnalysisError> {
        let url = config.classifier_url.as_deref().ok_or_else(|| {
            AnalysisError::Classifier("BANKPULSE_CLASSIFIER_URL is not set".to_string())
        })?;
        Ok(Self::new(url).with_retries(
            config.classifier_max_retries,
            config.classifier_retry_backoff_ms,
        ))
    }

    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Classify `texts`, splitting a two-text batch so TEI cannot read it as a
    /// sentence pair.
    async fn predict(&self, texts: &[String]) -> Result<Vec<RawPrediction>, AnalysisError> {
        if texts.len() != 2 {
            return self.predict_once(texts).await;
        }
        let mut predictions = Vec::with_capacity(2);
        for text in texts.chunks(1) {
            predictions.extend(self.predict_once(text).await?);
        }
        Ok(predictions)
    }

    /// One `/predict` round trip, keeping the top-ranked label per input.
    async fn predict_once(&self, texts: &[String]) -> Result<Vec<RawPrediction>, AnalysisError> {
        let request = PredictRequest {
            inputs: texts,
            truncate: true,
        };
        let response = self.client.post(&self.url).json(&request).send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(AnalysisError::Overloaded { retry_after });
        }
        let response = response.error_for_status()?;

        let rankings: Vec<Vec<LabelScore>> = response.json().await?;

        if rankings.len() != texts.len() {
            return Err(AnalysisError::Classifier(format!(
                "TEI returned {} predictions for {} inputs",
                rankings.len(),
                texts.len()
            )));
        }

        rankings
            .into_iter()
            .map(|ranking| {
                ranking
                    .into_iter()
                    .reduce(|best, next| if next.score > best.score { next } else { best })
                    .map(|top| RawPrediction::new(top.label, top.score))
                    .ok_or_else(|| {
                        AnalysisError::Classifier("TEI returned an empty ranking".to_string())
                    })
            })
            .collect()
    }
}

impl BatchClassifier for TeiClassifier {
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<RawPrediction>, AnalysisError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || self.predict(texts)).await
    }
}
