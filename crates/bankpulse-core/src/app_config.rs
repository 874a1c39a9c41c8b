use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Whether log lines carry ANSI colour codes. Production logs are plain text.
    #[must_use]
    pub fn ansi_logs(&self) -> bool {
        !matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Reviews per classifier call. Always at least 1.
    pub batch_size: usize,
    /// Upper bound on classifier calls in flight at once. Always at least 1.
    pub max_concurrent_batches: usize,
    pub batch_timeout_secs: u64,
    /// Base URL of a TEI `/predict` deployment, if a remote classifier is used.
    pub classifier_url: Option<String>,
    pub classifier_max_retries: u32,
    pub classifier_retry_backoff_ms: u64,
    /// Optional YAML override for the built-in theme taxonomy.
    pub taxonomy_path: Option<PathBuf>,
}

impl AppConfig {
    #[must_use]
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("batch_size", &self.batch_size)
            .field("max_concurrent_batches", &self.max_concurrent_batches)
            .field("batch_timeout_secs", &self.batch_timeout_secs)
            .field(
                "classifier_url",
                &self.classifier_url.as_ref().map(|_| "[redacted]"),
            )
            .field("classifier_max_retries", &self.classifier_max_retries)
            .field(
                "classifier_retry_backoff_ms",
                &self.classifier_retry_backoff_ms,
            )
            .field("taxonomy_path", &self.taxonomy_path)
            .finish()
    }
}
