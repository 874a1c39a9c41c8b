//! Review theme catalogue and the keyword taxonomy that drives tagging.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Topical theme a review can be tagged with.
///
/// Variant order is the canonical output order: tagging and frequency tables
/// list themes in declaration order, with `Other` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Theme {
    #[serde(rename = "Account Access")]
    AccountAccess,
    #[serde(rename = "Transaction Issues")]
    TransactionIssues,
    #[serde(rename = "App Performance")]
    AppPerformance,
    #[serde(rename = "User Interface")]
    UserInterface,
    #[serde(rename = "Customer Support")]
    CustomerSupport,
    #[serde(rename = "Features")]
    Features,
    /// Fallback for reviews that match no taxonomy theme.
    #[serde(rename = "Other")]
    Other,
}

impl Theme {
    /// Every taxonomy theme, excluding the `Other` fallback.
    pub const TAXONOMY: [Theme; 6] = [
        Theme::AccountAccess,
        Theme::TransactionIssues,
        Theme::AppPerformance,
        Theme::UserInterface,
        Theme::CustomerSupport,
        Theme::Features,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::AccountAccess => "Account Access",
            Theme::TransactionIssues => "Transaction Issues",
            Theme::AppPerformance => "App Performance",
            Theme::UserInterface => "User Interface",
            Theme::CustomerSupport => "Customer Support",
            Theme::Features => "Features",
            Theme::Other => "Other",
        }
    }

    #[must_use]
    pub fn is_other(self) -> bool {
        self == Theme::Other
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const BUILTIN_TRIGGERS: &[(Theme, &[&str])] = &[
    (
        Theme::AccountAccess,
        &[
            "login",
            "password",
            "account",
            "access",
            "authenticate",
            "pin",
            "security",
        ],
    ),
    (
        Theme::TransactionIssues,
        &[
            "transfer",
            "transaction",
            "send",
            "money",
            "payment",
            "failed",
            "stuck",
        ],
    ),
    (
        Theme::AppPerformance,
        &["slow", "crash", "lag", "freeze", "speed", "loading", "hang"],
    ),
    (
        Theme::UserInterface,
        &[
            "interface",
            "ui",
            "design",
            "layout",
            "button",
            "menu",
            "navigation",
        ],
    ),
    (
        Theme::CustomerSupport,
        &[
            "support",
            "help",
            "response",
            "service",
            "contact",
            "complaint",
            "assistance",
        ],
    ),
    (
        Theme::Features,
        &[
            "feature",
            "missing",
            "request",
            "functionality",
            "update",
            "version",
            "option",
        ],
    ),
];

/// Mapping from taxonomy theme to its lower-cased trigger keywords.
///
/// Never contains [`Theme::Other`]; that theme is implied when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeTaxonomy {
    triggers: BTreeMap<Theme, BTreeSet<String>>,
}

impl Default for ThemeTaxonomy {
    fn default() -> Self {
        let triggers = BUILTIN_TRIGGERS
            .iter()
            .map(|(theme, words)| {
                (
                    *theme,
                    words.iter().map(|w| (*w).to_string()).collect::<BTreeSet<_>>(),
                )
            })
            .collect();
        Self { triggers }
    }
}

impl ThemeTaxonomy {
    /// Build a taxonomy from explicit trigger lists.
    ///
    /// Keywords are trimmed and lower-cased.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `Other` is given triggers, a
    /// keyword is blank, or a theme has no keywords.
    pub fn from_triggers<I, K>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (Theme, Vec<K>)>,
        K: AsRef<str>,
    {
        let mut triggers = BTreeMap::new();
        for (theme, keywords) in entries {
            if theme.is_other() {
                return Err(ConfigError::Validation(
                    "theme 'Other' is the fallback and cannot have trigger keywords".to_string(),
                ));
            }
            let mut set = BTreeSet::new();
            for keyword in &keywords {
                let normalized = keyword.as_ref().trim().to_lowercase();
                if normalized.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "theme '{theme}' has a blank trigger keyword"
                    )));
                }
                set.insert(normalized);
            }
            if set.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "theme '{theme}' must list at least one trigger keyword"
                )));
            }
            triggers.insert(theme, set);
        }
        Ok(Self { triggers })
    }

    /// Themes with their trigger sets, in canonical theme order.
    pub fn iter(&self) -> impl Iterator<Item = (Theme, &BTreeSet<String>)> + '_ {
        self.triggers.iter().map(|(theme, set)| (*theme, set))
    }

    #[must_use]
    pub fn triggers(&self, theme: Theme) -> Option<&BTreeSet<String>> {
        self.triggers.get(&theme)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    themes: BTreeMap<Theme, Vec<String>>,
}

/// Load a taxonomy override from a YAML file of the form
/// `themes: { "Account Access": [login, ...], ... }`.
///
/// The file replaces the built-in taxonomy; themes it omits are never matched.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_taxonomy(path: &Path) -> Result<ThemeTaxonomy, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TaxonomyFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_taxonomy(&content)
}

fn parse_taxonomy(content: &str) -> Result<ThemeTaxonomy, ConfigError> {
    let file: TaxonomyFile =
        serde_yaml::from_str(content).map_err(ConfigError::TaxonomyFileParse)?;
    ThemeTaxonomy::from_triggers(file.themes)
}
