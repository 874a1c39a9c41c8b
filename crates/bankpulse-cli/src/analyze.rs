//! `analyze` command handler.

use std::collections::BTreeSet;
use std::path::PathBuf;

use bankpulse_analysis::{
    run_analysis, AnalysisReport, ClassifyOptions, LexicalExtractor, LexiconClassifier,
    TeiClassifier,
};
use bankpulse_core::{load_taxonomy, AppConfig, ThemeTaxonomy};

use crate::input::load_reviews;
use crate::output::write_outputs;
use crate::ClassifierKind;

#[derive(Debug)]
pub(crate) struct AnalyzeArgs {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub classifier: ClassifierKind,
    pub batch_size: Option<usize>,
    pub dry_run: bool,
}

/// Load reviews, run the analysis pipeline, write result CSVs, and print summaries.
///
/// When `dry_run` is set, reports what would run and returns before any
/// classifier call or file write.
///
/// # Errors
///
/// Returns an error if the input or taxonomy cannot be loaded, the remote
/// classifier is not configured, the sentiment stage fails as a whole, or an
/// output file cannot be written.
pub(crate) async fn run_analyze(config: &AppConfig, args: &AnalyzeArgs) -> anyhow::Result<()> {
    let reviews = load_reviews(&args.input)?;
    if reviews.is_empty() {
        println!(
            "no valid reviews in {}; nothing to analyze",
            args.input.display()
        );
        return Ok(());
    }

    let taxonomy = match &config.taxonomy_path {
        Some(path) => load_taxonomy(path)?,
        None => ThemeTaxonomy::default(),
    };

    let mut options = ClassifyOptions::from_config(config);
    if let Some(batch_size) = args.batch_size {
        options = options.with_batch_size(batch_size);
    }

    if args.dry_run {
        let banks: BTreeSet<&str> = reviews.iter().map(|r| r.bank.as_str()).collect();
        println!(
            "dry-run: would analyze {} reviews across {} banks [{}] in batches of {} with the {:?} classifier",
            reviews.len(),
            banks.len(),
            banks.into_iter().collect::<Vec<_>>().join(", "),
            options.batch_size,
            args.classifier,
        );
        return Ok(());
    }

    let report = match args.classifier {
        ClassifierKind::Lexicon => {
            run_analysis(
                &reviews,
                &LexiconClassifier,
                &LexicalExtractor,
                &taxonomy,
                &options,
            )
            .await?
        }
        ClassifierKind::Remote => {
            let classifier = TeiClassifier::from_config(config)?;
            run_analysis(&reviews, &classifier, &LexicalExtractor, &taxonomy, &options).await?
        }
    };

    write_outputs(&args.output_dir, &reviews, &report)?;
    print_summary(&report);
    println!("results written to {}", args.output_dir.display());

    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    println!("{:<20}{:<10}MEAN_SENTIMENT", "BANK", "REVIEWS");
    for bank in &report.sentiment_summary.banks {
        println!(
            "{:<20}{:<10}{:.3}",
            bank.bank, bank.review_count, bank.mean_sentiment_numeric
        );
    }
    println!();

    let table = &report.theme_table;
    if !table.is_empty() {
        print!("{:<20}", "BANK");
        for theme in table.themes() {
            print!("{:<20}", theme.as_str().to_uppercase());
        }
        println!();
        for bank in table.banks() {
            print!("{bank:<20}");
            for theme in table.themes() {
                print!("{:<20}", table.get(bank, *theme).unwrap_or(0));
            }
            println!();
        }
        println!();
    }

    println!(
        "{} reviews classified ({} degraded in {} failed batches); {} skipped in theme tagging",
        report.sentiment.results.len(),
        report.degraded_count(),
        report.sentiment.failed_batches.len(),
        report.skipped_count(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{
        BANK_SENTIMENT, RATING_SENTIMENT, REVIEWS_WITH_SENTIMENT, REVIEW_THEMES,
        THEME_DISTRIBUTION,
    };

    const INPUT: &str = "review,rating,date,bank\n\
                         App crash and freeze,1,2025-05-20,BOA\n\
                         Great login experience,5,2025-05-21,BOA\n\
                         Easy transfer,4,2025-05-22,CBE\n";

    fn config() -> AppConfig {
        AppConfig {
            env: bankpulse_core::Environment::Test,
            log_level: "info".to_string(),
            batch_size: 2,
            max_concurrent_batches: 2,
            batch_timeout_secs: 5,
            classifier_url: None,
            classifier_max_retries: 0,
            classifier_retry_backoff_ms: 0,
            taxonomy_path: None,
        }
    }

    fn args(dir: &std::path::Path, classifier: ClassifierKind, dry_run: bool) -> AnalyzeArgs {
        let input = dir.join("reviews.csv");
        std::fs::write(&input, INPUT).unwrap();
        AnalyzeArgs {
            input,
            output_dir: dir.join("out"),
            classifier,
            batch_size: None,
            dry_run,
        }
    }

    #[tokio::test]
    async fn lexicon_run_writes_every_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), ClassifierKind::Lexicon, false);

        run_analyze(&config(), &args).await.unwrap();

        for name in [
            REVIEWS_WITH_SENTIMENT,
            REVIEW_THEMES,
            BANK_SENTIMENT,
            RATING_SENTIMENT,
            THEME_DISTRIBUTION,
        ] {
            assert!(args.output_dir.join(name).exists(), "{name} not written");
        }

        let banks = std::fs::read_to_string(args.output_dir.join(BANK_SENTIMENT)).unwrap();
        assert_eq!(
            banks,
            "bank,mean_sentiment_numeric,review_count\nBOA,0.5000,2\nCBE,1.0000,1\n"
        );
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), ClassifierKind::Lexicon, true);

        run_analyze(&config(), &args).await.unwrap();

        assert!(!args.output_dir.exists());
    }

    #[tokio::test]
    async fn remote_without_url_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), ClassifierKind::Remote, false);

        let err = run_analyze(&config(), &args).await.unwrap_err();
        assert!(
            err.to_string().contains("BANKPULSE_CLASSIFIER_URL"),
            "got: {err}"
        );
    }
}
