mod analyze;
mod clean;
mod input;
mod insights;
mod output;

use std::path::PathBuf;

use bankpulse_core::AppConfig;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bankpulse")]
#[command(about = "Sentiment and theme analysis for banking app reviews")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Sentiment backend used by `analyze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClassifierKind {
    /// Built-in word lexicon; needs no model server
    Lexicon,
    /// TEI `/predict` endpoint at `BANKPULSE_CLASSIFIER_URL`
    Remote,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify sentiment, tag themes, and write summary CSVs
    Analyze {
        /// Reviews CSV (`review`, `rating`, `date`, `bank` columns)
        #[arg(long)]
        input: PathBuf,

        /// Directory that receives the output CSVs
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        #[arg(long, value_enum, default_value_t = ClassifierKind::Lexicon)]
        classifier: ClassifierKind,

        /// Overrides `BANKPULSE_BATCH_SIZE`
        #[arg(long)]
        batch_size: Option<usize>,

        /// Load and validate input, then report what would run
        #[arg(long)]
        dry_run: bool,
    },
    /// Add a `cleaned_review` column to a reviews CSV
    Clean {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },
    /// Print satisfaction drivers and pain points per bank
    Insights {
        #[arg(long)]
        input: PathBuf,

        /// Bank to report on; repeat for several. Defaults to every bank.
        #[arg(long)]
        bank: Vec<String>,

        /// Words to show per list
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

/// Only `analyze` reads `BANKPULSE_*` settings; the file-only commands run
/// without them.
fn needs_app_config(command: &Commands) -> bool {
    matches!(command, Commands::Analyze { .. })
}

/// `RUST_LOG` wins over `BANKPULSE_LOG_LEVEL`; without an app config the
/// level is `info` with colour on.
fn init_tracing(config: Option<&AppConfig>) -> anyhow::Result<()> {
    let default_level = config.map_or("info", |c| c.log_level.as_str());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(config.is_none_or(|c| c.env.ansi_logs()))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.command {
        Some(command) if needs_app_config(command) => Some(bankpulse_core::load_app_config()?),
        _ => None,
    };
    init_tracing(config.as_ref())?;

    match cli.command {
        Some(Commands::Analyze {
            input,
            output_dir,
            classifier,
            batch_size,
            dry_run,
        }) => {
            let config = match config {
                Some(config) => config,
                None => bankpulse_core::load_app_config()?,
            };
            analyze::run_analyze(
                &config,
                &analyze::AnalyzeArgs {
                    input,
                    output_dir,
                    classifier,
                    batch_size,
                    dry_run,
                },
            )
            .await?;
        }
        Some(Commands::Clean { input, output }) => clean::run_clean(&input, &output)?,
        Some(Commands::Insights { input, bank, top }) => {
            insights::run_insights(&input, &bank, top)?;
        }
        None => println!("bankpulse: no command given; run `bankpulse --help` for usage"),
    }

    Ok(())
}
