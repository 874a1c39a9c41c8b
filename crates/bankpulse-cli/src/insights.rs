//! `insights` command handler.

use std::collections::BTreeSet;
use std::path::Path;

use bankpulse_analysis::{bank_insights, BankInsight};

use crate::input::load_reviews;

/// Print drivers and pain points for each requested bank, or every bank when
/// `banks` is empty.
///
/// # Errors
///
/// Returns an error if the input CSV cannot be loaded.
pub(crate) fn run_insights(input: &Path, banks: &[String], top: usize) -> anyhow::Result<()> {
    let reviews = load_reviews(input)?;

    let targets: Vec<String> = if banks.is_empty() {
        reviews
            .iter()
            .map(|r| r.bank.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    } else {
        banks.to_vec()
    };

    if targets.is_empty() {
        println!("no reviews in {}; nothing to report", input.display());
        return Ok(());
    }

    for bank in &targets {
        match bank_insights(&reviews, bank, top) {
            Some(insight) => print!("{}", render_insight(&insight)),
            None => println!("no reviews found for bank '{bank}'\n"),
        }
    }

    Ok(())
}

fn render_insight(insight: &BankInsight) -> String {
    let mut out = format!("## {}\n", insight.bank);
    out.push_str(&render_list("Drivers", &insight.drivers));
    out.push_str(&render_list("Pain points", &insight.pain_points));
    out.push('\n');
    out
}

fn render_list(title: &str, words: &[(String, usize)]) -> String {
    if words.is_empty() {
        return format!("{title}: none\n");
    }
    let items: Vec<String> = words
        .iter()
        .map(|(word, count)| format!("{word} ({count})"))
        .collect();
    format!("{title}: {}\n", items.join(", "))
}
