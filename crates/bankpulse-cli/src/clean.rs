//! `clean` command: add a `cleaned_review` column to a reviews CSV.

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::Context;
use bankpulse_analysis::clean_text;

const CLEANED_COLUMN: &str = "cleaned_review";

pub(crate) fn run_clean(input: &Path, output: &Path) -> anyhow::Result<()> {
    let reader =
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let writer =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;

    let rows = clean_csv(reader, writer)?;
    println!("cleaned {rows} reviews -> {}", output.display());
    Ok(())
}

/// Copy every row, filling `cleaned_review` from the `review` column.
///
/// An existing `cleaned_review` column is overwritten in place; otherwise the
/// column is appended. Returns the number of data rows written.
pub(crate) fn clean_csv<R: io::Read, W: io::Write>(input: R, output: W) -> anyhow::Result<usize> {
    let mut reader = csv::Reader::from_reader(input);
    let mut headers = reader.headers().context("failed to read CSV header")?.clone();

    let review_idx = headers
        .iter()
        .position(|h| h.trim() == "review")
        .ok_or_else(|| anyhow::anyhow!("input is missing required column 'review'"))?;
    let cleaned_idx = headers.iter().position(|h| h.trim() == CLEANED_COLUMN);
    if cleaned_idx.is_none() {
        headers.push_field(CLEANED_COLUMN);
    }

    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(&headers)?;

    let mut rows = 0usize;
    for result in reader.records() {
        let record = result?;
        let cleaned = clean_text(record.get(review_idx).unwrap_or_default());

        let out: csv::StringRecord = match cleaned_idx {
            Some(idx) => record
                .iter()
                .enumerate()
                .map(|(i, field)| if i == idx { cleaned.as_str() } else { field })
                .collect(),
            None => record.iter().chain(std::iter::once(cleaned.as_str())).collect(),
        };
        writer.write_record(&out)?;
        rows += 1;
    }

    writer.flush()?;
    tracing::info!(rows, "cleaned reviews written");
    Ok(rows)
}
