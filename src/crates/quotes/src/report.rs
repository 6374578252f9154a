//! Top-performer selection and report output.
//!
//! Maps the retry-wrapped daily-change fetch over a symbol universe,
//! picks the day's best performer and renders its recent history as a
//! markdown sample table plus a CSV file.

use crate::client::{DailyBar, DailyChange, QuoteClient};
use crate::error::{QuoteError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tabled::settings::Style;
use tabled::Table;
use taskpool::{run_concurrently, wrap_with_retry, RetryPolicy, TaskBatch};

/// Report for the best-performing symbol of the day.
#[derive(Debug, Clone)]
pub struct TopPerformer {
    /// Winning ticker symbol.
    pub symbol: String,

    /// Open-to-close percentage change.
    pub percent_change: f64,

    /// Markdown table with the first rows of the recent history.
    pub sample_markdown: String,

    /// Where the full history CSV was written.
    pub csv_path: PathBuf,
}

/// Load ticker symbols from a Nasdaq-100 style CSV file.
///
/// The file must carry a header row with a `Ticker` column; every other
/// column is ignored.
pub fn load_symbols(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let raw = fs::read_to_string(&path)?;
    let mut lines = raw.lines();

    let header = lines
        .next()
        .ok_or_else(|| QuoteError::SymbolFile("file is empty".to_string()))?;
    let column = header
        .split(',')
        .position(|name| name.trim() == "Ticker")
        .ok_or_else(|| QuoteError::SymbolFile("no Ticker column in header".to_string()))?;

    Ok(lines
        .filter_map(|line| line.split(',').nth(column))
        .map(|symbol| symbol.trim().to_string())
        .filter(|symbol| !symbol.is_empty())
        .collect())
}

/// Render the first five bars as a markdown table.
pub fn markdown_table(bars: &[DailyBar]) -> String {
    let sample: Vec<&DailyBar> = bars.iter().take(5).collect();
    Table::new(sample).with(Style::markdown()).to_string()
}

/// Write the full history as a CSV file, creating parent directories.
pub fn write_csv(path: &Path, bars: &[DailyBar]) -> Result<()> {
    let mut out = String::from("Date,Open,High,Low,Close,Volume\n");
    for bar in bars {
        out.push_str(&format!(
            "{},{:.6},{:.6},{:.6},{:.6},{}\n",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, out)?;
    Ok(())
}

/// Pick the highest-percentage change, skipping omitted entries.
///
/// Omissions are the fallback a retry-wrapped fetch leaves behind for a
/// symbol that stayed unreachable; they shrink the candidate set without
/// affecting the ranking of the rest.
fn best_change(changes: Vec<Option<DailyChange>>) -> Result<DailyChange> {
    changes
        .into_iter()
        .flatten()
        .max_by(|a, b| a.percent_change.total_cmp(&b.percent_change))
        .ok_or(QuoteError::NoUsableQuotes)
}

/// Find the day's top performer across `symbols` and build its report.
///
/// Each symbol's daily change is fetched through retry (3 attempts,
/// fallback = omit), fanned out over the default worker pool. Symbols
/// that stay unreachable are dropped from the ranking; the result list
/// still aligns one-to-one with the input, so a partial outage shrinks
/// the candidate set without aborting the run. The winner's `days`-day
/// history lands in `output_dir` as CSV.
pub async fn top_performer(
    client: &QuoteClient,
    symbols: Vec<String>,
    days: u32,
    output_dir: impl AsRef<Path>,
) -> Result<TopPerformer> {
    let fetch_client = client.clone();
    let fetch = wrap_with_retry(
        "fetch_daily_change",
        RetryPolicy::new(3),
        None,
        move |symbol: String| {
            let client = fetch_client.clone();
            async move { client.daily_change(&symbol).await.map(Some) }
        },
    );

    let changes = run_concurrently(
        fetch,
        TaskBatch::new(symbols).with_label("fetching daily quotes"),
    )
    .await?;

    let winner = best_change(changes)?;

    tracing::info!(
        symbol = %winner.symbol,
        percent_change = winner.percent_change,
        "top performer selected"
    );

    let bars = client.history(&winner.symbol, days).await?;
    let sample_markdown = markdown_table(&bars);

    let csv_path = output_dir.as_ref().join(format!(
        "{}_performance_in_the_past_{}_days.csv",
        winner.symbol.to_lowercase(),
        days
    ));
    write_csv(&csv_path, &bars)?;

    Ok(TopPerformer {
        symbol: winner.symbol,
        percent_change: winner.percent_change,
        sample_markdown,
        csv_path,
    })
}
