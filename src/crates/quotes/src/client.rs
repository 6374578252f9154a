//! Chart-API client for daily quote data.
//!
//! Fetches OHLCV bars from a Yahoo-style chart endpoint and derives the
//! intraday percentage change used for performance ranking.

use crate::error::{QuoteError, Result};
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tabled::Tabled;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Configuration for the chart-API client.
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// Base URL of the chart API.
    pub base_url: String,

    /// Request timeout duration.
    pub timeout: Duration,
}

impl QuoteConfig {
    /// Create a configuration pointing at the public chart endpoint.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: default_timeout(),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Intraday percentage change for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChange {
    /// Ticker symbol.
    pub symbol: String,

    /// Percentage change from open to close.
    pub percent_change: f64,
}

/// One day of OHLCV data.
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct DailyBar {
    /// Trading date.
    #[tabled(rename = "Date")]
    pub date: NaiveDate,

    /// Opening price.
    #[tabled(rename = "Open")]
    pub open: f64,

    /// Daily high.
    #[tabled(rename = "High")]
    pub high: f64,

    /// Daily low.
    #[tabled(rename = "Low")]
    pub low: f64,

    /// Closing price.
    #[tabled(rename = "Close")]
    pub close: f64,

    /// Traded volume.
    #[tabled(rename = "Volume")]
    pub volume: u64,
}

// Chart API wire types. Bars with halted trading come back as nulls, so
// every series is a vector of options.

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

fn percent_change(open: f64, close: f64) -> f64 {
    (close - open) / open * 100.0
}

fn change_from_chart(symbol: &str, result: &ChartResult) -> Result<DailyChange> {
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| QuoteError::NoData(symbol.to_string()))?;

    let open = quote
        .open
        .first()
        .copied()
        .flatten()
        .ok_or_else(|| QuoteError::NoData(symbol.to_string()))?;
    let close = quote
        .close
        .first()
        .copied()
        .flatten()
        .ok_or_else(|| QuoteError::NoData(symbol.to_string()))?;

    Ok(DailyChange {
        symbol: symbol.to_string(),
        percent_change: percent_change(open, close),
    })
}

fn bars_from_chart(result: &ChartResult) -> Vec<DailyBar> {
    let Some(quote) = result.indicators.quote.first() else {
        return Vec::new();
    };

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (index, seconds) in result.timestamp.iter().enumerate() {
        let Some(date) = DateTime::from_timestamp(*seconds, 0).map(|ts| ts.date_naive()) else {
            continue;
        };

        let series = (
            quote.open.get(index).copied().flatten(),
            quote.high.get(index).copied().flatten(),
            quote.low.get(index).copied().flatten(),
            quote.close.get(index).copied().flatten(),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = series else {
            continue;
        };

        bars.push(DailyBar {
            date,
            open,
            high,
            low,
            close,
            volume: quote.volume.get(index).copied().flatten().unwrap_or(0),
        });
    }

    bars
}

/// Client for the chart API.
#[derive(Debug, Clone)]
pub struct QuoteClient {
    config: QuoteConfig,
    client: Client,
}

impl QuoteClient {
    /// Create a new client with the given configuration.
    pub fn new(config: QuoteConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    async fn chart(&self, symbol: &str, range_days: u32) -> Result<ChartResult> {
        let url = format!("{}/v8/finance/chart/{}", self.config.base_url, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[("range", format!("{}d", range_days)), ("interval", "1d".to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(QuoteError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChartResponse = response
            .json()
            .await
            .map_err(|e| QuoteError::InvalidResponse(e.to_string()))?;

        parsed
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| QuoteError::NoData(symbol.to_string()))
    }

    /// Fetch today's open-to-close percentage change for `symbol`.
    pub async fn daily_change(&self, symbol: &str) -> Result<DailyChange> {
        let result = self.chart(symbol, 1).await?;
        change_from_chart(symbol, &result)
    }

    /// Fetch `days` days of OHLCV bars for `symbol`.
    pub async fn history(&self, symbol: &str, days: u32) -> Result<Vec<DailyBar>> {
        let result = self.chart(symbol, days).await?;
        let bars = bars_from_chart(&result);

        if bars.is_empty() {
            return Err(QuoteError::NoData(symbol.to_string()));
        }
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_chart() -> ChartResult {
        let body = json!({
            "timestamp": [1722600000, 1722686400, 1722945600],
            "indicators": {
                "quote": [
                    {
                        "open": [100.0, 102.5, null],
                        "high": [104.0, 103.0, 105.0],
                        "low": [99.0, 101.0, 102.0],
                        "close": [102.0, 101.5, 104.5],
                        "volume": [1_200_000, 900_000, null]
                    }
                ]
            }
        });

        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_percent_change_arithmetic() {
        assert_eq!(percent_change(100.0, 102.0), 2.0);
        assert_eq!(percent_change(200.0, 150.0), -25.0);
    }

    #[test]
    fn test_change_from_chart_uses_first_bar() {
        let chart = sample_chart();
        let change = change_from_chart("AAPL", &chart).unwrap();

        assert_eq!(change.symbol, "AAPL");
        assert_eq!(change.percent_change, 2.0);
    }

    #[test]
    fn test_change_from_chart_rejects_missing_series() {
        let body = json!({
            "timestamp": [],
            "indicators": {"quote": [{"open": [], "close": []}]}
        });
        let chart: ChartResult = serde_json::from_value(body).unwrap();

        assert!(matches!(
            change_from_chart("EMPTY", &chart),
            Err(QuoteError::NoData(_))
        ));
    }

    #[test]
    fn test_bars_skip_null_entries() {
        let chart = sample_chart();
        let bars = bars_from_chart(&chart);

        // The third bar has a null open and is dropped.
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].volume, 1_200_000);
        assert_eq!(bars[1].close, 101.5);
    }

    #[test]
    fn test_bar_dates_come_from_timestamps() {
        let chart = sample_chart();
        let bars = bars_from_chart(&chart);

        assert_eq!(bars[0].date.to_string(), "2024-08-02");
    }

    #[tokio::test]
    async fn test_daily_change_surfaces_connection_errors() {
        // Nothing listens on the discard port, so the request fails fast.
        let config = QuoteConfig::new()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_millis(250));
        let client = QuoteClient::new(config);

        let result = client.daily_change("AAPL").await;
        assert!(matches!(result, Err(QuoteError::Http(_))));
    }

    #[test]
    fn test_null_chart_result_is_rejected() {
        let body = json!({"chart": {"result": null, "error": {"code": "Not Found"}}});
        let parsed: ChartResponse = serde_json::from_value(body).unwrap();

        assert!(parsed.chart.result.is_none());
    }
}
