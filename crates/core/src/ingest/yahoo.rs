use crate::config::Settings;
use crate::ingest::provider::{validate_snapshot, QuoteProvider};
use crate::ingest::types::FinancialSnapshot;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const QUOTE_SUMMARY_PATH: &str = "/v10/finance/quoteSummary";

// price: regular market price; financialData: FCF, growth, debt, cash;
// defaultKeyStatistics: shares outstanding; summaryDetail: trailing P/E.
const MODULES: &str = "price,financialData,defaultKeyStatistics,summaryDetail";

/// Unauthenticated client for the Yahoo quoteSummary endpoint.
///
/// One request per symbol, no retries and no backoff; the per-request timeout
/// is the only hardening. Base URL and timeout are env-overridable so tests
/// and mirrors can point it elsewhere.
#[derive(Debug, Clone)]
pub struct YahooQuoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl YahooQuoteClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .quote_api_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = settings
            .quote_api_timeout_secs
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("fairval/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build quote http client")?;

        Ok(Self { http, base_url })
    }

    fn url(&self, symbol: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url.trim_end_matches('/'),
            QUOTE_SUMMARY_PATH,
            symbol
        )
    }
}

#[async_trait::async_trait]
impl QuoteProvider for YahooQuoteClient {
    fn provider_name(&self) -> &'static str {
        "yahoo_quote_summary"
    }

    async fn fetch_snapshot(&self, symbol: &str) -> Result<FinancialSnapshot> {
        anyhow::ensure!(!symbol.trim().is_empty(), "symbol must be non-empty");

        let res = self
            .http
            .get(self.url(symbol))
            .query(&[("modules", MODULES)])
            .send()
            .await
            .with_context(|| format!("quote request failed for {symbol}"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read quote response for {symbol}"))?;

        if !status.is_success() {
            anyhow::bail!("quote HTTP {status} for {symbol}: {text}");
        }

        let envelope = serde_json::from_str::<QuoteSummaryEnvelope>(&text)
            .with_context(|| format!("quote response for {symbol} is not valid JSON: {text}"))?;

        let snapshot = snapshot_from_envelope(symbol, envelope, Utc::now())?;
        validate_snapshot(&snapshot)?;

        tracing::debug!(
            symbol,
            price = snapshot.price,
            trailing_pe = ?snapshot.trailing_pe,
            "fetched quote summary"
        );
        Ok(snapshot)
    }
}

fn snapshot_from_envelope(
    symbol: &str,
    envelope: QuoteSummaryEnvelope,
    fetched_at: DateTime<Utc>,
) -> Result<FinancialSnapshot> {
    let body = envelope.quote_summary;
    if let Some(err) = body.error {
        if !err.is_null() {
            anyhow::bail!("quote provider error for {symbol}: {err}");
        }
    }

    let result = body
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .with_context(|| format!("quote response for {symbol} has no result"))?;

    let price_module = result
        .price
        .with_context(|| format!("price module missing for {symbol}"))?;
    let financial = result
        .financial_data
        .with_context(|| format!("financialData module missing for {symbol}"))?;
    let statistics = result
        .default_key_statistics
        .with_context(|| format!("defaultKeyStatistics module missing for {symbol}"))?;
    let summary = result.summary_detail.unwrap_or_default();

    let price = price_module
        .regular_market_price
        .raw
        .with_context(|| format!("regular market price missing for {symbol}"))?;
    let free_cash_flow = financial
        .free_cashflow
        .raw
        .with_context(|| format!("free cash flow missing for {symbol}"))?;
    let shares_outstanding = statistics
        .shares_outstanding
        .raw
        .with_context(|| format!("shares outstanding missing for {symbol}"))?;

    Ok(FinancialSnapshot {
        symbol: symbol.to_string(),
        price,
        free_cash_flow,
        shares_outstanding,
        growth_estimate: financial.earnings_growth.raw,
        trailing_pe: summary.trailing_pe.raw,
        total_debt: financial.total_debt.raw,
        total_cash: financial.total_cash.raw,
        fetched_at,
    })
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(rename = "financialData", default)]
    financial_data: Option<FinancialDataModule>,
    #[serde(rename = "defaultKeyStatistics", default)]
    default_key_statistics: Option<KeyStatisticsModule>,
    #[serde(rename = "summaryDetail", default)]
    summary_detail: Option<SummaryDetailModule>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceModule {
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: WrappedNumber,
}

#[derive(Debug, Default, Deserialize)]
struct FinancialDataModule {
    #[serde(rename = "freeCashflow", default)]
    free_cashflow: WrappedNumber,
    #[serde(rename = "earningsGrowth", default)]
    earnings_growth: WrappedNumber,
    #[serde(rename = "totalDebt", default)]
    total_debt: WrappedNumber,
    #[serde(rename = "totalCash", default)]
    total_cash: WrappedNumber,
}

#[derive(Debug, Default, Deserialize)]
struct KeyStatisticsModule {
    #[serde(rename = "sharesOutstanding", default)]
    shares_outstanding: WrappedNumber,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDetailModule {
    #[serde(rename = "trailingPE", default)]
    trailing_pe: WrappedNumber,
}

/// Yahoo wraps numbers as `{"raw": 123.4, "fmt": "123.40"}` and ships an
/// empty object `{}` when a figure is unavailable.
#[derive(Debug, Default, Deserialize)]
struct WrappedNumber {
    #[serde(default)]
    raw: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fetched_at() -> DateTime<Utc> {
        Utc::now()
    }

    fn full_envelope() -> Value {
        json!({
            "quoteSummary": {
                "result": [
                    {
                        "price": {"regularMarketPrice": {"raw": 212.5, "fmt": "212.50"}},
                        "financialData": {
                            "freeCashflow": {"raw": 9.8e10, "fmt": "98B"},
                            "earningsGrowth": {"raw": 0.081, "fmt": "8.10%"},
                            "totalDebt": {"raw": 1.0e11, "fmt": "100B"},
                            "totalCash": {"raw": 6.0e10, "fmt": "60B"}
                        },
                        "defaultKeyStatistics": {
                            "sharesOutstanding": {"raw": 1.5e10, "fmt": "15B"}
                        },
                        "summaryDetail": {"trailingPE": {"raw": 32.1, "fmt": "32.10"}}
                    }
                ],
                "error": null
            }
        })
    }

    #[test]
    fn parses_full_quote_summary() {
        let envelope: QuoteSummaryEnvelope = serde_json::from_value(full_envelope()).unwrap();
        let snap = snapshot_from_envelope("AAPL", envelope, fetched_at()).unwrap();

        assert_eq!(snap.symbol, "AAPL");
        assert_eq!(snap.price, 212.5);
        assert_eq!(snap.free_cash_flow, 9.8e10);
        assert_eq!(snap.shares_outstanding, 1.5e10);
        assert_eq!(snap.growth_estimate, Some(0.081));
        assert_eq!(snap.trailing_pe, Some(32.1));
        assert_eq!(snap.total_debt, Some(1.0e11));
        assert_eq!(snap.total_cash, Some(6.0e10));
    }

    #[test]
    fn absent_trailing_pe_maps_to_none() {
        let mut v = full_envelope();
        v["quoteSummary"]["result"][0]["summaryDetail"] = json!({"trailingPE": {}});
        let envelope: QuoteSummaryEnvelope = serde_json::from_value(v).unwrap();
        let snap = snapshot_from_envelope("BRK-A", envelope, fetched_at()).unwrap();
        assert_eq!(snap.trailing_pe, None);
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let mut v = full_envelope();
        v["quoteSummary"]["result"][0]["financialData"]["freeCashflow"] = json!({});
        let envelope: QuoteSummaryEnvelope = serde_json::from_value(v).unwrap();
        assert!(snapshot_from_envelope("AAPL", envelope, fetched_at()).is_err());
    }

    #[test]
    fn provider_error_payload_is_surfaced() {
        let v = json!({
            "quoteSummary": {
                "result": null,
                "error": {"code": "Not Found", "description": "Quote not found for ticker symbol: ZZZT"}
            }
        });
        let envelope: QuoteSummaryEnvelope = serde_json::from_value(v).unwrap();
        let err = snapshot_from_envelope("ZZZT", envelope, fetched_at()).unwrap_err();
        assert!(err.to_string().contains("ZZZT"));
    }

    #[test]
    fn empty_result_list_is_an_error() {
        let v = json!({"quoteSummary": {"result": [], "error": null}});
        let envelope: QuoteSummaryEnvelope = serde_json::from_value(v).unwrap();
        assert!(snapshot_from_envelope("AAPL", envelope, fetched_at()).is_err());
    }
}
