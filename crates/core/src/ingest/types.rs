use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fundamentals for one symbol, produced once per run by a quote provider.
///
/// Required fields are what the DCF needs; everything the provider may omit
/// is an explicit `Option`, never a zero sentinel. Debt and cash feed the
/// net-debt adjustment and default to 0 when the provider has no figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub symbol: String,
    pub price: f64,
    pub free_cash_flow: f64,
    pub shares_outstanding: f64,
    pub growth_estimate: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub total_debt: Option<f64>,
    pub total_cash: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}
