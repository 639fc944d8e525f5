use crate::ingest::types::FinancialSnapshot;
use anyhow::Result;

/// A live source of per-symbol fundamentals. One outbound lookup per symbol
/// per run; a failed lookup is an error for that symbol only, and callers are
/// expected to skip it and continue.
#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_snapshot(&self, symbol: &str) -> Result<FinancialSnapshot>;
}

/// Structural checks every provider output must pass before it reaches the
/// valuation engine. Range checks (positive price, positive shares) belong to
/// the engine; this only rejects snapshots that are not even well-formed.
pub fn validate_snapshot(snapshot: &FinancialSnapshot) -> Result<()> {
    anyhow::ensure!(
        !snapshot.symbol.trim().is_empty(),
        "symbol must be non-empty"
    );
    anyhow::ensure!(
        snapshot.price.is_finite(),
        "price must be finite (got {})",
        snapshot.price
    );
    anyhow::ensure!(
        snapshot.free_cash_flow.is_finite(),
        "free cash flow must be finite (got {})",
        snapshot.free_cash_flow
    );
    anyhow::ensure!(
        snapshot.shares_outstanding.is_finite(),
        "shares outstanding must be finite (got {})",
        snapshot.shares_outstanding
    );

    for (field, value) in [
        ("growth_estimate", snapshot.growth_estimate),
        ("trailing_pe", snapshot.trailing_pe),
        ("total_debt", snapshot.total_debt),
        ("total_cash", snapshot.total_cash),
    ] {
        if let Some(v) = value {
            anyhow::ensure!(v.is_finite(), "{field} must be finite when present (got {v})");
        }
    }

    Ok(())
}
