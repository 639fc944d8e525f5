use fairval_core::domain::catalog::Catalog;
use fairval_core::domain::valuation::{evaluate, ValuationAssumptions};
use fairval_core::ingest::provider::QuoteProvider;
use fairval_core::report::ReportRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Fetch,
    Evaluate,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Fetch => "fetch",
            FailureStage::Evaluate => "evaluate",
        }
    }
}

#[derive(Debug)]
pub struct SkippedEntry {
    pub symbol: &'static str,
    pub stage: FailureStage,
    pub reason: String,
}

#[derive(Debug)]
pub struct CatalogOutcome {
    pub catalog: Catalog,
    pub rows: Vec<ReportRow>,
    pub skipped: Vec<SkippedEntry>,
}

/// Fetches and evaluates every entry of one catalog, sequentially.
///
/// Entries are fully independent: a failure at either stage skips that symbol
/// and the loop moves on. Rows keep catalog insertion order.
pub async fn analyze_catalog(
    provider: &dyn QuoteProvider,
    catalog: &Catalog,
    assumptions: &ValuationAssumptions,
) -> CatalogOutcome {
    let mut rows = Vec::with_capacity(catalog.entries.len());
    let mut skipped = Vec::new();

    for entry in catalog.entries {
        let snapshot = match provider.fetch_snapshot(entry.symbol).await {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(
                    symbol = entry.symbol,
                    provider = provider.provider_name(),
                    error = %err,
                    "fetch failed; skipping symbol"
                );
                skipped.push(SkippedEntry {
                    symbol: entry.symbol,
                    stage: FailureStage::Fetch,
                    reason: format!("{err:#}"),
                });
                continue;
            }
        };

        // Informational only; the projection uses the fixed assumption.
        if let Some(growth) = snapshot.growth_estimate {
            tracing::debug!(symbol = entry.symbol, growth, "provider growth estimate");
        }

        match evaluate(&snapshot, assumptions) {
            Ok(result) => rows.push(ReportRow {
                name: entry.name,
                result,
            }),
            Err(err) => {
                tracing::warn!(
                    symbol = entry.symbol,
                    error = %err,
                    "valuation failed; skipping symbol"
                );
                skipped.push(SkippedEntry {
                    symbol: entry.symbol,
                    stage: FailureStage::Evaluate,
                    reason: format!("{err:#}"),
                });
            }
        }
    }

    tracing::info!(
        catalog = catalog.title,
        analyzed = rows.len(),
        skipped = skipped.len(),
        "catalog analysis complete"
    );

    CatalogOutcome {
        catalog: *catalog,
        rows,
        skipped,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub analyzed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[CatalogOutcome]) -> Self {
        Self {
            analyzed: outcomes.iter().map(|o| o.rows.len()).sum(),
            skipped: outcomes.iter().map(|o| o.skipped.len()).sum(),
        }
    }

    /// True when every symbol in every catalog failed; the one condition that
    /// turns into a non-zero exit status.
    pub fn total_failure(&self) -> bool {
        self.analyzed == 0 && self.skipped > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fairval_core::domain::catalog::{Catalog, CompanyEntry};
    use fairval_core::ingest::types::FinancialSnapshot;

    const TEST_ENTRIES: &[CompanyEntry] = &[
        CompanyEntry { symbol: "AAA", name: "Alpha" },
        CompanyEntry { symbol: "BBB", name: "Beta" },
        CompanyEntry { symbol: "CCC", name: "Gamma" },
    ];

    fn test_catalog() -> Catalog {
        Catalog {
            title: "Test Catalog",
            entries: TEST_ENTRIES,
        }
    }

    struct StubProvider {
        fetch_failures: &'static [&'static str],
        zero_share_symbols: &'static [&'static str],
    }

    impl StubProvider {
        fn healthy() -> Self {
            Self {
                fetch_failures: &[],
                zero_share_symbols: &[],
            }
        }
    }

    #[async_trait::async_trait]
    impl QuoteProvider for StubProvider {
        fn provider_name(&self) -> &'static str {
            "stub"
        }

        async fn fetch_snapshot(&self, symbol: &str) -> anyhow::Result<FinancialSnapshot> {
            if self.fetch_failures.contains(&symbol) {
                anyhow::bail!("simulated network error for {symbol}");
            }

            let shares = if self.zero_share_symbols.contains(&symbol) {
                0.0
            } else {
                100.0
            };

            Ok(FinancialSnapshot {
                symbol: symbol.to_string(),
                price: 100.0,
                free_cash_flow: 1000.0,
                shares_outstanding: shares,
                growth_estimate: Some(0.05),
                trailing_pe: Some(20.0),
                total_debt: None,
                total_cash: None,
                fetched_at: Utc::now(),
            })
        }
    }

    #[tokio::test]
    async fn analyzes_all_entries_in_catalog_order() {
        let provider = StubProvider::healthy();
        let outcome = analyze_catalog(
            &provider,
            &test_catalog(),
            &ValuationAssumptions::default(),
        )
        .await;

        let symbols: Vec<&str> = outcome.rows.iter().map(|r| r.result.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAA", "BBB", "CCC"]);
        assert!(outcome.skipped.is_empty());

        let summary = RunSummary::from_outcomes(&[outcome]);
        assert!(!summary.total_failure());
        assert_eq!(summary.analyzed, 3);
    }

    #[tokio::test]
    async fn fetch_failure_skips_only_the_affected_symbol() {
        let provider = StubProvider {
            fetch_failures: &["BBB"],
            zero_share_symbols: &[],
        };
        let outcome = analyze_catalog(
            &provider,
            &test_catalog(),
            &ValuationAssumptions::default(),
        )
        .await;

        let symbols: Vec<&str> = outcome.rows.iter().map(|r| r.result.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAA", "CCC"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].symbol, "BBB");
        assert_eq!(outcome.skipped[0].stage, FailureStage::Fetch);

        let summary = RunSummary::from_outcomes(&[outcome]);
        assert!(!summary.total_failure());
    }

    #[tokio::test]
    async fn invalid_snapshot_is_an_evaluate_stage_skip() {
        let provider = StubProvider {
            fetch_failures: &[],
            zero_share_symbols: &["CCC"],
        };
        let outcome = analyze_catalog(
            &provider,
            &test_catalog(),
            &ValuationAssumptions::default(),
        )
        .await;

        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].stage, FailureStage::Evaluate);
        assert!(outcome.skipped[0].reason.contains("shares"));
    }

    #[tokio::test]
    async fn all_symbols_failing_is_a_total_failure() {
        let provider = StubProvider {
            fetch_failures: &["AAA", "BBB", "CCC"],
            zero_share_symbols: &[],
        };
        let outcome = analyze_catalog(
            &provider,
            &test_catalog(),
            &ValuationAssumptions::default(),
        )
        .await;

        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.skipped.len(), 3);

        let summary = RunSummary::from_outcomes(&[outcome]);
        assert!(summary.total_failure());
    }
}
