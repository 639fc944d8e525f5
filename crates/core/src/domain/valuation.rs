use crate::ingest::types::FinancialSnapshot;
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed model assumptions. The projection growth rate here is authoritative;
/// a provider-reported growth estimate never feeds the formula, so two runs
/// over the same snapshot always produce the same value.
#[derive(Debug, Clone)]
pub struct ValuationAssumptions {
    /// Growth applied to free cash flow over the explicit horizon.
    pub short_term_growth: f64,

    /// WACC proxy used to discount projected flows and the terminal value.
    pub discount_rate: f64,

    /// Perpetual growth beyond the horizon.
    pub terminal_growth: f64,

    pub horizon_years: u32,

    /// Trailing P/E above this reads as "High P/E".
    pub high_pe_threshold: f64,
}

impl Default for ValuationAssumptions {
    fn default() -> Self {
        Self {
            short_term_growth: 0.05,
            discount_rate: 0.07,
            terminal_growth: 0.025,
            horizon_years: 5,
            high_pe_threshold: 25.0,
        }
    }
}

impl ValuationAssumptions {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("VALUATION_SHORT_TERM_GROWTH") {
            if let Ok(n) = s.parse::<f64>() {
                out.short_term_growth = n;
            }
        }

        if let Ok(s) = std::env::var("VALUATION_DISCOUNT_RATE") {
            if let Ok(n) = s.parse::<f64>() {
                out.discount_rate = n;
            }
        }

        if let Ok(s) = std::env::var("VALUATION_TERMINAL_GROWTH") {
            if let Ok(n) = s.parse::<f64>() {
                out.terminal_growth = n;
            }
        }

        if let Ok(s) = std::env::var("VALUATION_HORIZON_YEARS") {
            if let Ok(n) = s.parse::<u32>() {
                out.horizon_years = n;
            }
        }

        if let Ok(s) = std::env::var("VALUATION_HIGH_PE_THRESHOLD") {
            if let Ok(n) = s.parse::<f64>() {
                out.high_pe_threshold = n;
            }
        }

        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Undervalued,
    Overvalued,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Undervalued => write!(f, "Undervalued"),
            Verdict::Overvalued => write!(f, "Overvalued"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeVerdict {
    High,
    Low,
}

impl fmt::Display for PeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeVerdict::High => write!(f, "High P/E"),
            PeVerdict::Low => write!(f, "Low P/E"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    pub symbol: String,
    pub intrinsic_value: f64,
    pub price: f64,
    pub margin_of_safety_pct: f64,
    pub dcf_verdict: Verdict,
    pub trailing_pe: Option<f64>,
    pub pe_verdict: Option<PeVerdict>,
}

/// Runs the simplified DCF over one snapshot.
///
/// Projects free cash flow over the horizon at the fixed growth rate,
/// discounts flows and a Gordon-growth terminal value at the fixed discount
/// rate, applies the net-debt adjustment, and divides by shares outstanding.
/// Any input the formula cannot price (non-positive price or shares, negative
/// FCF, degenerate terminal spread, non-positive intrinsic value) is an error,
/// never a NaN or infinity smuggled into a result.
pub fn evaluate(
    snapshot: &FinancialSnapshot,
    assumptions: &ValuationAssumptions,
) -> Result<ValuationResult> {
    ensure!(
        snapshot.price > 0.0 && snapshot.price.is_finite(),
        "current price must be positive (got {})",
        snapshot.price
    );
    ensure!(
        snapshot.shares_outstanding > 0.0 && snapshot.shares_outstanding.is_finite(),
        "shares outstanding must be positive (got {})",
        snapshot.shares_outstanding
    );
    ensure!(
        snapshot.free_cash_flow >= 0.0 && snapshot.free_cash_flow.is_finite(),
        "free cash flow must be non-negative (got {})",
        snapshot.free_cash_flow
    );
    ensure!(
        assumptions.horizon_years >= 1,
        "projection horizon must be at least 1 year"
    );
    ensure!(
        assumptions.discount_rate > assumptions.terminal_growth,
        "discount rate {} must exceed terminal growth {}",
        assumptions.discount_rate,
        assumptions.terminal_growth
    );

    let growth = assumptions.short_term_growth;
    let discount = assumptions.discount_rate;

    // Explicit-horizon flows, discounted year by year.
    let mut discounted_flows = 0.0;
    let mut projected = snapshot.free_cash_flow;
    for year in 1..=assumptions.horizon_years {
        projected *= 1.0 + growth;
        discounted_flows += projected / (1.0 + discount).powi(year as i32);
    }

    // Gordon-growth terminal value off the final projected year.
    let terminal_value = projected * (1.0 + assumptions.terminal_growth)
        / (discount - assumptions.terminal_growth);
    let discounted_terminal =
        terminal_value / (1.0 + discount).powi(assumptions.horizon_years as i32);

    let enterprise_value = discounted_flows + discounted_terminal;
    let equity_value =
        enterprise_value - snapshot.total_debt.unwrap_or(0.0) + snapshot.total_cash.unwrap_or(0.0);
    let intrinsic_value = equity_value / snapshot.shares_outstanding;

    ensure!(
        intrinsic_value.is_finite() && intrinsic_value > 0.0,
        "intrinsic value is not positive for {} (got {intrinsic_value})",
        snapshot.symbol
    );

    let margin_of_safety_pct = (intrinsic_value - snapshot.price) / intrinsic_value * 100.0;
    ensure!(
        margin_of_safety_pct.is_finite(),
        "margin of safety is not finite for {}",
        snapshot.symbol
    );

    let dcf_verdict = if intrinsic_value > snapshot.price {
        Verdict::Undervalued
    } else {
        Verdict::Overvalued
    };

    let pe_verdict = snapshot.trailing_pe.map(|pe| {
        if pe > assumptions.high_pe_threshold {
            PeVerdict::High
        } else {
            PeVerdict::Low
        }
    });

    Ok(ValuationResult {
        symbol: snapshot.symbol.clone(),
        intrinsic_value,
        price: snapshot.price,
        margin_of_safety_pct,
        dcf_verdict,
        trailing_pe: snapshot.trailing_pe,
        pe_verdict,
    })
}
