use crate::domain::valuation::ValuationResult;
use serde::Serialize;
use std::fmt::Write as _;

const PLACEHOLDER: &str = "-";

/// One rendered table line: the catalog display name plus the valuation.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub name: &'static str,
    pub result: ValuationResult,
}

/// Renders one catalog as a fixed-width text table.
///
/// Skipped symbols are omitted from the body; the footer carries the
/// analyzed/total counts so a short table is visibly a partial one.
pub fn render_catalog(title: &str, rows: &[ReportRow], total_entries: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "--- {title} ---");
    let _ = writeln!(
        out,
        "{:<8}{:<22}{:>12}{:>11}{:>10}{:>13}{:>10}{:>12}",
        "SYMBOL", "COMPANY", "INTRINSIC", "PRICE", "MARGIN", "VERDICT", "TRL P/E", "P/E SIGNAL"
    );

    for row in rows {
        let r = &row.result;
        let trailing_pe = r
            .trailing_pe
            .map(|pe| format!("{pe:.2}"))
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let pe_verdict = r
            .pe_verdict
            .map(|v| v.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        let _ = writeln!(
            out,
            "{:<8}{:<22}{:>12}{:>11}{:>10}{:>13}{:>10}{:>12}",
            r.symbol,
            row.name,
            format!("${:.2}", r.intrinsic_value),
            format!("${:.2}", r.price),
            format!("{:.2}%", r.margin_of_safety_pct),
            r.dcf_verdict.to_string(),
            trailing_pe,
            pe_verdict,
        );
    }

    let skipped = total_entries.saturating_sub(rows.len());
    let _ = writeln!(
        out,
        "analyzed {} of {} ({} skipped)",
        rows.len(),
        total_entries,
        skipped
    );

    out
}
