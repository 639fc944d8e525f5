use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod analyze;

#[derive(Debug, Parser)]
#[command(name = "fairval_worker")]
struct Args {
    /// Emit results as a JSON document instead of text tables.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = fairval_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let assumptions = fairval_core::domain::valuation::ValuationAssumptions::from_env();
    let provider = fairval_core::ingest::yahoo::YahooQuoteClient::from_settings(&settings)?;

    let mut outcomes = Vec::new();
    for catalog in fairval_core::domain::catalog::catalogs() {
        let outcome = analyze::analyze_catalog(&provider, &catalog, &assumptions).await;
        outcomes.push(outcome);
    }

    let summary = analyze::RunSummary::from_outcomes(&outcomes);
    if summary.total_failure() {
        let err = anyhow::anyhow!(
            "no valuations produced: all {} symbols failed",
            summary.skipped
        );
        sentry_anyhow::capture_anyhow(&err);
        return Err(err);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json_report(&outcomes))?);
    } else {
        for outcome in &outcomes {
            print!(
                "{}",
                fairval_core::report::render_catalog(
                    outcome.catalog.title,
                    &outcome.rows,
                    outcome.catalog.entries.len(),
                )
            );
            println!();
        }
        println!("Disclaimer: simplified educational model, not financial advice.");
    }

    tracing::info!(
        analyzed = summary.analyzed,
        skipped = summary.skipped,
        "valuation run complete"
    );

    Ok(())
}

fn json_report(outcomes: &[analyze::CatalogOutcome]) -> serde_json::Value {
    let catalogs: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|outcome| {
            let skipped: Vec<serde_json::Value> = outcome
                .skipped
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "symbol": s.symbol,
                        "stage": s.stage.as_str(),
                        "reason": s.reason,
                    })
                })
                .collect();

            serde_json::json!({
                "title": outcome.catalog.title,
                "rows": outcome.rows,
                "skipped": skipped,
            })
        })
        .collect();

    serde_json::json!({ "catalogs": catalogs })
}

fn init_sentry(settings: &fairval_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
