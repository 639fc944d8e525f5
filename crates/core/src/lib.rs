pub mod domain;
pub mod ingest;
pub mod report;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub quote_api_base_url: Option<String>,
        pub quote_api_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                quote_api_base_url: std::env::var("QUOTE_API_BASE_URL").ok(),
                quote_api_timeout_secs: std::env::var("QUOTE_API_TIMEOUT_SECS")
                    .ok()
                    .map(|s| {
                        s.parse::<u64>()
                            .context("QUOTE_API_TIMEOUT_SECS must be an integer")
                    })
                    .transpose()?,
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }
    }
}
