// ------------------------------------------------------------
// Module declarations
// ------------------------------------------------------------
//
// Each module represents a well-defined responsibility:
//
// - config:     Configuration loaded from JSON plus env overrides
// - error:      Fetch and configuration error types
// - http:       HTTP client with retry / backoff
// - schema:     Salary records, category stats and reports
// - salary:     Salary estimation and per-category aggregation
// - providers:  Job board adapters and provider registry
// - collector:  Page streaming and per-provider orchestration
// - report:     Table and JSON rendering
// - metrics:    Per-run counters
// - util:       Shared helpers (lists, JSON bounds, logging)
//
mod collector;
mod config;
mod error;
mod http;
mod metrics;
mod providers;
mod report;
mod salary;
mod schema;
mod util;

// ------------------------------------------------------------
// External dependencies
// ------------------------------------------------------------

use std::env;
use std::path::PathBuf;

use log::{info, warn};

use collector::runner::collect_salary_stats;
use config::{Config, OutputFormat};
use http::HttpClient;
use metrics::RunMetrics;
use providers::get_provider;

const CONFIG_PATH_ENV: &str = "SALARY_STATS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";

// ------------------------------------------------------------
// Application entry point
// ------------------------------------------------------------
//
// Responsibilities:
// - Load and validate configuration
// - Initialize logging
// - Run every configured provider, one after another
// - Print the reports in provider order
//
// Category failures never change the exit code; only start-up
// errors (configuration, HTTP client) do.
//
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // --------------------------------------------------------
    // Load configuration
    //
    // NOTE:
    // - A missing file means defaults
    // - The SuperJob key usually comes from SUPERJOB_API_KEY
    //   and must not be committed to version control
    // --------------------------------------------------------
    let config_path = env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = Config::load(&config_path)?;

    util::setup_logging(config.logging_level.to_filter());
    info!(
        "loaded {} ({} categories, providers: {}, output: {})",
        config_path.display(),
        config.programming_languages.len(),
        config.providers.join(", "),
        config.output
    );

    let client = HttpClient::new(&config)?;

    // --------------------------------------------------------
    // Run providers sequentially
    // --------------------------------------------------------
    let mut reports = Vec::with_capacity(config.providers.len());

    for name in &config.providers {
        let Some(provider) = get_provider(name, &config) else {
            warn!("Provider '{}' is not supported", name);
            continue;
        };

        info!("Collecting {} ({})", provider.title(), provider.name());

        let metrics = RunMetrics::default();
        let report = collect_salary_stats(provider.as_ref(), &client, &config, &metrics).await;

        if report.is_empty() {
            warn!("{}: no category could be collected", provider.title());
        } else {
            info!(
                "{}: {}/{} categories collected",
                provider.title(),
                report.len(),
                config.programming_languages.len()
            );
        }
        info!("[METRICS] {} {}", provider.name(), metrics);
        reports.push(report);
    }

    // --------------------------------------------------------
    // Output
    // --------------------------------------------------------
    match config.output {
        OutputFormat::Table => {
            for report in &reports {
                println!("{}", report::render_table(report));
                println!();
            }
        }
        OutputFormat::Json => println!("{}", report::render_json(&reports)?),
    }

    Ok(())
}
