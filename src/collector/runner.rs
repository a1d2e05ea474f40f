use std::pin::pin;

use futures_util::TryStreamExt;
use log::{debug, error, info};
use tokio::time::sleep;

use crate::{
    collector::stream::vacancy_stream,
    config::Config,
    error::FetchError,
    http::HttpClient,
    metrics::RunMetrics,
    providers::adapter::VacancyProvider,
    salary::{CategoryAggregator, estimate},
    schema::{CategoryStats, SalaryStatsReport},
};

/// Collects salary statistics for every configured category on one provider.
///
/// Categories are processed one after another, in configuration order.
///
/// FAILURE HANDLING (per category):
/// - Transport error: category omitted, then sleep for the configured
///   timeout before the next category
/// - Any other fetch error: category omitted, continue immediately
///
/// This function never fails; errors surface only as log lines and
/// missing report entries.
pub async fn collect_salary_stats(
    provider: &dyn VacancyProvider,
    client: &HttpClient,
    config: &Config,
    metrics: &RunMetrics,
) -> SalaryStatsReport {
    let mut report = SalaryStatsReport::new(provider.title());

    for category in &config.programming_languages {
        match collect_category(provider, client, category, metrics).await {
            Ok(stats) => {
                info!(
                    "{} '{}': found={} processed={} average={}",
                    provider.name(),
                    category,
                    stats.vacancies_found,
                    stats.vacancies_processed,
                    stats.average_salary
                );
                RunMetrics::incr(&metrics.categories_collected);
                report.insert(category.clone(), stats);
            }

            Err(e) if e.is_transport() => {
                error!(
                    "{} '{}': connection failed, category skipped: {}",
                    provider.name(),
                    category,
                    e
                );
                RunMetrics::incr(&metrics.transport_errors);
                RunMetrics::incr(&metrics.categories_failed);
                sleep(config.timeout()).await;
            }

            Err(e) => {
                error!(
                    "{} '{}': request failed, category skipped: {}",
                    provider.name(),
                    category,
                    e
                );
                RunMetrics::incr(&metrics.protocol_errors);
                RunMetrics::incr(&metrics.categories_failed);
            }
        }
    }

    report
}

/// Streams every vacancy of one category through the estimator into an
/// aggregator. Nothing is committed unless the whole stream succeeds.
async fn collect_category(
    provider: &dyn VacancyProvider,
    client: &HttpClient,
    category: &str,
    metrics: &RunMetrics,
) -> Result<CategoryStats, FetchError> {
    let mut aggregator = CategoryAggregator::new();
    let mut vacancies = pin!(vacancy_stream(provider, client, category, metrics));

    while let Some(vacancy) = vacancies.try_next().await? {
        let record = provider.salary_record(&vacancy);
        debug!("{} '{}': salary={:?}", provider.name(), category, record);

        RunMetrics::incr(&metrics.vacancies_seen);
        aggregator.push(estimate(record.as_ref(), provider.target_currency()));
    }

    Ok(aggregator.finish())
}
