use futures_util::stream::{self, Stream, TryStreamExt};
use log::debug;
use serde_json::Value;

use crate::{
    error::FetchError,
    http::HttpClient,
    metrics::RunMetrics,
    providers::adapter::VacancyProvider,
};

/// Lazily walks every page of `category` on `provider`, yielding raw
/// vacancies one by one.
///
/// GUARANTEES:
/// - Page `n + 1` is requested only after every vacancy of page `n` was
///   pulled, and only if page `n` reported more pages
/// - At most one page is held in memory
/// - The first error ends the stream; it is not restartable
pub fn vacancy_stream<'a>(
    provider: &'a dyn VacancyProvider,
    client: &'a HttpClient,
    category: &'a str,
    metrics: &'a RunMetrics,
) -> impl Stream<Item = Result<Value, FetchError>> + 'a {
    stream::try_unfold(Some(0u32), move |next_page| async move {
        let Some(page) = next_page else {
            return Ok::<_, FetchError>(None);
        };

        let batch = provider.fetch_page(client, category, page).await?;
        RunMetrics::incr(&metrics.pages_fetched);
        debug!(
            "{} '{}' page {}: {} vacancies (more: {}, reported total: {:?})",
            provider.name(),
            category,
            page,
            batch.vacancies.len(),
            batch.has_more,
            batch.reported_total
        );

        let next_page = batch.has_more.then(|| page + 1);
        Ok(Some((batch.vacancies, next_page)))
    })
    .map_ok(|vacancies| stream::iter(vacancies.into_iter().map(Ok::<Value, FetchError>)))
    .try_flatten()
}
