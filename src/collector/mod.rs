/// Collector module
///
/// This module groups all logic responsible for:
/// - Walking a provider's pages for one category (`stream`)
/// - Turning every configured category into report entries (`runner`)
///
/// The collector layer acts as the orchestration layer between:
/// - Provider adapters (HeadHunter, SuperJob)
/// - The salary estimator and aggregator
///
/// Design notes:
/// - Provider-specific logic MUST NOT live here
/// - Failures are contained per category and never abort a run
pub mod runner;
pub mod stream;
