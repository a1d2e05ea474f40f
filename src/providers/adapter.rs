use serde_json::Value;

use crate::error::FetchError;
use crate::http::HttpClient;
use crate::schema::SalaryRecord;

/// One page of raw vacancies as returned by a provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VacancyPage {
    /// Raw vacancy records, in provider order
    pub vacancies: Vec<Value>,

    /// Whether the provider has at least one more page after this one
    pub has_more: bool,

    /// Total match count reported by the provider, if any
    pub reported_total: Option<u64>,
}

/// VacancyProvider is the abstraction between:
/// - The generic collector (pagination, estimation, aggregation)
/// - A job board's REST API
///
/// Each provider implementation must:
/// - Know its endpoint, query parameters and headers
/// - Decode a page and its continuation signal
/// - Rename its salary fields into a `SalaryRecord`
///
/// THREAD SAFETY:
/// - Must be Send + Sync (providers are held in `Arc`)
///
#[async_trait::async_trait]
pub trait VacancyProvider: Send + Sync {
    /// Canonical provider name.
    ///
    /// CONTRACT:
    /// - Must match the entry in `Config::providers`
    /// - Used for logging and metrics
    fn name(&self) -> &'static str;

    /// Human-readable title used as the report heading.
    fn title(&self) -> &str;

    /// Currency code a salary must carry to be estimated.
    fn target_currency(&self) -> &str;

    /// Fetches page `page` (0-based) of vacancies for `category`.
    ///
    /// Pages past the last one come back empty with `has_more = false`.
    async fn fetch_page(
        &self,
        client: &HttpClient,
        category: &str,
        page: u32,
    ) -> Result<VacancyPage, FetchError>;

    /// Translates one raw vacancy into a salary record.
    ///
    /// Returns `None` when the vacancy carries no salary block at all.
    ///
    /// IMPORTANT:
    /// - Field renaming only, no estimation or filtering
    /// - Must never panic on unexpected shapes
    fn salary_record(&self, vacancy: &Value) -> Option<SalaryRecord>;
}
