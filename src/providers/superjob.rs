use serde_json::Value;

use crate::{
    config::SuperJobConfig,
    error::FetchError,
    http::HttpClient,
    schema::SalaryRecord,
    util,
};

use super::adapter::{VacancyPage, VacancyProvider};

/// SuperJob only publishes rouble salaries under this code.
const SUPERJOB_CURRENCY: &str = "rub";

/// SuperJob (api.superjob.ru) adapter
///
/// - Authenticated with the `X-Api-App-Id` header
/// - `page` is 0-based, the response flags further pages with `more`
/// - Salaries are flat fields: `payment_from`, `payment_to`, `currency`
pub struct SuperJobProvider {
    config: SuperJobConfig,
}

impl SuperJobProvider {
    pub fn new(config: SuperJobConfig) -> Self {
        Self { config }
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        vec![(
            "X-Api-App-Id",
            self.config.api_key.clone().unwrap_or_default(),
        )]
    }

    fn query(&self, category: &str, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("page", page.to_string()),
            ("catalogues", self.config.catalogues.clone()),
            ("town", self.config.town.clone()),
            ("keyword", category.to_string()),
        ]
    }

    fn parse_page(&self, mut body: Value) -> Result<VacancyPage, FetchError> {
        let has_more = body
            .get("more")
            .and_then(Value::as_bool)
            .ok_or_else(|| FetchError::payload(self.name(), "missing 'more'"))?;
        let reported_total = body.get("total").and_then(Value::as_u64);

        let objects = match body.get_mut("objects").map(Value::take) {
            Some(Value::Array(objects)) => objects,
            _ => return Err(FetchError::payload(self.name(), "missing 'objects'")),
        };

        Ok(VacancyPage {
            vacancies: objects,
            has_more,
            reported_total,
        })
    }
}

#[async_trait::async_trait]
impl VacancyProvider for SuperJobProvider {
    fn name(&self) -> &'static str {
        "superjob"
    }

    fn title(&self) -> &str {
        &self.config.title
    }

    fn target_currency(&self) -> &str {
        SUPERJOB_CURRENCY
    }

    async fn fetch_page(
        &self,
        client: &HttpClient,
        category: &str,
        page: u32,
    ) -> Result<VacancyPage, FetchError> {
        let body = client
            .get_json(
                &self.config.base_url,
                &self.headers(),
                &self.query(category, page),
            )
            .await?;
        self.parse_page(body)
    }

    fn salary_record(&self, vacancy: &Value) -> Option<SalaryRecord> {
        Some(SalaryRecord {
            lower: util::json_bound(vacancy.get("payment_from")),
            upper: util::json_bound(vacancy.get("payment_to")),
            currency: vacancy
                .get("currency")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}
