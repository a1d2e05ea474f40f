use serde_json::Value;

use crate::{
    config::HeadHunterConfig,
    error::FetchError,
    http::HttpClient,
    schema::SalaryRecord,
    util,
};

use super::adapter::{VacancyPage, VacancyProvider};

/// HeadHunter (api.hh.ru) adapter
///
/// Pagination:
/// - `page` is 0-based
/// - the response carries the total page count in `pages`
///
/// Salary block (`salary` may be null):
///   { "from": 100000, "to": 150000, "currency": "RUR", "gross": true }
pub struct HeadHunterProvider {
    config: HeadHunterConfig,
}

impl HeadHunterProvider {
    pub fn new(config: HeadHunterConfig) -> Self {
        Self { config }
    }

    fn query(&self, category: &str, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("page", page.to_string()),
            ("specialization", self.config.specialization.clone()),
            ("area", self.config.area.clone()),
            ("text", format!("{} {}", self.config.search_prefix, category)),
        ]
    }

    fn parse_page(&self, page: u32, mut body: Value) -> Result<VacancyPage, FetchError> {
        let pages = body
            .get("pages")
            .and_then(Value::as_u64)
            .ok_or_else(|| FetchError::payload(self.name(), "missing 'pages'"))?;
        let reported_total = body.get("found").and_then(Value::as_u64);

        let items = match body.get_mut("items").map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => return Err(FetchError::payload(self.name(), "missing 'items'")),
        };

        if u64::from(page) >= pages {
            return Ok(VacancyPage {
                vacancies: Vec::new(),
                has_more: false,
                reported_total,
            });
        }

        Ok(VacancyPage {
            vacancies: items,
            has_more: u64::from(page) + 1 < pages,
            reported_total,
        })
    }
}

#[async_trait::async_trait]
impl VacancyProvider for HeadHunterProvider {
    fn name(&self) -> &'static str {
        "headhunter"
    }

    fn title(&self) -> &str {
        &self.config.title
    }

    fn target_currency(&self) -> &str {
        &self.config.currency
    }

    async fn fetch_page(
        &self,
        client: &HttpClient,
        category: &str,
        page: u32,
    ) -> Result<VacancyPage, FetchError> {
        let body = client
            .get_json(&self.config.base_url, &[], &self.query(category, page))
            .await?;
        self.parse_page(page, body)
    }

    fn salary_record(&self, vacancy: &Value) -> Option<SalaryRecord> {
        let salary = vacancy.get("salary").filter(|s| !s.is_null())?;

        Some(SalaryRecord {
            lower: util::json_bound(salary.get("from")),
            upper: util::json_bound(salary.get("to")),
            currency: salary
                .get("currency")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}
