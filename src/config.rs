use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;

use crate::error::ConfigError;
use crate::http::RetryPolicy;
use crate::util::split_list;

// ------------------------------------------------------------
// Root configuration
// ------------------------------------------------------------
//
// Loaded once in `main` from an optional JSON file, then patched
// with environment overrides and validated. Passed by reference
// everywhere else; nothing reads settings from global state.
//
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Categories to collect, in report order
    pub programming_languages: Vec<String>,

    /// Per-request timeout, also used as the cool-down after a
    /// transport failure
    pub timeout_secs: u64,

    /// HTTP retry policy
    pub retry: RetryConfig,

    /// DEBUG, INFO, WARNING, ERROR or CRITICAL
    pub logging_level: LogLevel,

    /// How reports are printed
    pub output: OutputFormat,

    /// Providers to run, in order (e.g. "headhunter", "superjob")
    pub providers: Vec<String>,

    pub headhunter: HeadHunterConfig,

    pub superjob: SuperJobConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            programming_languages: [
                "Python", "Golang", "NodeJS", "Java", "Rust", "C", "C++", "C#", "PHP", "Ruby",
                "Scala",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            timeout_secs: 10,
            retry: RetryConfig::default(),
            logging_level: LogLevel::Warning,
            output: OutputFormat::Table,
            providers: vec!["headhunter".to_string(), "superjob".to_string()],
            headhunter: HeadHunterConfig::default(),
            superjob: SuperJobConfig::default(),
        }
    }
}

impl Config {
    /// Reads `path` (missing file = defaults), applies process environment
    /// overrides and validates the result.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&data).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    /// Applies environment overrides (`TIMEOUT`, `RETRY_COUNT`, ...).
    ///
    /// `lookup` abstracts the environment so tests never touch the real
    /// process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("PROGRAMING_LANGUAGES") {
            self.programming_languages = split_list(&raw);
        }
        if let Some(raw) = lookup("TIMEOUT") {
            self.timeout_secs = parse_value("TIMEOUT", &raw)?;
        }
        if let Some(raw) = lookup("RETRY_COUNT") {
            self.retry.count = parse_value("RETRY_COUNT", &raw)?;
        }
        if let Some(raw) = lookup("RETRY_BACKOFF_FACTOR") {
            self.retry.backoff_factor = parse_value("RETRY_BACKOFF_FACTOR", &raw)?;
        }
        if let Some(raw) = lookup("STATUS_FORCE_LIST") {
            self.retry.status_forcelist = split_list(&raw)
                .into_iter()
                .map(|code| {
                    code.parse::<u16>().map_err(|_| ConfigError::InvalidList {
                        key: "STATUS_FORCE_LIST".to_string(),
                        value: code.clone(),
                    })
                })
                .collect::<Result<_, _>>()?;
        }
        if let Some(raw) = lookup("ALLOWED_METHODS") {
            self.retry.allowed_methods = split_list(&raw);
        }
        if let Some(raw) = lookup("LOGGING_LEVEL") {
            self.logging_level = raw.parse()?;
        }
        if let Some(raw) = lookup("OUTPUT_FORMAT") {
            self.output = raw.parse()?;
        }
        if let Some(key) = lookup("SUPERJOB_API_KEY") {
            self.superjob.api_key = Some(key);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        RetryPolicy::from_config(&self.retry)?;

        for status in &self.retry.status_forcelist {
            if !(100..=599).contains(status) {
                return Err(ConfigError::InvalidList {
                    key: "STATUS_FORCE_LIST".to_string(),
                    value: status.to_string(),
                });
            }
        }

        if !self.retry.backoff_factor.is_finite() || self.retry.backoff_factor < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "RETRY_BACKOFF_FACTOR".to_string(),
                value: self.retry.backoff_factor.to_string(),
            });
        }

        let superjob_enabled = self.providers.iter().any(|p| p == "superjob");
        if superjob_enabled && self.superjob.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

// ------------------------------------------------------------
// Retry policy
// ------------------------------------------------------------
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub count: u32,

    /// Response statuses that trigger a retry
    pub status_forcelist: Vec<u16>,

    /// HTTP methods that may be retried
    pub allowed_methods: Vec<String>,

    /// Base of the exponential backoff, in seconds
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            count: 5,
            status_forcelist: vec![429, 500, 502, 503, 504],
            allowed_methods: vec!["HEAD".into(), "GET".into(), "OPTIONS".into()],
            backoff_factor: 0.5,
        }
    }
}

// ------------------------------------------------------------
// Logging level
// ------------------------------------------------------------
//
// Accepts the five level names case-insensitively. Anything else
// is rejected at load time.
//
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error | LogLevel::Critical => LevelFilter::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(ConfigError::InvalidLogLevel(raw.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ConfigError;

    fn try_from(raw: String) -> Result<Self, ConfigError> {
        raw.parse()
    }
}

// ------------------------------------------------------------
// Output format
// ------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "OUTPUT_FORMAT".to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

// ------------------------------------------------------------
// HeadHunter (api.hh.ru)
// ------------------------------------------------------------
//
// NOTES:
// - `area` 1 is Moscow.
// - `specialization` 1.221 is "Programming, software development".
// - The search text is "<search_prefix> <language>".
//
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HeadHunterConfig {
    pub title: String,
    pub base_url: String,
    pub currency: String,
    pub area: String,
    pub specialization: String,
    pub search_prefix: String,
}

impl Default for HeadHunterConfig {
    fn default() -> Self {
        Self {
            title: "HeadHunter Moscow".to_string(),
            base_url: "https://api.hh.ru/vacancies".to_string(),
            currency: "RUR".to_string(),
            area: "1".to_string(),
            specialization: "1.221".to_string(),
            search_prefix: "Программист".to_string(),
        }
    }
}

// ------------------------------------------------------------
// SuperJob (api.superjob.ru)
// ------------------------------------------------------------
//
// NOTES:
// - `api_key` is sent as X-Api-App-Id and must never be committed.
// - `town` 4 is Moscow, `catalogues` 48 is "Development, programming".
//
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SuperJobConfig {
    pub title: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub town: String,
    pub catalogues: String,
}

impl Default for SuperJobConfig {
    fn default() -> Self {
        Self {
            title: "SuperJob Moscow".to_string(),
            base_url: "https://api.superjob.ru/2.0/vacancies".to_string(),
            api_key: None,
            town: "4".to_string(),
            catalogues: "48".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_original_settings() {
        let config = Config::default();
        assert_eq!(config.programming_languages.len(), 11);
        assert_eq!(config.programming_languages[0], "Python");
        assert_eq!(config.programming_languages[10], "Scala");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.retry.count, 5);
        assert_eq!(config.retry.status_forcelist, vec![429, 500, 502, 503, 504]);
        assert_eq!(config.retry.allowed_methods, vec!["HEAD", "GET", "OPTIONS"]);
        assert_eq!(config.logging_level, LogLevel::Warning);
        assert_eq!(config.headhunter.currency, "RUR");
    }

    #[test]
    fn env_overrides_are_applied() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("PROGRAMING_LANGUAGES", " Python , Go ,"),
                ("TIMEOUT", "3"),
                ("RETRY_COUNT", "2"),
                ("STATUS_FORCE_LIST", "429, 503"),
                ("ALLOWED_METHODS", "GET"),
                ("LOGGING_LEVEL", "debug"),
                ("OUTPUT_FORMAT", "JSON"),
                ("SUPERJOB_API_KEY", "v3.secret"),
            ]))
            .unwrap();

        assert_eq!(config.programming_languages, vec!["Python", "Go"]);
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.retry.count, 2);
        assert_eq!(config.retry.status_forcelist, vec![429, 503]);
        assert_eq!(config.retry.allowed_methods, vec!["GET"]);
        assert_eq!(config.logging_level, LogLevel::Debug);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.superjob.api_key.as_deref(), Some("v3.secret"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_logging_level_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[("LOGGING_LEVEL", "VERBOSE")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(level) if level == "VERBOSE"));
    }

    #[test]
    fn logging_level_is_checked_when_deserializing() {
        let err = serde_json::from_str::<Config>(r#"{"logging_level": "loud"}"#).unwrap_err();
        assert!(err.to_string().contains("loud"));

        let config: Config = serde_json::from_str(r#"{"logging_level": "critical"}"#).unwrap();
        assert_eq!(config.logging_level.to_filter(), LevelFilter::Error);
    }

    #[test]
    fn logging_level_converts_from_owned_string() {
        assert_eq!(LogLevel::try_from("Error".to_string()).unwrap(), LogLevel::Error);
        assert!(matches!(
            LogLevel::try_from("trace".to_string()),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn non_numeric_status_code_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[("STATUS_FORCE_LIST", "429,oops")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidList { value, .. } if value == "oops"));
    }

    #[test]
    fn missing_superjob_key_fails_validation() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));

        let mut without_superjob = Config::default();
        without_superjob.providers = vec!["headhunter".to_string()];
        assert!(without_superjob.validate().is_ok());
    }

    #[test]
    fn invalid_method_fails_validation() {
        let mut config = Config::default();
        config.providers = vec!["headhunter".to_string()];
        config.retry.allowed_methods = vec!["GET".into(), "NOT A METHOD".into()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidList { key, .. }) if key == "ALLOWED_METHODS"
        ));
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "programming_languages": ["Rust"],
                "retry": { "count": 1 },
                "superjob": { "api_key": "k", "town": "14" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.programming_languages, vec!["Rust"]);
        assert_eq!(config.retry.count, 1);
        assert_eq!(config.retry.status_forcelist, vec![429, 500, 502, 503, 504]);
        assert_eq!(config.superjob.town, "14");
        assert_eq!(config.superjob.catalogues, "48");
        assert_eq!(config.headhunter.area, "1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_means_defaults() {
        let config = Config::from_file(Path::new("/nonexistent/salary-stats.json")).unwrap();
        assert_eq!(config.timeout_secs, 10);
    }
}
