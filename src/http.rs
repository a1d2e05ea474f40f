//! Pre-configured HTTP client for the job board APIs.
//!
//! Features:
//! - Per-request timeout and a fixed User-Agent
//! - Retries on connection failures and on configured statuses
//! - Exponential backoff (capped at 120s) with a little jitter
//! - `Retry-After` honored on retried responses
//! - Failures classified into `FetchError` variants

use std::time::Duration;

use anyhow::Context;
use log::{debug, warn};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tokio::time::sleep;

use crate::config::{Config, RetryConfig};
use crate::error::{ConfigError, FetchError};

const USER_AGENT: &str = concat!("language-salary-stats/", env!("CARGO_PKG_VERSION"));

/// Upper bound for any single backoff sleep
const BACKOFF_MAX: Duration = Duration::from_secs(120);

/// Fraction of the backoff added as random jitter
const BACKOFF_JITTER: f64 = 0.1;

/// When and how long to wait before retrying a request.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    status_forcelist: Vec<u16>,
    allowed_methods: Vec<Method>,
    backoff_factor: f64,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Result<Self, ConfigError> {
        let allowed_methods = config
            .allowed_methods
            .iter()
            .map(|name| {
                Method::from_bytes(name.to_uppercase().as_bytes()).map_err(|_| {
                    ConfigError::InvalidList {
                        key: "ALLOWED_METHODS".to_string(),
                        value: name.clone(),
                    }
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            max_retries: config.count,
            status_forcelist: config.status_forcelist.clone(),
            allowed_methods,
            backoff_factor: config.backoff_factor,
        })
    }

    fn allows(&self, method: &Method) -> bool {
        self.allowed_methods.contains(method)
    }

    /// `retries_done` counts retries already performed for this request.
    pub fn should_retry_transport(&self, method: &Method, retries_done: u32) -> bool {
        retries_done < self.max_retries && self.allows(method)
    }

    pub fn should_retry_status(&self, method: &Method, status: u16, retries_done: u32) -> bool {
        self.should_retry_transport(method, retries_done) && self.status_forcelist.contains(&status)
    }

    /// Delay before the `retry`-th retry (1-based).
    ///
    /// The first retry is immediate; afterwards the delay is
    /// `backoff_factor * 2^(retry - 1)` seconds, capped at `BACKOFF_MAX`.
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let exponent = (retry - 1).min(30) as i32;
        let seconds = self.backoff_factor * 2.0_f64.powi(exponent);
        Duration::from_secs_f64(seconds.min(BACKOFF_MAX.as_secs_f64()))
    }
}

fn with_jitter(delay: Duration) -> Duration {
    delay + delay.mul_f64(rand::random::<f64>() * BACKOFF_JITTER)
}

/// Seconds from a numeric `Retry-After` header, capped at `BACKOFF_MAX`.
/// HTTP-date values are ignored.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let seconds = headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()?;
    Some(Duration::from_secs(seconds).min(BACKOFF_MAX))
}

/// Connect failures, timeouts and connections dropped while the request
/// was in flight. Builder errors (bad URL, bad header) are not transport.
fn is_transport_failure(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout() || (e.is_request() && !e.is_builder())
}

/// HTTP client shared by all providers for the whole run.
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            retry: RetryPolicy::from_config(&config.retry)?,
        })
    }

    /// GETs `url` with `query` and `headers` and decodes the body as JSON.
    pub async fn get_json(
        &self,
        url: &str,
        headers: &[(&str, String)],
        query: &[(&str, String)],
    ) -> Result<Value, FetchError> {
        let url = Url::parse_with_params(url, query.iter().map(|(k, v)| (*k, v.as_str())))
            .map_err(|e| FetchError::Request(format!("invalid URL {url}: {e}")))?;
        let method = Method::GET;
        let mut retries_done = 0;

        loop {
            let mut request = self.client.request(method.clone(), url.clone());
            for (name, value) in headers {
                request = request.header(*name, value);
            }

            debug!("{} {}", method, url);

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) if is_transport_failure(&e) => {
                    if self.retry.should_retry_transport(&method, retries_done) {
                        retries_done += 1;
                        let delay = with_jitter(self.retry.backoff(retries_done));
                        warn!(
                            "{} failed ({}), retry {}/{} in {:.1}s",
                            url,
                            e,
                            retries_done,
                            self.retry.max_retries,
                            delay.as_secs_f64()
                        );
                        sleep(delay).await;
                        continue;
                    }
                    return Err(FetchError::Transport {
                        url: url.to_string(),
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(FetchError::Request(e.to_string())),
            };

            let status = response.status();

            if status.is_success() {
                return response.json::<Value>().await.map_err(|e| {
                    if e.is_timeout() {
                        FetchError::Transport {
                            url: url.to_string(),
                            message: e.to_string(),
                        }
                    } else {
                        FetchError::payload(url.as_str(), e.to_string())
                    }
                });
            }

            if self
                .retry
                .should_retry_status(&method, status.as_u16(), retries_done)
            {
                retries_done += 1;
                let delay = retry_after(response.headers())
                    .unwrap_or_else(|| with_jitter(self.retry.backoff(retries_done)));
                warn!(
                    "{} returned {}, retry {}/{} in {:.1}s",
                    url,
                    status,
                    retries_done,
                    self.retry.max_retries,
                    delay.as_secs_f64()
                );
                sleep(delay).await;
                continue;
            }

            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn policy(count: u32, backoff_factor: f64) -> RetryPolicy {
        RetryPolicy::from_config(&RetryConfig {
            count,
            backoff_factor,
            ..RetryConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn retries_forcelisted_statuses_until_budget_is_spent() {
        let policy = policy(2, 0.5);
        assert!(policy.should_retry_status(&Method::GET, 503, 0));
        assert!(policy.should_retry_status(&Method::GET, 429, 1));
        assert!(!policy.should_retry_status(&Method::GET, 503, 2));
    }

    #[test]
    fn other_statuses_are_not_retried() {
        let policy = policy(5, 0.5);
        assert!(!policy.should_retry_status(&Method::GET, 404, 0));
        assert!(!policy.should_retry_status(&Method::GET, 403, 0));
    }

    #[test]
    fn methods_outside_the_allow_list_are_not_retried() {
        let policy = policy(5, 0.5);
        assert!(!policy.should_retry_transport(&Method::POST, 0));
        assert!(!policy.should_retry_status(&Method::POST, 503, 0));
        assert!(policy.should_retry_transport(&Method::HEAD, 0));
    }

    #[test]
    fn method_names_are_case_insensitive() {
        let policy = RetryPolicy::from_config(&RetryConfig {
            allowed_methods: vec!["get".into()],
            ..RetryConfig::default()
        })
        .unwrap();
        assert!(policy.should_retry_transport(&Method::GET, 0));
    }

    #[test]
    fn backoff_grows_exponentially_and_is_capped() {
        let policy = policy(10, 0.5);
        assert_eq!(policy.backoff(1), Duration::ZERO);
        assert_eq!(policy.backoff(2), Duration::from_secs(1));
        assert_eq!(policy.backoff(3), Duration::from_secs(2));
        assert_eq!(policy.backoff(4), Duration::from_secs(4));
        assert_eq!(policy.backoff(20), BACKOFF_MAX);
    }

    #[test]
    fn zero_factor_disables_backoff() {
        let policy = policy(5, 0.0);
        assert_eq!(policy.backoff(4), Duration::ZERO);
    }

    #[test]
    fn jitter_never_shortens_the_delay() {
        let delay = Duration::from_secs(2);
        let jittered = with_jitter(delay);
        assert!(jittered >= delay);
        assert!(jittered <= delay.mul_f64(1.0 + BACKOFF_JITTER));
    }

    #[test]
    fn retry_after_reads_numeric_seconds_only() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(7)));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("3600"));
        assert_eq!(retry_after(&headers), Some(BACKOFF_MAX));

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(retry_after(&headers), None);
    }

    #[tokio::test]
    async fn invalid_url_is_a_request_error() {
        let client = HttpClient::new(&Config::default()).unwrap();
        let err = client.get_json("not a url", &[], &[]).await.unwrap_err();
        assert!(matches!(err, FetchError::Request(_)));
    }

    #[tokio::test]
    async fn malformed_header_is_a_request_error() {
        let client = HttpClient::new(&Config::default()).unwrap();
        let err = client
            .get_json(
                "http://127.0.0.1:1/vacancies",
                &[("X Api App Id", "key".to_string())],
                &[],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Request(_)), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn connection_dropped_mid_request_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                drop(socket);
            }
        });

        let mut config = Config::default();
        config.retry.count = 0;
        let client = HttpClient::new(&config).unwrap();

        let err = client
            .get_json(&format!("http://{addr}/vacancies"), &[], &[])
            .await
            .unwrap_err();
        assert!(err.is_transport(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let mut config = Config::default();
        config.retry.count = 1;
        config.retry.backoff_factor = 0.0;
        let client = HttpClient::new(&config).unwrap();

        // nothing listens on port 1
        let err = client
            .get_json("http://127.0.0.1:1/vacancies", &[], &[("page", "0".into())])
            .await
            .unwrap_err();
        assert!(err.is_transport(), "unexpected error: {err}");
    }
}
