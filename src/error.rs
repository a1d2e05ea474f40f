use thiserror::Error;

/// Failure while fetching one page of vacancies.
///
/// The collector only cares about one distinction: whether the failure
/// happened at the transport level (connection refused, timeout) or not.
/// Transport failures trigger the cool-down sleep before the next category.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection could not be established or timed out after all retries
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// Non-2xx response that retries did not resolve
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Body was not JSON or lacked the fields the provider expects
    #[error("unexpected payload from {origin}: {message}")]
    Payload { origin: String, message: String },

    /// Any other client-side failure (invalid URL, redirect loop, ...)
    #[error("request error: {0}")]
    Request(String),
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }

    pub fn payload(origin: &str, message: impl Into<String>) -> Self {
        FetchError::Payload {
            origin: origin.to_string(),
            message: message.into(),
        }
    }
}

/// Invalid or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("logging level '{0}' is not one of DEBUG, INFO, WARNING, ERROR, CRITICAL")]
    InvalidLogLevel(String),

    #[error("invalid value '{value}' in {key}")]
    InvalidList { key: String, value: String },

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("SUPERJOB_API_KEY must be set when the superjob provider is enabled")]
    MissingApiKey,
}
