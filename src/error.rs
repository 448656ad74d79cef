//! Error types for the dashboard and the proxy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// A rover name that is not one of the known rovers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown rover '{0}'")]
pub struct UnknownRover(pub String);

/// Failures while fetching photos from the proxy.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("request to the proxy failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The proxy answered with a non-success status.
    #[error("proxy returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The body was not JSON or did not have the expected shape.
    #[error("could not decode proxy response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body decoded but cannot be turned into dashboard state.
    #[error("malformed proxy response: {reason}")]
    Malformed { reason: String },

    /// The fetch task panicked before producing a result.
    #[error("photo fetch aborted: {0}")]
    Panicked(String),
}

/// Failures inside the proxy while talking to the upstream API.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error(transparent)]
    UnknownRover(#[from] UnknownRover),

    /// Transport failure; built with the URL stripped so the API key never
    /// reaches logs or responses.
    #[error("upstream request failed: {0}")]
    Upstream(reqwest::Error),

    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("upstream returned an unreadable body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Upstream(err.without_url())
    }
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::UnknownRover(_) => StatusCode::NOT_FOUND,
            ProxyError::Upstream(_) | ProxyError::UpstreamStatus(_) | ProxyError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Invalid or missing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing API key. Set API_KEY in the environment or your .env file")]
    MissingApiKey,

    #[error("invalid {name} URL '{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
