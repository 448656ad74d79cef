//! Client for the NASA API, holding the only copy of the API key.

use reqwest::Response;
use serde_json::Value;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::{ConfigError, ProxyError};
use crate::state::RoverName;

/// Forwards requests to the upstream API with the server-held key
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ConfigError::Client)?;
        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Photos taken by `rover` on the configured sol and page, unfiltered
    pub async fn rover_photos(&self, rover: RoverName) -> Result<Value, ProxyError> {
        let url = self.endpoint(&format!("mars-photos/api/v1/rovers/{}/photos", rover.slug()));
        debug!(%url, sol = self.config.sol, page = self.config.page, "forwarding rover photos request");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("sol", self.config.sol.to_string()),
                ("page", self.config.page.to_string()),
                ("api_key", self.config.api_key.clone()),
            ])
            .send()
            .await?;

        read_json(response).await
    }

    /// Astronomy picture of the day
    pub async fn apod(&self) -> Result<Value, ProxyError> {
        let url = self.endpoint("planetary/apod");
        debug!(%url, "forwarding apod request");

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await?;

        read_json(response).await
    }
}

async fn read_json(response: Response) -> Result<Value, ProxyError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProxyError::UpstreamStatus(status.as_u16()));
    }

    response
        .json::<Value>()
        .await
        .map_err(|err| ProxyError::Decode(err.without_url().to_string()))
}
