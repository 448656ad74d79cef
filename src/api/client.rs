//! HTTP client for the proxy's rover endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::types::{PhotoEnvelope, RawPhoto};
use super::{PhotoSource, PHOTO_LIMIT};
use crate::error::{ConfigError, FetchError};
use crate::state::RoverName;

/// Fetches rover photos through the proxy server
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    /// Proxy base URL without a trailing slash (e.g., "http://localhost:3000")
    base_url: String,
}

impl ProxyClient {
    /// Create a client for the proxy at `base_url`
    ///
    /// Without a `timeout` requests wait as long as the transport allows.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        url::Url::parse(base_url).map_err(|source| ConfigError::InvalidUrl {
            name: "proxy",
            value: base_url.to_string(),
            source,
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ConfigError::Client)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `<proxy>/rovers/<rover>` and return at most the first five photos,
    /// in the order the proxy sent them
    pub async fn fetch_rover_photos(&self, rover: RoverName) -> Result<Vec<RawPhoto>, FetchError> {
        let url = format!("{}/rovers/{}", self.base_url, rover);
        debug!(%url, "fetching rover photos");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        let envelope: PhotoEnvelope = serde_json::from_slice(&body)?;
        let received = envelope.photos.len();

        let photos = envelope
            .photos
            .into_iter()
            .take(PHOTO_LIMIT)
            .map(serde_json::from_value)
            .collect::<Result<Vec<RawPhoto>, _>>()?;

        debug!(%rover, received, kept = photos.len(), "rover photos decoded");
        Ok(photos)
    }
}

#[async_trait]
impl PhotoSource for ProxyClient {
    async fn fetch_rover_photos(&self, rover: RoverName) -> Result<Vec<RawPhoto>, FetchError> {
        ProxyClient::fetch_rover_photos(self, rover).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::photos_payload;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_keeps_first_five_in_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rovers/Curiosity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(photos_payload("Curiosity", 8)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ProxyClient::new(&mock_server.uri(), None).unwrap();
        let photos = client.fetch_rover_photos(RoverName::Curiosity).await.unwrap();

        assert_eq!(photos.len(), 5);
        let ids: Vec<_> = photos.iter().map(|p| p.id.unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_fetch_returns_short_lists_unchanged() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rovers/Spirit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(photos_payload("Spirit", 2)))
            .mount(&mock_server)
            .await;

        let client = ProxyClient::new(&format!("{}/", mock_server.uri()), None).unwrap();
        let photos = client.fetch_rover_photos(RoverName::Spirit).await.unwrap();

        assert_eq!(photos.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_ignores_malformed_entries_past_the_limit() {
        let mock_server = MockServer::start().await;

        let mut payload = photos_payload("Opportunity", 5);
        payload["photos"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "img_src": 42 }));

        Mock::given(method("GET"))
            .and(path("/rovers/Opportunity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload))
            .mount(&mock_server)
            .await;

        let client = ProxyClient::new(&mock_server.uri(), None).unwrap();
        let photos = client.fetch_rover_photos(RoverName::Opportunity).await.unwrap();

        assert_eq!(photos.len(), 5);
    }

    #[tokio::test]
    async fn test_fetch_fails_on_non_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rovers/Curiosity"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&mock_server)
            .await;

        let client = ProxyClient::new(&mock_server.uri(), None).unwrap();
        let result = client.fetch_rover_photos(RoverName::Curiosity).await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_fails_when_photos_missing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rovers/Curiosity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errors": "No Photos" })))
            .mount(&mock_server)
            .await;

        let client = ProxyClient::new(&mock_server.uri(), None).unwrap();
        let result = client.fetch_rover_photos(RoverName::Curiosity).await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_fails_on_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rovers/Curiosity"))
            .respond_with(ResponseTemplate::new(502).set_body_json(json!({ "error": "upstream" })))
            .mount(&mock_server)
            .await;

        let client = ProxyClient::new(&mock_server.uri(), None).unwrap();
        let result = client.fetch_rover_photos(RoverName::Curiosity).await;

        assert!(matches!(result, Err(FetchError::Status { status: 502, .. })));
    }

    #[tokio::test]
    async fn test_fetch_fails_when_proxy_unreachable() {
        // Port 1 on loopback is never served
        let client = ProxyClient::new("http://127.0.0.1:1", Some(Duration::from_secs(2))).unwrap();
        let result = client.fetch_rover_photos(RoverName::Spirit).await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            ProxyClient::new("not a url", None),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
