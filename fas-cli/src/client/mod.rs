use std::fmt;

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod endpoint;
mod esr;
mod psd;

#[cfg(test)]
pub(crate) mod mock;

pub use endpoint::{CommodityCode, CountryCode, Endpoint, MarketYear};

pub const DEFAULT_BASE_URL: &str = "https://api.fas.usda.gov";
pub const API_KEY_ENV: &str = "USDA_API_KEY";
const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("USDA_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("API key is not a valid header value (it must be printable ASCII)")]
    InvalidApiKey,

    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error ({status}) from {url}: {body}")]
    Http {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("failed to decode JSON from {url}: {source}\nResponse: {body}")]
    Decode {
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingApiKey | Self::InvalidApiKey | Self::InvalidBaseUrl { .. } => 2,
            Self::Network { .. } => 3,
            Self::Http { .. } => 4,
            Self::Decode { .. } => 5,
            Self::ClientBuild(_) => 1,
        }
    }
}

/// The static credential attached to every request.
#[derive(Clone)]
pub struct ApiKey(HeaderValue);

impl ApiKey {
    /// Resolve the key from its raw (environment or flag) value.
    pub fn from_value(raw: Option<&str>) -> Result<Self, ApiError> {
        let key = raw.map(str::trim).filter(|k| !k.is_empty());
        let key = key.ok_or(ApiError::MissingApiKey)?;
        let mut value = HeaderValue::from_str(key).map_err(|_| ApiError::InvalidApiKey)?;
        value.set_sensitive(true);
        Ok(Self(value))
    }

    /// First eight and last four characters, for logs. Keys too short to
    /// hide anything that way are fully starred.
    pub fn masked(&self) -> String {
        // from_str only accepts visible ASCII, so byte offsets are char offsets
        let key = self.0.to_str().unwrap_or_default();
        if key.len() <= 12 {
            return "****".to_string();
        }
        format!(
            "{}...{}",
            &key[..8.min(key.len())],
            &key[key.len().saturating_sub(4)..]
        )
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.masked())
    }
}

pub struct FasClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl FasClient {
    pub fn new(base_url: &str, api_key: ApiKey) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = Client::builder().build().map_err(ApiError::ClientBuild)?;

        debug!(base_url, api_key = %api_key.masked(), "created FAS client");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Issue one authenticated GET and hand back the body as decoded JSON.
    pub async fn get_json(&self, endpoint: &Endpoint) -> Result<Value, ApiError> {
        let url = self.url_for(endpoint);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.api_key.0.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        debug!(%url, %status, "response received");

        let body = response.text().await.map_err(|source| ApiError::Network {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(ApiError::Http { status, url, body });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, body, source })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::mock::MockServer;
    use super::*;

    fn key() -> ApiKey {
        ApiKey::from_value(Some("abcdefgh-1234-wxyz")).unwrap()
    }

    #[test]
    fn missing_or_blank_key_is_a_config_error() {
        for raw in [None, Some(""), Some("   ")] {
            let err = ApiKey::from_value(raw).unwrap_err();
            assert!(matches!(err, ApiError::MissingApiKey));
            assert_eq!(err.exit_code(), 2);
        }
    }

    #[test]
    fn key_with_control_characters_is_rejected() {
        let err = ApiKey::from_value(Some("abc\ndef")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidApiKey));
    }

    #[test]
    fn key_is_masked_in_debug_output() {
        let debug = format!("{:?}", key());
        assert_eq!(debug, "ApiKey(abcdefgh...wxyz)");
        assert!(!debug.contains("1234"));
    }

    #[test]
    fn short_keys_are_fully_hidden() {
        for raw in ["k", "shortkey", "shortkey12ab"] {
            let key = ApiKey::from_value(Some(raw)).unwrap();
            assert_eq!(key.masked(), "****");
            assert!(!format!("{:?}", key).contains(raw));
        }
        let key = ApiKey::from_value(Some("shortkey12abc")).unwrap();
        assert_eq!(key.masked(), "shortkey...2abc");
    }

    #[test]
    fn client_build_failure_is_not_a_network_error() {
        let source = Client::new().get("not a url").build().unwrap_err();
        let err = ApiError::ClientBuild(source);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("failed to create HTTP client"));
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(matches!(
            FasClient::new("not a url", key()),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            FasClient::new("ftp://api.fas.usda.gov", key()),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let client = FasClient::new("https://api.fas.usda.gov/", key()).unwrap();
        assert_eq!(
            client.url_for(&Endpoint::Regions),
            "https://api.fas.usda.gov/api/psd/regions"
        );
    }

    #[tokio::test]
    async fn request_carries_credential_and_accept_headers() {
        let server = MockServer::start(200, "[]");
        let client = FasClient::new(&server.url(), key()).unwrap();

        client.get_json(&Endpoint::Countries).await.unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/api/psd/countries");
        assert_eq!(requests[0].header("x-api-key"), Some("abcdefgh-1234-wxyz"));
        assert_eq!(requests[0].header("accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn body_is_returned_verbatim() {
        let body = r#"{"rows":[{"a":1.5,"b":null,"c":["x",{"d":true}]}],"total":1}"#;
        let server = MockServer::start(200, body);
        let client = FasClient::new(&server.url(), key()).unwrap();

        let value = client.get_json(&Endpoint::EsrRegions).await.unwrap();

        assert_eq!(value, serde_json::from_str::<Value>(body).unwrap());
        assert_eq!(
            value,
            json!({"rows":[{"a":1.5,"b":null,"c":["x",{"d":true}]}],"total":1})
        );
    }

    #[tokio::test]
    async fn error_statuses_carry_status_and_body() {
        for (status, body) in [(404, "not found"), (500, r#"{"error":"boom"}"#)] {
            let server = MockServer::start(status, body);
            let client = FasClient::new(&server.url(), key()).unwrap();

            let err = client.get_json(&Endpoint::Commodities).await.unwrap_err();

            match &err {
                ApiError::Http {
                    status: got,
                    body: got_body,
                    ..
                } => {
                    assert_eq!(got.as_u16(), status);
                    assert_eq!(got_body, body);
                }
                other => panic!("expected HTTP error, got {other:?}"),
            }
            assert_eq!(err.exit_code(), 4);
        }
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error_with_raw_body() {
        let server = MockServer::start(200, "<html>maintenance</html>");
        let client = FasClient::new(&server.url(), key()).unwrap();

        let err = client.get_json(&Endpoint::Regions).await.unwrap_err();

        match &err {
            ApiError::Decode { body, .. } => assert_eq!(body, "<html>maintenance</html>"),
            other => panic!("expected decode error, got {other:?}"),
        }
        assert!(err.to_string().contains("<html>maintenance</html>"));
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let url = MockServer::unused_url();
        let client = FasClient::new(&url, key()).unwrap();

        let err = client.get_json(&Endpoint::Regions).await.unwrap_err();

        assert!(matches!(err, ApiError::Network { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
