//! WHM json-api client

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::http_client::{HttpUtils, create_http_client};
use crate::traits::WhmApi;
use crate::types::{ApiResponse, Credentials, ProvisioningRequest};
use crate::utils::log_sanitizer::params_for_log;

/// Path prefix of the administrative API.
pub(crate) const JSON_API_PREFIX: &str = "/json-api/";

/// HTTP client for one WHM server.
///
/// Holds validated [`Credentials`] and a pooled `reqwest` client. Cheap to
/// share behind an `Arc`; it keeps no per-request state.
pub struct WhmClient {
    client: Client,
    credentials: Credentials,
}

impl WhmClient {
    /// Create a client with the default timeouts (10 s connect, 30 s request).
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self::with_http_client(create_http_client()?, credentials))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http_client(client: Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// The credentials this client authenticates with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Full URL of an endpoint.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}{JSON_API_PREFIX}{}",
            self.credentials.hostname(),
            endpoint.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl WhmApi for WhmClient {
    fn hostname(&self) -> &str {
        self.credentials.hostname()
    }

    async fn call(&self, request: &ProvisioningRequest) -> Result<ApiResponse> {
        let endpoint = request.endpoint.trim_start_matches('/');
        let url = self.endpoint_url(endpoint);
        let method = request.method;

        log::debug!("[whm] Params: {}", params_for_log(&request.params));

        let mut builder = self
            .client
            .request(method.as_reqwest(), &url)
            .header("Authorization", self.credentials.authorization_header());
        builder = if method.sends_body() {
            builder.form(&request.params)
        } else {
            builder.query(&request.params)
        };

        let (status, body) =
            HttpUtils::execute_request(builder, endpoint, &method.to_string(), &url).await?;

        if let Some(err) =
            HttpUtils::classify_status(status, &body, endpoint, &self.credentials.host())
        {
            if err.is_expected() {
                log::warn!("[whm] {err}");
            } else {
                log::error!("[whm] {err}");
            }
            return Err(err);
        }

        let map = HttpUtils::parse_object(&body, endpoint)?;
        Ok(ApiResponse::new(map))
    }
}

impl std::fmt::Debug for WhmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhmClient")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
