//! HTTP plumbing shared by every json-api call
//!
//! Sends a prepared request, logs it, reads the body and turns the HTTP
//! status into either the raw body or a classified [`ApiError`].
//! There is no retry here: every call is exactly one round trip.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::utils::log_sanitizer::truncate_for_log;

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Create the HTTP client with connect/request timeouts.
pub(crate) fn create_http_client() -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| ApiError::Unknown {
            endpoint: String::new(),
            status: None,
            detail: format!("failed to create HTTP client: {e}"),
        })
}

/// HTTP tool function set
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns status code and response text.
    ///
    /// Transport failures (DNS, connect, TLS, timeout, body read) are reported
    /// as [`ApiError::Unknown`] without a status.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        endpoint: &str,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String), ApiError> {
        log::debug!("[whm] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            let detail = if e.is_timeout() {
                format!("request timed out: {e}")
            } else {
                format!("network error: {e}")
            };
            log::warn!("[whm] {method_name} {url} failed: {detail}");
            ApiError::Unknown {
                endpoint: endpoint.to_string(),
                status: None,
                detail,
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[whm] Response Status: {status_code}");

        let response_text = response.text().await.map_err(|e| ApiError::Unknown {
            endpoint: endpoint.to_string(),
            status: Some(status_code),
            detail: format!("failed to read response body: {e}"),
        })?;

        log::debug!("[whm] Response Body: {}", truncate_for_log(&response_text));

        Ok((status_code, response_text))
    }

    /// Classify a non-success status.
    ///
    /// Returns `None` for 2xx statuses.
    pub fn classify_status(
        status_code: u16,
        body: &str,
        endpoint: &str,
        host: &str,
    ) -> Option<ApiError> {
        if (200..300).contains(&status_code) {
            return None;
        }

        let error = match status_code {
            404 => ApiError::NotFound {
                endpoint: endpoint.to_string(),
                host: host.to_string(),
            },
            403 => ApiError::Forbidden {
                endpoint: endpoint.to_string(),
                raw_message: (!body.trim().is_empty()).then(|| truncate_for_log(body)),
            },
            _ => ApiError::Unknown {
                endpoint: endpoint.to_string(),
                status: Some(status_code),
                detail: if body.trim().is_empty() {
                    "empty response body".to_string()
                } else {
                    truncate_for_log(body)
                },
            },
        };
        Some(error)
    }

    /// Parse a success body, which must be a JSON object.
    pub fn parse_object(response_text: &str, endpoint: &str) -> Result<Map<String, Value>, ApiError> {
        match serde_json::from_str::<Value>(response_text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => {
                log::error!("[whm] {endpoint}: expected a JSON object, got {other}");
                Err(ApiError::Unknown {
                    endpoint: endpoint.to_string(),
                    status: None,
                    detail: "response body is not a JSON object".to_string(),
                })
            }
            Err(e) => {
                log::error!("[whm] {endpoint}: JSON parse failed: {e}");
                log::error!("[whm] Raw response: {}", truncate_for_log(response_text));
                Err(ApiError::Unknown {
                    endpoint: endpoint.to_string(),
                    status: None,
                    detail: format!("invalid JSON in response: {e}"),
                })
            }
        }
    }
}
