use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

// ============ Credentials ============

/// Validation error for [`Credentials`].
///
/// Returned when a field is missing, blank, or has an invalid format. No API
/// call is attempted with credentials that fail validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required field is missing entirely.
    MissingField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A field is present but empty/whitespace-only.
    EmptyField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A field is present but malformed.
    InvalidFormat {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
        /// Description of what's wrong with the format.
        reason: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
            Self::InvalidFormat { label, reason, .. } => write!(f, "{label}: {reason}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Connection settings for one WHM server.
///
/// Loaded once by the host platform and injected into the client; immutable
/// for the lifetime of a request. Construct with [`Credentials::new`] or
/// [`Credentials::from_map`], both of which validate.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    hostname: String,
    api_user: String,
    api_token: String,
}

impl Credentials {
    /// Settings key of the hostname field.
    pub const HOSTNAME_KEY: &'static str = "hostname";
    /// Settings key of the API user field.
    pub const USER_KEY: &'static str = "username";
    /// Settings key of the API token field.
    pub const TOKEN_KEY: &'static str = "token";

    pub(crate) const HOSTNAME_LABEL: &'static str = "Hostname";
    pub(crate) const USER_LABEL: &'static str = "API Username";
    pub(crate) const TOKEN_LABEL: &'static str = "API Token";

    /// Build and validate credentials.
    ///
    /// A trailing `/` on the hostname is dropped so that URL joins stay clean.
    pub fn new(
        hostname: impl Into<String>,
        api_user: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, CredentialValidationError> {
        let hostname = hostname.into();
        let credentials = Self {
            hostname: hostname.trim().trim_end_matches('/').to_string(),
            api_user: api_user.into().trim().to_string(),
            api_token: api_token.into().trim().to_string(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Construct credentials from the host's flat settings map.
    ///
    /// Expects the keys [`HOSTNAME_KEY`](Self::HOSTNAME_KEY),
    /// [`USER_KEY`](Self::USER_KEY) and [`TOKEN_KEY`](Self::TOKEN_KEY).
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, CredentialValidationError> {
        let hostname = Self::get_required_field(map, Self::HOSTNAME_KEY, Self::HOSTNAME_LABEL)?;
        let api_user = Self::get_required_field(map, Self::USER_KEY, Self::USER_LABEL)?;
        let api_token = Self::get_required_field(map, Self::TOKEN_KEY, Self::TOKEN_LABEL)?;
        Self::new(hostname, api_user, api_token)
    }

    /// Convert back to the flat settings representation.
    pub fn to_map(&self) -> HashMap<String, String> {
        [
            (Self::HOSTNAME_KEY.to_string(), self.hostname.clone()),
            (Self::USER_KEY.to_string(), self.api_user.clone()),
            (Self::TOKEN_KEY.to_string(), self.api_token.clone()),
        ]
        .into()
    }

    /// Check the invariants: every field non-blank, hostname an http(s) URL
    /// with a host.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        Self::require_non_empty(&self.hostname, Self::HOSTNAME_KEY, Self::HOSTNAME_LABEL)?;
        Self::require_non_empty(&self.api_user, Self::USER_KEY, Self::USER_LABEL)?;
        Self::require_non_empty(&self.api_token, Self::TOKEN_KEY, Self::TOKEN_LABEL)?;

        let invalid = |reason: String| CredentialValidationError::InvalidFormat {
            field: Self::HOSTNAME_KEY.to_string(),
            label: Self::HOSTNAME_LABEL.to_string(),
            reason,
        };
        let parsed = url::Url::parse(&self.hostname).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "unsupported scheme '{}', expected http or https",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(invalid("URL has no host".to_string()));
        }
        Ok(())
    }

    /// Base URL of the control panel, without trailing slash.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// API username.
    pub fn api_user(&self) -> &str {
        &self.api_user
    }

    /// API token.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Host part of the hostname URL, for diagnostics.
    pub fn host(&self) -> String {
        url::Url::parse(&self.hostname)
            .ok()
            .and_then(|u| u.host_str().map(ToString::to_string))
            .unwrap_or_else(|| self.hostname.clone())
    }

    /// Value of the `Authorization` header.
    pub(crate) fn authorization_header(&self) -> String {
        format!("whm {}:{}", self.api_user, self.api_token)
    }

    fn get_required_field(
        map: &HashMap<String, String>,
        key: &str,
        label: &str,
    ) -> Result<String, CredentialValidationError> {
        match map.get(key) {
            None => Err(CredentialValidationError::MissingField {
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) => {
                Self::require_non_empty(v, key, label)?;
                Ok(v.clone())
            }
        }
    }

    fn require_non_empty(
        value: &str,
        key: &str,
        label: &str,
    ) -> Result<(), CredentialValidationError> {
        if value.trim().is_empty() {
            return Err(CredentialValidationError::EmptyField {
                field: key.to_string(),
                label: label.to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("hostname", &self.hostname)
            .field("api_user", &self.api_user)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

// ============ Requests ============

/// HTTP method of a json-api request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read/list semantics. Parameters go in the query string.
    #[default]
    Get,
    /// Mutating call. Parameters go in a form-encoded body.
    Post,
    /// Mutating call. Parameters go in a form-encoded body.
    Put,
    /// Parameters go in the query string.
    Delete,
}

impl HttpMethod {
    /// Whether parameters travel in the request body rather than the query.
    pub fn sends_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

/// API-ready representation of one operation.
///
/// Built fresh per call; nothing is shared between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningRequest {
    /// Endpoint below `/json-api/` (e.g. `createacct`).
    pub endpoint: String,
    /// Key/value parameters.
    pub params: BTreeMap<String, String>,
    /// HTTP method.
    pub method: HttpMethod,
}

impl ProvisioningRequest {
    /// A parameterless request.
    pub fn new(endpoint: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: BTreeMap::new(),
            method,
        }
    }

    /// A `GET` request.
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, HttpMethod::Get)
    }

    /// A `POST` request.
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, HttpMethod::Post)
    }

    /// Add a parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Parameter value, if set.
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

// ============ Responses ============

/// Parsed body of a successful json-api call.
///
/// Exposed as a mapping from string keys to JSON values; callers extract the
/// fields they need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiResponse(Map<String, Value>);

impl ApiResponse {
    /// Wrap an already-parsed JSON object.
    pub fn new(body: Map<String, Value>) -> Self {
        Self(body)
    }

    /// Value of a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the underlying mapping.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Reason the remote gave for refusing the operation, if it did.
    ///
    /// The control panel answers many failures with HTTP 200 and a status flag
    /// in the body, in one of two shapes:
    /// - `{"metadata": {"result": 0, "reason": "..."}}`
    /// - `{"<field>": [{"status": 0, "statusmsg": "..."}]}`
    pub fn rejection_reason(&self) -> Option<String> {
        if let Some(metadata) = self.0.get("metadata").and_then(Value::as_object)
            && metadata.get("result").and_then(flag_value) == Some(false)
        {
            return Some(text_field(metadata, "reason"));
        }

        self.0
            .values()
            .filter_map(Value::as_array)
            .filter_map(|entries| entries.first().and_then(Value::as_object))
            .find(|entry| entry.get("status").and_then(flag_value) == Some(false))
            .map(|entry| text_field(entry, "statusmsg"))
    }

    /// Turn an HTTP-200 rejection into an [`ApiError`].
    ///
    /// A `createacct` rejection that says the account already exists becomes
    /// [`ApiError::AccountExists`]; everything else becomes
    /// [`ApiError::Rejected`].
    pub fn ensure_accepted(self, request: &ProvisioningRequest) -> Result<Self, ApiError> {
        let Some(reason) = self.rejection_reason() else {
            return Ok(self);
        };

        if request.endpoint == "createacct" && is_collision(&reason) {
            return Err(ApiError::AccountExists {
                username: request.get_param("username").unwrap_or_default().to_string(),
                reason,
            });
        }

        Err(ApiError::Rejected {
            endpoint: request.endpoint.clone(),
            reason,
        })
    }

    /// Names listed in the `package` field of a `listpkgs` answer.
    ///
    /// Entries are objects carrying a `name`, or bare strings. The result maps
    /// each plan name to itself, ordered by name.
    pub fn package_names(&self) -> BTreeMap<String, String> {
        self.0
            .get("package")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| match entry {
                        Value::String(name) => Some(name.clone()),
                        Value::Object(obj) => obj
                            .get("name")
                            .and_then(Value::as_str)
                            .map(ToString::to_string),
                        _ => None,
                    })
                    .map(|name| (name.clone(), name))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl From<Map<String, Value>> for ApiResponse {
    fn from(body: Map<String, Value>) -> Self {
        Self(body)
    }
}

/// The remote encodes status flags as numbers, numeric strings or booleans.
fn flag_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => s.trim().parse::<i64>().ok().map(|n| n != 0),
        _ => None,
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map_or_else(|| "no reason given".to_string(), ToString::to_string)
}

fn is_collision(reason: &str) -> bool {
    let lower = reason.to_lowercase();
    lower.contains("already exists") || lower.contains("already taken")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> ApiResponse {
        match value {
            Value::Object(map) => ApiResponse::new(map),
            other => panic!("expected object, got {other}"),
        }
    }

    // ---- Credentials ----

    #[test]
    fn credentials_trim_trailing_slash() {
        let c = Credentials::new("https://panel.example.com/", "root", "tok").unwrap();
        assert_eq!(c.hostname(), "https://panel.example.com");
        assert_eq!(c.host(), "panel.example.com");
    }

    #[test]
    fn credentials_reject_blank_token() {
        let err = Credentials::new("https://panel.example.com", "root", "  ").unwrap_err();
        assert!(matches!(
            err,
            CredentialValidationError::EmptyField { ref field, .. } if field == "token"
        ));
    }

    #[test]
    fn credentials_reject_non_url_hostname() {
        let err = Credentials::new("panel.example.com", "root", "tok").unwrap_err();
        assert!(matches!(
            err,
            CredentialValidationError::InvalidFormat { ref field, .. } if field == "hostname"
        ));
    }

    #[test]
    fn credentials_reject_ftp_scheme() {
        let err = Credentials::new("ftp://panel.example.com", "root", "tok").unwrap_err();
        assert!(matches!(err, CredentialValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn credentials_from_map_missing_user() {
        let map: HashMap<String, String> = [
            ("hostname".to_string(), "https://panel.example.com".to_string()),
            ("token".to_string(), "tok".to_string()),
        ]
        .into();
        let err = Credentials::from_map(&map).unwrap_err();
        assert!(matches!(
            err,
            CredentialValidationError::MissingField { ref field, .. } if field == "username"
        ));
    }

    #[test]
    fn credentials_map_roundtrip() {
        let c = Credentials::new("https://panel.example.com:2087", "root", "tok").unwrap();
        let back = Credentials::from_map(&c.to_map()).unwrap();
        assert_eq!(c, back);
    }

    #[test]
    fn credentials_debug_hides_token() {
        let c = Credentials::new("https://panel.example.com", "root", "s3cret-token").unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("s3cret-token"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn authorization_header_format() {
        let c = Credentials::new("https://panel.example.com", "root", "ABC123").unwrap();
        assert_eq!(c.authorization_header(), "whm root:ABC123");
    }

    // ---- HttpMethod ----

    #[test]
    fn method_body_placement() {
        assert!(!HttpMethod::Get.sends_body());
        assert!(HttpMethod::Post.sends_body());
        assert!(HttpMethod::Put.sends_body());
        assert!(!HttpMethod::Delete.sends_body());
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    // ---- ApiResponse ----

    #[test]
    fn accepted_when_no_status_flags() {
        let resp = response(json!({"package": []}));
        assert_eq!(resp.rejection_reason(), None);
    }

    #[test]
    fn metadata_result_zero_is_rejection() {
        let resp = response(json!({"metadata": {"result": 0, "reason": "No such user"}}));
        assert_eq!(resp.rejection_reason().as_deref(), Some("No such user"));
    }

    #[test]
    fn metadata_result_one_is_accepted() {
        let resp = response(json!({"metadata": {"result": 1, "reason": "OK"}}));
        assert_eq!(resp.rejection_reason(), None);
    }

    #[test]
    fn legacy_status_list_rejection() {
        let resp = response(json!({"result": [{"status": "0", "statusmsg": "Account is locked"}]}));
        assert_eq!(resp.rejection_reason().as_deref(), Some("Account is locked"));
    }

    #[test]
    fn createacct_collision_is_account_exists() {
        let req = ProvisioningRequest::post("createacct").param("username", "alice142");
        let resp = response(json!({
            "result": [{"status": 0, "statusmsg": "Sorry, a group for that username already exists."}]
        }));
        let err = resp.ensure_accepted(&req).unwrap_err();
        assert!(matches!(
            err,
            ApiError::AccountExists { ref username, .. } if username == "alice142"
        ));
    }

    #[test]
    fn other_rejection_is_rejected() {
        let req = ProvisioningRequest::post("suspendacct").param("user", "alice142");
        let resp = response(json!({"metadata": {"result": 0, "reason": "User does not exist"}}));
        let err = resp.ensure_accepted(&req).unwrap_err();
        assert!(matches!(err, ApiError::Rejected { ref endpoint, .. } if endpoint == "suspendacct"));
    }

    #[test]
    fn package_names_from_objects_and_strings() {
        let resp = response(json!({
            "package": [{"name": "gold"}, "bronze", {"name": "silver", "QUOTA": 100}, 7]
        }));
        let names: Vec<_> = resp.package_names().into_keys().collect();
        assert_eq!(names, vec!["bronze", "gold", "silver"]);
    }

    #[test]
    fn package_names_missing_field() {
        assert!(response(json!({})).package_names().is_empty());
    }
}
