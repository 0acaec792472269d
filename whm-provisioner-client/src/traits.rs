use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ApiResponse, ProvisioningRequest};

/// WHM json-api access.
///
/// [`WhmClient`](crate::WhmClient) is the HTTP implementation. The lifecycle
/// layer only depends on this trait, so hosts and tests can substitute their
/// own transport.
#[async_trait]
pub trait WhmApi: Send + Sync {
    /// Base URL of the control panel, without trailing slash.
    fn hostname(&self) -> &str;

    /// Send one authenticated request and classify the outcome.
    ///
    /// On HTTP success the parsed body is returned unchanged; HTTP-200
    /// rejections are left for the caller to inspect with
    /// [`ApiResponse::ensure_accepted`].
    async fn call(&self, request: &ProvisioningRequest) -> Result<ApiResponse>;

    /// List the hosting packages configured on the server as a
    /// plan-name → plan-name map.
    ///
    /// A refused `listpkgs` is an [`ApiError::Rejected`](crate::ApiError::Rejected),
    /// never an empty map.
    async fn list_packages(&self) -> Result<BTreeMap<String, String>> {
        let request = ProvisioningRequest::get("listpkgs");
        let response = self.call(&request).await?.ensure_accepted(&request)?;
        Ok(response.package_names())
    }
}
