//! # whm-provisioner-client
//!
//! Authenticated access to the WHM administrative json-api, limited to the
//! calls account provisioning needs.
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)*: Use rustls.
//! - **`native-tls`**: Use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use whm_provisioner_client::{Credentials, ProvisioningRequest, WhmApi, WhmClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::new("https://panel.example.com:2087", "root", "API-TOKEN")?;
//!     let client = WhmClient::new(credentials)?;
//!
//!     // Plans available for new accounts
//!     for plan in client.list_packages().await?.keys() {
//!         println!("{plan}");
//!     }
//!
//!     // Any other call
//!     let request = ProvisioningRequest::post("suspendacct").param("user", "alice142");
//!     let response = client.call(&request).await?.ensure_accepted(&request)?;
//!     println!("{:?}", response.get("metadata"));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`Result<T, ApiError>`](ApiError):
//!
//! - [`ApiError::NotFound`]: HTTP 404, wrong endpoint or host
//! - [`ApiError::Forbidden`]: HTTP 403, bad/expired token or missing permission
//! - [`ApiError::Unknown`]: any other failing status or transport failure
//! - [`ApiError::AccountExists`] / [`ApiError::Rejected`]: HTTP 200 answers the
//!   remote flagged as failed (see [`ApiResponse::ensure_accepted`])
//!
//! Nothing is retried automatically.

mod client;
mod error;
mod http_client;
mod traits;
mod types;
mod utils;

pub use client::WhmClient;
pub use error::{ApiError, Result};
pub use traits::WhmApi;
pub use types::{
    ApiResponse, CredentialValidationError, Credentials, HttpMethod, ProvisioningRequest,
};

pub use utils::log_sanitizer;
