//! WHM Provisioner Core Library
//!
//! Order lifecycle adapter for a billing platform: provisions, suspends,
//! upgrades and removes cPanel hosting accounts through the WHM API, keeping
//! one external account record per order.
//!
//! Storage and customer notifications belong to the host platform and are
//! injected through the [`ExternalAccountRepository`] and [`Notifier`] traits.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use whm_provisioner_core::types::Credentials;
//! use whm_provisioner_core::{
//!     InMemoryExternalAccountRepository, ProvisioningService, ServiceContext,
//! };
//!
//! # async fn run() -> whm_provisioner_core::CoreResult<()> {
//! let credentials = Credentials::new("https://panel.example.com:2087", "root", "TOKEN")?;
//! let ctx = ServiceContext::from_credentials(
//!     credentials,
//!     Arc::new(InMemoryExternalAccountRepository::new()),
//! )?;
//! let service = ProvisioningService::new(Arc::new(ctx));
//! service.test_connection().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{PluginDescriptorService, ProvisioningService, ServiceContext};
pub use traits::{ExternalAccountRepository, InMemoryExternalAccountRepository, Notifier};
