//! 业务逻辑服务层

mod plugin_descriptor_service;
mod provisioning_service;

pub use plugin_descriptor_service::PluginDescriptorService;
pub use provisioning_service::ProvisioningService;

use std::sync::Arc;

use whm_provisioner_client::{Credentials, WhmApi, WhmClient};

use crate::error::{CoreError, CoreResult};
use crate::traits::{ExternalAccountRepository, LogNotifier, Notifier};
use crate::types::ProvisioningOptions;

/// 服务上下文 - 持有所有依赖
///
/// The host platform builds this once per configured server and injects its
/// own storage and notification implementations.
pub struct ServiceContext {
    /// Control-panel API
    pub api: Arc<dyn WhmApi>,
    /// External account persistence
    pub accounts: Arc<dyn ExternalAccountRepository>,
    /// Customer notifications
    pub notifier: Arc<dyn Notifier>,
    /// Adapter tunables
    pub options: ProvisioningOptions,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        api: Arc<dyn WhmApi>,
        accounts: Arc<dyn ExternalAccountRepository>,
        notifier: Arc<dyn Notifier>,
        options: ProvisioningOptions,
    ) -> Self {
        Self {
            api,
            accounts,
            notifier,
            options,
        }
    }

    /// Build a context around an HTTP [`WhmClient`] for the given credentials,
    /// with the logging notifier and default options.
    pub fn from_credentials(
        credentials: Credentials,
        accounts: Arc<dyn ExternalAccountRepository>,
    ) -> CoreResult<Self> {
        credentials.validate()?;
        let client = WhmClient::new(credentials)?;
        Ok(Self::new(
            Arc::new(client),
            accounts,
            Arc::new(LogNotifier),
            ProvisioningOptions::default(),
        ))
    }

    /// Log an error at a level matching how expected it is, and pass it on.
    pub(crate) fn report(&self, operation: &str, err: CoreError) -> CoreError {
        if err.is_expected() {
            log::warn!("{operation} failed: {err}");
        } else {
            log::error!("{operation} failed: {err}");
        }
        err
    }
}
