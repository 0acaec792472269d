//! 类型定义模块

mod account;
mod context;
mod notification;
mod options;
mod plugin;

pub use account::{AccountState, ExternalAccount};
pub use context::{OrderContext, PackageInfo, UserInfo};
pub use notification::{Notification, NotificationButton};
pub use options::{ProvisioningOptions, TerminationPolicy};
pub use plugin::{
    ConfigField, FieldType, ManagementAction, PluginMetadata, SelectOption, ValidationRule,
};

// Re-export client 库的公共类型
pub use whm_provisioner_client::{ApiResponse, Credentials, HttpMethod, ProvisioningRequest};
