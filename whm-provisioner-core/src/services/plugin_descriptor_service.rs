//! Plugin descriptor service
//!
//! Describes the extension to the host platform: metadata and the
//! configuration fields it renders for servers, packages and checkout.

use std::sync::Arc;

use whm_provisioner_client::Credentials;

use crate::error::CoreResult;
use crate::types::{
    ConfigField, FieldType, ManagementAction, PackageInfo, PluginMetadata, SelectOption,
    ValidationRule,
};

use super::ServiceContext;

/// Semver range of host platform versions this extension targets.
const HOST_VERSION: &str = ">=0.9.0";

/// Plugin descriptor service
pub struct PluginDescriptorService {
    ctx: Arc<ServiceContext>,
}

impl PluginDescriptorService {
    /// Create plugin descriptor service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Static extension metadata.
    #[must_use]
    pub fn metadata() -> PluginMetadata {
        PluginMetadata {
            name: "WHM".to_string(),
            author: "whm-provisioner".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            host_version: HOST_VERSION.to_string(),
            description: "Provision cPanel hosting accounts on a WHM server".to_string(),
        }
    }

    /// Fields an administrator fills in when adding a server.
    ///
    /// Keys match what [`Credentials::from_map`] reads.
    #[must_use]
    pub fn setup_config_fields() -> Vec<ConfigField> {
        vec![
            ConfigField::new(Credentials::HOSTNAME_KEY, "Hostname", FieldType::Url)
                .with_rules(vec![ValidationRule::Required, ValidationRule::Url])
                .with_help("Including scheme and port, e.g. https://panel.example.com:2087"),
            ConfigField::new(Credentials::USER_KEY, "Username", FieldType::Text)
                .with_rules(vec![ValidationRule::Required]),
            ConfigField::new(Credentials::TOKEN_KEY, "API Token", FieldType::Password)
                .with_rules(vec![ValidationRule::Required])
                .with_help("Created under Development > Manage API Tokens"),
        ]
    }

    /// Fields an administrator fills in per product package.
    ///
    /// The plan select lists the plans currently configured on the server.
    pub async fn package_config_fields(&self) -> CoreResult<Vec<ConfigField>> {
        let plans = self
            .ctx
            .api
            .list_packages()
            .await
            .map_err(|e| self.ctx.report("list packages", e.into()))?;

        let mut field = ConfigField::new(PackageInfo::PLAN_KEY, "Package", FieldType::Select)
            .with_rules(vec![ValidationRule::Required]);
        field.options = plans
            .into_iter()
            .map(|(value, label)| SelectOption { value, label })
            .collect();
        Ok(vec![field])
    }

    /// Fields shown to the customer at checkout. None.
    #[must_use]
    pub fn checkout_config_fields() -> Vec<ConfigField> {
        Vec::new()
    }

    /// Extra buttons on the order management page. None.
    #[must_use]
    pub fn management_actions() -> Vec<ManagementAction> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_context;
    use crate::types::ProvisioningOptions;
    use std::collections::HashMap;
    use whm_provisioner_client::ApiError;

    #[test]
    fn metadata_carries_crate_version() {
        let meta = PluginDescriptorService::metadata();
        assert_eq!(meta.name, "WHM");
        assert_eq!(meta.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn setup_fields_build_credentials() {
        let fields = PluginDescriptorService::setup_config_fields();
        let keys: Vec<_> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["hostname", "username", "token"]);
        assert!(
            fields
                .iter()
                .all(|f| f.rules.contains(&ValidationRule::Required))
        );
        assert_eq!(fields[2].field_type, FieldType::Password);

        let values: HashMap<String, String> = [
            ("hostname", "https://panel.example.com:2087"),
            ("username", "root"),
            ("token", "TOKEN"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert!(Credentials::from_map(&values).is_ok());
    }

    #[test]
    fn checkout_and_actions_are_empty() {
        assert!(PluginDescriptorService::checkout_config_fields().is_empty());
        assert!(PluginDescriptorService::management_actions().is_empty());
    }

    #[tokio::test]
    async fn package_fields_list_remote_plans() {
        let (ctx, api, _, _) = create_test_context(ProvisioningOptions::default());
        api.respond_with(serde_json::json!({
            "package": [{"name": "gold"}, {"name": "bronze"}]
        }))
        .await;

        let svc = PluginDescriptorService::new(ctx);
        let fields = svc.package_config_fields().await.unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].key, PackageInfo::PLAN_KEY);
        assert_eq!(fields[0].field_type, FieldType::Select);
        let values: Vec<_> = fields[0].options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["bronze", "gold"]);
    }

    #[tokio::test]
    async fn package_fields_fail_when_server_unreachable() {
        let (ctx, api, _, _) = create_test_context(ProvisioningOptions::default());
        api.fail_next(ApiError::Unknown {
            endpoint: "listpkgs".into(),
            status: None,
            detail: "connection refused".into(),
        })
        .await;

        let err = PluginDescriptorService::new(ctx)
            .package_config_fields()
            .await
            .unwrap_err();
        assert!(!err.is_expected());
    }
}
