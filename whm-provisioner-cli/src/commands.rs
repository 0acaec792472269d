//! Subcommand implementations
//!
//! Each command writes its result to `out`; diagnostics go through `tracing`.

use std::io::Write;

use anyhow::{Context, Result};
use serde_json::json;
use whm_provisioner_core::{PluginDescriptorService, ProvisioningService};

pub async fn test_connection(
    service: &ProvisioningService,
    hostname: &str,
    out: &mut impl Write,
) -> Result<()> {
    service
        .test_connection()
        .await
        .with_context(|| format!("connection to {hostname} failed"))?;
    writeln!(out, "Connected to {hostname}")?;
    Ok(())
}

pub async fn list_packages(
    service: &ProvisioningService,
    as_json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let packages = service
        .list_packages()
        .await
        .context("failed to list packages")?;

    if as_json {
        let names: Vec<&String> = packages.keys().collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&names)?)?;
    } else if packages.is_empty() {
        tracing::warn!("No packages are configured on the server");
    } else {
        for name in packages.keys() {
            writeln!(out, "{name}")?;
        }
    }
    Ok(())
}

pub async fn remove_orphan(
    service: &ProvisioningService,
    username: &str,
    out: &mut impl Write,
) -> Result<()> {
    service
        .remove_orphaned_account(username)
        .await
        .with_context(|| format!("failed to remove account {username}"))?;
    writeln!(out, "Removed account {username}")?;
    Ok(())
}

pub fn describe(out: &mut impl Write) -> Result<()> {
    let descriptor = json!({
        "metadata": PluginDescriptorService::metadata(),
        "setupFields": PluginDescriptorService::setup_config_fields(),
        "checkoutFields": PluginDescriptorService::checkout_config_fields(),
        "actions": PluginDescriptorService::management_actions(),
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&descriptor)?)?;
    Ok(())
}
