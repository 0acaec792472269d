//! Read-only order context supplied by the billing platform

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The customer who placed the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    /// Platform username.
    pub username: String,
    /// Contact e-mail address.
    pub email: String,
}

/// The product package the order references.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageInfo {
    /// Platform package ID.
    pub id: String,
    /// Admin-configured package settings.
    #[serde(default)]
    pub data: HashMap<String, String>,
}

impl PackageInfo {
    /// Settings key holding the control-panel plan identifier.
    pub const PLAN_KEY: &'static str = "package";
    /// Plan used when the package has none configured.
    pub const DEFAULT_PLAN: &'static str = "default";

    /// Read a configured value, falling back to `default` when unset or blank.
    pub fn data<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.data
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
    }

    /// The control-panel plan this package maps to.
    pub fn plan(&self) -> &str {
        self.data(Self::PLAN_KEY, Self::DEFAULT_PLAN)
    }
}

/// Everything the adapter reads about an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderContext {
    /// Platform order ID; keys the external account record.
    pub id: String,
    /// Domain requested at checkout, if any.
    #[serde(default)]
    pub domain: Option<String>,
    /// Ordering customer.
    pub user: UserInfo,
    /// Ordered package.
    pub package: PackageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_defaults_when_unset() {
        let pkg = PackageInfo::default();
        assert_eq!(pkg.plan(), "default");
    }

    #[test]
    fn plan_defaults_when_blank() {
        let pkg = PackageInfo {
            id: "p".into(),
            data: [("package".to_string(), "  ".to_string())].into(),
        };
        assert_eq!(pkg.plan(), "default");
    }

    #[test]
    fn plan_reads_configured_value() {
        let pkg = PackageInfo {
            id: "p".into(),
            data: [("package".to_string(), "gold".to_string())].into(),
        };
        assert_eq!(pkg.plan(), "gold");
        assert_eq!(pkg.data("missing", "x"), "x");
    }
}
