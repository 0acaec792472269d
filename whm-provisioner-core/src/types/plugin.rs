//! Descriptor types the host platform reads to render configuration screens

use serde::{Deserialize, Serialize};

/// The input type of a configuration field (affects UI rendering).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// URL input.
    Url,
    /// Masked/password input; stored encrypted by the host.
    Password,
    /// Drop-down populated from [`ConfigField::options`].
    Select,
}

/// A validation rule the host applies before saving a field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "rule", content = "value", rename_all = "camelCase")]
pub enum ValidationRule {
    /// The field must be non-empty.
    Required,
    /// The value must be a valid URL.
    Url,
    /// The value must be at least this many characters long.
    MinLength(usize),
}

/// One option of a select field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    /// Stored value.
    pub value: String,
    /// Displayed label.
    pub label: String,
}

/// Definition of one configuration field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigField {
    /// Machine-readable field key (e.g., `"hostname"`).
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// Input type for UI rendering.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Validation rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ValidationRule>,
    /// Options of a select field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Optional help/description text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

impl ConfigField {
    pub(crate) fn new(key: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field_type,
            rules: Vec::new(),
            options: Vec::new(),
            help_text: None,
        }
    }

    #[must_use]
    pub(crate) fn with_rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub(crate) fn with_help(mut self, help: &str) -> Self {
        self.help_text = Some(help.to_string());
        self
    }
}

/// Button on the order management page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManagementAction {
    /// Action identifier.
    pub id: String,
    /// Button label.
    pub label: String,
}

/// Static description of the provisioning extension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    /// Display name.
    pub name: String,
    /// Author.
    pub author: String,
    /// Extension version.
    pub version: String,
    /// Compatible host platform versions (semver range).
    pub host_version: String,
    /// Short description.
    pub description: String,
}
