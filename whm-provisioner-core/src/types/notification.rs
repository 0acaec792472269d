use serde::{Deserialize, Serialize};

/// Call-to-action button in a notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationButton {
    /// Button label.
    pub label: String,
    /// Target URL.
    pub url: String,
}

/// A templated message for the customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_content: String,
    /// Optional call-to-action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<NotificationButton>,
}
