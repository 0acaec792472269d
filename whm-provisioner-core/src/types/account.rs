//! External account record and its lifecycle states

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a provisioned account.
///
/// `Unprovisioned` is represented by the absence of an [`ExternalAccount`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountState {
    /// Provisioned and serving.
    Active,
    /// Provisioned but suspended on the control panel.
    Suspended,
    /// Removed from the control panel. Final.
    Terminated,
}

impl AccountState {
    /// Whether the remote account still exists.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Active | Self::Suspended)
    }
}

impl std::fmt::Display for AccountState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Terminated => "terminated",
        })
    }
}

/// The adapter's durable record of a provisioned account.
///
/// Created once, after the control panel confirmed `createacct`, and read by
/// every later lifecycle operation of the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalAccount {
    /// Order the account belongs to.
    pub order_id: String,
    /// Username on the control panel.
    pub username: String,
    /// Password set at creation or by the last password change.
    pub password: String,
    /// Plan (package) identifier on the control panel.
    pub plan: String,
    /// Domain the account was created for.
    pub domain: String,
    /// Lifecycle state.
    pub state: AccountState,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl ExternalAccount {
    /// A freshly provisioned, active account.
    pub fn new(
        order_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        plan: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            order_id: order_id.into(),
            username: username.into(),
            password: password.into(),
            plan: plan.into(),
            domain: domain.into(),
            state: AccountState::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
