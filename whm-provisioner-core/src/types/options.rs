//! Adapter tunables

use serde::{Deserialize, Serialize};

use crate::utils::generator::DEFAULT_PASSWORD_LEN;

/// What happens to the local record after a successful terminate.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TerminationPolicy {
    /// Keep the record, marked `Terminated`.
    #[default]
    Retain,
    /// Delete the record.
    Delete,
}

/// Tunables of the lifecycle adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvisioningOptions {
    /// Local record handling on terminate.
    pub termination_policy: TerminationPolicy,
    /// How many times `create` regenerates the username after the control
    /// panel reports it taken. `0` surfaces the collision immediately.
    pub username_collision_retries: u32,
    /// Length of generated passwords.
    pub password_length: usize,
    /// Send the welcome notification after a successful create.
    pub send_welcome_notification: bool,
}

impl Default for ProvisioningOptions {
    fn default() -> Self {
        Self {
            termination_policy: TerminationPolicy::Retain,
            username_collision_retries: 0,
            password_length: DEFAULT_PASSWORD_LEN,
            send_welcome_notification: true,
        }
    }
}
