//! Customer notification abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{Notification, UserInfo};

/// Customer notification Trait
///
/// Backed by the host platform's e-mail subsystem. Called only after an
/// operation has succeeded; a failure here never undoes the operation.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a notification to a user
    async fn notify(&self, user: &UserInfo, notification: &Notification) -> CoreResult<()>;
}

/// Notifier that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user: &UserInfo, notification: &Notification) -> CoreResult<()> {
        log::info!(
            "Notification for {} <{}>: {}",
            user.username,
            user.email,
            notification.subject
        );
        Ok(())
    }
}
