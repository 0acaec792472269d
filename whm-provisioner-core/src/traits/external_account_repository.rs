//! External account persistence abstract Trait

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::types::ExternalAccount;

/// External account storage Trait
///
/// Implemented by the host platform on top of its own order storage. One
/// record per order at most.
#[async_trait]
pub trait ExternalAccountRepository: Send + Sync {
    /// Get the record of an order
    ///
    /// # Arguments
    /// * `order_id` - Order ID
    async fn find_by_order(&self, order_id: &str) -> CoreResult<Option<ExternalAccount>>;

    /// Get every record that uses a control-panel username
    ///
    /// Terminated records keep their username, so a later order can be
    /// assigned the same one. All matches are returned, in any order.
    ///
    /// # Arguments
    /// * `username` - Control-panel username
    async fn find_by_username(&self, username: &str) -> CoreResult<Vec<ExternalAccount>>;

    /// Save a record (new or update), keyed by `account.order_id`
    async fn save(&self, account: &ExternalAccount) -> CoreResult<()>;

    /// Delete the record of an order
    async fn delete(&self, order_id: &str) -> CoreResult<()>;
}

/// In-memory external account repository
///
/// Suitable for tools and tests; nothing survives the process.
#[derive(Clone, Default)]
pub struct InMemoryExternalAccountRepository {
    accounts: Arc<RwLock<HashMap<String, ExternalAccount>>>,
}

impl InMemoryExternalAccountRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Whether no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl ExternalAccountRepository for InMemoryExternalAccountRepository {
    async fn find_by_order(&self, order_id: &str) -> CoreResult<Option<ExternalAccount>> {
        Ok(self.accounts.read().await.get(order_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> CoreResult<Vec<ExternalAccount>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .filter(|a| a.username == username)
            .cloned()
            .collect())
    }

    async fn save(&self, account: &ExternalAccount) -> CoreResult<()> {
        self.accounts
            .write()
            .await
            .insert(account.order_id.clone(), account.clone());
        Ok(())
    }

    async fn delete(&self, order_id: &str) -> CoreResult<()> {
        self.accounts.write().await.remove(order_id);
        Ok(())
    }
}
