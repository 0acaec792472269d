//! Collaborator abstraction trait definitions

mod external_account_repository;
mod notifier;

pub use external_account_repository::{
    ExternalAccountRepository, InMemoryExternalAccountRepository,
};
pub use notifier::{LogNotifier, Notifier};
