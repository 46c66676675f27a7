use async_trait::async_trait;

use crate::contract::model::UserSummary;

/// View of the accounts module this module needs. Implemented by an adapter
/// over the accounts service, wired in by the application.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<UserSummary>>;
    /// Flip the account status to ACTIVE after a subscription is assigned.
    async fn activate(&self, id: i64) -> anyhow::Result<()>;
    /// All users with stored status ACTIVE (reminder sweep input).
    async fn active_users(&self) -> anyhow::Result<Vec<UserSummary>>;
}
