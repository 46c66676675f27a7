use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Roster lookup used to gate registration: only license numbers present in
/// the eligible-professional roster may create an account. Implemented by the
/// directory module and wired in by the application.
#[async_trait]
pub trait RosterLookup: Send + Sync {
    async fn matricule_exists(&self, matricule: &str) -> anyhow::Result<bool>;
}

/// Subscription view the authorization gate needs: the end date of the one
/// subscription a user may hold. `None` means no subscription row exists.
#[async_trait]
pub trait SubscriptionGate: Send + Sync {
    async fn end_date_for(&self, email: &str) -> anyhow::Result<Option<DateTime<Utc>>>;
}
