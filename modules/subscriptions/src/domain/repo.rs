use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{Subscription, SubscriptionType};

/// Port for the domain layer: persistence operations on subscription rows.
#[async_trait]
pub trait SubscriptionsRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Subscription>>;
    /// The one subscription a user may hold.
    async fn find_by_user(&self, user_id: i64) -> anyhow::Result<Option<Subscription>>;
    async fn insert(
        &self,
        user_id: i64,
        subscription_type: SubscriptionType,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> anyhow::Result<Subscription>;
    /// Change the plan and recompute the window for an existing row.
    async fn update_plan(
        &self,
        id: i64,
        subscription_type: SubscriptionType,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> anyhow::Result<()>;
    async fn delete(&self, id: i64) -> anyhow::Result<()>;
    async fn list_all(&self) -> anyhow::Result<Vec<Subscription>>;
    /// Persist (or clear) the reminder marker.
    async fn set_last_reminder(
        &self,
        id: i64,
        at: Option<DateTime<Utc>>,
    ) -> anyhow::Result<()>;
}
