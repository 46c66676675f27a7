use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::contract::model::{Subscription, SubscriptionType, UserSummary};
use crate::domain::error::DomainError;
use crate::domain::ports::UserDirectory;
use crate::domain::repo::SubscriptionsRepository;

/// A subscription projected together with its owner, for listings.
#[derive(Debug, Clone)]
pub struct SubscriptionWithUser {
    pub subscription: Subscription,
    pub user: Option<UserSummary>,
}

/// Domain service for the subscription lifecycle.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn SubscriptionsRepository>,
    users: Arc<dyn UserDirectory>,
}

impl Service {
    pub fn new(repo: Arc<dyn SubscriptionsRepository>, users: Arc<dyn UserDirectory>) -> Self {
        Self { repo, users }
    }

    pub fn repo(&self) -> Arc<dyn SubscriptionsRepository> {
        self.repo.clone()
    }

    /// Assign a subscription to a user who has none, and activate the
    /// account. Rejects without any mutation when a subscription exists.
    #[instrument(name = "subscriptions.service.assign", skip(self))]
    pub async fn assign(
        &self,
        user_id: i64,
        subscription_type: SubscriptionType,
    ) -> Result<SubscriptionWithUser, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::UserNotFound)?;

        if self
            .repo
            .find_by_user(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .is_some()
        {
            return Err(DomainError::AlreadySubscribed);
        }

        let start = Utc::now();
        let end = start + subscription_type.duration();
        let subscription = self
            .repo
            .insert(user_id, subscription_type, start, end)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        self.users
            .activate(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(
            "Assigned {} subscription to user {} until {}",
            subscription_type.as_str(),
            user_id,
            end
        );
        Ok(SubscriptionWithUser {
            subscription,
            user: Some(user),
        })
    }

    /// Change the plan of an existing subscription; the window restarts now.
    #[instrument(name = "subscriptions.service.update", skip(self))]
    pub async fn update(
        &self,
        id: i64,
        subscription_type: SubscriptionType,
    ) -> Result<SubscriptionWithUser, DomainError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::SubscriptionNotFound)?;

        let start = Utc::now();
        let end = start + subscription_type.duration();
        self.repo
            .update_plan(id, subscription_type, start, end)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Updated subscription {} to {}", id, subscription_type.as_str());
        self.get(existing.id).await
    }

    #[instrument(name = "subscriptions.service.delete", skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::SubscriptionNotFound)?;

        self.repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        info!("Deleted subscription {id}");
        Ok(())
    }

    #[instrument(name = "subscriptions.service.get", skip(self))]
    pub async fn get(&self, id: i64) -> Result<SubscriptionWithUser, DomainError> {
        let subscription = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::SubscriptionNotFound)?;
        self.with_user(subscription).await
    }

    #[instrument(name = "subscriptions.service.list", skip(self))]
    pub async fn list(&self) -> Result<Vec<SubscriptionWithUser>, DomainError> {
        let rows = self
            .repo
            .list_all()
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for subscription in rows {
            out.push(self.with_user(subscription).await?);
        }
        Ok(out)
    }

    /// End date for a user, if they hold a subscription.
    pub async fn end_date_for_user(
        &self,
        user_id: i64,
    ) -> Result<Option<chrono::DateTime<Utc>>, DomainError> {
        Ok(self
            .repo
            .find_by_user(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .map(|s| s.end_date))
    }

    async fn with_user(
        &self,
        subscription: Subscription,
    ) -> Result<SubscriptionWithUser, DomainError> {
        let user = self
            .users
            .find_by_id(subscription.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        Ok(SubscriptionWithUser { subscription, user })
    }
}
