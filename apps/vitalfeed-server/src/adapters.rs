//! Cross-module glue: each module declares the narrow port it needs and the
//! binary implements it over the neighbouring module's service or repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use accounts::contract::model::AccountStatus;
use accounts::domain::ports::{RosterLookup, SubscriptionGate};
use accounts::domain::repo::UsersRepository;
use directory::domain::roster::RosterService;
use subscriptions::contract::model::UserSummary;
use subscriptions::domain::ports::UserDirectory;

/// Registration checks license numbers against the directory's roster.
pub struct RosterAdapter(pub Arc<RosterService>);

#[async_trait]
impl RosterLookup for RosterAdapter {
    async fn matricule_exists(&self, matricule: &str) -> anyhow::Result<bool> {
        Ok(self.0.matricule_exists(matricule).await?)
    }
}

/// The authorization gate asks for a subscription end date by email; the
/// subscriptions module keys by user id, so resolve the user first.
pub struct SubscriptionGateAdapter {
    pub users: Arc<dyn UsersRepository>,
    pub subscriptions: Arc<subscriptions::domain::service::Service>,
}

#[async_trait]
impl SubscriptionGate for SubscriptionGateAdapter {
    async fn end_date_for(&self, email: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(None);
        };
        Ok(self.subscriptions.end_date_for_user(user.id).await?)
    }
}

/// The subscriptions module sees accounts only through this directory view.
pub struct UserDirectoryAdapter(pub Arc<dyn UsersRepository>);

#[async_trait]
impl UserDirectory for UserDirectoryAdapter {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<UserSummary>> {
        Ok(self.0.find_by_id(id).await?.map(|u| UserSummary {
            id: u.id,
            nom: u.nom,
            prenom: u.prenom,
            email: u.email,
        }))
    }

    async fn activate(&self, id: i64) -> anyhow::Result<()> {
        self.0.set_status(id, AccountStatus::Active).await
    }

    async fn active_users(&self) -> anyhow::Result<Vec<UserSummary>> {
        Ok(self
            .0
            .list_by_status(AccountStatus::Active)
            .await?
            .into_iter()
            .map(|u| UserSummary {
                id: u.id,
                nom: u.nom,
                prenom: u.prenom,
                email: u.email,
            })
            .collect())
    }
}
