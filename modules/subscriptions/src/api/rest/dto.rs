use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::model::UserSummary;
use crate::domain::service::SubscriptionWithUser;

/// `?subscriptionType=` query parameter on assign/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionTypeQuery {
    pub subscription_type: String,
}

/// Nested owner summary inside a subscription projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryDto {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
}

/// REST DTO for a subscription with its owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDto {
    pub id: i64,
    pub subscription_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub user: Option<UserSummaryDto>,
}

/// Generic `{"message": …}` success body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageDto {
    pub message: String,
}

impl From<UserSummary> for UserSummaryDto {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            nom: u.nom,
            prenom: u.prenom,
            email: u.email,
        }
    }
}

impl From<SubscriptionWithUser> for SubscriptionDto {
    fn from(s: SubscriptionWithUser) -> Self {
        Self {
            id: s.subscription.id,
            subscription_type: s.subscription.subscription_type.as_str().to_string(),
            start_date: s.subscription.start_date,
            end_date: s.subscription.end_date,
            user: s.user.map(UserSummaryDto::from),
        }
    }
}
