use chrono::{DateTime, Duration, Utc};

/// Plan type; the duration determines the end date at assignment time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionType {
    Monthly,
    Quarterly,
    Annual,
}

impl SubscriptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
            Self::Annual => "ANNUAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MONTHLY" => Some(Self::Monthly),
            "QUARTERLY" => Some(Self::Quarterly),
            "ANNUAL" => Some(Self::Annual),
            _ => None,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::Monthly => Duration::days(30),
            Self::Quarterly => Duration::days(90),
            Self::Annual => Duration::days(365),
        }
    }
}

/// One subscription row; at most one per user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub subscription_type: SubscriptionType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// When the expiry reminder was last sent; cleared once the
    /// subscription lapses so a renewal can be reminded again.
    pub last_reminder_sent_at: Option<DateTime<Utc>>,
}

/// The slice of a user account this module needs for projections,
/// activation, and reminder mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
}
