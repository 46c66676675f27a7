use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found")]
    UserNotFound,

    #[error("Subscription not found")]
    SubscriptionNotFound,

    #[error("L'utilisateur a déjà un abonnement")]
    AlreadySubscribed,

    #[error("Type d'abonnement invalide: {value}")]
    InvalidType { value: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn invalid_type(value: impl Into<String>) -> Self {
        Self::InvalidType {
            value: value.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
