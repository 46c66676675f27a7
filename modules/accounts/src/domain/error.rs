use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Un utilisateur avec cet email existe déjà")]
    EmailAlreadyExists,

    #[error("Matricule non disponible")]
    MatriculeNotInRoster,

    #[error("Unauthorized: Bad credentials")]
    BadCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("{field} est obligatoire")]
    MissingField { field: String },

    #[error("Erreur lors de l'envoi de l'e-mail de bienvenue")]
    WelcomeMailFailed,

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
