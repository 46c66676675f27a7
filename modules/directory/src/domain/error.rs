use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{field} est requis")]
    MissingField { field: String },

    #[error("Le matricule {matricule} n'existe pas dans la liste des vétérinaires agréés")]
    MatriculeNotInRoster { matricule: String },

    #[error("Aucun cabinet vétérinaire trouvé avec l'ID: {id}")]
    CabinetNotFound { id: i64 },

    #[error("User not found")]
    UserNotFound,

    #[error("Le fichier Excel est vide ou non fourni")]
    EmptyFile,

    #[error("{message}")]
    InvalidFile { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn matricule_not_in_roster(matricule: impl Into<String>) -> Self {
        Self::MatriculeNotInRoster {
            matricule: matricule.into(),
        }
    }

    pub fn invalid_file(message: impl Into<String>) -> Self {
        Self::InvalidFile {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
