/// Stored account status. Expiry is derived from the subscription end date
/// at evaluation time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Inactive,
    Active,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "INACTIVE",
            Self::Active => "ACTIVE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INACTIVE" => Some(Self::Inactive),
            "ACTIVE" => Some(Self::Active),
            _ => None,
        }
    }
}

/// Pure user model for inter-module communication (no serde).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub adresse_cabinet: String,
    pub num_matricule: String,
    pub is_admin: bool,
    pub is_first_login: bool,
    pub status: AccountStatus,
}

/// Data submitted by the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub adresse_cabinet: String,
    pub num_matricule: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub email: String,
    pub is_admin: bool,
    pub is_first_login: bool,
}
