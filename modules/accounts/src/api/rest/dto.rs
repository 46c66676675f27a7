use serde::{Deserialize, Serialize};

use crate::contract::model::{LoginOutcome, Registration, User};

/// REST DTO for the login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

/// REST DTO for the login response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    pub token: String,
    pub email: String,
    pub is_admin: bool,
    pub is_first_login: bool,
}

/// REST DTO for the registration request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    #[serde(default)]
    pub telephone: Option<String>,
    pub adresse_cabinet: String,
    pub num_matricule: String,
}

/// REST DTO for a user in the admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub adresse_cabinet: String,
    pub num_matricule: String,
    pub is_admin: bool,
    pub is_first_login: bool,
    pub status: String,
}

/// REST DTO for the password reset request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordReq {
    pub new_password: String,
}

/// Generic `{"message": …}` success body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageDto {
    pub message: String,
}

impl From<LoginOutcome> for LoginDto {
    fn from(o: LoginOutcome) -> Self {
        Self {
            token: o.token,
            email: o.email,
            is_admin: o.is_admin,
            is_first_login: o.is_first_login,
        }
    }
}

impl From<RegisterReq> for Registration {
    fn from(req: RegisterReq) -> Self {
        Self {
            nom: req.nom,
            prenom: req.prenom,
            email: req.email,
            telephone: req.telephone,
            adresse_cabinet: req.adresse_cabinet,
            num_matricule: req.num_matricule,
        }
    }
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            nom: u.nom,
            prenom: u.prenom,
            email: u.email,
            telephone: u.telephone,
            adresse_cabinet: u.adresse_cabinet,
            num_matricule: u.num_matricule,
            is_admin: u.is_admin,
            is_first_login: u.is_first_login,
            status: u.status.as_str().to_string(),
        }
    }
}
