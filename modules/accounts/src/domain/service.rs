use std::sync::Arc;

use crate::auth::token::TokenCodec;
use crate::contract::model::{AccountStatus, LoginOutcome, Registration, User};
use crate::domain::error::DomainError;
use crate::domain::ports::RosterLookup;
use crate::domain::repo::UsersRepository;
use crate::infra::email;
use mailer::Mailer;
use rand::Rng;
use tracing::{info, instrument, warn};

const PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()";
const PASSWORD_LEN: usize = 12;

/// Links embedded in the welcome mail.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub portal_url: String,
    pub app_download_url: String,
}

/// Domain service for account management.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    roster: Arc<dyn RosterLookup>,
    mailer: Arc<dyn Mailer>,
    tokens: TokenCodec,
    config: ServiceConfig,
}

impl Service {
    pub fn new(
        repo: Arc<dyn UsersRepository>,
        roster: Arc<dyn RosterLookup>,
        mailer: Arc<dyn Mailer>,
        tokens: TokenCodec,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            roster,
            mailer,
            tokens,
            config,
        }
    }

    pub fn repo(&self) -> Arc<dyn UsersRepository> {
        self.repo.clone()
    }

    /// Register a new veterinarian account.
    ///
    /// Rejects duplicate emails and license numbers that are not on the
    /// eligible-professional roster; neither rejection writes anything.
    /// On success the account is stored INACTIVE with a generated password,
    /// and the plaintext credential is mailed to the new user.
    #[instrument(name = "accounts.service.register", skip(self, reg), fields(email = %reg.email))]
    pub async fn register(&self, reg: Registration) -> Result<String, DomainError> {
        info!("Registering new user");
        self.validate_registration(&reg)?;

        if self
            .repo
            .email_exists(&reg.email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(DomainError::EmailAlreadyExists);
        }

        if !self
            .roster
            .matricule_exists(&reg.num_matricule)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(DomainError::MatriculeNotInRoster);
        }

        let password = generate_password();
        let hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
            .map_err(|e| DomainError::database(e.to_string()))?;

        let user = self
            .repo
            .insert(reg, hash, false, AccountStatus::Inactive)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        // The generated password travels in the welcome mail, as the product
        // requires; first-login reset is the mitigation.
        let body = email::welcome_email(
            &user.nom,
            &user.email,
            &password,
            &self.config.portal_url,
            &self.config.app_download_url,
        );
        self.mailer
            .send_html(&user.email, email::WELCOME_SUBJECT, body)
            .await
            .map_err(|e| {
                warn!("Failed to send welcome email to {}: {e}", user.email);
                DomainError::WelcomeMailFailed
            })?;

        info!("Successfully registered user id={}", user.id);
        Ok("Utilisateur enregistré avec succès. Vérifiez votre email.".to_string())
    }

    /// Verify credentials and issue a bearer token.
    #[instrument(name = "accounts.service.login", skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        let (user, hash) = self
            .repo
            .find_credentials(email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::BadCredentials)?;

        let ok = bcrypt::verify(password, &hash).unwrap_or(false);
        if !ok {
            return Err(DomainError::BadCredentials);
        }

        let token = self
            .tokens
            .issue(&user.email)
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Authenticated user {}", user.email);
        Ok(LoginOutcome {
            token,
            email: user.email,
            is_admin: user.is_admin,
            is_first_login: user.is_first_login,
        })
    }

    /// Replace the password of the authenticated user.
    #[instrument(name = "accounts.service.reset_password", skip(self, new_password))]
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), DomainError> {
        if new_password.trim().is_empty() {
            return Err(DomainError::missing_field("New password"));
        }

        let user = self
            .repo
            .find_by_email(email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::UserNotFound)?;

        let hash = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
            .map_err(|e| DomainError::database(e.to_string()))?;
        self.repo
            .update_password_hash(user.id, hash)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Password reset for {}", email);
        Ok(())
    }

    /// All users, for the admin listing.
    #[instrument(name = "accounts.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.repo
            .list_all()
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    fn validate_registration(&self, reg: &Registration) -> Result<(), DomainError> {
        if reg.nom.trim().is_empty() {
            return Err(DomainError::missing_field("Nom"));
        }
        if reg.prenom.trim().is_empty() {
            return Err(DomainError::missing_field("Prénom"));
        }
        if reg.email.is_empty() || !reg.email.contains('@') || !reg.email.contains('.') {
            return Err(DomainError::missing_field("Email"));
        }
        if reg.adresse_cabinet.trim().is_empty() {
            return Err(DomainError::missing_field("Adresse du cabinet"));
        }
        if reg.num_matricule.trim().is_empty() {
            return Err(DomainError::missing_field("Numéro matricule"));
        }
        Ok(())
    }
}

/// 12 characters drawn uniformly from a fixed alphanumeric+symbol alphabet.
fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    (0..PASSWORD_LEN)
        .map(|_| PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_password_has_expected_shape() {
        let pw = generate_password();
        assert_eq!(pw.len(), PASSWORD_LEN);
        assert!(pw.bytes().all(|b| PASSWORD_ALPHABET.contains(&b)));
    }

    #[test]
    fn generated_passwords_differ() {
        // Uniform over a 72-symbol alphabet; a collision over 12 chars would
        // be astronomically unlikely.
        assert_ne!(generate_password(), generate_password());
    }
}
