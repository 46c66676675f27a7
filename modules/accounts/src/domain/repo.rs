use crate::contract::model::{AccountStatus, Registration, User};
use async_trait::async_trait;

/// Port for the domain layer: persistence operations the accounts domain needs.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a user by id.
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    /// Load a user by unique email.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    /// Load a user together with its password hash, for credential checks.
    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<(User, String)>>;
    /// Check uniqueness by email.
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    /// Insert a new user from a registration; the service supplies the hash
    /// and initial flags. Returns the stored user.
    async fn insert(
        &self,
        reg: Registration,
        password_hash: String,
        is_admin: bool,
        status: AccountStatus,
    ) -> anyhow::Result<User>;
    /// Replace the password hash of an existing user.
    async fn update_password_hash(&self, id: i64, password_hash: String) -> anyhow::Result<()>;
    /// Transition the stored account status.
    async fn set_status(&self, id: i64, status: AccountStatus) -> anyhow::Result<()>;
    /// All users, for the admin listing.
    async fn list_all(&self) -> anyhow::Result<Vec<User>>;
    /// All users with a given stored status (reminder sweep input).
    async fn list_by_status(&self, status: AccountStatus) -> anyhow::Result<Vec<User>>;
}
