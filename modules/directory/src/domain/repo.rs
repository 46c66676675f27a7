use async_trait::async_trait;

use crate::contract::model::{Cabinet, NewCabinet, Profile, RosterEntry};

/// Port for the eligible-professional roster.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    async fn find_by_matricule(&self, matricule: &str) -> anyhow::Result<Option<RosterEntry>>;
    /// Insert or update in place, keyed by unique matricule.
    /// Returns true when a new row was created.
    async fn upsert(&self, nom: &str, prenom: &str, matricule: &str) -> anyhow::Result<bool>;
    async fn list_all(&self) -> anyhow::Result<Vec<RosterEntry>>;
}

/// Port for cabinet rows; identity is the canonical (name, address) pair.
#[async_trait]
pub trait CabinetsRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Cabinet>>;
    async fn find_by_name_and_address(
        &self,
        name: &str,
        address: &str,
    ) -> anyhow::Result<Option<Cabinet>>;
    async fn insert(&self, cabinet: NewCabinet, latitude: f64, longitude: f64)
        -> anyhow::Result<Cabinet>;
    async fn update(
        &self,
        id: i64,
        cabinet: NewCabinet,
        latitude: f64,
        longitude: f64,
    ) -> anyhow::Result<Cabinet>;
    async fn delete(&self, id: i64) -> anyhow::Result<()>;
    async fn list_all(&self) -> anyhow::Result<Vec<Cabinet>>;
}

/// Port for per-user veterinary profiles.
#[async_trait]
pub trait ProfilesRepository: Send + Sync {
    async fn find_by_user(&self, user_id: i64) -> anyhow::Result<Option<Profile>>;
    async fn insert(
        &self,
        user_id: i64,
        subscription_type_hint: Option<String>,
        image_path: Option<String>,
    ) -> anyhow::Result<Profile>;
    async fn update(
        &self,
        id: i64,
        subscription_type_hint: Option<String>,
        image_path: Option<String>,
    ) -> anyhow::Result<()>;
}
