//! SeaORM-backed implementations of the directory repository ports.

use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

use crate::contract::model::{Cabinet, NewCabinet, Profile, RosterEntry};
use crate::domain::repo::{CabinetsRepository, ProfilesRepository, RosterRepository};
use crate::infra::storage::entity::{cabinet, profile, roster};

pub struct SeaOrmRosterRepository {
    conn: Arc<DatabaseConnection>,
}

impl SeaOrmRosterRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }
}

fn to_roster_entry(m: roster::Model) -> RosterEntry {
    RosterEntry {
        id: m.id,
        nom: m.nom,
        prenom: m.prenom,
        matricule: m.matricule,
    }
}

#[async_trait]
impl RosterRepository for SeaOrmRosterRepository {
    async fn find_by_matricule(&self, matricule: &str) -> anyhow::Result<Option<RosterEntry>> {
        let found = roster::Entity::find()
            .filter(roster::Column::Matricule.eq(matricule))
            .one(self.conn.as_ref())
            .await
            .context("find_by_matricule failed")?;
        Ok(found.map(to_roster_entry))
    }

    async fn upsert(&self, nom: &str, prenom: &str, matricule: &str) -> anyhow::Result<bool> {
        let existing = roster::Entity::find()
            .filter(roster::Column::Matricule.eq(matricule))
            .one(self.conn.as_ref())
            .await
            .context("roster lookup failed")?;

        match existing {
            Some(found) => {
                let m = roster::ActiveModel {
                    id: Set(found.id),
                    nom: Set(nom.to_string()),
                    prenom: Set(prenom.to_string()),
                    ..Default::default()
                };
                m.update(self.conn.as_ref())
                    .await
                    .context("roster update failed")?;
                Ok(false)
            }
            None => {
                let m = roster::ActiveModel {
                    nom: Set(nom.to_string()),
                    prenom: Set(prenom.to_string()),
                    matricule: Set(matricule.to_string()),
                    ..Default::default()
                };
                m.insert(self.conn.as_ref())
                    .await
                    .context("roster insert failed")?;
                Ok(true)
            }
        }
    }

    async fn list_all(&self) -> anyhow::Result<Vec<RosterEntry>> {
        let rows = roster::Entity::find()
            .order_by_asc(roster::Column::Id)
            .all(self.conn.as_ref())
            .await
            .context("roster list failed")?;
        Ok(rows.into_iter().map(to_roster_entry).collect())
    }
}

pub struct SeaOrmCabinetsRepository {
    conn: Arc<DatabaseConnection>,
}

impl SeaOrmCabinetsRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }
}

fn to_cabinet(m: cabinet::Model) -> Cabinet {
    Cabinet {
        id: m.id,
        name: m.name,
        address: m.address,
        city: m.city,
        phone: m.phone,
        latitude: m.latitude,
        longitude: m.longitude,
        is_featured: m.is_featured,
        cabinet_type: m.cabinet_type,
        matricule: m.matricule,
    }
}

fn cabinet_fields(c: NewCabinet, latitude: f64, longitude: f64) -> cabinet::ActiveModel {
    cabinet::ActiveModel {
        name: Set(c.name),
        address: Set(c.address),
        city: Set(c.city),
        phone: Set(c.phone),
        latitude: Set(latitude),
        longitude: Set(longitude),
        is_featured: Set(c.is_featured),
        cabinet_type: Set(c.cabinet_type),
        matricule: Set(c.matricule),
        ..Default::default()
    }
}

#[async_trait]
impl CabinetsRepository for SeaOrmCabinetsRepository {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Cabinet>> {
        let found = cabinet::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .context("cabinet find_by_id failed")?;
        Ok(found.map(to_cabinet))
    }

    async fn find_by_name_and_address(
        &self,
        name: &str,
        address: &str,
    ) -> anyhow::Result<Option<Cabinet>> {
        let found = cabinet::Entity::find()
            .filter(cabinet::Column::Name.eq(name))
            .filter(cabinet::Column::Address.eq(address))
            .one(self.conn.as_ref())
            .await
            .context("cabinet find_by_name_and_address failed")?;
        Ok(found.map(to_cabinet))
    }

    async fn insert(
        &self,
        cabinet: NewCabinet,
        latitude: f64,
        longitude: f64,
    ) -> anyhow::Result<Cabinet> {
        let stored = cabinet_fields(cabinet, latitude, longitude)
            .insert(self.conn.as_ref())
            .await
            .context("cabinet insert failed")?;
        Ok(to_cabinet(stored))
    }

    async fn update(
        &self,
        id: i64,
        cabinet: NewCabinet,
        latitude: f64,
        longitude: f64,
    ) -> anyhow::Result<Cabinet> {
        let mut m = cabinet_fields(cabinet, latitude, longitude);
        m.id = Set(id);
        let stored = m
            .update(self.conn.as_ref())
            .await
            .context("cabinet update failed")?;
        Ok(to_cabinet(stored))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<()> {
        cabinet::Entity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .context("cabinet delete failed")?;
        Ok(())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Cabinet>> {
        let rows = cabinet::Entity::find()
            .order_by_asc(cabinet::Column::Id)
            .all(self.conn.as_ref())
            .await
            .context("cabinet list failed")?;
        Ok(rows.into_iter().map(to_cabinet).collect())
    }
}

pub struct SeaOrmProfilesRepository {
    conn: Arc<DatabaseConnection>,
}

impl SeaOrmProfilesRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }
}

fn to_profile(m: profile::Model) -> Profile {
    Profile {
        id: m.id,
        user_id: m.user_id,
        subscription_type_hint: m.subscription_type_hint,
        image_path: m.image_path,
    }
}

#[async_trait]
impl ProfilesRepository for SeaOrmProfilesRepository {
    async fn find_by_user(&self, user_id: i64) -> anyhow::Result<Option<Profile>> {
        let found = profile::Entity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(self.conn.as_ref())
            .await
            .context("profile find_by_user failed")?;
        Ok(found.map(to_profile))
    }

    async fn insert(
        &self,
        user_id: i64,
        subscription_type_hint: Option<String>,
        image_path: Option<String>,
    ) -> anyhow::Result<Profile> {
        let m = profile::ActiveModel {
            user_id: Set(user_id),
            subscription_type_hint: Set(subscription_type_hint),
            image_path: Set(image_path),
            ..Default::default()
        };
        let stored = m
            .insert(self.conn.as_ref())
            .await
            .context("profile insert failed")?;
        Ok(to_profile(stored))
    }

    async fn update(
        &self,
        id: i64,
        subscription_type_hint: Option<String>,
        image_path: Option<String>,
    ) -> anyhow::Result<()> {
        let m = profile::ActiveModel {
            id: Set(id),
            subscription_type_hint: Set(subscription_type_hint),
            image_path: Set(image_path),
            ..Default::default()
        };
        m.update(self.conn.as_ref())
            .await
            .context("profile update failed")?;
        Ok(())
    }
}
