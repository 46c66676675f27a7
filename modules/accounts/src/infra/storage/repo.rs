//! SeaORM-backed repository implementation for the accounts domain port.

use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

use crate::contract::model::{AccountStatus, Registration, User};
use crate::domain::repo::UsersRepository;
use crate::infra::storage::entity::{ActiveModel, Column, Entity, Model};

pub struct SeaOrmUsersRepository {
    conn: Arc<DatabaseConnection>,
}

impl SeaOrmUsersRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }
}

fn to_user(m: Model) -> User {
    // Unknown status strings collapse to INACTIVE rather than failing the row.
    let status = AccountStatus::parse(&m.status).unwrap_or(AccountStatus::Inactive);
    User {
        id: m.id,
        nom: m.nom,
        prenom: m.prenom,
        email: m.email,
        telephone: m.telephone,
        adresse_cabinet: m.adresse_cabinet,
        num_matricule: m.num_matricule,
        is_admin: m.is_admin,
        is_first_login: m.is_first_login,
        status,
    }
}

#[async_trait]
impl UsersRepository for SeaOrmUsersRepository {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let found = Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .context("find_by_id failed")?;
        Ok(found.map(to_user))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let found = Entity::find()
            .filter(Column::Email.eq(email))
            .one(self.conn.as_ref())
            .await
            .context("find_by_email failed")?;
        Ok(found.map(to_user))
    }

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<(User, String)>> {
        let found = Entity::find()
            .filter(Column::Email.eq(email))
            .one(self.conn.as_ref())
            .await
            .context("find_credentials failed")?;
        Ok(found.map(|m| {
            let hash = m.password_hash.clone();
            (to_user(m), hash)
        }))
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let count = Entity::find()
            .filter(Column::Email.eq(email))
            .count(self.conn.as_ref())
            .await
            .context("email_exists failed")?;
        Ok(count > 0)
    }

    async fn insert(
        &self,
        reg: Registration,
        password_hash: String,
        is_admin: bool,
        status: AccountStatus,
    ) -> anyhow::Result<User> {
        let m = ActiveModel {
            nom: Set(reg.nom),
            prenom: Set(reg.prenom),
            email: Set(reg.email),
            telephone: Set(reg.telephone),
            adresse_cabinet: Set(reg.adresse_cabinet),
            num_matricule: Set(reg.num_matricule),
            password_hash: Set(password_hash),
            is_admin: Set(is_admin),
            is_first_login: Set(true),
            status: Set(status.as_str().to_string()),
            ..Default::default()
        };
        let stored = m.insert(self.conn.as_ref()).await.context("insert failed")?;
        Ok(to_user(stored))
    }

    async fn update_password_hash(&self, id: i64, password_hash: String) -> anyhow::Result<()> {
        let m = ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash),
            ..Default::default()
        };
        m.update(self.conn.as_ref())
            .await
            .context("update_password_hash failed")?;
        Ok(())
    }

    async fn set_status(&self, id: i64, status: AccountStatus) -> anyhow::Result<()> {
        let m = ActiveModel {
            id: Set(id),
            status: Set(status.as_str().to_string()),
            ..Default::default()
        };
        m.update(self.conn.as_ref())
            .await
            .context("set_status failed")?;
        Ok(())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<User>> {
        let rows = Entity::find()
            .order_by_asc(Column::Id)
            .all(self.conn.as_ref())
            .await
            .context("list_all failed")?;
        Ok(rows.into_iter().map(to_user).collect())
    }

    async fn list_by_status(&self, status: AccountStatus) -> anyhow::Result<Vec<User>> {
        let rows = Entity::find()
            .filter(Column::Status.eq(status.as_str()))
            .order_by_asc(Column::Id)
            .all(self.conn.as_ref())
            .await
            .context("list_by_status failed")?;
        Ok(rows.into_iter().map(to_user).collect())
    }
}
