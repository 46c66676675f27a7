//! SeaORM-backed repository implementation for the subscriptions domain port.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

use crate::contract::model::{Subscription, SubscriptionType};
use crate::domain::repo::SubscriptionsRepository;
use crate::infra::storage::entity::{ActiveModel, Column, Entity, Model};

pub struct SeaOrmSubscriptionsRepository {
    conn: Arc<DatabaseConnection>,
}

impl SeaOrmSubscriptionsRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }
}

fn to_subscription(m: Model) -> anyhow::Result<Subscription> {
    let subscription_type = SubscriptionType::parse(&m.subscription_type)
        .with_context(|| format!("Unknown subscription type '{}'", m.subscription_type))?;
    Ok(Subscription {
        id: m.id,
        user_id: m.user_id,
        subscription_type,
        start_date: m.start_date,
        end_date: m.end_date,
        last_reminder_sent_at: m.last_reminder_sent_at,
    })
}

#[async_trait]
impl SubscriptionsRepository for SeaOrmSubscriptionsRepository {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Subscription>> {
        let found = Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .context("find_by_id failed")?;
        found.map(to_subscription).transpose()
    }

    async fn find_by_user(&self, user_id: i64) -> anyhow::Result<Option<Subscription>> {
        let found = Entity::find()
            .filter(Column::UserId.eq(user_id))
            .one(self.conn.as_ref())
            .await
            .context("find_by_user failed")?;
        found.map(to_subscription).transpose()
    }

    async fn insert(
        &self,
        user_id: i64,
        subscription_type: SubscriptionType,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> anyhow::Result<Subscription> {
        let m = ActiveModel {
            user_id: Set(user_id),
            subscription_type: Set(subscription_type.as_str().to_string()),
            start_date: Set(start_date),
            end_date: Set(end_date),
            last_reminder_sent_at: Set(None),
            ..Default::default()
        };
        let stored = m.insert(self.conn.as_ref()).await.context("insert failed")?;
        to_subscription(stored)
    }

    async fn update_plan(
        &self,
        id: i64,
        subscription_type: SubscriptionType,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let m = ActiveModel {
            id: Set(id),
            subscription_type: Set(subscription_type.as_str().to_string()),
            start_date: Set(start_date),
            end_date: Set(end_date),
            ..Default::default()
        };
        m.update(self.conn.as_ref())
            .await
            .context("update_plan failed")?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> anyhow::Result<()> {
        Entity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .context("delete failed")?;
        Ok(())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Subscription>> {
        let rows = Entity::find()
            .order_by_asc(Column::Id)
            .all(self.conn.as_ref())
            .await
            .context("list_all failed")?;
        rows.into_iter().map(to_subscription).collect()
    }

    async fn set_last_reminder(&self, id: i64, at: Option<DateTime<Utc>>) -> anyhow::Result<()> {
        let m = ActiveModel {
            id: Set(id),
            last_reminder_sent_at: Set(at),
            ..Default::default()
        };
        m.update(self.conn.as_ref())
            .await
            .context("set_last_reminder failed")?;
        Ok(())
    }
}
