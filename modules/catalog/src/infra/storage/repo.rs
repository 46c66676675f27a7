//! SeaORM-backed repository implementation for the catalog domain port.

use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

use crate::contract::model::{NewProduct, Product};
use crate::domain::repo::ProductsRepository;
use crate::infra::storage::entity::{ActiveModel, Column, Entity, Model};

pub struct SeaOrmProductsRepository {
    conn: Arc<DatabaseConnection>,
}

impl SeaOrmProductsRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }
}

fn to_product(m: Model) -> Product {
    Product {
        id: m.id,
        name: m.name,
        description: m.description,
        price: m.price,
        image_url: m.image_url,
        category: m.category,
        sub_category: m.sub_category,
        in_stock: m.in_stock,
        details_url: m.details_url,
    }
}

fn product_fields(product: NewProduct, image_url: String) -> ActiveModel {
    ActiveModel {
        name: Set(product.name),
        description: Set(product.description),
        price: Set(product.price),
        image_url: Set(image_url),
        category: Set(product.category),
        sub_category: Set(product.sub_category),
        in_stock: Set(product.in_stock),
        details_url: Set(product.details_url),
        ..Default::default()
    }
}

#[async_trait]
impl ProductsRepository for SeaOrmProductsRepository {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Product>> {
        let found = Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .context("find_by_id failed")?;
        Ok(found.map(to_product))
    }

    async fn insert(&self, product: NewProduct, image_url: String) -> anyhow::Result<Product> {
        let m = product_fields(product, image_url);
        let stored = m.insert(self.conn.as_ref()).await.context("insert failed")?;
        Ok(to_product(stored))
    }

    async fn update(
        &self,
        id: i64,
        product: NewProduct,
        image_url: String,
    ) -> anyhow::Result<Product> {
        let mut m = product_fields(product, image_url);
        m.id = Set(id);
        let stored = m.update(self.conn.as_ref()).await.context("update failed")?;
        Ok(to_product(stored))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<()> {
        Entity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .context("delete failed")?;
        Ok(())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Product>> {
        let rows = Entity::find()
            .order_by_asc(Column::Id)
            .all(self.conn.as_ref())
            .await
            .context("list_all failed")?;
        Ok(rows.into_iter().map(to_product).collect())
    }

    async fn list_by_category(&self, category: &str) -> anyhow::Result<Vec<Product>> {
        let rows = Entity::find()
            .filter(Column::Category.eq(category))
            .order_by_asc(Column::Id)
            .all(self.conn.as_ref())
            .await
            .context("list_by_category failed")?;
        Ok(rows.into_iter().map(to_product).collect())
    }

    async fn list_by_sub_category(&self, sub_category: &str) -> anyhow::Result<Vec<Product>> {
        let rows = Entity::find()
            .filter(Column::SubCategory.eq(sub_category))
            .order_by_asc(Column::Id)
            .all(self.conn.as_ref())
            .await
            .context("list_by_sub_category failed")?;
        Ok(rows.into_iter().map(to_product).collect())
    }

    async fn list_by_stock(&self, in_stock: bool) -> anyhow::Result<Vec<Product>> {
        let rows = Entity::find()
            .filter(Column::InStock.eq(in_stock))
            .order_by_asc(Column::Id)
            .all(self.conn.as_ref())
            .await
            .context("list_by_stock failed")?;
        Ok(rows.into_iter().map(to_product).collect())
    }
}
