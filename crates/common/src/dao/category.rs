//! Category data access

use super::now;
use crate::db::models::*;
use crate::errors::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

pub struct CategoryDao<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> CategoryDao<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        CategoryEntity::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        CategoryEntity::find()
            .filter(CategoryColumn::Slug.eq(slug))
            .one(self.conn)
            .await
            .map_err(Into::into)
    }

    /// Rows whose id is in `ids`; unknown ids are simply absent
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Category>> {
        CategoryEntity::find()
            .filter(CategoryColumn::Id.is_in(ids.iter().copied()))
            .all(self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Category>> {
        CategoryEntity::find()
            .order_by_desc(CategoryColumn::CreatedAt)
            .order_by_desc(CategoryColumn::Id)
            .limit(limit)
            .offset(offset)
            .all(self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn create(&self, mut category: CategoryActiveModel) -> Result<Category> {
        if category.id.is_not_set() {
            category.id = Set(Uuid::now_v7());
        }
        category.created_at = Set(now());
        category.insert(self.conn).await.map_err(Into::into)
    }

    pub async fn update(&self, category: CategoryActiveModel) -> Result<Category> {
        category.update(self.conn).await.map_err(Into::into)
    }

    /// Delete the row and its article links; the articles stay
    pub async fn delete(&self, category: &Category) -> Result<()> {
        article_category::Entity::delete_many()
            .filter(article_category::Column::CategoryId.eq(category.id))
            .exec(self.conn)
            .await?;
        CategoryEntity::delete_by_id(category.id).exec(self.conn).await?;
        Ok(())
    }
}
