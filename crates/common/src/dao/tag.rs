//! Tag data access

use super::now;
use crate::db::models::*;
use crate::errors::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

pub struct TagDao<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> TagDao<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Tag>> {
        TagEntity::find_by_id(id).one(self.conn).await.map_err(Into::into)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>> {
        TagEntity::find()
            .filter(TagColumn::Slug.eq(slug))
            .one(self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Tag>> {
        TagEntity::find()
            .filter(TagColumn::Id.is_in(ids.iter().copied()))
            .all(self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Tag>> {
        TagEntity::find()
            .order_by_desc(TagColumn::CreatedAt)
            .order_by_desc(TagColumn::Id)
            .limit(limit)
            .offset(offset)
            .all(self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn create(&self, mut tag: TagActiveModel) -> Result<Tag> {
        if tag.id.is_not_set() {
            tag.id = Set(Uuid::now_v7());
        }
        tag.created_at = Set(now());
        tag.insert(self.conn).await.map_err(Into::into)
    }

    pub async fn update(&self, tag: TagActiveModel) -> Result<Tag> {
        tag.update(self.conn).await.map_err(Into::into)
    }

    /// Delete the row and its article links; the articles stay
    pub async fn delete(&self, tag: &Tag) -> Result<()> {
        article_tag::Entity::delete_many()
            .filter(article_tag::Column::TagId.eq(tag.id))
            .exec(self.conn)
            .await?;
        TagEntity::delete_by_id(tag.id).exec(self.conn).await?;
        Ok(())
    }
}
