//! Homepage section and section item data access

use super::now;
use crate::db::models::*;
use crate::errors::{AppError, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

pub struct HomepageSectionDao<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> HomepageSectionDao<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<HomepageSection>> {
        HomepageSectionEntity::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn get_by_key(&self, key: &str) -> Result<Option<HomepageSection>> {
        HomepageSectionEntity::find()
            .filter(HomepageSectionColumn::Key.eq(key))
            .one(self.conn)
            .await
            .map_err(Into::into)
    }

    /// Layout order: position, then creation
    pub async fn list(&self, limit: u64, offset: u64) -> Result<Vec<HomepageSection>> {
        HomepageSectionEntity::find()
            .order_by_asc(HomepageSectionColumn::Position)
            .order_by_asc(HomepageSectionColumn::CreatedAt)
            .order_by_asc(HomepageSectionColumn::Id)
            .limit(limit)
            .offset(offset)
            .all(self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn create(&self, mut section: HomepageSectionActiveModel) -> Result<HomepageSection> {
        if section.id.is_not_set() {
            section.id = Set(Uuid::now_v7());
        }
        section.created_at = Set(now());
        section.insert(self.conn).await.map_err(Into::into)
    }

    pub async fn update(&self, section: HomepageSectionActiveModel) -> Result<HomepageSection> {
        section.update(self.conn).await.map_err(Into::into)
    }

    pub async fn delete(&self, section: &HomepageSection) -> Result<()> {
        HomepageSectionItemEntity::delete_many()
            .filter(HomepageSectionItemColumn::SectionId.eq(section.id))
            .exec(self.conn)
            .await?;
        HomepageSectionEntity::delete_by_id(section.id)
            .exec(self.conn)
            .await?;
        Ok(())
    }
}

pub struct HomepageSectionItemDao<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> HomepageSectionItemDao<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<HomepageSectionItem>> {
        HomepageSectionItemEntity::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(Into::into)
    }

    /// Items of one section with their articles, in display order
    pub async fn list_for_section(&self, section_id: Uuid) -> Result<Vec<(HomepageSectionItem, Option<Article>)>> {
        HomepageSectionItemEntity::find()
            .filter(HomepageSectionItemColumn::SectionId.eq(section_id))
            .find_also_related(ArticleEntity)
            .order_by_asc(HomepageSectionItemColumn::Position)
            .order_by_asc(HomepageSectionItemColumn::CreatedAt)
            .all(self.conn)
            .await
            .map_err(Into::into)
    }

    /// Position after the last item of the section (0 for an empty section).
    ///
    /// Fails with `Validation` when the last item already sits at `i32::MAX`.
    pub async fn next_position(&self, section_id: Uuid) -> Result<i32> {
        let last = HomepageSectionItemEntity::find()
            .filter(HomepageSectionItemColumn::SectionId.eq(section_id))
            .order_by_desc(HomepageSectionItemColumn::Position)
            .limit(1)
            .one(self.conn)
            .await?;
        match last {
            None => Ok(0),
            Some(item) => item.position.checked_add(1).ok_or_else(|| AppError::Validation {
                message: "section has no free position after its last item".to_string(),
                field: Some("position".to_string()),
            }),
        }
    }

    pub async fn create(&self, mut item: HomepageSectionItemActiveModel) -> Result<HomepageSectionItem> {
        if item.id.is_not_set() {
            item.id = Set(Uuid::now_v7());
        }
        item.created_at = Set(now());
        item.insert(self.conn).await.map_err(Into::into)
    }

    pub async fn delete(&self, item: &HomepageSectionItem) -> Result<()> {
        HomepageSectionItemEntity::delete_by_id(item.id)
            .exec(self.conn)
            .await?;
        Ok(())
    }
}
