//! Homepage layout service: sections and the articles placed in them

use super::Page;
use crate::dao::{ArticleDao, HomepageSectionDao, HomepageSectionItemDao};
use crate::db::models::*;
use crate::errors::{AppError, Result};
use crate::metrics;
use crate::slug::validate_slug;
use sea_orm::{ActiveValue::NotSet, DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SectionInput {
    /// Layout key, e.g. `top-stories`
    #[validate(custom(function = "validate_slug"))]
    pub key: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SectionItemInput {
    pub section_id: Uuid,

    pub article_id: Uuid,

    /// Appended after the last item when absent
    #[serde(default)]
    #[validate(range(min = 0))]
    pub position: Option<i32>,
}

pub struct HomepageService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> HomepageService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_sections(&self, page: Page) -> Result<Vec<HomepageSection>> {
        HomepageSectionDao::new(self.db)
            .list(page.limit, page.offset)
            .await
    }

    pub async fn get_section(&self, id: Uuid) -> Result<HomepageSection> {
        HomepageSectionDao::new(self.db)
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("homepage section", id))
    }

    /// Look a section up by its layout key
    pub async fn get_section_by_key(&self, key: &str) -> Result<HomepageSection> {
        HomepageSectionDao::new(self.db)
            .get_by_key(key)
            .await?
            .ok_or_else(|| AppError::not_found("homepage section", key))
    }

    pub async fn create_section(&self, input: SectionInput) -> Result<HomepageSection> {
        input.validate()?;

        let txn = self.db.begin().await?;
        let section = HomepageSectionDao::new(&txn)
            .create(HomepageSectionActiveModel {
                id: NotSet,
                key: Set(input.key),
                title: Set(input.title),
                position: Set(input.position),
                created_at: NotSet,
            })
            .await?;
        txn.commit().await?;

        metrics::record_created("homepage_section");
        info!(section_id = %section.id, key = %section.key, "Homepage section created");
        Ok(section)
    }

    pub async fn update_section(&self, id: Uuid, input: SectionInput) -> Result<HomepageSection> {
        input.validate()?;

        let txn = self.db.begin().await?;
        let dao = HomepageSectionDao::new(&txn);
        let mut active: HomepageSectionActiveModel = dao
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("homepage section", id))?
            .into();
        active.key = Set(input.key);
        active.title = Set(input.title);
        active.position = Set(input.position);
        let section = dao.update(active).await?;
        txn.commit().await?;

        info!(section_id = %id, key = %section.key, "Homepage section updated");
        Ok(section)
    }

    /// Delete a section together with its placements
    pub async fn delete_section(&self, id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;
        let dao = HomepageSectionDao::new(&txn);
        let section = dao
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("homepage section", id))?;
        dao.delete(&section).await?;
        txn.commit().await?;

        metrics::record_deleted("homepage_section");
        info!(section_id = %id, key = %section.key, "Homepage section deleted");
        Ok(())
    }

    /// Placements of a section in display order, each with its article
    pub async fn list_items(&self, section_id: Uuid) -> Result<Vec<(HomepageSectionItem, Option<Article>)>> {
        self.get_section(section_id).await?;
        HomepageSectionItemDao::new(self.db)
            .list_for_section(section_id)
            .await
    }

    pub async fn add_item(&self, input: SectionItemInput) -> Result<HomepageSectionItem> {
        input.validate()?;

        let txn = self.db.begin().await?;
        if HomepageSectionDao::new(&txn).get(input.section_id).await?.is_none() {
            return Err(AppError::Validation {
                message: format!("unknown homepage section id {}", input.section_id),
                field: Some("section_id".to_string()),
            });
        }
        if ArticleDao::new(&txn).get(input.article_id).await?.is_none() {
            return Err(AppError::Validation {
                message: format!("unknown article id {}", input.article_id),
                field: Some("article_id".to_string()),
            });
        }

        let items = HomepageSectionItemDao::new(&txn);
        let position = match input.position {
            Some(position) => position,
            None => items.next_position(input.section_id).await?,
        };
        let item = items
            .create(HomepageSectionItemActiveModel {
                id: NotSet,
                section_id: Set(input.section_id),
                article_id: Set(input.article_id),
                position: Set(position),
                created_at: NotSet,
            })
            .await?;
        txn.commit().await?;

        metrics::record_created("homepage_section_item");
        info!(
            item_id = %item.id,
            section_id = %item.section_id,
            article_id = %item.article_id,
            position = item.position,
            "Article placed on homepage"
        );
        Ok(item)
    }

    pub async fn remove_item(&self, id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;
        let dao = HomepageSectionItemDao::new(&txn);
        let item = dao
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("homepage section item", id))?;
        dao.delete(&item).await?;
        txn.commit().await?;

        metrics::record_deleted("homepage_section_item");
        info!(item_id = %id, section_id = %item.section_id, "Article removed from homepage");
        Ok(())
    }
}
