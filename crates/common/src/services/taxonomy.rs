//! Category and tag services

use super::Page;
use crate::dao::{ArticleDao, ArticleFilter, CategoryDao, TagDao};
use crate::db::models::*;
use crate::errors::{AppError, Result};
use crate::metrics;
use crate::slug::{resolve_slug, validate_slug};
use sea_orm::{ActiveValue::NotSet, DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Body for creating or replacing a category or tag
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TermInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// Derived from the name when absent
    #[serde(default)]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
}

impl TermInput {
    fn checked(&self) -> Result<String> {
        self.validate()?;
        resolve_slug(self.slug.as_deref(), &self.name).ok_or_else(|| AppError::Validation {
            message: "slug could not be derived from the name".to_string(),
            field: Some("slug".to_string()),
        })
    }
}

pub struct CategoryService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CategoryService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, page: Page) -> Result<Vec<Category>> {
        CategoryDao::new(self.db).list(page.limit, page.offset).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Category> {
        CategoryDao::new(self.db)
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("category", id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Category> {
        CategoryDao::new(self.db)
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("category", slug))
    }

    /// Articles filed under the category, newest first
    pub async fn articles(&self, slug: &str, page: Page) -> Result<Vec<Article>> {
        let category = self.get_by_slug(slug).await?;
        let filter = ArticleFilter {
            category: Some(category.slug),
            ..Default::default()
        };
        ArticleDao::new(self.db)
            .list(&filter, page.limit, page.offset)
            .await
    }

    pub async fn create(&self, input: TermInput) -> Result<Category> {
        let slug = input.checked()?;

        let txn = self.db.begin().await?;
        let category = CategoryDao::new(&txn)
            .create(CategoryActiveModel {
                id: NotSet,
                name: Set(input.name),
                slug: Set(slug),
                created_at: NotSet,
            })
            .await?;
        txn.commit().await?;

        metrics::record_created("category");
        info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    pub async fn update(&self, id: Uuid, input: TermInput) -> Result<Category> {
        let slug = input.checked()?;

        let txn = self.db.begin().await?;
        let dao = CategoryDao::new(&txn);
        let mut active: CategoryActiveModel = dao
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("category", id))?
            .into();
        active.name = Set(input.name);
        active.slug = Set(slug);
        let category = dao.update(active).await?;
        txn.commit().await?;

        info!(category_id = %id, slug = %category.slug, "Category updated");
        Ok(category)
    }

    /// Delete the category; article links go with it, articles stay
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;
        let dao = CategoryDao::new(&txn);
        let category = dao
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("category", id))?;
        dao.delete(&category).await?;
        txn.commit().await?;

        metrics::record_deleted("category");
        info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

pub struct TagService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TagService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, page: Page) -> Result<Vec<Tag>> {
        TagDao::new(self.db).list(page.limit, page.offset).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Tag> {
        TagDao::new(self.db)
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("tag", id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Tag> {
        TagDao::new(self.db)
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("tag", slug))
    }

    pub async fn articles(&self, slug: &str, page: Page) -> Result<Vec<Article>> {
        let tag = self.get_by_slug(slug).await?;
        let filter = ArticleFilter {
            tag: Some(tag.slug),
            ..Default::default()
        };
        ArticleDao::new(self.db)
            .list(&filter, page.limit, page.offset)
            .await
    }

    pub async fn create(&self, input: TermInput) -> Result<Tag> {
        let slug = input.checked()?;

        let txn = self.db.begin().await?;
        let tag = TagDao::new(&txn)
            .create(TagActiveModel {
                id: NotSet,
                name: Set(input.name),
                slug: Set(slug),
                created_at: NotSet,
            })
            .await?;
        txn.commit().await?;

        metrics::record_created("tag");
        info!(tag_id = %tag.id, slug = %tag.slug, "Tag created");
        Ok(tag)
    }

    pub async fn update(&self, id: Uuid, input: TermInput) -> Result<Tag> {
        let slug = input.checked()?;

        let txn = self.db.begin().await?;
        let dao = TagDao::new(&txn);
        let mut active: TagActiveModel = dao
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("tag", id))?
            .into();
        active.name = Set(input.name);
        active.slug = Set(slug);
        let tag = dao.update(active).await?;
        txn.commit().await?;

        info!(tag_id = %id, slug = %tag.slug, "Tag updated");
        Ok(tag)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;
        let dao = TagDao::new(&txn);
        let tag = dao
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("tag", id))?;
        dao.delete(&tag).await?;
        txn.commit().await?;

        metrics::record_deleted("tag");
        info!(tag_id = %id, "Tag deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::services::{ArticleInput, ArticleService};

    fn term(name: &str, slug: Option<&str>) -> TermInput {
        TermInput {
            name: name.to_string(),
            slug: slug.map(Into::into),
        }
    }

    #[tokio::test]
    async fn test_category_lifecycle() {
        let pool = test_pool().await;
        let service = CategoryService::new(pool.conn());

        let created = service.create(term("Local News", None)).await.unwrap();
        assert_eq!(created.slug, "local-news");
        assert_eq!(service.get_by_slug("local-news").await.unwrap(), created);

        let updated = service
            .update(created.id, term("Regional", Some("regional")))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert!(matches!(
            service.get_by_slug("local-news").await.unwrap_err(),
            AppError::NotFound { .. }
        ));

        service.delete(created.id).await.unwrap();
        assert!(matches!(
            service.get(created.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_duplicate_tag_slug_conflicts() {
        let pool = test_pool().await;
        let service = TagService::new(pool.conn());

        service.create(term("Elections", None)).await.unwrap();
        let err = service.create(term("elections!", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
        assert_eq!(service.list(Page::new(None, None, 100)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_articles_by_tag() {
        let pool = test_pool().await;
        let tags = TagService::new(pool.conn());
        let articles = ArticleService::new(pool.conn());

        let tag = tags.create(term("Climate", None)).await.unwrap();
        for (slug, tagged) in [("one", true), ("two", false), ("three", true)] {
            articles
                .create(ArticleInput {
                    title: slug.to_string(),
                    slug: Some(slug.to_string()),
                    summary: None,
                    body: String::new(),
                    hero_image_url: None,
                    published_at: None,
                    category_ids: Vec::new(),
                    tag_ids: if tagged { vec![tag.id] } else { Vec::new() },
                })
                .await
                .unwrap();
        }

        let listed = tags.articles("climate", Page::new(None, None, 20)).await.unwrap();
        let slugs: Vec<_> = listed.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, ["three", "one"]);

        assert!(matches!(
            tags.articles("missing", Page::new(None, None, 20)).await.unwrap_err(),
            AppError::NotFound { .. }
        ));

        tags.delete(tag.id).await.unwrap();
        let remaining = articles
            .list(&ArticleFilter::default(), Page::new(None, None, 20))
            .await
            .unwrap();
        assert_eq!(remaining.len(), 3);
    }
}
