//! Article service

use super::{dedup_ids, Page};
use crate::dao::{ArticleDao, ArticleFilter, CategoryDao, TagDao};
use crate::db::models::*;
use crate::errors::{AppError, Result};
use crate::metrics;
use crate::slug::{resolve_slug, validate_slug};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::NotSet, ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Body of `POST /articles/` and `PUT /articles/{id}`.
///
/// An update replaces every field, including the category and tag sets.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ArticleInput {
    #[validate(length(min = 1, max = 500))]
    pub title: String,

    /// Derived from the title when absent
    #[serde(default)]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    #[validate(length(max = 2048))]
    pub hero_image_url: Option<String>,

    /// Absent for drafts; a future instant schedules the article
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub category_ids: Vec<Uuid>,

    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

impl ArticleInput {
    fn resolved_slug(&self) -> Result<String> {
        resolve_slug(self.slug.as_deref(), &self.title).ok_or_else(|| AppError::Validation {
            message: "slug could not be derived from the title".to_string(),
            field: Some("slug".to_string()),
        })
    }
}

/// An article with its categories and tags
#[derive(Debug, Clone)]
pub struct ArticleDetail {
    pub article: Article,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

pub struct ArticleService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ArticleService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &ArticleFilter, page: Page) -> Result<Vec<Article>> {
        ArticleDao::new(self.db)
            .list(filter, page.limit, page.offset)
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<ArticleDetail> {
        let dao = ArticleDao::new(self.db);
        let article = dao
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("article", id))?;
        load_detail(&dao, article).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<ArticleDetail> {
        let dao = ArticleDao::new(self.db);
        let article = dao
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("article", slug))?;
        load_detail(&dao, article).await
    }

    pub async fn create(&self, input: ArticleInput) -> Result<Article> {
        input.validate()?;
        let slug = input.resolved_slug()?;
        let category_ids = dedup_ids(&input.category_ids);
        let tag_ids = dedup_ids(&input.tag_ids);

        let txn = self.db.begin().await?;
        ensure_terms_exist(&txn, &category_ids, &tag_ids).await?;

        let dao = ArticleDao::new(&txn);
        let article = dao
            .create(ArticleActiveModel {
                id: NotSet,
                title: Set(input.title),
                slug: Set(slug),
                summary: Set(input.summary),
                body: Set(input.body),
                hero_image_url: Set(input.hero_image_url),
                published_at: Set(input.published_at.map(Into::into)),
                created_at: NotSet,
                updated_at: NotSet,
            })
            .await?;
        dao.replace_categories(article.id, &category_ids).await?;
        dao.replace_tags(article.id, &tag_ids).await?;
        txn.commit().await?;

        metrics::record_created("article");
        info!(article_id = %article.id, slug = %article.slug, "Article created");

        Ok(article)
    }

    pub async fn update(&self, id: Uuid, input: ArticleInput) -> Result<ArticleDetail> {
        input.validate()?;
        let slug = input.resolved_slug()?;
        let category_ids = dedup_ids(&input.category_ids);
        let tag_ids = dedup_ids(&input.tag_ids);

        let txn = self.db.begin().await?;
        let dao = ArticleDao::new(&txn);
        let existing = dao
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("article", id))?;
        ensure_terms_exist(&txn, &category_ids, &tag_ids).await?;

        let mut active: ArticleActiveModel = existing.into();
        active.title = Set(input.title);
        active.slug = Set(slug);
        active.summary = Set(input.summary);
        active.body = Set(input.body);
        active.hero_image_url = Set(input.hero_image_url);
        active.published_at = Set(input.published_at.map(Into::into));

        let article = dao.update(active).await?;
        dao.replace_categories(article.id, &category_ids).await?;
        dao.replace_tags(article.id, &tag_ids).await?;
        let detail = load_detail(&dao, article).await?;
        txn.commit().await?;

        info!(article_id = %id, slug = %detail.article.slug, "Article updated");
        Ok(detail)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;
        let dao = ArticleDao::new(&txn);
        let article = dao
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("article", id))?;
        dao.delete(&article).await?;
        txn.commit().await?;

        metrics::record_deleted("article");
        info!(article_id = %id, slug = %article.slug, "Article deleted");
        Ok(())
    }
}

async fn load_detail<C: ConnectionTrait>(dao: &ArticleDao<'_, C>, article: Article) -> Result<ArticleDetail> {
    let categories = dao.categories(article.id).await?;
    let tags = dao.tags(article.id).await?;
    Ok(ArticleDetail {
        article,
        categories,
        tags,
    })
}

/// Reject links to categories or tags that do not exist
async fn ensure_terms_exist<C: ConnectionTrait>(conn: &C, category_ids: &[Uuid], tag_ids: &[Uuid]) -> Result<()> {
    if !category_ids.is_empty() {
        let found = CategoryDao::new(conn).find_many(category_ids).await?;
        if let Some(missing) = category_ids.iter().find(|id| !found.iter().any(|c| c.id == **id)) {
            return Err(AppError::Validation {
                message: format!("unknown category id {}", missing),
                field: Some("category_ids".to_string()),
            });
        }
    }

    if !tag_ids.is_empty() {
        let found = TagDao::new(conn).find_many(tag_ids).await?;
        if let Some(missing) = tag_ids.iter().find(|id| !found.iter().any(|t| t.id == **id)) {
            return Err(AppError::Validation {
                message: format!("unknown tag id {}", missing),
                field: Some("tag_ids".to_string()),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::services::{CategoryService, TermInput};

    fn input(title: &str, slug: Option<&str>) -> ArticleInput {
        ArticleInput {
            title: title.to_string(),
            slug: slug.map(Into::into),
            summary: None,
            body: "hello".to_string(),
            hero_image_url: None,
            published_at: None,
            category_ids: Vec::new(),
            tag_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_by_slug() {
        let pool = test_pool().await;
        let service = ArticleService::new(pool.conn());

        let created = service.create(input("A", Some("a"))).await.unwrap();
        let detail = service.get_by_slug("a").await.unwrap();

        assert_eq!(detail.article.id, created.id);
        assert_eq!(detail.article.title, "A");
        assert_eq!(detail.article.body, "hello");
        assert_eq!(detail.article.status(), ArticleStatus::Draft);
        assert!(detail.categories.is_empty());
    }

    #[tokio::test]
    async fn test_slug_derived_from_title() {
        let pool = test_pool().await;
        let service = ArticleService::new(pool.conn());

        let created = service.create(input("Budget Vote: What Next?", None)).await.unwrap();
        assert_eq!(created.slug, "budget-vote-what-next");

        let err = service.create(input("???", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let pool = test_pool().await;
        let service = ArticleService::new(pool.conn());

        let err = service.create(input("", Some("empty"))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = service.create(input("Bad", Some("Not A Slug"))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_missing_article_is_not_found() {
        let pool = test_pool().await;
        let service = ArticleService::new(pool.conn());

        assert!(matches!(
            service.get_by_slug("nope").await.unwrap_err(),
            AppError::NotFound { .. }
        ));
        assert!(matches!(
            service.update(Uuid::now_v7(), input("X", None)).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
        assert!(matches!(
            service.delete(Uuid::now_v7()).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_unknown_category_rolls_back() {
        let pool = test_pool().await;
        let service = ArticleService::new(pool.conn());

        let mut with_ghost = input("Ghost", Some("ghost"));
        with_ghost.category_ids = vec![Uuid::now_v7()];
        let err = service.create(with_ghost).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(service
            .list(&ArticleFilter::default(), Page::new(None, None, 20))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_links() {
        let pool = test_pool().await;
        let service = ArticleService::new(pool.conn());
        let categories = CategoryService::new(pool.conn());

        let world = categories
            .create(TermInput {
                name: "World".into(),
                slug: None,
            })
            .await
            .unwrap();
        let mut original = input("Original", Some("original"));
        original.summary = Some("short".into());
        original.category_ids = vec![world.id, world.id];
        let created = service.create(original).await.unwrap();
        assert_eq!(service.get(created.id).await.unwrap().categories, vec![world]);

        let mut replacement = input("Rewritten", Some("rewritten"));
        replacement.published_at = Some(Utc::now());
        let updated = service.update(created.id, replacement).await.unwrap();

        assert_eq!(updated.article.slug, "rewritten");
        assert_eq!(updated.article.summary, None);
        assert_eq!(updated.article.status(), ArticleStatus::Published);
        assert!(updated.categories.is_empty());
        assert_eq!(updated.article.created_at, created.created_at);
        assert!(updated.article.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_to_taken_slug_conflicts() {
        let pool = test_pool().await;
        let service = ArticleService::new(pool.conn());

        service.create(input("First", Some("first"))).await.unwrap();
        let second = service.create(input("Second", Some("second"))).await.unwrap();

        let err = service
            .update(second.id, input("Second", Some("first")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
        assert_eq!(service.get(second.id).await.unwrap().article.slug, "second");
    }
}
