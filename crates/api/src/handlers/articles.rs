//! Article handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{DateTime, FixedOffset};
use pressroom_common::{
    dao::ArticleFilter,
    db::{
        models::{Article, ArticleStatus},
        DbPool,
    },
    errors::{AppError, Result},
    services::{ArticleDetail, ArticleInput, ArticleService, Page},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::{AppJson, AppPath, AppQuery};
use super::{CreatedResponse, TermRef, ARTICLES_PAGE};

#[derive(Debug, Default, Deserialize)]
pub struct ArticleListQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Category slug
    pub category: Option<String>,
    /// Tag slug
    pub tag: Option<String>,
    /// `draft`, `scheduled` or `published`
    pub status: Option<String>,
}

/// List projection
#[derive(Debug, Serialize)]
pub struct ArticleSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub hero_image_url: Option<String>,
    pub published_at: Option<DateTime<FixedOffset>>,
    pub status: ArticleStatus,
}

impl From<Article> for ArticleSummary {
    fn from(article: Article) -> Self {
        Self {
            status: article.status(),
            id: article.id,
            title: article.title,
            slug: article.slug,
            summary: article.summary,
            hero_image_url: article.hero_image_url,
            published_at: article.published_at,
        }
    }
}

/// Full projection with categories and tags
#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub body: String,
    pub hero_image_url: Option<String>,
    pub published_at: Option<DateTime<FixedOffset>>,
    pub status: ArticleStatus,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub categories: Vec<TermRef>,
    pub tags: Vec<TermRef>,
}

impl From<ArticleDetail> for ArticleResponse {
    fn from(detail: ArticleDetail) -> Self {
        let article = detail.article;
        Self {
            status: article.status(),
            id: article.id,
            title: article.title,
            slug: article.slug,
            summary: article.summary,
            body: article.body,
            hero_image_url: article.hero_image_url,
            published_at: article.published_at,
            created_at: article.created_at,
            updated_at: article.updated_at,
            categories: detail.categories.into_iter().map(TermRef::from).collect(),
            tags: detail.tags.into_iter().map(TermRef::from).collect(),
        }
    }
}

/// List articles, newest first
pub async fn list_articles(
    State(db): State<DbPool>,
    AppQuery(query): AppQuery<ArticleListQuery>,
) -> Result<Json<Vec<ArticleSummary>>> {
    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(ArticleStatus::parse(raw).ok_or_else(|| AppError::Validation {
            message: format!("unknown status '{}'", raw),
            field: Some("status".to_string()),
        })?),
    };

    let filter = ArticleFilter {
        category: query.category.filter(|s| !s.is_empty()),
        tag: query.tag.filter(|s| !s.is_empty()),
        status,
    };
    let page = Page::new(query.limit, query.offset, ARTICLES_PAGE);

    let articles = ArticleService::new(db.conn()).list(&filter, page).await?;
    Ok(Json(articles.into_iter().map(ArticleSummary::from).collect()))
}

/// Get an article by slug
pub async fn get_article(
    State(db): State<DbPool>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<ArticleResponse>> {
    let detail = ArticleService::new(db.conn()).get_by_slug(&slug).await?;
    Ok(Json(detail.into()))
}

/// Get an article by id
pub async fn get_article_by_id(
    State(db): State<DbPool>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ArticleResponse>> {
    let detail = ArticleService::new(db.conn()).get(id).await?;
    Ok(Json(detail.into()))
}

pub async fn create_article(
    State(db): State<DbPool>,
    AppJson(input): AppJson<ArticleInput>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let article = ArticleService::new(db.conn()).create(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: article.id })))
}

/// Replace an article (every field, including its categories and tags)
pub async fn update_article(
    State(db): State<DbPool>,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<ArticleInput>,
) -> Result<Json<ArticleResponse>> {
    let detail = ArticleService::new(db.conn()).update(id, input).await?;
    Ok(Json(detail.into()))
}

pub async fn delete_article(State(db): State<DbPool>, AppPath(id): AppPath<Uuid>) -> Result<StatusCode> {
    ArticleService::new(db.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
