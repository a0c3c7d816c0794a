//! Tag handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use pressroom_common::{
    db::DbPool,
    errors::Result,
    services::{TagService, PageParams, TermInput},
};
use uuid::Uuid;

use crate::extract::{AppJson, AppPath, AppQuery};
use super::{articles::ArticleSummary, CreatedResponse, TermResponse, ARTICLES_PAGE, TERMS_PAGE};

pub async fn list_tags(
    State(db): State<DbPool>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<Vec<TermResponse>>> {
    let tags = TagService::new(db.conn())
        .list(params.page(TERMS_PAGE))
        .await?;
    Ok(Json(tags.into_iter().map(TermResponse::from).collect()))
}

pub async fn get_tag(
    State(db): State<DbPool>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<TermResponse>> {
    let tag = TagService::new(db.conn()).get_by_slug(&slug).await?;
    Ok(Json(tag.into()))
}

pub async fn get_tag_by_id(
    State(db): State<DbPool>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<TermResponse>> {
    let tag = TagService::new(db.conn()).get(id).await?;
    Ok(Json(tag.into()))
}

/// Articles carrying a tag, newest first
pub async fn tag_articles(
    State(db): State<DbPool>,
    AppPath(slug): AppPath<String>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<Vec<ArticleSummary>>> {
    let articles = TagService::new(db.conn())
        .articles(&slug, params.page(ARTICLES_PAGE))
        .await?;
    Ok(Json(articles.into_iter().map(ArticleSummary::from).collect()))
}

pub async fn create_tag(
    State(db): State<DbPool>,
    AppJson(input): AppJson<TermInput>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let tag = TagService::new(db.conn()).create(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: tag.id })))
}

pub async fn update_tag(
    State(db): State<DbPool>,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<TermInput>,
) -> Result<Json<TermResponse>> {
    let tag = TagService::new(db.conn()).update(id, input).await?;
    Ok(Json(tag.into()))
}

pub async fn delete_tag(State(db): State<DbPool>, AppPath(id): AppPath<Uuid>) -> Result<StatusCode> {
    TagService::new(db.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
