//! Category handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use pressroom_common::{
    db::DbPool,
    errors::Result,
    services::{CategoryService, PageParams, TermInput},
};
use uuid::Uuid;

use crate::extract::{AppJson, AppPath, AppQuery};
use super::{articles::ArticleSummary, CreatedResponse, TermResponse, ARTICLES_PAGE, TERMS_PAGE};

pub async fn list_categories(
    State(db): State<DbPool>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<Vec<TermResponse>>> {
    let categories = CategoryService::new(db.conn())
        .list(params.page(TERMS_PAGE))
        .await?;
    Ok(Json(categories.into_iter().map(TermResponse::from).collect()))
}

pub async fn get_category(
    State(db): State<DbPool>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<TermResponse>> {
    let category = CategoryService::new(db.conn()).get_by_slug(&slug).await?;
    Ok(Json(category.into()))
}

pub async fn get_category_by_id(
    State(db): State<DbPool>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<TermResponse>> {
    let category = CategoryService::new(db.conn()).get(id).await?;
    Ok(Json(category.into()))
}

/// Articles filed under a category, newest first
pub async fn category_articles(
    State(db): State<DbPool>,
    AppPath(slug): AppPath<String>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<Vec<ArticleSummary>>> {
    let articles = CategoryService::new(db.conn())
        .articles(&slug, params.page(ARTICLES_PAGE))
        .await?;
    Ok(Json(articles.into_iter().map(ArticleSummary::from).collect()))
}

pub async fn create_category(
    State(db): State<DbPool>,
    AppJson(input): AppJson<TermInput>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let category = CategoryService::new(db.conn()).create(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: category.id })))
}

pub async fn update_category(
    State(db): State<DbPool>,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<TermInput>,
) -> Result<Json<TermResponse>> {
    let category = CategoryService::new(db.conn()).update(id, input).await?;
    Ok(Json(category.into()))
}

pub async fn delete_category(State(db): State<DbPool>, AppPath(id): AppPath<Uuid>) -> Result<StatusCode> {
    CategoryService::new(db.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
