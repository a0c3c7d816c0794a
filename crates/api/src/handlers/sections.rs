//! Homepage section and section item handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{DateTime, FixedOffset};
use pressroom_common::{
    db::{models::HomepageSection, DbPool},
    errors::Result,
    services::{HomepageService, PageParams, SectionInput, SectionItemInput},
};
use serde::Serialize;
use uuid::Uuid;

use crate::extract::{AppJson, AppPath, AppQuery};
use super::{articles::ArticleSummary, CreatedResponse, SECTIONS_PAGE};

#[derive(Debug, Serialize)]
pub struct SectionResponse {
    pub id: Uuid,
    pub key: String,
    pub title: String,
    pub position: i32,
    pub created_at: DateTime<FixedOffset>,
}

impl From<HomepageSection> for SectionResponse {
    fn from(section: HomepageSection) -> Self {
        Self {
            id: section.id,
            key: section.key,
            title: section.title,
            position: section.position,
            created_at: section.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SectionItemResponse {
    pub id: Uuid,
    pub section_id: Uuid,
    pub position: i32,
    pub article: Option<ArticleSummary>,
}

pub async fn list_sections(
    State(db): State<DbPool>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<Vec<SectionResponse>>> {
    let sections = HomepageService::new(db.conn())
        .list_sections(params.page(SECTIONS_PAGE))
        .await?;
    Ok(Json(sections.into_iter().map(SectionResponse::from).collect()))
}

pub async fn get_section(
    State(db): State<DbPool>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<SectionResponse>> {
    let section = HomepageService::new(db.conn()).get_section(id).await?;
    Ok(Json(section.into()))
}

pub async fn get_section_by_key(
    State(db): State<DbPool>,
    AppPath(key): AppPath<String>,
) -> Result<Json<SectionResponse>> {
    let section = HomepageService::new(db.conn()).get_section_by_key(&key).await?;
    Ok(Json(section.into()))
}

pub async fn create_section(
    State(db): State<DbPool>,
    AppJson(input): AppJson<SectionInput>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let section = HomepageService::new(db.conn()).create_section(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: section.id })))
}

pub async fn update_section(
    State(db): State<DbPool>,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<SectionInput>,
) -> Result<Json<SectionResponse>> {
    let section = HomepageService::new(db.conn()).update_section(id, input).await?;
    Ok(Json(section.into()))
}

pub async fn delete_section(State(db): State<DbPool>, AppPath(id): AppPath<Uuid>) -> Result<StatusCode> {
    HomepageService::new(db.conn()).delete_section(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Articles placed in a section, in display order
pub async fn list_section_items(
    State(db): State<DbPool>,
    AppPath(section_id): AppPath<Uuid>,
) -> Result<Json<Vec<SectionItemResponse>>> {
    let items = HomepageService::new(db.conn()).list_items(section_id).await?;
    Ok(Json(
        items
            .into_iter()
            .map(|(item, article)| SectionItemResponse {
                id: item.id,
                section_id: item.section_id,
                position: item.position,
                article: article.map(ArticleSummary::from),
            })
            .collect(),
    ))
}

pub async fn create_section_item(
    State(db): State<DbPool>,
    AppJson(input): AppJson<SectionItemInput>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let item = HomepageService::new(db.conn()).add_item(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: item.id })))
}

pub async fn delete_section_item(State(db): State<DbPool>, AppPath(id): AppPath<Uuid>) -> Result<StatusCode> {
    HomepageService::new(db.conn()).remove_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
