//! Media handlers: listing, multipart upload, deletion and file serving

use axum::{
    body::Body,
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Request, State,
    },
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::{DateTime, FixedOffset};
use pressroom_common::{
    config::AppConfig,
    db::{models::MediaAsset, DbPool},
    errors::{AppError, Result},
    media::MediaStore,
    services::{MediaService, Page, UploadInput},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use uuid::Uuid;

use crate::extract::{AppPath, AppQuery};
use super::MEDIA_PAGE;

#[derive(Debug, Default, Deserialize)]
pub struct MediaListQuery {
    /// Case-insensitive match on file name, alt text or caption
    pub q: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub file_name: String,
    pub url: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub mime_type: Option<String>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub credit: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<MediaAsset> for MediaResponse {
    fn from(asset: MediaAsset) -> Self {
        Self {
            id: asset.id,
            kind: asset.kind,
            file_name: asset.file_name,
            url: asset.url,
            width: asset.width,
            height: asset.height,
            mime_type: asset.mime_type,
            alt_text: asset.alt_text,
            caption: asset.caption,
            credit: asset.credit,
            created_at: asset.created_at,
        }
    }
}

pub async fn list_media(
    State(db): State<DbPool>,
    State(store): State<Arc<MediaStore>>,
    AppQuery(query): AppQuery<MediaListQuery>,
) -> Result<Json<Vec<MediaResponse>>> {
    let page = Page::new(query.limit, query.offset, MEDIA_PAGE);
    let assets = MediaService::new(db.conn(), &store)
        .list(query.q.as_deref(), page)
        .await?;
    Ok(Json(assets.into_iter().map(MediaResponse::from).collect()))
}

pub async fn get_media(
    State(db): State<DbPool>,
    State(store): State<Arc<MediaStore>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MediaResponse>> {
    let asset = MediaService::new(db.conn(), &store).get(id).await?;
    Ok(Json(asset.into()))
}

/// Accept a multipart upload: a `file` part plus optional `alt_text`,
/// `caption`, `credit`, `width` and `height` fields
pub async fn upload_media(
    State(db): State<DbPool>,
    State(store): State<Arc<MediaStore>>,
    State(config): State<Arc<AppConfig>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MediaResponse>)> {
    let limit = config.media.max_upload_bytes;
    let mut input = UploadInput::default();
    let mut has_file = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "file" if field.file_name().is_some() => {
                input.file_name = field.file_name().unwrap_or_default().to_string();
                input.content_type = field.content_type().map(str::to_string);
                input.data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                has_file = true;
            }
            "alt_text" => input.alt_text = text_field(field, limit).await?,
            "caption" => input.caption = text_field(field, limit).await?,
            "credit" => input.credit = text_field(field, limit).await?,
            "width" => input.width = dimension_field("width", field, limit).await?,
            "height" => input.height = dimension_field("height", field, limit).await?,
            _ => {}
        }
    }

    if !has_file {
        return Err(AppError::MissingUpload);
    }

    let asset = MediaService::new(db.conn(), &store).upload(input).await?;
    Ok((StatusCode::CREATED, Json(asset.into())))
}

/// Delete the asset record and its stored file
pub async fn delete_media(
    State(db): State<DbPool>,
    State(store): State<Arc<MediaStore>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode> {
    MediaService::new(db.conn(), &store).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Serve a stored file by its public URL
pub async fn serve_file(State(store): State<Arc<MediaStore>>, request: Request) -> Result<Response> {
    let path = store
        .path_for_url(request.uri().path())
        .ok_or_else(|| AppError::not_found("file", request.uri().path()))?;

    let response = match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    Ok(response.map(Body::new))
}

async fn text_field(field: Field<'_>, limit: usize) -> Result<Option<String>> {
    let value = field.text().await.map_err(|e| multipart_error(e, limit))?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

async fn dimension_field(name: &str, field: Field<'_>, limit: usize) -> Result<Option<i32>> {
    let Some(raw) = text_field(field, limit).await? else {
        return Ok(None);
    };
    match raw.parse::<i32>() {
        Ok(value) if value >= 0 => Ok(Some(value)),
        _ => Err(AppError::Validation {
            message: format!("{} must be a non-negative integer", name),
            field: Some(name.to_string()),
        }),
    }
}

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::InvalidFormat {
            message: err.body_text(),
        }
    }
}
