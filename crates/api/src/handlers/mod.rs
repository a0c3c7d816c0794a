//! API handlers module
//!
//! Handlers parse the request, call a service and shape the JSON projection.
//! List endpoints return partial projections; single-item endpoints return
//! the full record with the minimal fields of related entities.

pub mod articles;
pub mod categories;
pub mod health;
pub mod media;
pub mod sections;
pub mod tags;

use chrono::{DateTime, FixedOffset};
use pressroom_common::db::models::{Category, Tag};
use serde::Serialize;
use uuid::Uuid;

/// Default page sizes per resource
pub const ARTICLES_PAGE: u64 = 20;
pub const TERMS_PAGE: u64 = 100;
pub const MEDIA_PAGE: u64 = 50;
pub const SECTIONS_PAGE: u64 = 100;

/// Body returned by create endpoints
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

/// Minimal projection of a category or tag
#[derive(Debug, Serialize)]
pub struct TermRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<Category> for TermRef {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
        }
    }
}

impl From<Tag> for TermRef {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
        }
    }
}

/// Full projection of a category or tag
#[derive(Debug, Serialize)]
pub struct TermResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<Category> for TermResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            created_at: category.created_at,
        }
    }
}

impl From<Tag> for TermResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
            created_at: tag.created_at,
        }
    }
}
