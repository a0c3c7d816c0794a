//! Data access objects
//!
//! One DAO per entity. Each borrows a connection supplied by the caller (a
//! pooled connection for reads, an open transaction for writes) and never
//! commits; transaction boundaries belong to the services.

mod article;
mod category;
mod homepage_section;
mod media;
mod tag;

pub use article::{ArticleDao, ArticleFilter};
pub use category::CategoryDao;
pub use homepage_section::{HomepageSectionDao, HomepageSectionItemDao};
pub use media::MediaDao;
pub use tag::TagDao;

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Timestamp assigned to rows on insert/update
pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}
