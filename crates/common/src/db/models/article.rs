//! Article entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(unique)]
    pub slug: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,

    /// Rich text (HTML) body
    #[sea_orm(column_type = "Text")]
    pub body: String,

    #[sea_orm(nullable)]
    pub hero_image_url: Option<String>,

    /// `None` means the article is still a draft
    pub published_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::article_category::Entity")]
    ArticleCategories,

    #[sea_orm(has_many = "super::article_tag::Entity")]
    ArticleTags,

    #[sea_orm(has_many = "super::homepage_section_item::Entity")]
    SectionItems,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_category::Relation::Article.def().rev())
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_tag::Relation::Article.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Publication state derived from `published_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Scheduled,
    Published,
}

impl ArticleStatus {
    /// Parse the `status` query parameter
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "scheduled" => Some(Self::Scheduled),
            "published" => Some(Self::Published),
            _ => None,
        }
    }
}

impl Model {
    /// Status relative to `now`
    pub fn status_at(&self, now: DateTimeWithTimeZone) -> ArticleStatus {
        match self.published_at {
            None => ArticleStatus::Draft,
            Some(at) if at > now => ArticleStatus::Scheduled,
            Some(_) => ArticleStatus::Published,
        }
    }

    /// Status relative to the current time
    pub fn status(&self) -> ArticleStatus {
        self.status_at(chrono::Utc::now().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn article(published_at: Option<DateTimeWithTimeZone>) -> Model {
        let now = Utc::now().into();
        Model {
            id: Uuid::now_v7(),
            title: "A".into(),
            slug: "a".into(),
            summary: None,
            body: "hello".into(),
            hero_image_url: None,
            published_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_is_derived_from_published_at() {
        let now: DateTimeWithTimeZone = Utc::now().into();
        assert_eq!(article(None).status_at(now), ArticleStatus::Draft);
        assert_eq!(
            article(Some(now - Duration::hours(1))).status_at(now),
            ArticleStatus::Published
        );
        assert_eq!(
            article(Some(now + Duration::hours(1))).status_at(now),
            ArticleStatus::Scheduled
        );
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ArticleStatus::parse("Published"), Some(ArticleStatus::Published));
        assert_eq!(ArticleStatus::parse("draft"), Some(ArticleStatus::Draft));
        assert_eq!(ArticleStatus::parse("archived"), None);
    }
}
