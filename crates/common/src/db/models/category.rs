//! Category entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::article_category::Entity")]
    ArticleCategories,
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_category::Relation::Article.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_category::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
