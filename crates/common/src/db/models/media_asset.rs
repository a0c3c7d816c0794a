//! Media asset entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media_assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Coarse kind: image, video, audio, document
    #[sea_orm(column_name = "type")]
    pub kind: String,

    pub file_name: String,

    /// Public URL under the static prefix
    pub url: String,

    pub width: Option<i32>,

    pub height: Option<i32>,

    pub mime_type: Option<String>,

    pub alt_text: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub caption: Option<String>,

    pub credit: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
