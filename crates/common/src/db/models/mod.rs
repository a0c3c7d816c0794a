//! SeaORM entity models
//!
//! Database entities for Pressroom

pub mod article;
pub mod article_category;
pub mod article_tag;
pub mod category;
pub mod homepage_section;
pub mod homepage_section_item;
pub mod media_asset;
pub mod tag;

pub use article::{
    Entity as ArticleEntity,
    Model as Article,
    ActiveModel as ArticleActiveModel,
    Column as ArticleColumn,
    ArticleStatus,
};

pub use category::{
    Entity as CategoryEntity,
    Model as Category,
    ActiveModel as CategoryActiveModel,
    Column as CategoryColumn,
};

pub use tag::{
    Entity as TagEntity,
    Model as Tag,
    ActiveModel as TagActiveModel,
    Column as TagColumn,
};

pub use media_asset::{
    Entity as MediaAssetEntity,
    Model as MediaAsset,
    ActiveModel as MediaAssetActiveModel,
    Column as MediaAssetColumn,
};

pub use homepage_section::{
    Entity as HomepageSectionEntity,
    Model as HomepageSection,
    ActiveModel as HomepageSectionActiveModel,
    Column as HomepageSectionColumn,
};

pub use homepage_section_item::{
    Entity as HomepageSectionItemEntity,
    Model as HomepageSectionItem,
    ActiveModel as HomepageSectionItemActiveModel,
    Column as HomepageSectionItemColumn,
};
