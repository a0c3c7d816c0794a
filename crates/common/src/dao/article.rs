//! Article data access

use super::now;
use crate::db::models::*;
use crate::errors::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

/// Optional narrowing for article listings
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Only articles linked to the category with this slug
    pub category: Option<String>,

    /// Only articles linked to the tag with this slug
    pub tag: Option<String>,

    /// Only articles in this publication state
    pub status: Option<ArticleStatus>,
}

pub struct ArticleDao<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> ArticleDao<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Article>> {
        ArticleEntity::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        ArticleEntity::find()
            .filter(ArticleColumn::Slug.eq(slug))
            .one(self.conn)
            .await
            .map_err(Into::into)
    }

    /// Newest first; ties on `created_at` fall back to the time-ordered id
    pub async fn list(&self, filter: &ArticleFilter, limit: u64, offset: u64) -> Result<Vec<Article>> {
        let mut query = ArticleEntity::find();

        if let Some(ref slug) = filter.category {
            query = query
                .join(JoinType::InnerJoin, article::Relation::ArticleCategories.def())
                .join(JoinType::InnerJoin, article_category::Relation::Category.def())
                .filter(CategoryColumn::Slug.eq(slug.as_str()));
        }

        if let Some(ref slug) = filter.tag {
            query = query
                .join(JoinType::InnerJoin, article::Relation::ArticleTags.def())
                .join(JoinType::InnerJoin, article_tag::Relation::Tag.def())
                .filter(TagColumn::Slug.eq(slug.as_str()));
        }

        query = match filter.status {
            None => query,
            Some(ArticleStatus::Draft) => query.filter(ArticleColumn::PublishedAt.is_null()),
            Some(ArticleStatus::Published) => query.filter(ArticleColumn::PublishedAt.lte(now())),
            Some(ArticleStatus::Scheduled) => query.filter(ArticleColumn::PublishedAt.gt(now())),
        };

        query
            .order_by_desc(ArticleColumn::CreatedAt)
            .order_by_desc(ArticleColumn::Id)
            .limit(limit)
            .offset(offset)
            .all(self.conn)
            .await
            .map_err(Into::into)
    }

    /// Insert; assigns the id (when unset) and both timestamps
    pub async fn create(&self, mut article: ArticleActiveModel) -> Result<Article> {
        let ts = now();
        if article.id.is_not_set() {
            article.id = Set(Uuid::now_v7());
        }
        article.created_at = Set(ts);
        article.updated_at = Set(ts);

        article.insert(self.conn).await.map_err(Into::into)
    }

    pub async fn update(&self, mut article: ArticleActiveModel) -> Result<Article> {
        article.updated_at = Set(now());
        article.update(self.conn).await.map_err(Into::into)
    }

    pub async fn delete(&self, article: &Article) -> Result<()> {
        article_category::Entity::delete_many()
            .filter(article_category::Column::ArticleId.eq(article.id))
            .exec(self.conn)
            .await?;
        article_tag::Entity::delete_many()
            .filter(article_tag::Column::ArticleId.eq(article.id))
            .exec(self.conn)
            .await?;
        ArticleEntity::delete_by_id(article.id).exec(self.conn).await?;
        Ok(())
    }

    /// Categories linked to the article, by name
    pub async fn categories(&self, article_id: Uuid) -> Result<Vec<Category>> {
        CategoryEntity::find()
            .join(JoinType::InnerJoin, category::Relation::ArticleCategories.def())
            .filter(article_category::Column::ArticleId.eq(article_id))
            .order_by_asc(CategoryColumn::Name)
            .all(self.conn)
            .await
            .map_err(Into::into)
    }

    /// Tags linked to the article, by name
    pub async fn tags(&self, article_id: Uuid) -> Result<Vec<Tag>> {
        TagEntity::find()
            .join(JoinType::InnerJoin, tag::Relation::ArticleTags.def())
            .filter(article_tag::Column::ArticleId.eq(article_id))
            .order_by_asc(TagColumn::Name)
            .all(self.conn)
            .await
            .map_err(Into::into)
    }

    /// Make `category_ids` the article's exact category set
    pub async fn replace_categories(&self, article_id: Uuid, category_ids: &[Uuid]) -> Result<()> {
        article_category::Entity::delete_many()
            .filter(article_category::Column::ArticleId.eq(article_id))
            .exec(self.conn)
            .await?;

        if category_ids.is_empty() {
            return Ok(());
        }

        let links = category_ids.iter().map(|&category_id| article_category::ActiveModel {
            article_id: Set(article_id),
            category_id: Set(category_id),
        });
        article_category::Entity::insert_many(links)
            .exec_without_returning(self.conn)
            .await?;
        Ok(())
    }

    /// Make `tag_ids` the article's exact tag set
    pub async fn replace_tags(&self, article_id: Uuid, tag_ids: &[Uuid]) -> Result<()> {
        article_tag::Entity::delete_many()
            .filter(article_tag::Column::ArticleId.eq(article_id))
            .exec(self.conn)
            .await?;

        if tag_ids.is_empty() {
            return Ok(());
        }

        let links = tag_ids.iter().map(|&tag_id| article_tag::ActiveModel {
            article_id: Set(article_id),
            tag_id: Set(tag_id),
        });
        article_tag::Entity::insert_many(links)
            .exec_without_returning(self.conn)
            .await?;
        Ok(())
    }
}
