//! Media asset data access

use super::now;
use crate::db::models::*;
use crate::errors::Result;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

const LIKE_ESCAPE: char = '\\';

/// `%term%` with the term's own wildcards taken literally
fn contains_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape(LIKE_ESCAPE)
}

pub struct MediaDao<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> MediaDao<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<MediaAsset>> {
        MediaAssetEntity::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(Into::into)
    }

    /// Newest first, optionally narrowed by a case-insensitive substring match
    /// on file name, alt text or caption
    pub async fn list(&self, search: Option<&str>, limit: u64, offset: u64) -> Result<Vec<MediaAsset>> {
        let mut query = MediaAssetEntity::find();

        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let matches = |col: MediaAssetColumn| {
                Expr::expr(Func::lower(Expr::col(col))).like(contains_pattern(&term))
            };
            query = query.filter(
                Condition::any()
                    .add(matches(MediaAssetColumn::FileName))
                    .add(matches(MediaAssetColumn::AltText))
                    .add(matches(MediaAssetColumn::Caption)),
            );
        }

        query
            .order_by_desc(MediaAssetColumn::CreatedAt)
            .order_by_desc(MediaAssetColumn::Id)
            .limit(limit)
            .offset(offset)
            .all(self.conn)
            .await
            .map_err(Into::into)
    }

    /// Records pointing at `url`; uploads with the same name in the same month share one
    pub async fn count_by_url(&self, url: &str) -> Result<u64> {
        MediaAssetEntity::find()
            .filter(MediaAssetColumn::Url.eq(url))
            .count(self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn create(&self, mut asset: MediaAssetActiveModel) -> Result<MediaAsset> {
        if asset.id.is_not_set() {
            asset.id = Set(Uuid::now_v7());
        }
        asset.created_at = Set(now());
        asset.insert(self.conn).await.map_err(Into::into)
    }

    pub async fn delete(&self, asset: &MediaAsset) -> Result<()> {
        MediaAssetEntity::delete_by_id(asset.id).exec(self.conn).await?;
        Ok(())
    }
}
