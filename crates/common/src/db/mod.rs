//! Database layer for Pressroom
//!
//! Provides:
//! - SeaORM entity models
//! - Connection pool management
//! - Schema bootstrap from the entity definitions

pub mod models;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use models::*;
use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
};
use std::time::Duration;
use tracing::info;

/// Database connection pool wrapper
///
/// Cheap to clone; each request works on its own handle and the pool returns
/// the underlying connection when the handle (or its transaction) is dropped.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let mut opts = ConnectOptions::new(&config.url);
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .sqlx_logging(config.sqlx_logging);

        let conn = Database::connect(opts)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect: {}", e),
            })?;

        info!("Database connection established");

        Ok(Self { conn })
    }

    /// Wrap an already opened connection
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Connection handle for the current request
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Ping failed: {}", e),
            })
    }

    /// Create every table (and the composite unique index) that does not exist yet.
    ///
    /// Parents are created before the tables holding foreign keys to them.
    pub async fn init_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        create_table(&self.conn, &schema, CategoryEntity).await?;
        create_table(&self.conn, &schema, TagEntity).await?;
        create_table(&self.conn, &schema, ArticleEntity).await?;
        create_table(&self.conn, &schema, article_category::Entity).await?;
        create_table(&self.conn, &schema, article_tag::Entity).await?;
        create_table(&self.conn, &schema, MediaAssetEntity).await?;
        create_table(&self.conn, &schema, HomepageSectionEntity).await?;
        create_table(&self.conn, &schema, HomepageSectionItemEntity).await?;

        let placement = Index::create()
            .name("idx_homepage_section_items_section_article")
            .table(HomepageSectionItemEntity)
            .col(HomepageSectionItemColumn::SectionId)
            .col(HomepageSectionItemColumn::ArticleId)
            .unique()
            .if_not_exists()
            .to_owned();
        self.conn.execute(backend.build(&placement)).await?;

        info!("Database schema ready");
        Ok(())
    }
}

async fn create_table<E>(conn: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let backend = conn.get_database_backend();
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    conn.execute(backend.build(&stmt)).await?;
    Ok(())
}

/// Open an in-memory SQLite database with the full schema.
///
/// A single pooled connection keeps every handle on the same in-memory database.
#[cfg(test)]
pub(crate) async fn test_pool() -> DbPool {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let conn = Database::connect(opts).await.expect("sqlite connects");
    let pool = DbPool::from_connection(conn);
    pool.init_schema().await.expect("schema created");
    pool
}
