//! Media service: file storage plus the asset record

use super::Page;
use crate::dao::MediaDao;
use crate::db::models::*;
use crate::errors::{AppError, Result};
use crate::media::{media_kind, MediaStore, StoredFile};
use crate::metrics;
use axum::body::Bytes;
use chrono::Utc;
use sea_orm::{ActiveValue::NotSet, DatabaseConnection, Set, TransactionTrait};
use tracing::{info, warn};
use uuid::Uuid;

/// A file received from the client with its descriptive fields
#[derive(Debug, Clone, Default)]
pub struct UploadInput {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub credit: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

pub struct MediaService<'a> {
    db: &'a DatabaseConnection,
    store: &'a MediaStore,
}

impl<'a> MediaService<'a> {
    pub fn new(db: &'a DatabaseConnection, store: &'a MediaStore) -> Self {
        Self { db, store }
    }

    pub async fn list(&self, search: Option<&str>, page: Page) -> Result<Vec<MediaAsset>> {
        MediaDao::new(self.db)
            .list(search, page.limit, page.offset)
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<MediaAsset> {
        MediaDao::new(self.db)
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("media", id))
    }

    /// Store the file under this month's bucket and record it.
    ///
    /// When the record cannot be saved the written file is removed again,
    /// unless an earlier record already points at the same file.
    pub async fn upload(&self, input: UploadInput) -> Result<MediaAsset> {
        let stored = self.store.save(&input.file_name, &input.data, Utc::now()).await?;
        let kind = media_kind(input.content_type.as_deref());

        match self.record(&stored, kind, input).await {
            Ok(asset) => {
                metrics::record_upload(kind, stored.size);
                info!(
                    media_id = %asset.id,
                    url = %asset.url,
                    bytes = stored.size,
                    "Media uploaded"
                );
                Ok(asset)
            }
            Err(e) => {
                match MediaDao::new(self.db).count_by_url(&stored.url).await {
                    Ok(0) => {
                        if let Err(cleanup) = self.store.remove(&stored.url).await {
                            warn!(path = %stored.path.display(), error = %cleanup, "Failed to remove orphaned upload");
                        }
                    }
                    Ok(_) => {}
                    Err(lookup) => warn!(
                        path = %stored.path.display(),
                        error = %lookup,
                        "Kept upload; could not check for other records"
                    ),
                }
                Err(e)
            }
        }
    }

    async fn record(&self, stored: &StoredFile, kind: &str, input: UploadInput) -> Result<MediaAsset> {
        let txn = self.db.begin().await?;
        let asset = MediaDao::new(&txn)
            .create(MediaAssetActiveModel {
                id: NotSet,
                kind: Set(kind.to_string()),
                file_name: Set(stored.file_name.clone()),
                url: Set(stored.url.clone()),
                width: Set(input.width),
                height: Set(input.height),
                mime_type: Set(input.content_type),
                alt_text: Set(input.alt_text),
                caption: Set(input.caption),
                credit: Set(input.credit),
                created_at: NotSet,
            })
            .await?;
        txn.commit().await?;
        Ok(asset)
    }

    /// Delete the record, then the stored file once no other record uses it
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;
        let dao = MediaDao::new(&txn);
        let asset = dao
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("media", id))?;
        dao.delete(&asset).await?;
        let still_used = dao.count_by_url(&asset.url).await?;
        txn.commit().await?;

        if still_used > 0 {
            info!(media_id = %id, url = %asset.url, remaining = still_used, "Stored file kept for other records");
        } else {
            match self.store.remove(&asset.url).await {
                Ok(true) => {}
                Ok(false) => warn!(media_id = %id, url = %asset.url, "Stored file was already gone"),
                Err(e) => warn!(media_id = %id, url = %asset.url, error = %e, "Failed to remove stored file"),
            }
        }

        metrics::record_deleted("media");
        info!(media_id = %id, "Media deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn upload(name: &str, content_type: &str) -> UploadInput {
        UploadInput {
            file_name: name.to_string(),
            content_type: Some(content_type.to_string()),
            data: Bytes::from_static(b"%PDF-1.7"),
            caption: Some("Quarterly report".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_upload_and_delete() {
        let pool = test_pool().await;
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path().join("uploads"), root.path(), "/static/");
        let service = MediaService::new(pool.conn(), &store);

        let asset = service
            .upload(upload("report final.pdf", "application/pdf"))
            .await
            .unwrap();

        let now = Utc::now();
        assert_eq!(asset.file_name, "report_final.pdf");
        assert_eq!(asset.kind, "document");
        assert_eq!(
            asset.url,
            format!("/static/uploads/{}/report_final.pdf", now.format("%Y/%m"))
        );
        let path = store.path_for_url(&asset.url).unwrap();
        assert!(path.exists());

        assert_eq!(service.get(asset.id).await.unwrap(), asset);
        assert_eq!(service.list(Some("QUARTERLY"), Page::new(None, None, 50)).await.unwrap().len(), 1);

        service.delete(asset.id).await.unwrap();
        assert!(!path.exists());
        assert!(matches!(
            service.get(asset.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_image_kind_default() {
        let pool = test_pool().await;
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path().join("uploads"), root.path(), "/static/");
        let service = MediaService::new(pool.conn(), &store);

        let mut input = upload("photo.png", "image/png");
        input.content_type = None;
        input.width = Some(640);
        input.height = Some(480);
        let asset = service.upload(input).await.unwrap();

        assert_eq!(asset.kind, "image");
        assert_eq!(asset.width, Some(640));
        assert_eq!(asset.mime_type, None);
    }

    #[tokio::test]
    async fn test_shared_file_survives_until_last_record_deleted() {
        let pool = test_pool().await;
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path().join("uploads"), root.path(), "/static/");
        let service = MediaService::new(pool.conn(), &store);

        let first = service.upload(upload("photo.png", "image/png")).await.unwrap();
        let second = service.upload(upload("photo.png", "image/png")).await.unwrap();
        assert_eq!(first.url, second.url);
        let path = store.path_for_url(&first.url).unwrap();

        service.delete(second.id).await.unwrap();
        assert!(path.exists());
        assert_eq!(service.get(first.id).await.unwrap().url, first.url);

        service.delete(first.id).await.unwrap();
        assert!(!path.exists());
    }
}
