//! Media upload storage
//!
//! Uploaded files land in `<upload_dir>/<YYYY>/<MM>/<sanitized-name>` and are
//! addressed by a URL relative to the static root. A second upload with the
//! same name in the same month overwrites the first. The client-declared MIME
//! type is recorded without inspecting the bytes.

use crate::config::MediaConfig;
use crate::errors::Result;
use chrono::{DateTime, Datelike, Utc};
use regex_lite::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// URL segment used for uploads when the upload root lives outside the static root
const UPLOADS_SEGMENT: &str = "uploads";

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "AUX", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3", "PRN", "NUL",
];

fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("static pattern"))
}

/// Reduce a client-supplied file name to a safe, flat ASCII name.
///
/// Returns an empty string when nothing usable remains.
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    let flattened = ascii.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = disallowed_chars().replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    let stem = trimmed.split('.').next().unwrap_or_default().to_ascii_uppercase();
    if !trimmed.is_empty() && WINDOWS_DEVICE_NAMES.contains(&stem.as_str()) {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Coarse asset kind from the declared MIME type
pub fn media_kind(mime_type: Option<&str>) -> &'static str {
    match mime_type.and_then(|m| m.split('/').next()) {
        None => "image",
        Some("image") => "image",
        Some("video") => "video",
        Some("audio") => "audio",
        Some(_) => "document",
    }
}

/// A file written to the upload area
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub path: PathBuf,
    pub url: String,
    pub size: usize,
}

/// Filesystem layout for uploads
#[derive(Debug, Clone)]
pub struct MediaStore {
    upload_dir: PathBuf,
    static_root: PathBuf,
    url_prefix: String,
}

impl MediaStore {
    pub fn new(
        upload_dir: impl Into<PathBuf>,
        static_root: impl Into<PathBuf>,
        url_prefix: impl Into<String>,
    ) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            static_root: static_root.into(),
            url_prefix: url_prefix.into(),
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(
            config.upload_dir.clone(),
            config.static_root.clone(),
            config.static_url_prefix.clone(),
        )
    }

    /// `<upload_dir>/<YYYY>/<MM>` for the given instant
    pub fn bucket_dir(&self, at: DateTime<Utc>) -> PathBuf {
        self.upload_dir
            .join(at.year().to_string())
            .join(format!("{:02}", at.month()))
    }

    /// Write `data` under the month bucket for `at` and return where it went
    pub async fn save(&self, client_name: &str, data: &[u8], at: DateTime<Utc>) -> Result<StoredFile> {
        let mut file_name = sanitize_filename(client_name);
        if file_name.is_empty() {
            file_name = format!("upload-{}", Uuid::new_v4().simple());
        }

        let dir = self.bucket_dir(at);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(&file_name);
        tokio::fs::write(&path, data).await?;

        let url = self.public_url(&path);
        tracing::debug!(path = %path.display(), url = %url, bytes = data.len(), "Stored upload");

        Ok(StoredFile {
            file_name,
            path,
            url,
            size: data.len(),
        })
    }

    /// Public URL for a stored path.
    ///
    /// Paths under the static root map directly; an upload root elsewhere
    /// (see `UPLOAD_DIR`) is exposed as `<prefix>/uploads/...`.
    pub fn public_url(&self, path: &Path) -> String {
        let relative = match path.strip_prefix(&self.static_root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => Path::new(UPLOADS_SEGMENT)
                .join(path.strip_prefix(&self.upload_dir).unwrap_or(path)),
        };

        let segments: Vec<&str> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();

        format!("{}/{}", self.url_prefix.trim_end_matches('/'), segments.join("/"))
    }

    /// Map a public URL back to the file it was derived from.
    ///
    /// Returns `None` for URLs outside the prefix or containing anything but
    /// plain path segments.
    pub fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let rest = url
            .strip_prefix(self.url_prefix.trim_end_matches('/'))?
            .strip_prefix('/')?;
        let relative = Path::new(rest);

        if rest.is_empty() || relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return None;
        }

        if !self.upload_dir.starts_with(&self.static_root) {
            if let Ok(inner) = relative.strip_prefix(UPLOADS_SEGMENT) {
                return Some(self.upload_dir.join(inner));
            }
        }

        Some(self.static_root.join(relative))
    }

    /// Delete the file behind `url`; `Ok(false)` when there was nothing to delete
    pub async fn remove(&self, url: &str) -> Result<bool> {
        let Some(path) = self.path_for_url(url) else {
            return Ok(false);
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report final.pdf"), "report_final.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("..\\windows\\system32.dll"), "windows_system32.dll");
        assert_eq!(sanitize_filename("photo (1).JPG"), "photo_1.JPG");
        assert_eq!(sanitize_filename("résumé.txt"), "resume.txt");
        assert_eq!(sanitize_filename("con.txt"), "_con.txt");
        assert_eq!(sanitize_filename("..."), "");
        assert_eq!(sanitize_filename("日本語"), "");
    }

    #[test]
    fn test_media_kind() {
        assert_eq!(media_kind(Some("image/png")), "image");
        assert_eq!(media_kind(Some("video/mp4")), "video");
        assert_eq!(media_kind(Some("application/pdf")), "document");
        assert_eq!(media_kind(None), "image");
    }

    #[tokio::test]
    async fn test_save_buckets_by_month() {
        let root = tempfile::tempdir().unwrap();
        let static_root = root.path().join("static");
        let store = MediaStore::new(static_root.join("uploads"), &static_root, "/static/");
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();

        let stored = store.save("report final.pdf", b"%PDF", at).await.unwrap();

        assert_eq!(stored.file_name, "report_final.pdf");
        assert_eq!(stored.url, "/static/uploads/2024/03/report_final.pdf");
        assert_eq!(stored.path, static_root.join("uploads/2024/03/report_final.pdf"));
        assert_eq!(std::fs::read(&stored.path).unwrap(), b"%PDF");
        assert_eq!(stored.size, 4);
    }

    #[tokio::test]
    async fn test_unusable_name_gets_generated_one() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path().join("uploads"), root.path(), "/static/");
        let stored = store.save("???", b"x", Utc::now()).await.unwrap();
        assert!(stored.file_name.starts_with("upload-"));
        assert!(stored.path.exists());
    }

    #[test]
    fn test_url_for_upload_dir_outside_static_root() {
        let store = MediaStore::new("/srv/media", "/app/static", "/static/");
        let url = store.public_url(Path::new("/srv/media/2025/01/a.png"));
        assert_eq!(url, "/static/uploads/2025/01/a.png");
        assert_eq!(
            store.path_for_url(&url),
            Some(PathBuf::from("/srv/media/2025/01/a.png"))
        );
    }

    #[test]
    fn test_path_for_url_rejects_traversal() {
        let store = MediaStore::new("/app/static/uploads", "/app/static", "/static/");
        assert_eq!(
            store.path_for_url("/static/uploads/2025/01/a.png"),
            Some(PathBuf::from("/app/static/uploads/2025/01/a.png"))
        );
        assert_eq!(store.path_for_url("/static/../secrets"), None);
        assert_eq!(store.path_for_url("/elsewhere/a.png"), None);
        assert_eq!(store.path_for_url("/static/"), None);
    }

    #[tokio::test]
    async fn test_remove_missing_file() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path().join("uploads"), root.path(), "/static/");
        assert!(!store.remove("/static/uploads/2020/01/none.png").await.unwrap());
    }
}
