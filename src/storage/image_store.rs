//! Disk-backed store for essay images.
//!
//! Files live under `{upload.dir}/{owner_id}/{name}` and are served
//! publicly at `{upload.public_base_url}/files/{owner_id}/{name}` so the
//! OCR backend can fetch them by URL. Deletes are idempotent: removing a
//! path that is already gone is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::{EssaySystemError, Result};
use crate::utils::validate_magic_bytes;

/// A stored image: the internal path plus the URL it is served at.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub path: String,
    pub public_url: String,
}

/// Object store contract for essay images.
pub trait ImageGateway: Send + Sync {
    /// Validate and persist an uploaded image, returning its path and
    /// public URL. Validation failures happen before anything is written.
    fn store(&self, data: &[u8], owner_id: i64, extension: &str) -> Result<StoredImage>;

    /// Remove a stored image. Missing files are tolerated.
    fn remove(&self, path: &str) -> Result<()>;

    /// Resolve a stored file for serving; returns None when the path does
    /// not belong to the store or the file does not exist.
    fn resolve(&self, owner_id: i64, name: &str) -> Option<PathBuf>;
}

pub struct DiskImageStore {
    dir: String,
    public_base_url: String,
    max_size: usize,
    allowed_types: Vec<String>,
}

impl DiskImageStore {
    pub fn from_config() -> Self {
        let config = AppConfig::get();
        Self {
            dir: config.upload.dir.clone(),
            public_base_url: config.upload.public_base_url.clone(),
            max_size: config.upload.max_size,
            allowed_types: config.upload.allowed_types.clone(),
        }
    }

    #[cfg(test)]
    pub fn new(dir: String, public_base_url: String, max_size: usize) -> Self {
        Self {
            dir,
            public_base_url,
            max_size,
            allowed_types: vec![
                ".jpg".to_string(),
                ".jpeg".to_string(),
                ".png".to_string(),
                ".pdf".to_string(),
            ],
        }
    }

    fn validate(&self, data: &[u8], extension: &str) -> Result<()> {
        let extension = extension.to_lowercase();
        if !self.allowed_types.iter().any(|t| t.to_lowercase() == extension) {
            return Err(EssaySystemError::validation(format!(
                "File type not allowed: {extension}. Only JPG, PNG and PDF files are accepted"
            )));
        }
        if !validate_magic_bytes(data, &extension) {
            return Err(EssaySystemError::validation(
                "File content does not match its extension",
            ));
        }
        if data.len() > self.max_size {
            return Err(EssaySystemError::validation(format!(
                "File size exceeds the {} byte limit",
                self.max_size
            )));
        }
        Ok(())
    }

    /// Reject anything that could escape the upload directory.
    fn is_safe_relative_path(path: &str) -> bool {
        !path.is_empty()
            && !path.starts_with('/')
            && !path.contains("..")
            && !path.contains('\\')
    }
}

impl ImageGateway for DiskImageStore {
    fn store(&self, data: &[u8], owner_id: i64, extension: &str) -> Result<StoredImage> {
        self.validate(data, extension)?;

        let owner_dir = format!("{}/{}", self.dir, owner_id);
        fs::create_dir_all(&owner_dir).map_err(|e| {
            EssaySystemError::file_operation(format!("Failed to create upload directory: {e}"))
        })?;

        let name = format!(
            "{}-{}{}",
            chrono::Utc::now().timestamp(),
            Uuid::new_v4(),
            extension.to_lowercase()
        );
        let file_path = format!("{owner_dir}/{name}");

        fs::write(&file_path, data).map_err(|e| {
            EssaySystemError::file_operation(format!("Failed to write image file: {e}"))
        })?;

        Ok(StoredImage {
            path: format!("{owner_id}/{name}"),
            public_url: format!("{}/files/{}/{}", self.public_base_url, owner_id, name),
        })
    }

    fn remove(&self, path: &str) -> Result<()> {
        if !Self::is_safe_relative_path(path) {
            return Err(EssaySystemError::validation(format!(
                "Invalid image path: {path}"
            )));
        }

        let full_path = format!("{}/{}", self.dir, path);
        if !Path::new(&full_path).exists() {
            // Already gone; deletes are idempotent
            return Ok(());
        }

        fs::remove_file(&full_path).map_err(|e| {
            EssaySystemError::file_operation(format!("Failed to remove image file: {e}"))
        })
    }

    fn resolve(&self, owner_id: i64, name: &str) -> Option<PathBuf> {
        if !Self::is_safe_relative_path(name) || name.contains('/') {
            return None;
        }
        let full_path = PathBuf::from(&self.dir)
            .join(owner_id.to_string())
            .join(name);
        full_path.is_file().then_some(full_path)
    }
}

/// Guess the content type of a stored image from its extension.
pub fn content_type_for(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn temp_store(max_size: usize) -> (DiskImageStore, String) {
        let dir = std::env::temp_dir()
            .join(format!("essay-images-{}", Uuid::new_v4()))
            .to_string_lossy()
            .to_string();
        let store = DiskImageStore::new(dir.clone(), "http://localhost:8080".to_string(), max_size);
        (store, dir)
    }

    #[test]
    fn test_store_and_remove_roundtrip() {
        let (store, dir) = temp_store(1024);

        let stored = store.store(&PNG_HEADER, 7, ".png").unwrap();
        assert!(stored.path.starts_with("7/"));
        assert!(stored.public_url.starts_with("http://localhost:8080/files/7/"));

        let name = stored.path.split('/').nth(1).unwrap();
        assert!(store.resolve(7, name).is_some());

        store.remove(&stored.path).unwrap();
        assert!(store.resolve(7, name).is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_remove_missing_path_is_ok() {
        let (store, dir) = temp_store(1024);
        assert!(store.remove("7/never-existed.png").is_ok());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_remove_rejects_traversal() {
        let (store, dir) = temp_store(1024);
        assert!(store.remove("../etc/passwd").is_err());
        assert!(store.remove("/etc/passwd").is_err());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_store_rejects_bad_type() {
        let (store, dir) = temp_store(1024);
        let err = store.store(b"GIF89a...", 7, ".gif").unwrap_err();
        assert_eq!(err.code(), "E005");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_store_rejects_mismatched_content() {
        let (store, dir) = temp_store(1024);
        // JPEG bytes with a PNG extension
        let err = store.store(&[0xFF, 0xD8, 0xFF, 0xE0], 7, ".png").unwrap_err();
        assert_eq!(err.code(), "E005");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_store_rejects_oversize() {
        let (store, dir) = temp_store(16);
        let mut data = PNG_HEADER.to_vec();
        data.extend_from_slice(&[0u8; 32]);
        let err = store.store(&data, 7, ".png").unwrap_err();
        assert_eq!(err.code(), "E005");
        let _ = fs::remove_dir_all(dir);
    }
}
