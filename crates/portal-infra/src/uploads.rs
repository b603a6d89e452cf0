//! Storage for uploaded images and attachments

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use portal_types::{Error, Result};

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// URL path under which stored files are served
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// A file written to the upload directory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub url: String,
    /// Name the client uploaded the file under
    pub file_name: String,
    #[serde(skip)]
    pub path: PathBuf,
}

/// Upload directory on disk
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store an image. The content must be a recognised image format; the
    /// stored name is derived from its hash, so re-uploads share one file.
    pub fn save_image(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<StoredFile> {
        check_size(bytes)?;
        let format = image::guess_format(bytes).map_err(|_| Error::Upload("not an image file".to_string()))?;
        let extension = format.extensions_str().first().copied().unwrap_or("img");

        let hash = format!("{:x}", Sha256::digest(bytes));
        let stored_name = format!("{}.{}", &hash[..16], extension);
        let file_name = original_name
            .map(sanitize_file_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| stored_name.clone());
        self.write(stored_name, file_name, bytes)
    }

    /// Store an arbitrary attachment under a fresh name keeping its extension
    pub fn save_file(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        check_size(bytes)?;
        if bytes.is_empty() {
            return Err(Error::validation("uploaded file is empty"));
        }
        let file_name = sanitize_file_name(original_name);
        let stored_name = match extension_of(&file_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let file_name = if file_name.is_empty() { stored_name.clone() } else { file_name };
        self.write(stored_name, file_name, bytes)
    }

    /// Path of a stored file named in an upload URL, if it exists
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(UPLOAD_URL_PREFIX)?.trim_start_matches('/');
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.starts_with('.') {
            return None;
        }
        let path = self.dir.join(name);
        path.is_file().then_some(path)
    }

    fn write(&self, stored_name: String, file_name: String, bytes: &[u8]) -> Result<StoredFile> {
        let path = self.dir.join(&stored_name);
        fs::write(&path, bytes)?;
        tracing::info!(file = %stored_name, bytes = bytes.len(), "upload stored");
        Ok(StoredFile {
            url: format!("{}/{}", UPLOAD_URL_PREFIX, stored_name),
            file_name,
            path,
        })
    }
}

fn check_size(bytes: &[u8]) -> Result<()> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(Error::validation(format!(
            "upload exceeds {} MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Last path component with control characters removed
fn sanitize_file_name(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    (!ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())).then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn test_image_is_content_addressed() {
        let dir = tempdir().unwrap();
        let store = UploadStore::open(dir.path()).unwrap();
        let first = store.save_image(Some("slide.png"), PNG_HEADER).unwrap();
        let second = store.save_image(None, PNG_HEADER).unwrap();
        assert_eq!(first.url, second.url);
        assert!(first.url.starts_with("/uploads/"));
        assert!(first.url.ends_with(".png"));
        assert_eq!(first.file_name, "slide.png");
        assert_eq!(store.resolve(&first.url), Some(first.path));
    }

    #[test]
    fn test_non_image_rejected() {
        let dir = tempdir().unwrap();
        let store = UploadStore::open(dir.path()).unwrap();
        let err = store.save_image(Some("a.png"), b"hello").unwrap_err();
        assert!(matches!(err, Error::Upload(_)));
    }

    #[test]
    fn test_file_keeps_extension_and_name() {
        let dir = tempdir().unwrap();
        let store = UploadStore::open(dir.path()).unwrap();
        let stored = store.save_file("..\\보고서/점검표.XLSX", b"data").unwrap();
        assert_eq!(stored.file_name, "점검표.XLSX");
        assert!(stored.url.ends_with(".xlsx"));
        assert!(stored.path.exists());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = tempdir().unwrap();
        let store = UploadStore::open(dir.path()).unwrap();
        assert!(store.resolve("/uploads/../secret").is_none());
        assert!(store.resolve("/uploads/missing.png").is_none());
        assert!(store.resolve("/other/x.png").is_none());
    }
}
