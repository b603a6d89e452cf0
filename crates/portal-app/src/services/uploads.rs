//! Upload use cases

use serde::Serialize;

use portal_infra::uploads::UploadStore;
use portal_types::Result;

/// Response of an image upload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub image_url: String,
}

/// Response of an attachment upload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpload {
    pub file_url: String,
    pub file_name: String,
}

#[derive(Clone)]
pub struct UploadService {
    store: UploadStore,
}

impl UploadService {
    pub fn new(store: UploadStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &UploadStore {
        &self.store
    }

    pub fn upload_image(&self, file_name: Option<&str>, bytes: &[u8]) -> Result<ImageUpload> {
        let stored = self.store.save_image(file_name, bytes)?;
        Ok(ImageUpload { image_url: stored.url })
    }

    pub fn upload_file(&self, file_name: &str, bytes: &[u8]) -> Result<FileUpload> {
        let stored = self.store.save_file(file_name, bytes)?;
        Ok(FileUpload {
            file_url: stored.url,
            file_name: stored.file_name,
        })
    }
}
