use axum::{
    extract::{Multipart, State},
    Json,
};

use portal_app::services::{FileUpload, ImageUpload};
use portal_app::Portal;
use portal_types::Error;

use crate::error::{blocking, ApiResult, AppError};

struct UploadedField {
    file_name: Option<String>,
    bytes: Vec<u8>,
}

/// Bytes of the multipart field `name`
async fn read_field(multipart: &mut Multipart, name: &str) -> ApiResult<UploadedField> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(name) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| AppError::BadRequest(e.body_text()))?;
        return Ok(UploadedField {
            file_name,
            bytes: bytes.to_vec(),
        });
    }
    Err(Error::validation(format!("multipart field '{name}' is missing")).into())
}

/// Field `image`; anything that is not an image is rejected
pub async fn image(State(portal): State<Portal>, mut multipart: Multipart) -> ApiResult<Json<ImageUpload>> {
    let field = read_field(&mut multipart, "image").await?;
    let upload = blocking(move || portal.uploads.upload_image(field.file_name.as_deref(), &field.bytes)).await?;
    Ok(Json(upload))
}

/// Field `file`, stored under a fresh name
pub async fn file(State(portal): State<Portal>, mut multipart: Multipart) -> ApiResult<Json<FileUpload>> {
    let field = read_field(&mut multipart, "file").await?;
    let file_name = field.file_name.unwrap_or_default();
    Ok(Json(blocking(move || portal.uploads.upload_file(&file_name, &field.bytes)).await?))
}
