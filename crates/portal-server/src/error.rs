use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use portal_types::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Portal(#[from] Error),

    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Portal(err) => match err {
                Error::Validation(_) | Error::Import(_) => StatusCode::BAD_REQUEST,
                Error::NotFound { .. } => StatusCode::NOT_FOUND,
                Error::Locked => StatusCode::LOCKED,
                Error::Upload(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, AppError>;

/// Run a service call that touches the stores on the blocking pool
pub async fn blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> portal_types::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Task(e.to_string()))?
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blocking_keeps_error_status() {
        let value = blocking(|| Ok(7)).await.unwrap();
        assert_eq!(value, 7);

        let err = blocking(|| Err::<(), _>(Error::Locked)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::LOCKED);
    }

    #[tokio::test]
    async fn test_panicking_task_is_server_error() {
        let err = blocking(|| -> portal_types::Result<()> { panic!("store writer crashed") })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Task(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
