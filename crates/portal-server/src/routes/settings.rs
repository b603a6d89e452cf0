use axum::{extract::State, Json};

use portal_app::Portal;
use portal_types::Settings;

use crate::error::{blocking, ApiResult};
use crate::extract::ApiJson;

pub async fn get_lock(State(portal): State<Portal>) -> ApiResult<Json<Settings>> {
    Ok(Json(portal.settings.settings()?))
}

pub async fn set_lock(State(portal): State<Portal>, ApiJson(body): ApiJson<Settings>) -> ApiResult<Json<Settings>> {
    Ok(Json(blocking(move || portal.settings.set_locked(body.is_locked)).await?))
}
