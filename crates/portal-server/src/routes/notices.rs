use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use portal_app::Portal;
use portal_domain::model::RequestStatus;
use portal_types::{NewNotice, Notice, NoticeCategory, NoticeUpdate};

use crate::error::{blocking, ApiResult};
use crate::extract::ApiJson;

#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    category: Option<String>,
}

pub async fn list(State(portal): State<Portal>, Query(query): Query<NoticeQuery>) -> ApiResult<Json<Vec<Notice>>> {
    let category = match query.category.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(raw) => Some(raw.parse::<NoticeCategory>()?),
    };
    Ok(Json(portal.notices.list(category)?))
}

pub async fn get(State(portal): State<Portal>, Path(id): Path<i64>) -> ApiResult<Json<Notice>> {
    Ok(Json(portal.notices.get(id)?))
}

pub async fn create(
    State(portal): State<Portal>,
    ApiJson(notice): ApiJson<NewNotice>,
) -> ApiResult<(StatusCode, Json<Notice>)> {
    let notice = blocking(move || portal.notices.create(notice)).await?;
    Ok((StatusCode::CREATED, Json(notice)))
}

pub async fn update(
    State(portal): State<Portal>,
    Path(id): Path<i64>,
    ApiJson(update): ApiJson<NoticeUpdate>,
) -> ApiResult<Json<Notice>> {
    Ok(Json(blocking(move || portal.notices.update(id, update)).await?))
}

pub async fn delete(State(portal): State<Portal>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    blocking(move || portal.notices.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    status: String,
}

pub async fn set_request_status(
    State(portal): State<Portal>,
    Path(id): Path<i64>,
    ApiJson(body): ApiJson<StatusBody>,
) -> ApiResult<Json<Notice>> {
    let status: RequestStatus = body.status.parse()?;
    Ok(Json(blocking(move || portal.notices.set_request_status(id, status)).await?))
}
