use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use portal_app::services::EquipmentSummary;
use portal_app::Portal;
use portal_domain::model::EquipmentItem;
use portal_domain::service::{BatchReport, TeamRecord};

use crate::error::{blocking, ApiResult};
use crate::extract::ApiJson;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    team: Option<String>,
}

pub async fn teams(State(portal): State<Portal>) -> ApiResult<Json<Vec<TeamRecord>>> {
    Ok(Json(portal.equipment.records()?))
}

pub async fn summary(
    State(portal): State<Portal>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<EquipmentSummary>> {
    Ok(Json(portal.equipment.summary(query.team.as_deref())?))
}

/// CSV sheet in the request body
pub async fn import(State(portal): State<Portal>, body: Bytes) -> ApiResult<Json<BatchReport>> {
    let report = blocking(move || portal.equipment.import_csv(&body)).await?;
    Ok(Json(report))
}

pub async fn bulk_add(
    State(portal): State<Portal>,
    ApiJson(item): ApiJson<EquipmentItem>,
) -> ApiResult<Json<BatchReport>> {
    let item = EquipmentItem::new(item.name, item.quantity, item.category, item.status);
    let report = blocking(move || portal.equipment.bulk_add(item)).await?;
    Ok(Json(report))
}

pub async fn export(State(portal): State<Portal>) -> ApiResult<impl IntoResponse> {
    let bytes = blocking(move || portal.equipment.export_xlsx()).await?;
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"equipment.xlsx\""),
        ],
        bytes,
    ))
}
