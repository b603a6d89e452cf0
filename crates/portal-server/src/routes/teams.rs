use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use portal_app::services::current_year;
use portal_app::Portal;
use portal_domain::service::ScoreboardEntry;
use portal_types::{Team, TeamUpdate};

use crate::error::{blocking, ApiResult};
use crate::extract::ApiJson;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    year: Option<i32>,
}

/// Ranked scorecards of a year
pub async fn list(
    State(portal): State<Portal>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<Vec<ScoreboardEntry>>> {
    let year = query.year.unwrap_or_else(current_year);
    Ok(Json(portal.teams.scoreboard(year)?))
}

pub async fn update(
    State(portal): State<Portal>,
    Path(id): Path<i64>,
    ApiJson(update): ApiJson<TeamUpdate>,
) -> ApiResult<Json<Team>> {
    Ok(Json(blocking(move || portal.teams.update(id, update)).await?))
}

pub async fn export(State(portal): State<Portal>, Query(query): Query<YearQuery>) -> ApiResult<impl IntoResponse> {
    let year = query.year.unwrap_or_else(current_year);
    let bytes = blocking(move || portal.teams.scoreboard_xlsx(year)).await?;
    let disposition = format!("attachment; filename=\"scoreboard-{year}.xlsx\"");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
