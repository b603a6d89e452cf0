use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use portal_app::Portal;
use portal_types::{NewVehicle, Vehicle, VehicleUpdate};

use crate::error::{blocking, ApiResult};
use crate::extract::ApiJson;

pub async fn list(State(portal): State<Portal>) -> ApiResult<Json<Vec<Vehicle>>> {
    Ok(Json(portal.vehicles.list()?))
}

pub async fn create(
    State(portal): State<Portal>,
    ApiJson(vehicle): ApiJson<NewVehicle>,
) -> ApiResult<(StatusCode, Json<Vehicle>)> {
    let vehicle = blocking(move || portal.vehicles.create(vehicle)).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

pub async fn update(
    State(portal): State<Portal>,
    Path(id): Path<i64>,
    ApiJson(update): ApiJson<VehicleUpdate>,
) -> ApiResult<Json<Vehicle>> {
    Ok(Json(blocking(move || portal.vehicles.update(id, update)).await?))
}

pub async fn delete(State(portal): State<Portal>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    blocking(move || portal.vehicles.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
