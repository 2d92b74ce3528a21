use super::dto::{CreateVehicleDto, SetOutOfStationDto, VehicleDriverDto};
use crate::{
    modules::common::{extractors::ValidatedJson, responses::SimpleError},
    server::controller::AppState,
    storage::models::{Vehicle, VehicleKind},
};
use axum::{
    extract::{Path, State},
    routing::{patch, post, put},
    Json, Router,
};
use http::StatusCode;
use std::str::FromStr;
use uuid::Uuid;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route("/:vehicle_id/driver", put(assign_vehicle))
        .route("/:vehicle_id/release", post(release_vehicle))
        .route("/:vehicle_id/out-of-station", patch(mark_out_of_station))
}

/// Registers a new vehicle on the fleet
#[utoipa::path(
    post,
    tag = "vehicle",
    path = "/vehicle",
    request_body(content = CreateVehicleDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            body = Vehicle,
            content_type = "application/json",
        ),
        (
            status = BAD_REQUEST,
            description = "invalid dto error message / VEHICLE_NUMBER_IN_USE / GPS_DEVICE_IN_USE",
            body = SimpleError,
        ),
    ),
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateVehicleDto>,
) -> Result<Json<Vehicle>, (StatusCode, SimpleError)> {
    // the dto validator only lets supported kinds through
    let kind = VehicleKind::from_str(&dto.kind)
        .map_err(|_| (StatusCode::BAD_REQUEST, SimpleError::from("invalid kind")))?;

    let vehicle = state
        .store
        .create_vehicle(&dto.number, &dto.gps_device_id, kind)
        .await?;

    Ok(Json(vehicle))
}

/// Binds a driver to a vehicle, going on duty.
///
/// a vehicle holds at most one driver and a driver at most one vehicle,
/// re-submitting the current pair is accepted so clients can retry safely
#[utoipa::path(
    put,
    tag = "vehicle",
    path = "/vehicle/{vehicle_id}/driver",
    params(
        ("vehicle_id" = Uuid, Path, description = "id of the vehicle to assign"),
    ),
    request_body(content = VehicleDriverDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            description = "the vehicle with the driver bound to it",
            body = Vehicle,
            content_type = "application/json",
        ),
        (
            status = BAD_REQUEST,
            description = "VEHICLE_ALREADY_ASSIGNED / DRIVER_KIND_MISMATCH",
            body = SimpleError,
        ),
    ),
)]
pub async fn assign_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<VehicleDriverDto>,
) -> Result<Json<Vehicle>, (StatusCode, SimpleError)> {
    let vehicle = state.store.assign(dto.driver_id, vehicle_id).await?;

    Ok(Json(vehicle))
}

/// Clears the driver binding, going off duty.
///
/// any open trip of the vehicle is force closed with it, so releasing is
/// always safe as a end of shift action
#[utoipa::path(
    post,
    tag = "vehicle",
    path = "/vehicle/{vehicle_id}/release",
    params(
        ("vehicle_id" = Uuid, Path, description = "id of the vehicle to release"),
    ),
    request_body(content = VehicleDriverDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            description = "success message",
            body = String,
            content_type = "application/json",
            example = json!("vehicle released successfully"),
        ),
        (
            status = BAD_REQUEST,
            description = "VEHICLE_NOT_ASSIGNED",
            body = SimpleError,
        ),
    ),
)]
pub async fn release_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<VehicleDriverDto>,
) -> Result<Json<String>, (StatusCode, SimpleError)> {
    state.store.release(dto.driver_id, vehicle_id).await?;

    Ok(Json(String::from("vehicle released successfully")))
}

/// Flips the out of station flag of a vehicle, out of station vehicles
/// are hidden from riders and skipped by dispatch
#[utoipa::path(
    patch,
    tag = "vehicle",
    path = "/vehicle/{vehicle_id}/out-of-station",
    params(
        ("vehicle_id" = Uuid, Path, description = "id of the vehicle"),
    ),
    request_body(content = SetOutOfStationDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            body = Vehicle,
            content_type = "application/json",
        ),
        (
            status = NOT_FOUND,
            description = "VEHICLE_NOT_FOUND",
            body = SimpleError,
        ),
    ),
)]
pub async fn mark_out_of_station(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<SetOutOfStationDto>,
) -> Result<Json<Vehicle>, (StatusCode, SimpleError)> {
    let vehicle = state
        .store
        .set_out_of_station(vehicle_id, dto.out_of_station)
        .await?;

    Ok(Json(vehicle))
}
