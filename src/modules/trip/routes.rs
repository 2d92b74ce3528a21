use super::dto::StartTripDto;
use crate::{
    modules::common::{extractors::ValidatedJson, responses::SimpleError},
    server::controller::AppState,
    storage::models::Trip,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use http::StatusCode;
use uuid::Uuid;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_trip))
        .route("/:trip_id/end", post(end_trip))
        .route("/active/:vehicle_id", get(get_active_trip))
}

/// Opens a trip for a assigned, idle vehicle.
///
/// GPS pings are only attributed to the vehicle while the trip is open
#[utoipa::path(
    post,
    tag = "trip",
    path = "/trip",
    request_body(content = StartTripDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            body = Trip,
            content_type = "application/json",
        ),
        (
            status = BAD_REQUEST,
            description = "NO_ASSIGNMENT / TRIP_ALREADY_ACTIVE",
            body = SimpleError,
        ),
    ),
)]
pub async fn start_trip(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<StartTripDto>,
) -> Result<Json<Trip>, (StatusCode, SimpleError)> {
    let trip = state.store.start_trip(dto.vehicle_id).await?;

    Ok(Json(trip))
}

/// Closes a open trip.
///
/// ending a already closed trip fails with TRIP_NOT_ACTIVE so double
/// submissions are detectable by the caller
#[utoipa::path(
    post,
    tag = "trip",
    path = "/trip/{trip_id}/end",
    params(
        ("trip_id" = Uuid, Path, description = "id of the trip to end"),
    ),
    responses(
        (
            status = OK,
            description = "the closed trip",
            body = Trip,
            content_type = "application/json",
        ),
        (
            status = BAD_REQUEST,
            description = "TRIP_NOT_ACTIVE",
            body = SimpleError,
        ),
    ),
)]
pub async fn end_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<Trip>, (StatusCode, SimpleError)> {
    let trip = state.store.end_trip(trip_id).await?;

    Ok(Json(trip))
}

/// Gets the open trip of a vehicle, `null` while the vehicle is idle
#[utoipa::path(
    get,
    tag = "trip",
    path = "/trip/active/{vehicle_id}",
    params(
        ("vehicle_id" = Uuid, Path, description = "id of the vehicle"),
    ),
    responses(
        (
            status = OK,
            description = "the open trip or null",
            body = Trip,
            content_type = "application/json",
        ),
        (
            status = NOT_FOUND,
            description = "VEHICLE_NOT_FOUND",
            body = SimpleError,
        ),
    ),
)]
pub async fn get_active_trip(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<Option<Trip>>, (StatusCode, SimpleError)> {
    if state.store.vehicle(vehicle_id).await.is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            SimpleError::from("vehicle not found"),
        ));
    }

    Ok(Json(state.store.active_trip(vehicle_id).await))
}
