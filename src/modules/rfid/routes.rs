use super::dto::CreateRfidDeviceDto;
use crate::{
    modules::common::{extractors::ValidatedJson, responses::SimpleError},
    server::controller::AppState,
    storage::models::RfidDevice,
};
use axum::{extract::State, routing::post, Json, Router};
use http::StatusCode;

pub fn create_router() -> Router<AppState> {
    Router::new().route("/", post(create_rfid_device))
}

/// Registers a roadside RFID reader, scans from unregistered readers
/// are rejected by the telemetry endpoints
#[utoipa::path(
    post,
    tag = "rfid",
    path = "/rfid-device",
    request_body(content = CreateRfidDeviceDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            body = RfidDevice,
            content_type = "application/json",
        ),
        (
            status = BAD_REQUEST,
            description = "invalid dto error message / RFID_ID_IN_USE",
            body = SimpleError,
        ),
    ),
)]
pub async fn create_rfid_device(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateRfidDeviceDto>,
) -> Result<Json<RfidDevice>, (StatusCode, SimpleError)> {
    let device = state
        .store
        .register_device(&dto.rfid_id, &dto.location_name)
        .await?;

    Ok(Json(device))
}
