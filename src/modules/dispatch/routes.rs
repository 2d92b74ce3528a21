use super::dto::{BookingDriverDto, CreateBookingDto, VerifyOtpDto};
use crate::{
    modules::{
        common::{extractors::ValidatedJson, responses::SimpleError},
        tracking,
    },
    server::controller::AppState,
    storage::models::{Booking, LatLng},
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
        .route("/", post(create_booking))
        .route("/pending", get(list_pending_bookings))
        .route("/:booking_id", get(get_booking))
        .route("/:booking_id/accept", post(accept_booking))
        .route("/:booking_id/verify-otp", post(verify_booking_otp))
        .route("/:booking_id/abort", post(abort_booking))
        .route("/:booking_id/complete", post(complete_booking))
}

/// Creates a pending ambulance booking
#[utoipa::path(
    post,
    tag = "dispatch",
    path = "/booking",
    request_body(content = CreateBookingDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            description = "the created booking, pending until a driver accepts it",
            body = Booking,
            content_type = "application/json",
        ),
        (
            status = BAD_REQUEST,
            description = "invalid dto error message / INVALID_PICKUP_PLACE",
            body = SimpleError,
        ),
    ),
)]
pub async fn create_booking(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateBookingDto>,
) -> Result<Json<Booking>, (StatusCode, SimpleError)> {
    let booking = state
        .dispatch
        .create_booking(
            &dto.student_registration_id,
            &dto.phone,
            &dto.place,
            dto.place_details,
            LatLng {
                lat: dto.user_location.lat,
                lng: dto.user_location.lng,
            },
        )
        .await?;

    tracking::routes::emit_booking_event(&state.io, "new_booking", &booking);

    Ok(Json(booking))
}

/// Lists pending bookings, oldest first, for polling drivers
#[utoipa::path(
    get,
    tag = "dispatch",
    path = "/booking/pending",
    responses(
        (
            status = OK,
            description = "all pending bookings",
            body = Vec<Booking>,
            content_type = "application/json",
        ),
    ),
)]
pub async fn list_pending_bookings(State(state): State<AppState>) -> Json<Vec<Booking>> {
    Json(state.dispatch.list_pending().await)
}

/// Gets a booking by ID
#[utoipa::path(
    get,
    tag = "dispatch",
    path = "/booking/{booking_id}",
    params(
        ("booking_id" = Uuid, Path, description = "id of the booking"),
    ),
    responses(
        (
            status = OK,
            body = Booking,
            content_type = "application/json",
        ),
        (
            status = NOT_FOUND,
            description = "BOOKING_NOT_FOUND",
            body = SimpleError,
        ),
    ),
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, (StatusCode, SimpleError)> {
    let booking = state.dispatch.booking(booking_id).await.ok_or((
        StatusCode::NOT_FOUND,
        SimpleError::from("booking not found"),
    ))?;

    Ok(Json(booking))
}

/// A driver accepts a pending booking.
///
/// when two drivers race for the same booking exactly one gets the
/// accepted booking back, the other a BOOKING_ALREADY_ACCEPTED conflict
#[utoipa::path(
    post,
    tag = "dispatch",
    path = "/booking/{booking_id}/accept",
    params(
        ("booking_id" = Uuid, Path, description = "id of the booking to accept"),
    ),
    request_body(content = BookingDriverDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            description = "the accepted booking with OTP and pickup estimate",
            body = Booking,
            content_type = "application/json",
        ),
        (
            status = CONFLICT,
            description = "BOOKING_ALREADY_ACCEPTED",
            body = SimpleError,
        ),
        (
            status = BAD_REQUEST,
            description = "NO_AMBULANCE_ASSIGNED / AMBULANCE_OUT_OF_STATION",
            body = SimpleError,
        ),
    ),
)]
pub async fn accept_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<BookingDriverDto>,
) -> Result<Json<Booking>, (StatusCode, SimpleError)> {
    let booking = state.dispatch.accept(booking_id, dto.driver_id).await?;

    tracking::routes::emit_booking_event(&state.io, "booking_accepted", &booking);

    Ok(Json(booking))
}

/// Verifies the rider OTP, starting the ride
#[utoipa::path(
    post,
    tag = "dispatch",
    path = "/booking/{booking_id}/verify-otp",
    params(
        ("booking_id" = Uuid, Path, description = "id of the accepted booking"),
    ),
    request_body(content = VerifyOtpDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            description = "the booking, now in progress",
            body = Booking,
            content_type = "application/json",
        ),
        (
            status = BAD_REQUEST,
            description = "INVALID_OTP / BOOKING_NOT_ACCEPTED",
            body = SimpleError,
        ),
    ),
)]
pub async fn verify_booking_otp(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<VerifyOtpDto>,
) -> Result<Json<Booking>, (StatusCode, SimpleError)> {
    let booking = state.dispatch.verify_otp(booking_id, &dto.otp).await?;

    Ok(Json(booking))
}

/// The bound driver gives up a accepted booking, cancelling it for good
#[utoipa::path(
    post,
    tag = "dispatch",
    path = "/booking/{booking_id}/abort",
    params(
        ("booking_id" = Uuid, Path, description = "id of the accepted booking"),
    ),
    request_body(content = BookingDriverDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            description = "the cancelled booking",
            body = Booking,
            content_type = "application/json",
        ),
        (
            status = FORBIDDEN,
            description = "NOT_BOOKING_DRIVER",
            body = SimpleError,
        ),
    ),
)]
pub async fn abort_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<BookingDriverDto>,
) -> Result<Json<Booking>, (StatusCode, SimpleError)> {
    let booking = state.dispatch.abort(booking_id, dto.driver_id).await?;

    tracking::routes::emit_booking_event(&state.io, "booking_cancelled", &booking);

    Ok(Json(booking))
}

/// The bound driver marks a ride as finished
#[utoipa::path(
    post,
    tag = "dispatch",
    path = "/booking/{booking_id}/complete",
    params(
        ("booking_id" = Uuid, Path, description = "id of the in progress booking"),
    ),
    request_body(content = BookingDriverDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            description = "the completed booking",
            body = Booking,
            content_type = "application/json",
        ),
        (
            status = FORBIDDEN,
            description = "NOT_BOOKING_DRIVER",
            body = SimpleError,
        ),
    ),
)]
pub async fn complete_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<BookingDriverDto>,
) -> Result<Json<Booking>, (StatusCode, SimpleError)> {
    let booking = state.dispatch.complete(booking_id, dto.driver_id).await?;

    tracking::routes::emit_booking_event(&state.io, "booking_completed", &booking);

    Ok(Json(booking))
}
