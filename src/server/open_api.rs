use crate::modules::{common, dispatch, rfid, telemetry, tracking, trip, user, vehicle};
use crate::server::controller;
use crate::storage::models;
use axum::{routing::get, Json, Router};
use utoipa::openapi::{InfoBuilder, OpenApiBuilder};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(
        models::Vehicle,
        models::Driver,
        models::Student,
        models::Trip,
        models::RfidDevice,
        models::Offence,
        models::Booking,
        models::Position,
        models::LatLng,
        models::VehicleKind,
        models::BookingStatus,
        models::OffenceKind,
        models::OffenceSubject,
        models::OffenceLocation,

        common::responses::SimpleError,

        vehicle::dto::CreateVehicleDto,
        vehicle::dto::VehicleDriverDto,
        vehicle::dto::SetOutOfStationDto,

        trip::dto::StartTripDto,

        telemetry::dto::GpsPingDto,
        telemetry::dto::RfidScanDto,
        telemetry::dto::GpsAckDto,
        telemetry::dto::RfidScanAckDto,

        dispatch::dto::CreateBookingDto,
        dispatch::dto::UserLocationDto,
        dispatch::dto::BookingDriverDto,
        dispatch::dto::VerifyOtpDto,

        tracking::dto::PositionDto,
        tracking::dto::ActiveBusDto,

        user::dto::CreateDriverDto,
        user::dto::CreateStudentDto,

        rfid::dto::CreateRfidDeviceDto,
    )),
    paths(
        controller::healthcheck,

        vehicle::routes::create_vehicle,
        vehicle::routes::assign_vehicle,
        vehicle::routes::release_vehicle,
        vehicle::routes::mark_out_of_station,

        trip::routes::start_trip,
        trip::routes::end_trip,
        trip::routes::get_active_trip,

        telemetry::routes::ingest_gps,
        telemetry::routes::ingest_rfid_scan,

        dispatch::routes::create_booking,
        dispatch::routes::list_pending_bookings,
        dispatch::routes::get_booking,
        dispatch::routes::accept_booking,
        dispatch::routes::verify_booking_otp,
        dispatch::routes::abort_booking,
        dispatch::routes::complete_booking,

        tracking::routes::list_active_buses,

        user::routes::create_driver,
        user::routes::create_student,

        rfid::routes::create_rfid_device,
    ),
)]
struct ApiDoc;

pub fn create_openapi_router() -> Router<controller::AppState> {
    let builder: OpenApiBuilder = ApiDoc::openapi().into();

    let info = InfoBuilder::new()
        .title("Campus Fleet API")
        .description(Some(
            "Campus bus tracking and emergency ambulance dispatch API.",
        ))
        .version("0.1.0")
        .build();

    let api_doc = builder.info(info).build();

    Router::new().route(
        "/docs/openapi.json",
        get(move || {
            let doc = api_doc.clone();
            async move { Json(doc) }
        }),
    )
}
