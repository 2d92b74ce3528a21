use super::{
    detector,
    dto::{GpsAckDto, GpsPingDto, RfidScanAckDto, RfidScanDto},
};
use crate::{
    config::app_config,
    modules::{
        common::{error_codes, extractors::ValidatedJson, responses::SimpleError},
        tracking::{self, dto::PositionDto},
    },
    server::controller::AppState,
    storage::{
        fleet::PositionAttribution,
        models::{Position, Trip, VehicleKind},
    },
};
use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use http::StatusCode;
use tracing::warn;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/gps", post(ingest_gps))
        .route("/rfid-scan", post(ingest_rfid_scan))
}

/// Ingests a GPS ping from a vehicle tracking device
#[utoipa::path(
    post,
    tag = "telemetry",
    path = "/telemetry/gps",
    request_body(content = GpsPingDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            description = "ping accepted, offence detection runs in the background",
            body = GpsAckDto,
            content_type = "application/json",
        ),
        (
            status = NOT_FOUND,
            description = "VEHICLE_NOT_FOUND: no vehicle has this GPS device",
            body = SimpleError,
        ),
    ),
)]
#[tracing::instrument(skip_all)]
pub async fn ingest_gps(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<GpsPingDto>,
) -> Result<Json<GpsAckDto>, (StatusCode, SimpleError)> {
    process_gps(&state, dto).await.map(Json)
}

/// GPS ingestion pipeline, split from the handler so it can be exercised
/// without HTTP plumbing.
///
/// a ping is attributed when the vehicle has a open trip, or when it is a
/// ambulance serving a booking, unattributed pings are accepted and
/// discarded. bus pings above the campus limit on a open trip raise a
/// offence unless the vehicle is out of station, ambulances are exempt
/// from speed enforcement by construction, whatever their speed
pub async fn process_gps(
    state: &AppState,
    dto: GpsPingDto,
) -> Result<GpsAckDto, (StatusCode, SimpleError)> {
    let vehicle = state.store.vehicle_by_device(&dto.device_id).await.ok_or((
        StatusCode::NOT_FOUND,
        SimpleError::with_code(
            "no vehicle registered for this GPS device",
            error_codes::VEHICLE_NOT_FOUND,
        ),
    ))?;

    let position = Position {
        lat: dto.lat,
        lng: dto.lng,
        speed: dto.speed,
        timestamp: dto.timestamp.unwrap_or_else(Utc::now),
    };

    let mut attributed_trip: Option<Trip> = None;

    match state.store.record_position(vehicle.id, position).await? {
        PositionAttribution::Trip(trip) => attributed_trip = Some(trip),
        PositionAttribution::Unattributed => {}
    }

    let mut attributed = attributed_trip.is_some();

    // ambulances serving a booking report positions without a open trip,
    // their pings also refresh the rider facing pickup estimate
    if vehicle.kind == VehicleKind::Ambulance {
        if let Some(booking) = state.store.engaged_booking_for_vehicle(vehicle.id).await {
            if !attributed {
                state
                    .store
                    .record_engaged_position(vehicle.id, position)
                    .await?;
                attributed = true;
            }

            if let Some(updated) = state.dispatch.refresh_eta(&booking, position).await {
                tracking::routes::emit_eta_update(&state.io, &updated, position);
            }
        }
    }

    if let Some(trip) = &attributed_trip {
        let speed_limit = app_config().speed_limit_kmh;

        let overspeeding = vehicle.kind == VehicleKind::Bus
            && position.speed > speed_limit
            && !vehicle.out_of_station;

        if overspeeding {
            warn!(
                "overspeeding detected: {} at {} km/h",
                vehicle.number, position.speed
            );

            detector::record(
                state.store.offences(),
                detector::bus_overspeed(trip.driver_id, vehicle.id, position, speed_limit),
            );
        }
    }

    if attributed {
        tracking::routes::emit_position(
            &state.io,
            PositionDto {
                vehicle_id: vehicle.id,
                vehicle_number: vehicle.number.clone(),
                lat: position.lat,
                lng: position.lng,
                speed: position.speed,
                timestamp: position.timestamp,
            },
        );
    }

    Ok(GpsAckDto {
        message: String::from("GPS data received"),
        vehicle_id: vehicle.id,
    })
}

/// Ingests a scan event from a roadside RFID reader
#[utoipa::path(
    post,
    tag = "telemetry",
    path = "/telemetry/rfid-scan",
    request_body(content = RfidScanDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            description = "scan accepted",
            body = RfidScanAckDto,
            content_type = "application/json",
        ),
        (
            status = NOT_FOUND,
            description = "UNKNOWN_DEVICE: the reader is not registered",
            body = SimpleError,
        ),
    ),
)]
#[tracing::instrument(skip_all)]
pub async fn ingest_rfid_scan(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RfidScanDto>,
) -> Result<Json<RfidScanAckDto>, (StatusCode, SimpleError)> {
    process_rfid_scan(&state, dto).await.map(Json)
}

/// RFID ingestion pipeline, scans above the campus limit charge the
/// student that swiped, every over limit scan raises its own offence,
/// there is no de-duplication window
pub async fn process_rfid_scan(
    state: &AppState,
    dto: RfidScanDto,
) -> Result<RfidScanAckDto, (StatusCode, SimpleError)> {
    let device = state.store.device(&dto.rfid_id).await.ok_or((
        StatusCode::NOT_FOUND,
        SimpleError::with_code("RFID device not registered", error_codes::UNKNOWN_DEVICE),
    ))?;

    let speed_limit = app_config().speed_limit_kmh;

    if dto.speed <= speed_limit {
        return Ok(RfidScanAckDto {
            message: String::from("scan recorded, no violation"),
            offence_recorded: false,
        });
    }

    let student = state
        .store
        .student_by_registration(&dto.student_registration_id)
        .await;

    warn!(
        "student speed violation: {} at {} km/h ({})",
        dto.student_registration_id, dto.speed, device.location_name
    );

    detector::record(
        state.store.offences(),
        detector::student_speed(
            student.map(|s| s.id),
            &dto.student_registration_id,
            dto.speed,
            &device.location_name,
            dto.timestamp.unwrap_or_else(Utc::now),
            speed_limit,
        ),
    );

    Ok(RfidScanAckDto {
        message: String::from("speed violation recorded"),
        offence_recorded: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        modules::dispatch::service::DispatchService,
        storage::{
            models::{OffenceKind, OffenceLocation, OffenceSubject},
            FleetStore,
        },
    };
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;
    use std::{sync::Arc, time::Duration};
    use uuid::Uuid;

    fn test_state() -> AppState {
        let (_layer, io) = socketioxide::SocketIo::builder().build_layer();

        let store = Arc::new(FleetStore::in_memory());
        let dispatch = DispatchService::new(store.clone(), ChaCha8Rng::seed_from_u64(1));

        AppState {
            store,
            dispatch,
            io,
        }
    }

    fn gps(device_id: &str, speed: f64) -> GpsPingDto {
        GpsPingDto {
            device_id: String::from(device_id),
            lat: 20.2961,
            lng: 85.8245,
            speed,
            timestamp: None,
        }
    }

    /// lets the fire-and-forget persistence task run
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    async fn bus_on_trip(state: &AppState, device_id: &str) -> (Uuid, Uuid) {
        let bus = state
            .store
            .create_vehicle("CB-01", device_id, VehicleKind::Bus)
            .await
            .unwrap();
        let driver = state.store.create_driver("ravi", VehicleKind::Bus).await;

        state.store.assign(driver.id, bus.id).await.unwrap();
        state.store.start_trip(bus.id).await.unwrap();

        (bus.id, driver.id)
    }

    #[tokio::test]
    async fn a_ping_from_a_unknown_device_is_rejected() {
        let state = test_state();

        let result = process_gps(&state, gps("ghost-device", 30.0)).await;

        assert_eq!(result.unwrap_err().0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn a_speeding_bus_on_a_trip_raises_exactly_one_offence() {
        let state = test_state();
        let (bus_id, driver_id) = bus_on_trip(&state, "imei-1").await;

        process_gps(&state, gps("imei-1", 41.0)).await.unwrap();
        settle().await;

        let offences = state.store.offences().all();
        assert_eq!(offences.len(), 1);

        let offence = &offences[0];
        assert_eq!(offence.kind, OffenceKind::BusOverspeed);
        assert_eq!(offence.speed, 41.0);
        assert_eq!(offence.speed_limit, 40.0);
        assert_eq!(
            offence.subject,
            OffenceSubject::Vehicle {
                driver_id,
                vehicle_id: bus_id
            }
        );
    }

    #[tokio::test]
    async fn a_ping_at_the_limit_is_not_a_offence() {
        let state = test_state();
        bus_on_trip(&state, "imei-1").await;

        process_gps(&state, gps("imei-1", 40.0)).await.unwrap();
        settle().await;

        assert!(state.store.offences().all().is_empty());
    }

    #[tokio::test]
    async fn every_over_limit_ping_raises_its_own_offence() {
        let state = test_state();
        bus_on_trip(&state, "imei-1").await;

        // no de-duplication window: back to back pings both count
        process_gps(&state, gps("imei-1", 44.0)).await.unwrap();
        process_gps(&state, gps("imei-1", 47.0)).await.unwrap();
        settle().await;

        assert_eq!(state.store.offences().all().len(), 2);
    }

    #[tokio::test]
    async fn a_speeding_bus_without_a_trip_raises_nothing() {
        let state = test_state();

        let bus = state
            .store
            .create_vehicle("CB-01", "imei-1", VehicleKind::Bus)
            .await
            .unwrap();

        process_gps(&state, gps("imei-1", 80.0)).await.unwrap();
        settle().await;

        assert!(state.store.offences().all().is_empty());

        // and the discarded ping moved nothing
        assert!(state.store.last_known_position(bus.id).await.is_none());
    }

    #[tokio::test]
    async fn out_of_station_buses_are_not_fined() {
        let state = test_state();
        let (bus_id, _) = bus_on_trip(&state, "imei-1").await;

        state.store.set_out_of_station(bus_id, true).await.unwrap();

        process_gps(&state, gps("imei-1", 80.0)).await.unwrap();
        settle().await;

        assert!(state.store.offences().all().is_empty());
    }

    #[tokio::test]
    async fn ambulances_are_exempt_from_speed_enforcement() {
        let state = test_state();

        let ambulance = state
            .store
            .create_vehicle("CA-01", "imei-amb", VehicleKind::Ambulance)
            .await
            .unwrap();
        let driver = state
            .store
            .create_driver("asha", VehicleKind::Ambulance)
            .await;

        state.store.assign(driver.id, ambulance.id).await.unwrap();
        state.store.start_trip(ambulance.id).await.unwrap();

        process_gps(&state, gps("imei-amb", 90.0)).await.unwrap();
        settle().await;

        assert!(state.store.offences().all().is_empty());
    }

    #[tokio::test]
    async fn engaged_ambulance_pings_update_position_and_eta_without_a_trip() {
        let state = test_state();

        let ambulance = state
            .store
            .create_vehicle("CA-01", "imei-amb", VehicleKind::Ambulance)
            .await
            .unwrap();
        let driver = state
            .store
            .create_driver("asha", VehicleKind::Ambulance)
            .await;
        state.store.assign(driver.id, ambulance.id).await.unwrap();

        let booking = state
            .dispatch
            .create_booking(
                "2101010101",
                "9999999999",
                "1",
                None,
                crate::storage::models::LatLng {
                    lat: 20.2961,
                    lng: 85.8245,
                },
            )
            .await
            .unwrap();

        state.dispatch.accept(booking.id, driver.id).await.unwrap();

        // ~3.3 km away at the default 20 km/h is ten minutes out
        let mut ping = gps("imei-amb", 50.0);
        ping.lat += 0.03;

        process_gps(&state, ping).await.unwrap();

        let refreshed = state.store.booking(booking.id).await.unwrap();
        assert_eq!(refreshed.eta_minutes, Some(10));

        assert!(state
            .store
            .last_known_position(ambulance.id)
            .await
            .is_some());
    }

    #[tokio::test]
    async fn idle_ambulance_pings_are_discarded() {
        let state = test_state();

        let ambulance = state
            .store
            .create_vehicle("CA-01", "imei-amb", VehicleKind::Ambulance)
            .await
            .unwrap();

        process_gps(&state, gps("imei-amb", 50.0)).await.unwrap();

        assert!(state
            .store
            .last_known_position(ambulance.id)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn scans_from_unknown_readers_are_rejected() {
        let state = test_state();

        let scan = RfidScanDto {
            rfid_id: String::from("ghost-reader"),
            student_registration_id: String::from("2101010101"),
            speed: 55.0,
            timestamp: None,
        };

        let result = process_rfid_scan(&state, scan).await;

        assert_eq!(result.unwrap_err().0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn a_over_limit_scan_charges_the_student() {
        let state = test_state();

        state
            .store
            .register_device("gate-1", "MAIN GATE")
            .await
            .unwrap();
        let student = state
            .store
            .create_student("mira", "2101010101", "9999999999")
            .await
            .unwrap();

        let scan = RfidScanDto {
            rfid_id: String::from("gate-1"),
            student_registration_id: String::from("2101010101"),
            speed: 45.0,
            timestamp: None,
        };

        let ack = process_rfid_scan(&state, scan).await.unwrap();
        assert!(ack.offence_recorded);

        settle().await;

        let offences = state.store.offences().all();
        assert_eq!(offences.len(), 1);
        assert_eq!(offences[0].kind, OffenceKind::StudentSpeed);
        assert_eq!(
            offences[0].subject,
            OffenceSubject::Student {
                student_id: Some(student.id),
                registration_id: String::from("2101010101"),
            }
        );
        assert_eq!(
            offences[0].location,
            OffenceLocation::Place {
                name: String::from("MAIN GATE")
            }
        );
    }

    #[tokio::test]
    async fn a_slow_scan_is_recorded_without_a_offence() {
        let state = test_state();

        state
            .store
            .register_device("gate-1", "MAIN GATE")
            .await
            .unwrap();

        let scan = RfidScanDto {
            rfid_id: String::from("gate-1"),
            student_registration_id: String::from("2101010101"),
            speed: 25.0,
            timestamp: None,
        };

        let ack = process_rfid_scan(&state, scan).await.unwrap();

        assert!(!ack.offence_recorded);
        settle().await;
        assert!(state.store.offences().all().is_empty());
    }
}
