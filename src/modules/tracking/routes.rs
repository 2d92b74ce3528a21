use super::dto::{ActiveBusDto, EtaUpdateDto, PositionDto};
use crate::{
    modules::common::responses::SimpleError,
    server::controller::AppState,
    storage::{
        models::{Booking, Position},
        FleetStore,
    },
};
use axum::{extract::State, routing::get, Json, Router};
use socketioxide::{
    extract::{Data, SocketRef, State as SocketState},
    SocketIo,
};
use std::sync::Arc;
use uuid::Uuid;

/// The maximun amount of vehicles a client can
/// listen to for realtime position updates
const VEHICLE_SUBSCRIPTION_PER_CLIENT_LIMIT: usize = 20;

pub fn create_router() -> Router<AppState> {
    Router::new().route("/active-buses", get(list_active_buses))
}

/// Buses currently on a trip, with driver and last position, for the
/// rider map, out of station vehicles are never listed
#[utoipa::path(
    get,
    tag = "tracking",
    path = "/tracking/active-buses",
    responses(
        (
            status = OK,
            description = "every bus on a open trip",
            body = Vec<ActiveBusDto>,
            content_type = "application/json",
        ),
    ),
)]
pub async fn list_active_buses(State(state): State<AppState>) -> Json<Vec<ActiveBusDto>> {
    let buses = state
        .store
        .active_buses()
        .await
        .into_iter()
        .map(|(vehicle, driver, trip)| ActiveBusDto {
            trip_id: trip.id,
            vehicle_id: vehicle.id,
            vehicle_number: vehicle.number,
            driver_name: driver.name,
            position: trip.last_known_position,
        })
        .collect();

    Json(buses)
}

/// callback for when a SocketIO connection is established
///
/// riders and the fines desk connect anonymously, all a client can do is
/// pick which vehicles to listen to
pub async fn on_connect(socket: SocketRef) {
    socket.on("change_vehicles_to_listen", on_change_vehicles_to_listen);
}

fn send_error(s: &SocketRef, msg: &str) {
    let _ = s.emit("error", SimpleError::from(msg));
}

/// Callback for the `change_vehicles_to_listen` event.
///
/// verifies the vehicle ids informed by the event and swaps the client
/// rooms for the existing ones, so the client gets position events for
/// exactly the vehicles it asked for
async fn on_change_vehicles_to_listen(
    s: SocketRef,
    SocketState(store): SocketState<Arc<FleetStore>>,
    Data(vehicle_ids): Data<Vec<Uuid>>,
) {
    if vehicle_ids.len() > VEHICLE_SUBSCRIPTION_PER_CLIENT_LIMIT {
        let error_msg =
            format!("cannot listen to over {VEHICLE_SUBSCRIPTION_PER_CLIENT_LIMIT} vehicles");

        send_error(&s, &error_msg);
        return;
    }

    let mut rooms: Vec<String> = Vec::new();
    let mut unknown: Vec<String> = Vec::new();

    for vehicle_id in vehicle_ids {
        if store.vehicle(vehicle_id).await.is_some() {
            rooms.push(vehicle_id.to_string());
        } else {
            unknown.push(vehicle_id.to_string());
        }
    }

    if !unknown.is_empty() {
        let error_msg = format!("cannot listen to not found vehicles: {}", unknown.join(", "));
        send_error(&s, &error_msg);
    }

    let _ = s.leave_all();
    let _ = s.join(rooms);
}

/// emits a position event to the vehicle room of the `/tracking` namespace
pub fn emit_position(io: &SocketIo, position: PositionDto) {
    if let Some(ns) = io.of("/tracking") {
        let room = position.vehicle_id.to_string();
        let _ = ns.within(room).emit("position", position);
    }
}

/// broadcasts a booking lifecycle event to every `/tracking` client
pub fn emit_booking_event(io: &SocketIo, event: &'static str, booking: &Booking) {
    if let Some(ns) = io.of("/tracking") {
        let _ = ns.emit(event, booking.clone());
    }
}

/// broadcasts a refreshed pickup estimate while a ambulance is underway
pub fn emit_eta_update(io: &SocketIo, booking: &Booking, position: Position) {
    if let Some(ns) = io.of("/tracking") {
        let _ = ns.emit(
            "eta_update",
            EtaUpdateDto {
                booking_id: booking.id,
                eta_minutes: booking.eta_minutes,
                lat: position.lat,
                lng: position.lng,
            },
        );
    }
}
