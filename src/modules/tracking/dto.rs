use crate::storage::models::Position;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A live position event sent to `/tracking` subscribers of the
/// vehicle's room
#[derive(Serialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionDto {
    pub vehicle_id: Uuid,
    pub vehicle_number: String,
    pub lat: f64,
    pub lng: f64,
    pub speed: f64,
    pub timestamp: DateTime<Utc>,
}

/// Pickup estimate refresh broadcast while a ambulance is underway
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EtaUpdateDto {
    pub booking_id: Uuid,
    pub eta_minutes: Option<u32>,
    pub lat: f64,
    pub lng: f64,
}

/// One bus on the rider facing map
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBusDto {
    pub trip_id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_number: String,
    pub driver_name: String,
    pub position: Option<Position>,
}
