use crate::modules::common::validators::REGEX_IS_REGISTRATION_ID;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A position report from a vehicle GPS device
#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GpsPingDto {
    /// id of the reporting GPS device, pings from devices that are not
    /// installed on a vehicle are rejected
    #[validate(length(min = 1, max = 64))]
    pub device_id: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,

    /// km/h
    #[validate(range(min = 0.0))]
    pub speed: f64,

    /// time of the fix, defaults to the ingestion time when absent
    pub timestamp: Option<DateTime<Utc>>,
}

/// A scan event from a roadside RFID reader
#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RfidScanDto {
    #[validate(length(min = 1, max = 64))]
    pub rfid_id: String,

    #[validate(regex(
        path = "REGEX_IS_REGISTRATION_ID",
        message = "registration id must be 4 to 20 alphanumeric characters"
    ))]
    pub student_registration_id: String,

    /// km/h measured by the reader
    #[validate(range(min = 0.0))]
    pub speed: f64,

    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GpsAckDto {
    pub message: String,
    pub vehicle_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RfidScanAckDto {
    pub message: String,

    /// whether the scan was over the campus speed limit and a offence
    /// was queued for persistence
    pub offence_recorded: bool,
}
