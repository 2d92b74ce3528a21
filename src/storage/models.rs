use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;
use uuid::Uuid;

/// The two vehicle categories operated by the campus fleet, a driver can
/// only ever be bound to vehicles of its own kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VehicleKind {
    Bus,
    Ambulance,
}

impl VehicleKind {
    /// Creates a string vector containing all the supported vehicle kinds
    pub fn to_string_vec() -> Vec<String> {
        VehicleKind::iter().map(|k| k.to_string()).collect()
    }
}

/// A GPS fix reported by a vehicle tracking device, speed in km/h
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
    pub speed: f64,
    pub timestamp: DateTime<Utc>,
}

/// A plain (lat, lng) pair, used for rider locations that carry no
/// speed or timestamp
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[schema(title = "Vehicle")]
pub struct Vehicle {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,

    /// registration plate / fleet number, unique across the fleet
    pub number: String,

    /// identifier of the GPS tracking device installed on the vehicle,
    /// GPS pings are attributed to vehicles through this value
    pub gps_device_id: String,

    pub kind: VehicleKind,

    /// driver currently bound to the vehicle, `None` while off duty
    pub assigned_driver: Option<Uuid>,

    /// out of station vehicles are hidden from riders and skipped
    /// by dispatch
    pub out_of_station: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[schema(title = "Driver")]
pub struct Driver {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub name: String,

    /// vehicle kind the driver is licensed for
    pub kind: VehicleKind,

    /// vehicle currently bound to the driver, `None` while off duty
    pub assigned_vehicle: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[schema(title = "Student")]
pub struct Student {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub name: String,

    /// college registration id, RFID scans reference students by it
    pub registration_id: String,

    pub phone: String,
}

/// A bounded interval of vehicle operation, open while `end_time` is `None`.
///
/// GPS pings are only attributed to a vehicle while it has an open trip
/// (ambulances engaged on a booking being the exception).
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[schema(title = "Trip")]
pub struct Trip {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub last_known_position: Option<Position>,
}

impl Trip {
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }
}

/// A roadside RFID reader registered at a fixed campus location
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[schema(title = "RfidDevice")]
pub struct RfidDevice {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,

    /// hardware id sent by the reader on every scan
    pub rfid_id: String,

    /// human readable name of the spot the reader is mounted at
    pub location_name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OffenceKind {
    /// a bus exceeded the campus speed limit during a trip
    BusOverspeed,

    /// a student vehicle exceeded the campus speed limit at a RFID gate
    StudentSpeed,
}

/// Who a speeding offence is charged to
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum OffenceSubject {
    Vehicle {
        driver_id: Uuid,
        vehicle_id: Uuid,
    },
    Student {
        /// `None` when the scanned registration id is not a registered student
        student_id: Option<Uuid>,
        registration_id: String,
    },
}

/// Where a speeding offence was detected: a GPS coordinate for moving
/// vehicles, the reader location name for RFID gates
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum OffenceLocation {
    Point { lat: f64, lng: f64 },
    Place { name: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[schema(title = "Offence")]
pub struct Offence {
    pub id: Uuid,
    pub kind: OffenceKind,
    pub subject: OffenceSubject,

    /// measured speed in km/h
    pub speed: f64,

    /// the limit that was in force when the offence was recorded
    pub speed_limit: f64,

    pub location: OffenceLocation,
    pub timestamp: DateTime<Utc>,

    /// cleared by the fines desk, offences start unpaid
    pub paid: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

/// An emergency ambulance request and its whole lifecycle.
///
/// Driver, vehicle, OTP and ETA are set at acceptance time, records of
/// terminal bookings are kept as immutable history.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[schema(title = "Booking")]
pub struct Booking {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,

    pub student_registration_id: String,
    pub phone: String,

    /// campus pickup point code, see `modules::dispatch::constants`
    pub place: String,

    /// free text detail, required when `place` is the "other" code
    pub place_details: Option<String>,

    pub user_location: LatLng,

    pub status: BookingStatus,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,

    /// code the rider must hand to the driver before the ride starts
    pub otp: Option<String>,

    pub eta_minutes: Option<u32>,
}
