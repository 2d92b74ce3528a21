use crate::modules::common::{error_codes, responses::SimpleError};
use http::StatusCode;
use std::fmt;

/// Errors for vehicle / driver / trip operations on the fleet store.
///
/// every variant maps to its own error code so callers can react to the
/// exact precondition that failed, these are safely returned from axum
/// route handlers through the `Into<(StatusCode, SimpleError)>` impl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetError {
    VehicleNotFound,
    DriverNotFound,

    /// driver kind and vehicle kind differ
    KindMismatch,

    /// the vehicle has another driver, or the driver holds another vehicle
    AlreadyAssigned,

    /// the driver / vehicle pair does not match the current binding
    NotAssigned,

    NumberInUse,
    DeviceInUse,
    RfidIdInUse,
    RegistrationIdInUse,

    /// trips can only be started on vehicles with a bound driver
    NoAssignment,

    /// the vehicle already has a open trip
    TripAlreadyActive,

    TripNotFound,

    /// the trip was already ended
    TripNotActive,
}

impl fmt::Display for FleetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FleetError::VehicleNotFound => "vehicle not found",
            FleetError::DriverNotFound => "driver not found",
            FleetError::KindMismatch => "driver is not licensed for this vehicle kind",
            FleetError::AlreadyAssigned => "vehicle or driver is already assigned",
            FleetError::NotAssigned => "vehicle is not assigned to this driver",
            FleetError::NumberInUse => "a vehicle with this number already exists",
            FleetError::DeviceInUse => "a vehicle with this GPS device already exists",
            FleetError::RfidIdInUse => "a RFID device with this id already exists",
            FleetError::RegistrationIdInUse => "a student with this registration id already exists",
            FleetError::NoAssignment => "vehicle has no driver assigned",
            FleetError::TripAlreadyActive => "vehicle already has a active trip",
            FleetError::TripNotFound => "trip not found",
            FleetError::TripNotActive => "trip was already ended",
        };

        write!(f, "{}", msg)
    }
}

impl std::error::Error for FleetError {}

impl From<FleetError> for (StatusCode, SimpleError) {
    fn from(err: FleetError) -> Self {
        use FleetError::*;

        let (status, code) = match err {
            VehicleNotFound => (StatusCode::NOT_FOUND, error_codes::VEHICLE_NOT_FOUND),
            DriverNotFound => (StatusCode::NOT_FOUND, error_codes::DRIVER_NOT_FOUND),
            TripNotFound => (StatusCode::NOT_FOUND, error_codes::TRIP_NOT_FOUND),
            KindMismatch => (StatusCode::BAD_REQUEST, error_codes::DRIVER_KIND_MISMATCH),
            AlreadyAssigned => (StatusCode::BAD_REQUEST, error_codes::VEHICLE_ALREADY_ASSIGNED),
            NotAssigned => (StatusCode::BAD_REQUEST, error_codes::VEHICLE_NOT_ASSIGNED),
            NumberInUse => (StatusCode::BAD_REQUEST, error_codes::VEHICLE_NUMBER_IN_USE),
            DeviceInUse => (StatusCode::BAD_REQUEST, error_codes::GPS_DEVICE_IN_USE),
            RfidIdInUse => (StatusCode::BAD_REQUEST, error_codes::RFID_ID_IN_USE),
            RegistrationIdInUse => (StatusCode::BAD_REQUEST, error_codes::REGISTRATION_ID_IN_USE),
            NoAssignment => (StatusCode::BAD_REQUEST, error_codes::NO_ASSIGNMENT),
            TripAlreadyActive => (StatusCode::BAD_REQUEST, error_codes::TRIP_ALREADY_ACTIVE),
            TripNotActive => (StatusCode::BAD_REQUEST, error_codes::TRIP_NOT_ACTIVE),
        };

        (status, SimpleError::with_code(&err.to_string(), code))
    }
}

/// Errors for the booking state machine.
///
/// the state machine reports the exact precondition that failed, never a
/// generic "invalid request", so the driver app can show eg: "already
/// accepted by another driver"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    BookingNotFound,
    DriverNotFound,

    /// pickup place is not a known campus point code, or is the "other"
    /// code with no details
    InvalidPickupPlace,

    /// the accepting driver has no ambulance bound to it
    NoAmbulanceAssigned,

    /// the accepting driver's ambulance is marked out of station
    AmbulanceOutOfStation,

    /// lost the acceptance race, the booking was no longer pending
    AlreadyAccepted,

    /// transition defined only for accepted bookings
    NotAccepted,

    /// transition defined only for in progress bookings
    NotInProgress,

    /// informed OTP does not match, the booking state is unchanged
    InvalidOtp,

    /// the acting driver is not the one bound to the booking
    NotBookingDriver,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            DispatchError::BookingNotFound => "booking not found",
            DispatchError::DriverNotFound => "driver not found",
            DispatchError::InvalidPickupPlace => "unknown pickup place",
            DispatchError::NoAmbulanceAssigned => "no ambulance assigned to this driver",
            DispatchError::AmbulanceOutOfStation => "assigned ambulance is out of station",
            DispatchError::AlreadyAccepted => "booking was already accepted by another driver",
            DispatchError::NotAccepted => "booking is not in the accepted state",
            DispatchError::NotInProgress => "booking is not in progress",
            DispatchError::InvalidOtp => "invalid OTP",
            DispatchError::NotBookingDriver => "booking is assigned to another driver",
        };

        write!(f, "{}", msg)
    }
}

impl std::error::Error for DispatchError {}

impl From<DispatchError> for (StatusCode, SimpleError) {
    fn from(err: DispatchError) -> Self {
        use DispatchError::*;

        let (status, code) = match err {
            BookingNotFound => (StatusCode::NOT_FOUND, error_codes::BOOKING_NOT_FOUND),
            DriverNotFound => (StatusCode::NOT_FOUND, error_codes::DRIVER_NOT_FOUND),
            InvalidPickupPlace => (StatusCode::BAD_REQUEST, error_codes::INVALID_PICKUP_PLACE),
            NoAmbulanceAssigned => (StatusCode::BAD_REQUEST, error_codes::NO_AMBULANCE_ASSIGNED),
            AmbulanceOutOfStation => {
                (StatusCode::BAD_REQUEST, error_codes::AMBULANCE_OUT_OF_STATION)
            }
            AlreadyAccepted => (StatusCode::CONFLICT, error_codes::BOOKING_ALREADY_ACCEPTED),
            NotAccepted => (StatusCode::BAD_REQUEST, error_codes::BOOKING_NOT_ACCEPTED),
            NotInProgress => (StatusCode::BAD_REQUEST, error_codes::BOOKING_NOT_IN_PROGRESS),
            InvalidOtp => (StatusCode::BAD_REQUEST, error_codes::INVALID_OTP),
            NotBookingDriver => (StatusCode::FORBIDDEN, error_codes::NOT_BOOKING_DRIVER),
        };

        (status, SimpleError::with_code(&err.to_string(), code))
    }
}

/// A failure persisting a record to a backing store, assumed transient
/// and worth retrying
#[derive(Debug, Clone)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}
