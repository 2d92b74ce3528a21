/// a vehicle could not be bound to a driver because the vehicle already
/// has another driver or the driver already holds another vehicle
pub static VEHICLE_ALREADY_ASSIGNED: &str = "VEHICLE_ALREADY_ASSIGNED";

/// a release was requested for a driver / vehicle pair that does not
/// match the current binding
pub static VEHICLE_NOT_ASSIGNED: &str = "VEHICLE_NOT_ASSIGNED";

/// a driver can only be bound to vehicles of the kind it is licensed
/// for, eg: a bus driver cannot take a ambulance
pub static DRIVER_KIND_MISMATCH: &str = "DRIVER_KIND_MISMATCH";

/// a vehicle could not be registered because its fleet number is
/// already in use
pub static VEHICLE_NUMBER_IN_USE: &str = "VEHICLE_NUMBER_IN_USE";

/// a vehicle could not be registered because its GPS device id is
/// already installed on another vehicle
pub static GPS_DEVICE_IN_USE: &str = "GPS_DEVICE_IN_USE";

/// a RFID device could not be registered because its hardware id is
/// already registered
pub static RFID_ID_IN_USE: &str = "RFID_ID_IN_USE";

/// a student could not be registered because the registration id is taken
pub static REGISTRATION_ID_IN_USE: &str = "REGISTRATION_ID_IN_USE";

/// a trip cannot be started on a vehicle that has no driver bound to it
pub static NO_ASSIGNMENT: &str = "NO_ASSIGNMENT";

/// a trip cannot be started on a vehicle that already has a open trip
pub static TRIP_ALREADY_ACTIVE: &str = "TRIP_ALREADY_ACTIVE";

/// the trip was already ended, double ends are reported so clients can
/// detect double submissions
pub static TRIP_NOT_ACTIVE: &str = "TRIP_NOT_ACTIVE";

/// a RFID scan referenced a reader that is not registered
pub static UNKNOWN_DEVICE: &str = "UNKNOWN_DEVICE";

/// the booking was not pending at the moment of the accept call, almost
/// always because another driver won the race for it
pub static BOOKING_ALREADY_ACCEPTED: &str = "BOOKING_ALREADY_ACCEPTED";

/// the requested transition is only defined for accepted bookings
pub static BOOKING_NOT_ACCEPTED: &str = "BOOKING_NOT_ACCEPTED";

/// the requested transition is only defined for in progress bookings
pub static BOOKING_NOT_IN_PROGRESS: &str = "BOOKING_NOT_IN_PROGRESS";

/// the informed OTP does not match the one issued at acceptance
pub static INVALID_OTP: &str = "INVALID_OTP";

/// the acting driver is not the driver bound to the booking
pub static NOT_BOOKING_DRIVER: &str = "NOT_BOOKING_DRIVER";

/// a booking cannot be accepted by a driver with no ambulance bound to it
pub static NO_AMBULANCE_ASSIGNED: &str = "NO_AMBULANCE_ASSIGNED";

/// out of station vehicles are excluded from dispatch
pub static AMBULANCE_OUT_OF_STATION: &str = "AMBULANCE_OUT_OF_STATION";

/// the booking pickup place is not a known campus point, or is the
/// "other" code without free text details
pub static INVALID_PICKUP_PLACE: &str = "INVALID_PICKUP_PLACE";

/// the referenced vehicle does not exist
pub static VEHICLE_NOT_FOUND: &str = "VEHICLE_NOT_FOUND";

/// the referenced driver does not exist
pub static DRIVER_NOT_FOUND: &str = "DRIVER_NOT_FOUND";

/// the referenced trip does not exist
pub static TRIP_NOT_FOUND: &str = "TRIP_NOT_FOUND";

/// the referenced booking does not exist
pub static BOOKING_NOT_FOUND: &str = "BOOKING_NOT_FOUND";
