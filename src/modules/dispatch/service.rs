use super::constants::{PickupPlace, OTP_LENGTH};
use crate::{
    config::app_config,
    storage::{
        error::DispatchError,
        models::{Booking, BookingStatus, LatLng, Position, VehicleKind},
        FleetStore,
    },
    utils::geo,
};
use chrono::Utc;
use rand_chacha::ChaCha8Rng;
use rand_core::RngCore;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// The emergency booking state machine:
///
/// ```text
/// pending  -- accept(driver) --> accepted
/// accepted -- verify_otp     --> in_progress
/// accepted -- abort(driver)  --> cancelled
/// in_progress -- complete(driver) --> completed
/// ```
///
/// transitions are compare and swaps on the booking store, see
/// `storage::bookings`, this service adds pickup place validation, the
/// driver / ambulance preconditions, OTP issuance and ETA math on top
#[derive(Clone)]
pub struct DispatchService {
    store: Arc<FleetStore>,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl DispatchService {
    pub fn new(store: Arc<FleetStore>, rng: ChaCha8Rng) -> Self {
        DispatchService {
            store,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Creates a pending booking after validating the pickup place code,
    /// the "other" place requires free text details
    pub async fn create_booking(
        &self,
        student_registration_id: &str,
        phone: &str,
        place: &str,
        place_details: Option<String>,
        user_location: LatLng,
    ) -> Result<Booking, DispatchError> {
        let pickup = PickupPlace::from_code(place).ok_or(DispatchError::InvalidPickupPlace)?;

        let has_details = place_details
            .as_deref()
            .map(|d| !d.trim().is_empty())
            .unwrap_or(false);

        if pickup == PickupPlace::Other && !has_details {
            return Err(DispatchError::InvalidPickupPlace);
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            student_registration_id: String::from(student_registration_id),
            phone: String::from(phone),
            place: String::from(place),
            place_details,
            user_location,
            status: BookingStatus::Pending,
            driver_id: None,
            vehicle_id: None,
            otp: None,
            eta_minutes: None,
        };

        self.store.insert_booking(booking.clone()).await;

        tracing::info!("booking {} created at {}", booking.id, pickup.label());

        Ok(booking)
    }

    pub async fn booking(&self, booking_id: Uuid) -> Option<Booking> {
        self.store.booking(booking_id).await
    }

    pub async fn list_pending(&self) -> Vec<Booking> {
        self.store.pending_bookings().await
    }

    /// A driver takes a pending booking.
    ///
    /// requires a on duty ambulance driver whose vehicle is not out of
    /// station, issues the OTP and the initial pickup estimate, the
    /// status swap itself is atomic so racing drivers get exactly one
    /// winner and `AlreadyAccepted` for everyone else
    pub async fn accept(
        &self,
        booking_id: Uuid,
        driver_id: Uuid,
    ) -> Result<Booking, DispatchError> {
        if self.store.driver(driver_id).await.is_none() {
            return Err(DispatchError::DriverNotFound);
        }

        let ambulance = self
            .store
            .assigned_vehicle(driver_id)
            .await
            .filter(|v| v.kind == VehicleKind::Ambulance)
            .ok_or(DispatchError::NoAmbulanceAssigned)?;

        if ambulance.out_of_station {
            return Err(DispatchError::AmbulanceOutOfStation);
        }

        let booking = self
            .store
            .booking(booking_id)
            .await
            .ok_or(DispatchError::BookingNotFound)?;

        // the estimate is None until the ambulance has a attributed
        // position, pings while serving the booking will fill it in
        let eta_minutes = self
            .store
            .last_known_position(ambulance.id)
            .await
            .map(|pos| self.eta_minutes_between(pos, booking.user_location));

        let otp = self.generate_otp();

        self.store
            .accept_booking(booking_id, driver_id, ambulance.id, otp, eta_minutes)
            .await
    }

    pub async fn verify_otp(&self, booking_id: Uuid, code: &str) -> Result<Booking, DispatchError> {
        self.store.verify_booking_otp(booking_id, code).await
    }

    pub async fn abort(&self, booking_id: Uuid, driver_id: Uuid) -> Result<Booking, DispatchError> {
        self.store.abort_booking(booking_id, driver_id).await
    }

    pub async fn complete(
        &self,
        booking_id: Uuid,
        driver_id: Uuid,
    ) -> Result<Booking, DispatchError> {
        self.store.complete_booking(booking_id, driver_id).await
    }

    /// Recomputes the pickup estimate of a booking from a fresh ambulance
    /// position, returns `None` when the booking is no longer being served
    pub async fn refresh_eta(&self, booking: &Booking, position: Position) -> Option<Booking> {
        let eta = self.eta_minutes_between(position, booking.user_location);

        self.store.update_booking_eta(booking.id, eta).await
    }

    fn eta_minutes_between(&self, from: Position, to: LatLng) -> u32 {
        let distance_km = geo::haversine_distance_km(from.lat, from.lng, to.lat, to.lng);

        geo::eta_minutes(distance_km, app_config().dispatch_speed_kmh)
    }

    /// a uniformly random numeric code of `OTP_LENGTH` digits, no leading zeros
    fn generate_otp(&self) -> String {
        let n = self
            .rng
            .lock()
            .expect("dispatch OTP rng lock poisoned")
            .next_u32();

        let otp = (100_000 + n % 900_000).to_string();
        debug_assert_eq!(otp.len(), OTP_LENGTH);

        otp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::SeedableRng;

    const TEST_RNG_SEED: u64 = 7;

    fn service() -> (Arc<FleetStore>, DispatchService) {
        let store = Arc::new(FleetStore::in_memory());
        let dispatch =
            DispatchService::new(store.clone(), ChaCha8Rng::seed_from_u64(TEST_RNG_SEED));

        (store, dispatch)
    }

    fn campus_location() -> LatLng {
        LatLng {
            lat: 20.2961,
            lng: 85.8245,
        }
    }

    /// the OTP the service will issue first for `TEST_RNG_SEED`
    fn expected_first_otp() -> String {
        let mut rng = ChaCha8Rng::seed_from_u64(TEST_RNG_SEED);

        (100_000 + rng.next_u32() % 900_000).to_string()
    }

    /// a ambulance on duty for `driver`, with a known position when `lat`
    /// and `lng` are given
    async fn on_duty_ambulance(
        store: &FleetStore,
        number: &str,
        device: &str,
        position: Option<(f64, f64)>,
    ) -> (Uuid, Uuid) {
        let ambulance = store
            .create_vehicle(number, device, VehicleKind::Ambulance)
            .await
            .unwrap();
        let driver = store.create_driver("asha", VehicleKind::Ambulance).await;

        store.assign(driver.id, ambulance.id).await.unwrap();

        if let Some((lat, lng)) = position {
            store.start_trip(ambulance.id).await.unwrap();
            store
                .record_position(
                    ambulance.id,
                    Position {
                        lat,
                        lng,
                        speed: 30.0,
                        timestamp: Utc::now(),
                    },
                )
                .await
                .unwrap();
        }

        (driver.id, ambulance.id)
    }

    #[tokio::test]
    async fn bookings_require_a_known_pickup_place() {
        let (_, dispatch) = service();

        let err = dispatch
            .create_booking("2101010101", "9999999999", "99", None, campus_location())
            .await;

        assert_eq!(err, Err(DispatchError::InvalidPickupPlace));

        // the "other" place is only valid with details
        let err = dispatch
            .create_booking("2101010101", "9999999999", "6", None, campus_location())
            .await;

        assert_eq!(err, Err(DispatchError::InvalidPickupPlace));

        dispatch
            .create_booking(
                "2101010101",
                "9999999999",
                "6",
                Some(String::from("near the sports complex gate")),
                campus_location(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn accept_requires_a_on_duty_ambulance_driver() {
        let (store, dispatch) = service();

        let booking = dispatch
            .create_booking("2101010101", "9999999999", "1", None, campus_location())
            .await
            .unwrap();

        assert_eq!(
            dispatch.accept(booking.id, Uuid::new_v4()).await,
            Err(DispatchError::DriverNotFound)
        );

        // a driver with no vehicle cannot accept
        let idle_driver = store.create_driver("ravi", VehicleKind::Ambulance).await;
        assert_eq!(
            dispatch.accept(booking.id, idle_driver.id).await,
            Err(DispatchError::NoAmbulanceAssigned)
        );

        // neither can a bus driver on duty
        let bus = store
            .create_vehicle("CB-01", "imei-bus", VehicleKind::Bus)
            .await
            .unwrap();
        let bus_driver = store.create_driver("hari", VehicleKind::Bus).await;
        store.assign(bus_driver.id, bus.id).await.unwrap();

        assert_eq!(
            dispatch.accept(booking.id, bus_driver.id).await,
            Err(DispatchError::NoAmbulanceAssigned)
        );
    }

    #[tokio::test]
    async fn accept_skips_out_of_station_ambulances() {
        let (store, dispatch) = service();

        let (driver_id, ambulance_id) =
            on_duty_ambulance(&store, "CA-01", "imei-amb", None).await;

        store.set_out_of_station(ambulance_id, true).await.unwrap();

        let booking = dispatch
            .create_booking("2101010101", "9999999999", "1", None, campus_location())
            .await
            .unwrap();

        assert_eq!(
            dispatch.accept(booking.id, driver_id).await,
            Err(DispatchError::AmbulanceOutOfStation)
        );
    }

    #[tokio::test]
    async fn accept_issues_a_deterministic_otp_under_a_seeded_rng() {
        let (store, dispatch) = service();

        let (driver_id, ambulance_id) =
            on_duty_ambulance(&store, "CA-01", "imei-amb", None).await;

        let booking = dispatch
            .create_booking("2101010101", "9999999999", "1", None, campus_location())
            .await
            .unwrap();

        let accepted = dispatch.accept(booking.id, driver_id).await.unwrap();

        assert_eq!(accepted.status, BookingStatus::Accepted);
        assert_eq!(accepted.driver_id, Some(driver_id));
        assert_eq!(accepted.vehicle_id, Some(ambulance_id));
        assert_eq!(accepted.otp, Some(expected_first_otp()));

        // the ambulance never reported a attributed position yet
        assert_eq!(accepted.eta_minutes, None);
    }

    #[tokio::test]
    async fn accept_estimates_the_pickup_from_the_last_known_position() {
        let (store, dispatch) = service();

        // ~20.0 km north of the rider at the default 20 km/h is a hour away
        let rider = campus_location();
        let ambulance_position = (rider.lat + 0.17985, rider.lng);

        let (driver_id, _) =
            on_duty_ambulance(&store, "CA-01", "imei-amb", Some(ambulance_position)).await;

        let booking = dispatch
            .create_booking("2101010101", "9999999999", "2", None, rider)
            .await
            .unwrap();

        let accepted = dispatch.accept(booking.id, driver_id).await.unwrap();

        assert_eq!(accepted.eta_minutes, Some(60));
    }

    #[tokio::test]
    async fn refresh_eta_tracks_the_approaching_ambulance() {
        let (store, dispatch) = service();

        let (driver_id, _) = on_duty_ambulance(&store, "CA-01", "imei-amb", None).await;

        let booking = dispatch
            .create_booking("2101010101", "9999999999", "3", None, campus_location())
            .await
            .unwrap();

        let accepted = dispatch.accept(booking.id, driver_id).await.unwrap();

        // ~3.3 km away at 20 km/h is ten minutes
        let position = Position {
            lat: campus_location().lat + 0.03,
            lng: campus_location().lng,
            speed: 40.0,
            timestamp: Utc::now(),
        };

        let refreshed = dispatch.refresh_eta(&accepted, position).await.unwrap();

        assert_eq!(refreshed.eta_minutes, Some(10));
    }
}
