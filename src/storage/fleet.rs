use super::{
    error::FleetError,
    models::{Driver, Position, Trip, Vehicle, VehicleKind},
    FleetState, FleetStore,
};
use chrono::Utc;
use uuid::Uuid;

/// What a GPS ping ended up attributed to
#[derive(Debug, Clone, PartialEq)]
pub enum PositionAttribution {
    /// the vehicle had a open trip and its position was updated
    Trip(Trip),

    /// no open trip, the ping was accepted but discarded
    Unattributed,
}

impl FleetState {
    /// closes the open trip of a vehicle if there is one
    fn close_open_trip(&mut self, vehicle_id: Uuid) -> Option<Trip> {
        let trip_id = self.active_trips.remove(&vehicle_id)?;

        let trip = self.trips.get_mut(&trip_id)?;
        trip.end_time = Some(Utc::now());

        Some(trip.clone())
    }
}

impl FleetStore {
    pub async fn create_vehicle(
        &self,
        number: &str,
        gps_device_id: &str,
        kind: VehicleKind,
    ) -> Result<Vehicle, FleetError> {
        let mut fleet = self.fleet.write().await;

        if fleet.vehicles.values().any(|v| v.number == number) {
            return Err(FleetError::NumberInUse);
        }

        if fleet.device_index.contains_key(gps_device_id) {
            return Err(FleetError::DeviceInUse);
        }

        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            number: String::from(number),
            gps_device_id: String::from(gps_device_id),
            kind,
            assigned_driver: None,
            out_of_station: false,
        };

        fleet
            .device_index
            .insert(vehicle.gps_device_id.clone(), vehicle.id);
        fleet.vehicles.insert(vehicle.id, vehicle.clone());

        Ok(vehicle)
    }

    pub async fn create_driver(&self, name: &str, kind: VehicleKind) -> Driver {
        let driver = Driver {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            name: String::from(name),
            kind,
            assigned_vehicle: None,
        };

        self.fleet
            .write()
            .await
            .drivers
            .insert(driver.id, driver.clone());

        driver
    }

    pub async fn vehicle(&self, vehicle_id: Uuid) -> Option<Vehicle> {
        self.fleet.read().await.vehicles.get(&vehicle_id).cloned()
    }

    pub async fn driver(&self, driver_id: Uuid) -> Option<Driver> {
        self.fleet.read().await.drivers.get(&driver_id).cloned()
    }

    pub async fn vehicle_by_device(&self, gps_device_id: &str) -> Option<Vehicle> {
        let fleet = self.fleet.read().await;

        let vehicle_id = fleet.device_index.get(gps_device_id)?;
        fleet.vehicles.get(vehicle_id).cloned()
    }

    /// the vehicle currently bound to a driver, if any
    pub async fn assigned_vehicle(&self, driver_id: Uuid) -> Option<Vehicle> {
        let fleet = self.fleet.read().await;

        let vehicle_id = fleet.drivers.get(&driver_id)?.assigned_vehicle?;
        fleet.vehicles.get(&vehicle_id).cloned()
    }

    /// Binds a driver to a vehicle.
    ///
    /// at most one driver per vehicle and one vehicle per driver, submitting
    /// the pair that is already bound is a no-op success so clients can
    /// safely retry, any other conflicting binding fails
    pub async fn assign(&self, driver_id: Uuid, vehicle_id: Uuid) -> Result<Vehicle, FleetError> {
        let mut fleet = self.fleet.write().await;

        let vehicle = fleet
            .vehicles
            .get(&vehicle_id)
            .ok_or(FleetError::VehicleNotFound)?;

        let driver = fleet
            .drivers
            .get(&driver_id)
            .ok_or(FleetError::DriverNotFound)?;

        if driver.kind != vehicle.kind {
            return Err(FleetError::KindMismatch);
        }

        let same_pair = vehicle.assigned_driver == Some(driver_id)
            && driver.assigned_vehicle == Some(vehicle_id);

        if same_pair {
            return Ok(vehicle.clone());
        }

        if vehicle.assigned_driver.is_some() || driver.assigned_vehicle.is_some() {
            return Err(FleetError::AlreadyAssigned);
        }

        fleet
            .drivers
            .get_mut(&driver_id)
            .map(|d| d.assigned_vehicle = Some(vehicle_id));

        let vehicle = fleet.vehicles.get_mut(&vehicle_id).map(|v| {
            v.assigned_driver = Some(driver_id);
            v.clone()
        });

        // both entries were checked above so the vehicle is always present
        vehicle.ok_or(FleetError::VehicleNotFound)
    }

    /// Clears a driver / vehicle binding.
    ///
    /// any open trip of the vehicle is force closed in the same critical
    /// section, so a released vehicle can never be left with a dangling
    /// trip (end of duty safety net), the closed trip is returned
    pub async fn release(
        &self,
        driver_id: Uuid,
        vehicle_id: Uuid,
    ) -> Result<Option<Trip>, FleetError> {
        let mut fleet = self.fleet.write().await;

        let vehicle = fleet
            .vehicles
            .get(&vehicle_id)
            .ok_or(FleetError::VehicleNotFound)?;

        if !fleet.drivers.contains_key(&driver_id) {
            return Err(FleetError::DriverNotFound);
        }

        if vehicle.assigned_driver != Some(driver_id) {
            return Err(FleetError::NotAssigned);
        }

        fleet
            .vehicles
            .get_mut(&vehicle_id)
            .map(|v| v.assigned_driver = None);
        fleet
            .drivers
            .get_mut(&driver_id)
            .map(|d| d.assigned_vehicle = None);

        Ok(fleet.close_open_trip(vehicle_id))
    }

    /// flips the out of station flag, out of station vehicles are hidden
    /// from riders and skipped by dispatch
    pub async fn set_out_of_station(
        &self,
        vehicle_id: Uuid,
        out_of_station: bool,
    ) -> Result<Vehicle, FleetError> {
        let mut fleet = self.fleet.write().await;

        let vehicle = fleet
            .vehicles
            .get_mut(&vehicle_id)
            .ok_or(FleetError::VehicleNotFound)?;

        vehicle.out_of_station = out_of_station;

        Ok(vehicle.clone())
    }

    /// Opens a trip for a assigned and idle vehicle
    pub async fn start_trip(&self, vehicle_id: Uuid) -> Result<Trip, FleetError> {
        let mut fleet = self.fleet.write().await;

        let vehicle = fleet
            .vehicles
            .get(&vehicle_id)
            .ok_or(FleetError::VehicleNotFound)?;

        let driver_id = vehicle.assigned_driver.ok_or(FleetError::NoAssignment)?;

        if fleet.active_trips.contains_key(&vehicle_id) {
            return Err(FleetError::TripAlreadyActive);
        }

        let trip = Trip {
            id: Uuid::new_v4(),
            vehicle_id,
            driver_id,
            start_time: Utc::now(),
            end_time: None,
            last_known_position: None,
        };

        fleet.active_trips.insert(vehicle_id, trip.id);
        fleet.trips.insert(trip.id, trip.clone());

        Ok(trip)
    }

    /// Closes a open trip, ending a already closed trip is a error rather
    /// than a silent no-op so clients can detect double submissions
    pub async fn end_trip(&self, trip_id: Uuid) -> Result<Trip, FleetError> {
        let mut fleet = self.fleet.write().await;

        let trip = fleet.trips.get(&trip_id).ok_or(FleetError::TripNotFound)?;

        if !trip.is_active() {
            return Err(FleetError::TripNotActive);
        }

        let vehicle_id = trip.vehicle_id;

        fleet
            .close_open_trip(vehicle_id)
            .ok_or(FleetError::TripNotActive)
    }

    pub async fn active_trip(&self, vehicle_id: Uuid) -> Option<Trip> {
        let fleet = self.fleet.read().await;

        let trip_id = fleet.active_trips.get(&vehicle_id)?;
        fleet.trips.get(trip_id).cloned()
    }

    /// Records a GPS fix for a vehicle.
    ///
    /// the position only sticks when the vehicle has a open trip, a ping
    /// from a idle vehicle is accepted and discarded so stale devices can
    /// never raise offences or move rider facing markers
    pub async fn record_position(
        &self,
        vehicle_id: Uuid,
        position: Position,
    ) -> Result<PositionAttribution, FleetError> {
        let mut fleet = self.fleet.write().await;

        if !fleet.vehicles.contains_key(&vehicle_id) {
            return Err(FleetError::VehicleNotFound);
        }

        let active_trip_id = match fleet.active_trips.get(&vehicle_id) {
            Some(trip_id) => *trip_id,
            None => return Ok(PositionAttribution::Unattributed),
        };

        fleet.last_positions.insert(vehicle_id, position);

        let trip = fleet
            .trips
            .get_mut(&active_trip_id)
            .ok_or(FleetError::TripNotFound)?;

        trip.last_known_position = Some(position);

        Ok(PositionAttribution::Trip(trip.clone()))
    }

    /// Records a GPS fix for a ambulance engaged on a booking, which
    /// reports positions without a open trip
    pub async fn record_engaged_position(
        &self,
        vehicle_id: Uuid,
        position: Position,
    ) -> Result<(), FleetError> {
        let mut fleet = self.fleet.write().await;

        if !fleet.vehicles.contains_key(&vehicle_id) {
            return Err(FleetError::VehicleNotFound);
        }

        fleet.last_positions.insert(vehicle_id, position);

        Ok(())
    }

    pub async fn last_known_position(&self, vehicle_id: Uuid) -> Option<Position> {
        self.fleet
            .read()
            .await
            .last_positions
            .get(&vehicle_id)
            .copied()
    }

    /// buses currently on a open trip with their driver and trip, out of
    /// station vehicles are excluded, this is the rider facing map feed
    pub async fn active_buses(&self) -> Vec<(Vehicle, Driver, Trip)> {
        let fleet = self.fleet.read().await;

        fleet
            .active_trips
            .values()
            .filter_map(|trip_id| {
                let trip = fleet.trips.get(trip_id)?;
                let vehicle = fleet.vehicles.get(&trip.vehicle_id)?;

                if vehicle.kind != VehicleKind::Bus || vehicle.out_of_station {
                    return None;
                }

                let driver = fleet.drivers.get(&trip.driver_id)?;

                Some((vehicle.clone(), driver.clone(), trip.clone()))
            })
            .collect()
    }
}
