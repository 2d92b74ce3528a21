pub mod bookings;
pub mod error;
pub mod fleet;
pub mod models;
pub mod offence;

use self::error::FleetError;
use self::models::{Booking, Driver, Position, RfidDevice, Student, Trip, Vehicle};
use self::offence::{MemoryOffenceStore, OffenceStore};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// The shared in-memory state behind the whole coordination engine.
///
/// collections that must change together live under the same lock:
/// vehicles, drivers and trips form one "fleet" table so that driver
/// bindings and trip sessions always mutate in a single critical section,
/// while bookings, students and RFID readers get their own locks so
/// telemetry ingestion and dispatch never wait on each other.
///
/// offences go through the injected [`OffenceStore`] sink, see
/// `modules::telemetry::detector` for the retry policy around it
pub struct FleetStore {
    fleet: RwLock<FleetState>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
    students: RwLock<HashMap<Uuid, Student>>,
    devices: RwLock<HashMap<String, RfidDevice>>,
    offences: Arc<dyn OffenceStore>,
}

/// Vehicles, drivers and trips plus the indexes between them
#[derive(Default)]
struct FleetState {
    vehicles: HashMap<Uuid, Vehicle>,
    drivers: HashMap<Uuid, Driver>,

    /// GPS device id -> vehicle id
    device_index: HashMap<String, Uuid>,

    trips: HashMap<Uuid, Trip>,

    /// vehicle id -> its open trip, keying by vehicle id is what enforces
    /// the at most one open trip per vehicle invariant
    active_trips: HashMap<Uuid, Uuid>,

    /// latest attributed position per vehicle
    last_positions: HashMap<Uuid, Position>,
}

impl FleetStore {
    pub fn new(offences: Arc<dyn OffenceStore>) -> Self {
        FleetStore {
            fleet: RwLock::new(FleetState::default()),
            bookings: RwLock::new(HashMap::new()),
            students: RwLock::new(HashMap::new()),
            devices: RwLock::new(HashMap::new()),
            offences,
        }
    }

    /// Creates a store with a plain in-memory offence sink
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryOffenceStore::default()))
    }

    pub fn offences(&self) -> Arc<dyn OffenceStore> {
        self.offences.clone()
    }

    pub async fn create_student(
        &self,
        name: &str,
        registration_id: &str,
        phone: &str,
    ) -> Result<Student, FleetError> {
        let mut students = self.students.write().await;

        let registration_taken = students
            .values()
            .any(|s| s.registration_id == registration_id);

        if registration_taken {
            return Err(FleetError::RegistrationIdInUse);
        }

        let student = Student {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            name: String::from(name),
            registration_id: String::from(registration_id),
            phone: String::from(phone),
        };

        students.insert(student.id, student.clone());

        Ok(student)
    }

    pub async fn student_by_registration(&self, registration_id: &str) -> Option<Student> {
        self.students
            .read()
            .await
            .values()
            .find(|s| s.registration_id == registration_id)
            .cloned()
    }

    pub async fn register_device(
        &self,
        rfid_id: &str,
        location_name: &str,
    ) -> Result<RfidDevice, FleetError> {
        let mut devices = self.devices.write().await;

        if devices.contains_key(rfid_id) {
            return Err(FleetError::RfidIdInUse);
        }

        let device = RfidDevice {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            rfid_id: String::from(rfid_id),
            location_name: String::from(location_name),
        };

        devices.insert(device.rfid_id.clone(), device.clone());

        Ok(device)
    }

    pub async fn device(&self, rfid_id: &str) -> Option<RfidDevice> {
        self.devices.read().await.get(rfid_id).cloned()
    }
}
