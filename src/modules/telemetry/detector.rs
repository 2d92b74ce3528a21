use crate::storage::{
    models::{Offence, OffenceKind, OffenceLocation, OffenceSubject, Position},
    offence::OffenceStore,
};
use chrono::{DateTime, Utc};
use std::{sync::Arc, time::Duration};
use tracing::{error, warn};
use uuid::Uuid;

/// how many times persisting a offence is attempted before giving up
const MAX_PERSIST_ATTEMPTS: u32 = 3;

/// pause between persist attempts
const PERSIST_RETRY_DELAY: Duration = Duration::from_millis(100);

/// a bus exceeding the campus limit during a trip, charged to the driver
/// on duty and the vehicle
pub fn bus_overspeed(
    driver_id: Uuid,
    vehicle_id: Uuid,
    position: Position,
    speed_limit: f64,
) -> Offence {
    Offence {
        id: Uuid::new_v4(),
        kind: OffenceKind::BusOverspeed,
        subject: OffenceSubject::Vehicle {
            driver_id,
            vehicle_id,
        },
        speed: position.speed,
        speed_limit,
        location: OffenceLocation::Point {
            lat: position.lat,
            lng: position.lng,
        },
        timestamp: position.timestamp,
        paid: false,
    }
}

/// a student vehicle exceeding the campus limit at a RFID gate
pub fn student_speed(
    student_id: Option<Uuid>,
    registration_id: &str,
    speed: f64,
    location_name: &str,
    timestamp: DateTime<Utc>,
    speed_limit: f64,
) -> Offence {
    Offence {
        id: Uuid::new_v4(),
        kind: OffenceKind::StudentSpeed,
        subject: OffenceSubject::Student {
            student_id,
            registration_id: String::from(registration_id),
        },
        speed,
        speed_limit,
        location: OffenceLocation::Place {
            name: String::from(location_name),
        },
        timestamp,
        paid: false,
    }
}

/// Queues a offence for persistence without making the caller wait.
///
/// ingestion endpoints must stay cheap and always available, so a failing
/// sink is retried on a background task and, once attempts run out, the
/// offence is dropped with a error log, the telemetry sender never sees
/// the failure
pub fn record(sink: Arc<dyn OffenceStore>, offence: Offence) {
    tokio::spawn(async move {
        persist_with_retries(sink, offence).await;
    });
}

/// retry loop behind [`record`], returns whether the offence was stored
pub async fn persist_with_retries(sink: Arc<dyn OffenceStore>, offence: Offence) -> bool {
    for attempt in 1..=MAX_PERSIST_ATTEMPTS {
        match sink.insert(offence.clone()) {
            Ok(()) => return true,
            Err(e) => {
                warn!(
                    "failed to persist offence {} (attempt {attempt}): {e}",
                    offence.id
                );

                if attempt < MAX_PERSIST_ATTEMPTS {
                    tokio::time::sleep(PERSIST_RETRY_DELAY).await;
                }
            }
        }
    }

    error!(
        "dropping offence {} after {} failed persist attempts",
        offence.id, MAX_PERSIST_ATTEMPTS
    );

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{error::StoreError, offence::MemoryOffenceStore};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// sink that fails the first `failures` inserts and then delegates
    /// to a in-memory store
    struct FlakySink {
        failures: u32,
        attempts: AtomicU32,
        inner: MemoryOffenceStore,
    }

    impl FlakySink {
        fn new(failures: u32) -> Self {
            FlakySink {
                failures,
                attempts: AtomicU32::new(0),
                inner: MemoryOffenceStore::default(),
            }
        }
    }

    impl OffenceStore for FlakySink {
        fn insert(&self, offence: Offence) -> Result<(), StoreError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

            if attempt <= self.failures {
                return Err(StoreError(String::from("simulated outage")));
            }

            self.inner.insert(offence)
        }

        fn all(&self) -> Vec<Offence> {
            self.inner.all()
        }
    }

    fn some_offence() -> Offence {
        bus_overspeed(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Position {
                lat: 20.2961,
                lng: 85.8245,
                speed: 52.0,
                timestamp: Utc::now(),
            },
            40.0,
        )
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_the_insert_lands() {
        let sink = Arc::new(FlakySink::new(2));

        let stored = persist_with_retries(sink.clone(), some_offence()).await;

        assert!(stored);
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 3);
        assert_eq!(sink.all().len(), 1);
    }

    #[tokio::test]
    async fn the_offence_is_dropped_once_attempts_run_out() {
        let sink = Arc::new(FlakySink::new(u32::MAX));

        let stored = persist_with_retries(sink.clone(), some_offence()).await;

        assert!(!stored);

        // bounded: gave up after exactly the configured attempts
        assert_eq!(sink.attempts.load(Ordering::SeqCst), MAX_PERSIST_ATTEMPTS);
        assert!(sink.all().is_empty());
    }
}
