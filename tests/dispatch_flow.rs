//! End to end run of the emergency dispatch workflow: booking, the
//! acceptance race between two drivers, the OTP gate and completion.

use campus_fleet_api::{
    modules::dispatch::service::DispatchService,
    storage::{
        error::{DispatchError, FleetError},
        models::{BookingStatus, LatLng, VehicleKind},
        FleetStore,
    },
};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use std::sync::Arc;
use uuid::Uuid;

fn dispatch_over(store: &Arc<FleetStore>) -> DispatchService {
    DispatchService::new(store.clone(), ChaCha8Rng::seed_from_u64(42))
}

/// a driver on duty with its own ambulance
async fn on_duty_ambulance_driver(store: &FleetStore, name: &str, number: &str) -> Uuid {
    let ambulance = store
        .create_vehicle(number, &format!("imei-{number}"), VehicleKind::Ambulance)
        .await
        .unwrap();
    let driver = store.create_driver(name, VehicleKind::Ambulance).await;

    store.assign(driver.id, ambulance.id).await.unwrap();

    driver.id
}

fn rider_location() -> LatLng {
    LatLng {
        lat: 20.2961,
        lng: 85.8245,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn the_whole_dispatch_workflow() {
    let store = Arc::new(FleetStore::in_memory());
    let dispatch = dispatch_over(&store);

    let driver_a = on_duty_ambulance_driver(&store, "Asha", "CA-01").await;
    let driver_b = on_duty_ambulance_driver(&store, "Binod", "CA-02").await;

    let booking = dispatch
        .create_booking("2101010101", "9437000001", "1", None, rider_location())
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.otp, None);
    assert_eq!(booking.eta_minutes, None);

    // both drivers race for the booking at the same time
    let (result_a, result_b) = tokio::join!(
        {
            let dispatch = dispatch.clone();
            let id = booking.id;
            tokio::spawn(async move { dispatch.accept(id, driver_a).await })
        },
        {
            let dispatch = dispatch.clone();
            let id = booking.id;
            tokio::spawn(async move { dispatch.accept(id, driver_b).await })
        },
    );

    let results = [result_a.unwrap(), result_b.unwrap()];

    let winners: Vec<_> = results.iter().filter(|r| r.is_ok()).collect();
    let losers: Vec<_> = results.iter().filter(|r| r.is_err()).collect();

    assert_eq!(winners.len(), 1);
    assert_eq!(losers.len(), 1);
    assert_eq!(losers[0], &Err(DispatchError::AlreadyAccepted));

    let accepted = winners[0].as_ref().unwrap().clone();
    let winner_id = accepted.driver_id.unwrap();
    let loser_id = if winner_id == driver_a { driver_b } else { driver_a };

    assert_eq!(accepted.status, BookingStatus::Accepted);
    assert!(accepted.vehicle_id.is_some());

    let otp = accepted.otp.clone().unwrap();
    assert_eq!(otp.len(), 6);
    assert!(otp.chars().all(|c| c.is_ascii_digit()));

    // wrong code: the booking stays accepted and can be retried
    assert_eq!(
        dispatch.verify_otp(booking.id, "000000").await,
        Err(DispatchError::InvalidOtp)
    );
    assert_eq!(
        store.booking(booking.id).await.unwrap().status,
        BookingStatus::Accepted
    );

    // only the bound driver may run the ride
    let in_progress = dispatch.verify_otp(booking.id, &otp).await.unwrap();
    assert_eq!(in_progress.status, BookingStatus::InProgress);

    assert_eq!(
        dispatch.complete(booking.id, loser_id).await,
        Err(DispatchError::NotBookingDriver)
    );

    let completed = dispatch.complete(booking.id, winner_id).await.unwrap();
    assert_eq!(completed.status, BookingStatus::Completed);

    // completed is terminal, no transition leaves it
    assert_eq!(
        dispatch.abort(booking.id, winner_id).await,
        Err(DispatchError::NotAccepted)
    );
    assert_eq!(
        dispatch.accept(booking.id, loser_id).await,
        Err(DispatchError::AlreadyAccepted)
    );

    // the record survives as immutable history
    let record = store.booking(booking.id).await.unwrap();
    assert_eq!(record.status, BookingStatus::Completed);
    assert_eq!(record.driver_id, Some(winner_id));
}

#[tokio::test]
async fn aborted_bookings_die_instead_of_returning_to_the_pool() {
    let store = Arc::new(FleetStore::in_memory());
    let dispatch = dispatch_over(&store);

    let driver_a = on_duty_ambulance_driver(&store, "Asha", "CA-01").await;
    let driver_b = on_duty_ambulance_driver(&store, "Binod", "CA-02").await;

    let booking = dispatch
        .create_booking("2101010101", "9437000001", "2", None, rider_location())
        .await
        .unwrap();

    dispatch.accept(booking.id, driver_a).await.unwrap();

    let cancelled = dispatch.abort(booking.id, driver_a).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    // the booking is not offered again to anyone
    assert!(dispatch.list_pending().await.is_empty());
    assert_eq!(
        dispatch.accept(booking.id, driver_b).await,
        Err(DispatchError::AlreadyAccepted)
    );
}

#[tokio::test]
async fn duty_cycle_frees_the_vehicle_for_the_next_driver() {
    let store = FleetStore::in_memory();

    let bus = store
        .create_vehicle("CB-01", "imei-bus", VehicleKind::Bus)
        .await
        .unwrap();
    let first = store.create_driver("Ravi", VehicleKind::Bus).await;
    let second = store.create_driver("Hari", VehicleKind::Bus).await;

    store.assign(first.id, bus.id).await.unwrap();
    store.start_trip(bus.id).await.unwrap();

    // going off duty force closes the trip and frees the vehicle
    let closed = store.release(first.id, bus.id).await.unwrap();
    assert!(closed.unwrap().end_time.is_some());

    store.assign(second.id, bus.id).await.unwrap();
    let trip = store.start_trip(bus.id).await.unwrap();
    assert_eq!(trip.driver_id, second.id);

    // and the stale pair can no longer release it
    assert_eq!(
        store.release(first.id, bus.id).await,
        Err(FleetError::NotAssigned)
    );
}
