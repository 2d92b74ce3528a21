use crate::storage::{models::VehicleKind, FleetStore};
use anyhow::Result;
use tracing::info;

/// Seeds a small demo fleet so a development instance is usable right
/// after boot: two buses, a ambulance, drivers for them, one student
/// and a RFID gate.
///
/// only meant for development mode, the store always starts empty so
/// idempotency is not a concern
pub async fn seed_demo_fleet(store: &FleetStore) -> Result<()> {
    let bus_a = store
        .create_vehicle("CB-01", "350000000000001", VehicleKind::Bus)
        .await?;
    let bus_b = store
        .create_vehicle("CB-02", "350000000000002", VehicleKind::Bus)
        .await?;
    let ambulance = store
        .create_vehicle("CA-01", "350000000000003", VehicleKind::Ambulance)
        .await?;

    let bus_driver = store.create_driver("Ravi Pradhan", VehicleKind::Bus).await;
    store.create_driver("Hari Sahu", VehicleKind::Bus).await;
    let ambulance_driver = store
        .create_driver("Asha Mohanty", VehicleKind::Ambulance)
        .await;

    store.assign(bus_driver.id, bus_a.id).await?;
    store.assign(ambulance_driver.id, ambulance.id).await?;

    store
        .create_student("Mira Das", "2101010101", "9437000001")
        .await?;

    store.register_device("gate-01", "MAIN GATE").await?;

    info!(
        "[SEED] demo fleet created: buses {} and {}, ambulance {}",
        bus_a.number, bus_b.number, ambulance.number
    );

    Ok(())
}
