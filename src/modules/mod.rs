pub mod common;
pub mod dispatch;
pub mod rfid;
pub mod telemetry;
pub mod tracking;
pub mod trip;
pub mod user;
pub mod vehicle;
