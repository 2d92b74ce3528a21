use super::{error::StoreError, models::Offence};
use std::sync::RwLock;

/// Sink for offence records created by the violation detector.
///
/// behind a trait so the detector does not care where offences end up and
/// tests can inject a failing sink to exercise the retry path, inserts are
/// synchronous and must return fast, retrying is the caller's problem
pub trait OffenceStore: Send + Sync {
    fn insert(&self, offence: Offence) -> Result<(), StoreError>;

    fn all(&self) -> Vec<Offence>;
}

/// `OffenceStore` over a plain in-memory vector
#[derive(Default)]
pub struct MemoryOffenceStore {
    records: RwLock<Vec<Offence>>,
}

impl OffenceStore for MemoryOffenceStore {
    fn insert(&self, offence: Offence) -> Result<(), StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError(String::from("offence store lock poisoned")))?
            .push(offence);

        Ok(())
    }

    fn all(&self) -> Vec<Offence> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}
