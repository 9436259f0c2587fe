//! Bounded-concurrency admission for worker fan-out.
//!
//! Two independent gates exist at runtime: one bounding simultaneous jam
//! runs, one bounding game tasks within a single jam run. They are never
//! combined into a global pool, so a jam with many games cannot starve
//! other jams.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::AppError;

/// A counting-semaphore admission gate.
///
/// A task blocks on [`admit`](Self::admit) until a slot frees; the returned
/// permit releases its slot when dropped, on every exit path.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    slots: Arc<Semaphore>,
    limit: usize,
}

impl AdmissionGate {
    /// Create a gate with the given slot count. A limit of zero would
    /// deadlock every caller, so it is clamped to one.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            slots: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Wait for a slot. The permit is owned so it can move into a spawned
    /// task and release on drop regardless of how the task exits.
    pub async fn admit(&self) -> Result<AdmissionPermit, AppError> {
        let permit = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AppError::Generic("admission gate closed".into()))?;
        Ok(AdmissionPermit { _permit: permit })
    }
}

/// An admitted slot. Dropping it releases the slot.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}
