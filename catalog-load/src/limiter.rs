use crate::error::DriverError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds the number of requests dispatched but not yet completed.
///
/// Acquisition order is whatever the semaphore grants; only the count is guaranteed. The limiter
/// also tracks the current and peak in-flight counts so the bound can be observed after a run.
#[derive(Clone)]
pub struct CapacityLimiter {
    semaphore: Arc<Semaphore>,
    counts: Arc<InFlight>,
    capacity: usize,
}

#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl CapacityLimiter {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            counts: Arc::new(InFlight::default()),
            capacity,
        }
    }

    /// Wait for a free slot. The slot is released when the returned guard drops.
    pub async fn acquire(&self) -> Result<Slot, DriverError> {
        let permit = self.semaphore.clone().acquire_owned().await?;

        let current = self.counts.current.fetch_add(1, Ordering::AcqRel) + 1;
        self.counts.peak.fetch_max(current, Ordering::AcqRel);

        #[cfg(feature = "metrics")]
        metrics::gauge!(catalog_load_core::IN_FLIGHT_GAUGE).increment(1.);

        Ok(Slot {
            _permit: permit,
            counts: self.counts.clone(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_flight(&self) -> usize {
        self.counts.current.load(Ordering::Acquire)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.counts.peak.load(Ordering::Acquire)
    }
}

/// One occupied unit of capacity.
pub struct Slot {
    _permit: OwnedSemaphorePermit,
    counts: Arc<InFlight>,
}

impl Drop for Slot {
    fn drop(&mut self) {
        // NOTE: Decrement before the permit is returned so `current` never exceeds capacity.
        self.counts.current.fetch_sub(1, Ordering::AcqRel);

        #[cfg(feature = "metrics")]
        metrics::gauge!(catalog_load_core::IN_FLIGHT_GAUGE).decrement(1.);
    }
}
