use crate::types::{Fields, Metric, Tags};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Sink for everything an input gathers.
///
/// Inputs call [`add_fields`](Accumulator::add_fields) once per record and
/// [`add_error`](Accumulator::add_error) for failures that should be reported
/// without aborting the rest of the gather. Implementations are shared across
/// the tasks of a concurrent gather, hence `Send + Sync` and `&self`.
pub trait Accumulator: Send + Sync {
    fn add_fields(&self, measurement: &str, fields: Fields, tags: Tags);

    fn add_error(&self, err: anyhow::Error);
}

/// An [`Accumulator`] that keeps everything in memory.
#[derive(Default)]
pub struct MemoryAccumulator {
    metrics: Mutex<Vec<Metric>>,
    errors: Mutex<Vec<String>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> Vec<Metric> {
        lock(&self.metrics).clone()
    }

    /// Error messages in the order they were reported.
    pub fn errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }

    pub fn take_metrics(&self) -> Vec<Metric> {
        std::mem::take(&mut *lock(&self.metrics))
    }

    /// All metrics recorded under `measurement`, in insertion order.
    pub fn measurement(&self, measurement: &str) -> Vec<Metric> {
        lock(&self.metrics)
            .iter()
            .filter(|m| m.measurement == measurement)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.metrics).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.metrics).is_empty()
    }
}

impl Accumulator for MemoryAccumulator {
    fn add_fields(&self, measurement: &str, fields: Fields, tags: Tags) {
        lock(&self.metrics).push(Metric::new(measurement, fields, tags));
    }

    fn add_error(&self, err: anyhow::Error) {
        lock(&self.errors).push(err.to_string());
    }
}
