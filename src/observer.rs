//! Diagnostic observers for resolution events.
//!
//! Observers are notified synchronously around every activation: once before
//! the entry's lifecycle runs, and once with the elapsed time or the error
//! afterwards. When no observer is registered nothing is timed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::RegistrationKey;

/// Observer trait for resolution events.
///
/// Keep implementations cheap; they run on the resolving thread.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{ContainerBuilder, DiObserver, RegistrationKey, Resolver};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder { seen: Mutex<Vec<String>> }
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, key: &RegistrationKey) {
///         self.seen.lock().unwrap().push(key.to_string());
///     }
///     fn resolved(&self, _: &RegistrationKey, _: Duration) {}
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let mut builder = ContainerBuilder::new();
/// builder.register_instance::<u32>(Arc::new(7));
/// builder.add_observer(recorder.clone());
/// let container = builder.build();
///
/// container.resolve::<u32>().unwrap();
/// assert_eq!(recorder.seen.lock().unwrap().as_slice(), ["u32"]);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before the entry's lifecycle is asked for an instance.
    fn resolving(&self, key: &RegistrationKey);

    /// Called after a successful resolve.
    fn resolved(&self, key: &RegistrationKey, duration: Duration);

    /// Called when the resolve of `key` failed.
    fn failed(&self, key: &RegistrationKey, error: &DiError) {
        let _ = (key, error);
    }
}

#[derive(Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &RegistrationKey) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &RegistrationKey, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &RegistrationKey, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Resolutions are logged at `debug`, failures at `warn`, all under the
/// `ferrous_ioc::resolve` target.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{ContainerBuilder, TracingObserver};
/// use std::sync::Arc;
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_observer(Arc::new(TracingObserver::new()));
/// let _container = builder.build();
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl DiObserver for TracingObserver {
    fn resolving(&self, key: &RegistrationKey) {
        tracing::trace!(target: "ferrous_ioc::resolve", registration = %key, "resolving");
    }

    fn resolved(&self, key: &RegistrationKey, duration: Duration) {
        tracing::debug!(
            target: "ferrous_ioc::resolve",
            registration = %key,
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn failed(&self, key: &RegistrationKey, error: &DiError) {
        tracing::warn!(target: "ferrous_ioc::resolve", registration = %key, %error, "resolve failed");
    }
}

/// Counts resolutions, failures and total time.
///
/// Nested resolutions are counted individually, so one top-level resolve of a
/// type with two dependencies counts three times.
#[derive(Debug, Default)]
pub struct MetricsObserver {
    resolution_count: AtomicU64,
    total_resolution_time: AtomicU64,
    failure_count: AtomicU64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolution_count(&self) -> u64 {
        self.resolution_count.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn total_resolution_time(&self) -> Duration {
        Duration::from_nanos(self.total_resolution_time.load(Ordering::Relaxed))
    }

    /// Mean time per successful resolve.
    pub fn average_resolution_time(&self) -> Option<Duration> {
        let count = self.resolution_count();
        if count == 0 {
            return None;
        }
        Some(Duration::from_nanos(
            self.total_resolution_time.load(Ordering::Relaxed) / count,
        ))
    }

    pub fn reset(&self) {
        self.resolution_count.store(0, Ordering::Relaxed);
        self.total_resolution_time.store(0, Ordering::Relaxed);
        self.failure_count.store(0, Ordering::Relaxed);
    }
}

impl DiObserver for MetricsObserver {
    fn resolving(&self, _key: &RegistrationKey) {}

    fn resolved(&self, _key: &RegistrationKey, duration: Duration) {
        self.resolution_count.fetch_add(1, Ordering::Relaxed);
        self.total_resolution_time
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    fn failed(&self, _key: &RegistrationKey, _error: &DiError) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }
}
