//! Lock-protected dashboard for multi-threaded hosts
//!
//! MQTT callbacks and the refresh timer often run on different threads. Both
//! go through one `Mutex`, so a refresh never sees a half-applied sample.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror_no_std::Error;

use crate::dashboard::{Dashboard, RefreshFrame};
use crate::errors::ObserveError;
use crate::season::MonthDay;
use crate::sensors::SensorIndex;
use crate::stale::{SampleValue, SensorState, StaleStatus};
use crate::time::Timestamp;

/// Errors from the shared wrapper
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SharedError {
    /// A thread panicked while holding the lock
    #[error("Dashboard lock poisoned")]
    LockPoisoned,

    /// Sample rejected
    #[error(transparent)]
    Observe(#[from] ObserveError),
}

/// Cloneable handle to a dashboard behind a mutex
#[derive(Debug, Clone)]
pub struct SharedDashboard {
    inner: Arc<Mutex<Dashboard>>,
}

impl SharedDashboard {
    /// Wrap a dashboard
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dashboard)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Dashboard>, SharedError> {
        self.inner.lock().map_err(|_| SharedError::LockPoisoned)
    }

    /// Ingest one sample
    pub fn observe(
        &self,
        sensor: SensorIndex,
        value: impl Into<SampleValue>,
        now: Timestamp,
    ) -> Result<StaleStatus, SharedError> {
        Ok(self.lock()?.observe(sensor, value, now)?)
    }

    /// Build the frame for a refresh tick
    pub fn refresh(&self, today: MonthDay, now: Timestamp) -> Result<RefreshFrame, SharedError> {
        Ok(self.lock()?.refresh(today, now))
    }

    /// Consistent copy of one sensor's state
    pub fn snapshot(&self, sensor: SensorIndex) -> Result<Option<SensorState>, SharedError> {
        Ok(self.lock()?.snapshot(sensor))
    }

    /// Run `f` with exclusive access
    pub fn with<R>(&self, f: impl FnOnce(&mut Dashboard) -> R) -> Result<R, SharedError> {
        Ok(f(&mut *self.lock()?))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::config::DashboardConfig;

    #[test]
    fn ingest_and_refresh_from_different_threads() {
        let shared = SharedDashboard::new(Dashboard::new(DashboardConfig::default()).unwrap());

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..100u32 {
                    shared
                        .observe(SensorIndex::OutdoorTemp, i as f32 * 0.1, u64::from(i) * 1000)
                        .unwrap();
                }
            })
        };

        for _ in 0..10 {
            let frame = shared.refresh(MonthDay::new(6, 1).unwrap(), 50_000).unwrap();
            assert_eq!(frame.gauges.len(), 13);
        }
        writer.join().unwrap();

        let state = shared.snapshot(SensorIndex::OutdoorTemp).unwrap().unwrap();
        assert_eq!(state.last_seen, 99_000);
    }

    #[test]
    fn rejected_sample_surfaces() {
        let shared = SharedDashboard::new(Dashboard::new(DashboardConfig::default()).unwrap());
        assert_eq!(
            shared.observe(SensorIndex::PicoCo2, f32::INFINITY, 0),
            Err(SharedError::Observe(ObserveError::NonFinite {
                sensor: SensorIndex::PicoCo2
            }))
        );
        assert_eq!(shared.with(|d| d.config().seasonal_gauges), Ok(false));
    }
}
