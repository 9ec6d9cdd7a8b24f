//! Background sweep of expired tickets.
//!
//! Expiry is already enforced on every read. The reaper only keeps the
//! ticket map from growing with addresses that never come back.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::window::ValidationWindowManager;

/// Handle to a running reaper. Dropping it stops the task.
#[derive(Debug)]
pub struct ReaperHandle {
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Stop the reaper.
    pub fn stop(self) {
        // Drop aborts.
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for ReaperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Purge expired tickets from `manager` every `period`.
///
/// Must be called from within a tokio runtime.
pub fn spawn_reaper(manager: Arc<ValidationWindowManager>, period: Duration) -> ReaperHandle {
    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let purged = manager.purge_expired();
            if purged > 0 {
                debug!(purged, "reaped expired validation tickets");
            }
        }
    });

    ReaperHandle { task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowConfig;
    use star_registry_core::{Ed25519Verifier, ManualClock};

    #[tokio::test]
    async fn test_reaper_purges_expired_tickets() {
        let clock = ManualClock::new(1_000);
        let manager = Arc::new(ValidationWindowManager::new(
            WindowConfig::default(),
            Arc::new(clock.clone()),
            Arc::new(Ed25519Verifier),
        ));

        manager.request_ticket("stale").unwrap();
        clock.advance(301);
        assert_eq!(manager.pending_count(), 1);

        let handle = spawn_reaper(Arc::clone(&manager), Duration::from_millis(10));
        for _ in 0..100 {
            if manager.pending_count() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(manager.pending_count(), 0);
        assert!(handle.is_running());
        handle.stop();
    }

    #[tokio::test]
    async fn test_reaper_leaves_live_tickets() {
        let clock = ManualClock::new(1_000);
        let manager = Arc::new(ValidationWindowManager::new(
            WindowConfig::default(),
            Arc::new(clock.clone()),
            Arc::new(Ed25519Verifier),
        ));
        manager.request_ticket("live").unwrap();

        let _handle = spawn_reaper(Arc::clone(&manager), Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(manager.pending_count(), 1);
    }
}
