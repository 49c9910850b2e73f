// ABOUTME: Source of the server's current sync parameters
// ABOUTME: Thread-safe shared holder that hands out consistent snapshots

use crate::protocol::messages::SyncParameters;
use parking_lot::RwLock;
use std::sync::Arc;

/// Provides the sync parameters currently in force
///
/// Called once per accepted connection. Implementations must return a
/// complete value even while another thread is updating it.
pub trait SyncInfoSource: Send + Sync + 'static {
    /// Current sync parameters
    fn snapshot(&self) -> SyncParameters;
}

impl<F> SyncInfoSource for F
where
    F: Fn() -> SyncParameters + Send + Sync + 'static,
{
    fn snapshot(&self) -> SyncParameters {
        self()
    }
}

/// Shared, updatable sync parameters
///
/// Clones share the same value, so the owner can keep one handle for updates
/// and give another to the server.
#[derive(Debug, Clone)]
pub struct SharedSyncParameters {
    inner: Arc<RwLock<SyncParameters>>,
}

impl SharedSyncParameters {
    /// Create a shared holder with an initial value
    pub fn new(params: SyncParameters) -> Self {
        Self {
            inner: Arc::new(RwLock::new(params)),
        }
    }

    /// Replace the current value
    pub fn set(&self, params: SyncParameters) {
        *self.inner.write() = params;
    }

    /// Modify the current value in place
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut SyncParameters),
    {
        f(&mut *self.inner.write());
    }
}

impl SyncInfoSource for SharedSyncParameters {
    fn snapshot(&self) -> SyncParameters {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::ClockType;
    use std::thread;

    #[test]
    fn test_clones_share_value() {
        let shared = SharedSyncParameters::new(SyncParameters::new(ClockType::Net, 1));
        let handle = shared.clone();

        handle.update(|p| {
            p.paused = true;
            p.last_pause_time = 77;
        });

        let snap = shared.snapshot();
        assert!(snap.paused);
        assert_eq!(snap.last_pause_time, 77);
    }

    #[test]
    fn test_closure_source() {
        let source = || SyncParameters::new(ClockType::Ptp, 9);
        assert_eq!(source.snapshot().base_time, 9);
    }

    #[test]
    fn test_snapshots_never_torn() {
        let shared = SharedSyncParameters::new(SyncParameters::new(ClockType::Net, 0));

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..1_000u64 {
                    shared.update(|p| {
                        p.base_time = i;
                        p.base_time_offset = i;
                    });
                }
            })
        };

        for _ in 0..1_000 {
            let snap = shared.snapshot();
            assert_eq!(snap.base_time, snap.base_time_offset);
        }

        writer.join().unwrap();
    }
}
