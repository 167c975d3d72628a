use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Shared cancellation signal, polled by the matcher between BFS phases.
///
/// Clones observe the same flag, so one handle can be given to a watchdog
/// while the analysis holds another.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Raise the flag from a background thread once `timeout` has elapsed.
    pub fn cancel_after(&self, timeout: Duration) {
        let flag = self.clone();
        thread::spawn(move || {
            thread::sleep(timeout);
            flag.cancel();
        });
    }
}
