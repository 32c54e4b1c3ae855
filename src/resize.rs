//! SIGWINCH watcher
//!
//! Resize notifications are delivered on a dedicated signal-hook thread,
//! never inside the signal handler itself, so the callback is free to
//! take locks and write to the terminal.

use signal_hook::consts::signal::SIGWINCH;
use signal_hook::iterator::{Handle, Signals};
use std::io;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Runs a callback for every window-size change until stopped.
pub struct ResizeWatcher {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl ResizeWatcher {
    /// Register for SIGWINCH and start delivering to `on_resize`.
    pub fn start<F>(mut on_resize: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let mut signals = Signals::new([SIGWINCH])?;
        let handle = signals.handle();

        let thread = thread::Builder::new()
            .name("kickstart-resize".into())
            .spawn(move || {
                for _ in signals.forever() {
                    debug!("SIGWINCH received");
                    on_resize();
                }
            })?;

        debug!("Resize watcher started");
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Unregister and wait for the delivery thread to finish.
    ///
    /// Must not be called while holding a lock the callback takes.
    pub fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        self.handle.close();
        if thread.join().is_err() {
            warn!("Resize watcher thread panicked");
        }
        debug!("Resize watcher stopped");
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    fn wait_for(counter: &AtomicUsize, timeout: Duration) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if counter.load(Ordering::SeqCst) > 0 {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_watcher_delivers_sigwinch() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut watcher = ResizeWatcher::start(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        assert!(watcher.is_running());

        signal_hook::low_level::raise(SIGWINCH).unwrap();
        assert!(wait_for(&count, Duration::from_secs(2)));

        watcher.stop();
        assert!(!watcher.is_running());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut watcher = ResizeWatcher::start(|| {}).unwrap();
        watcher.stop();
        watcher.stop();
        assert!(!watcher.is_running());
    }
}
