use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::warn;

// Process-wide: every store instance shares the same counter and the
// single ctrl-c listener task.
static ACTIVE_SESSIONS: AtomicUsize = AtomicUsize::new(0);
static HANDLER_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Marks one ask session as active for the lifetime of the guard. While
/// any session is active, ctrl-c terminates the process immediately
/// (exit code 130) instead of leaving the terminal mid-prompt; with no
/// active session the signal is ignored.
pub struct InterruptGuard {
    _private: (),
}

/// Engages interrupt handling for one ask session. The ctrl-c listener
/// is installed once per process, on the first call from within a tokio
/// runtime; repeat calls only bump the session counter.
pub fn engage() -> InterruptGuard {
    ACTIVE_SESSIONS.fetch_add(1, Ordering::SeqCst);
    if !HANDLER_INSTALLED.swap(true, Ordering::SeqCst) {
        tokio::spawn(async {
            loop {
                if tokio::signal::ctrl_c().await.is_err() {
                    warn!("ctrl-c listener unavailable; interrupt handling disabled");
                    return;
                }
                if ACTIVE_SESSIONS.load(Ordering::SeqCst) > 0 {
                    std::process::exit(130);
                }
            }
        });
    }
    InterruptGuard { _private: () }
}

/// Number of ask sessions currently in flight.
pub fn active_sessions() -> usize {
    ACTIVE_SESSIONS.load(Ordering::SeqCst)
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        ACTIVE_SESSIONS.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn guard_tracks_active_sessions() {
        let before = active_sessions();
        let guard = engage();
        assert_eq!(active_sessions(), before + 1);
        let nested = engage();
        assert_eq!(active_sessions(), before + 2);
        drop(nested);
        drop(guard);
        assert_eq!(active_sessions(), before);
    }
}
