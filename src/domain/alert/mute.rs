//! The timed mute window.

/// Mute is a timed window, not a latch: it silences alerts for a fixed
/// duration and then lapses on its own. The state records only when the mute
/// began; expiry is evaluated lazily against the clock, so no timer task is
/// needed and the behavior is deterministic under test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MuteState {
    muted_at_ms: Option<i64>,
}

impl MuteState {
    /// Whether the window is still open at the given instant. The window is
    /// half-open: at exactly `window_ms` after muting, the mute has lapsed.
    pub fn is_muted(&self, now_ms: i64, window_ms: i64) -> bool {
        match self.muted_at_ms {
            Some(start) => now_ms.saturating_sub(start) < window_ms,
            None => false,
        }
    }

    pub fn mute(&mut self, now_ms: i64) {
        self.muted_at_ms = Some(now_ms);
    }

    /// Clears the mute. Returns `true` when the clear happened while the
    /// window was still open, which is what distinguishes an operator
    /// unmuting early (paused alerts resume) from the window lapsing on its
    /// own (paused alerts stay stopped).
    pub fn unmute(&mut self, now_ms: i64, window_ms: i64) -> bool {
        let within_window = self.is_muted(now_ms, window_ms);
        self.muted_at_ms = None;
        within_window
    }
}
