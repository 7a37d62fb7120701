//! Turns board events into playback commands.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::OrderNumber;
use crate::ports::{AudioOutput, AudioOutputError, Clock, PlaybackRequest, SoundSource, SoundStorage};

use super::mute::MuteState;
use super::settings::{SoundKind, SoundSettings};

const PLAY_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Mute status reported back to the display after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MuteSnapshot {
    pub muted: bool,
    /// Playback is blocked until the operator interacts with the display.
    pub needs_interaction: bool,
}

/// Orders currently overdue, together with whether their alarm loop is
/// audible. The loop can be down while orders remain overdue: muting pauses
/// it, and a mute window that lapses cancels it for those orders.
#[derive(Debug, Default)]
struct OverdueState {
    orders: BTreeSet<OrderNumber>,
    loop_running: bool,
}

/// Central alert policy.
///
/// All audible decisions go through here: whether a sound plays at all
/// (master switch, per-type switch, mute window), which file plays (custom
/// upload or bundled default), and the lifecycle of the looping overdue
/// alarm. New-order alerts are batched upstream, so one poll cycle produces
/// at most one new-order sound no matter how many orders arrived.
pub struct AlertDispatcher {
    output: Arc<dyn AudioOutput>,
    storage: Arc<dyn SoundStorage>,
    clock: Arc<dyn Clock>,
    mute_window_ms: i64,
    settings: RwLock<SoundSettings>,
    mute: Mutex<MuteState>,
    overdue: Mutex<OverdueState>,
    needs_interaction: AtomicBool,
}

impl AlertDispatcher {
    pub fn new(
        output: Arc<dyn AudioOutput>,
        storage: Arc<dyn SoundStorage>,
        clock: Arc<dyn Clock>,
        mute_window: Duration,
        settings: SoundSettings,
    ) -> Self {
        Self {
            output,
            storage,
            clock,
            mute_window_ms: mute_window.as_millis() as i64,
            settings: RwLock::new(settings.normalized()),
            mute: Mutex::new(MuteState::default()),
            overdue: Mutex::new(OverdueState::default()),
            needs_interaction: AtomicBool::new(false),
        }
    }

    pub async fn settings(&self) -> SoundSettings {
        self.settings.read().await.clone()
    }

    pub async fn apply_settings(&self, settings: SoundSettings) {
        *self.settings.write().await = settings.normalized();
    }

    pub async fn is_muted(&self) -> bool {
        self.mute
            .lock()
            .await
            .is_muted(self.clock.now_ms(), self.mute_window_ms)
    }

    pub fn needs_interaction(&self) -> bool {
        self.needs_interaction.load(Ordering::SeqCst)
    }

    /// One alert for a whole batch of newly arrived orders.
    pub async fn notify_new_orders(&self, count: usize) {
        if count == 0 || !self.should_play(SoundKind::NewOrder).await {
            return;
        }
        let request = self.request_for(SoundKind::NewOrder, false).await;
        self.play_with_retry(request).await;
    }

    /// One alert when an order crosses the 60% approaching threshold. Plays
    /// the new-order sound, same as the original arrival announcement.
    pub async fn notify_approaching(&self) {
        if !self.should_play(SoundKind::NewOrder).await {
            return;
        }
        let request = self.request_for(SoundKind::NewOrder, false).await;
        self.play_with_retry(request).await;
    }

    /// One alert when an order crosses the near-finish threshold.
    pub async fn notify_near_finish(&self) {
        if !self.should_play(SoundKind::NearFinish).await {
            return;
        }
        let request = self.request_for(SoundKind::NearFinish, false).await;
        self.play_with_retry(request).await;
    }

    /// Marks an order overdue. When the alarm loop is not already running it
    /// starts, even inside a mute window: an overdue order must announce
    /// itself. Only the master switch keeps it silent.
    pub async fn order_overdue(&self, order: OrderNumber) {
        let enabled = self.sounds_enabled().await;
        let start = {
            let mut overdue = self.overdue.lock().await;
            overdue.orders.insert(order);
            if enabled && !overdue.loop_running {
                overdue.loop_running = true;
                true
            } else {
                false
            }
        };
        if start {
            let request = self.request_for(SoundKind::NearFinish, true).await;
            self.play_with_retry(request).await;
        }
    }

    /// Clears an order from the overdue set; stops the alarm once no
    /// overdue orders remain.
    pub async fn order_cleared(&self, order: OrderNumber) {
        let now_empty = {
            let mut overdue = self.overdue.lock().await;
            overdue.orders.remove(&order);
            if overdue.orders.is_empty() {
                overdue.loop_running = false;
                true
            } else {
                false
            }
        };
        if now_empty {
            self.output.stop().await;
        }
    }

    /// Flips the mute window.
    ///
    /// Muting pauses the overdue alarm. Unmuting while the window is still
    /// open resumes it; once the window has lapsed on its own, a paused
    /// alarm stays stopped until the next overdue event.
    pub async fn toggle_mute(&self) -> MuteSnapshot {
        let now_ms = self.clock.now_ms();
        let (muted, resume) = {
            let mut mute = self.mute.lock().await;
            if mute.is_muted(now_ms, self.mute_window_ms) {
                (false, mute.unmute(now_ms, self.mute_window_ms))
            } else {
                mute.mute(now_ms);
                (true, false)
            }
        };

        if muted {
            self.pause_loop().await;
        } else if resume && self.sounds_enabled().await && self.restart_loop().await {
            let request = self.request_for(SoundKind::NearFinish, true).await;
            self.play_with_retry(request).await;
        }

        MuteSnapshot {
            muted,
            needs_interaction: self.needs_interaction(),
        }
    }

    /// Called after the operator interacts with the display; lifts the
    /// playback block and restarts the alarm when orders are still overdue.
    pub async fn unlock_audio(&self) {
        self.needs_interaction.store(false, Ordering::SeqCst);
        if self.sounds_enabled().await && self.restart_loop().await {
            let request = self.request_for(SoundKind::NearFinish, true).await;
            self.play_with_retry(request).await;
        }
    }

    async fn should_play(&self, kind: SoundKind) -> bool {
        let allowed = {
            let settings = self.settings.read().await;
            settings.enabled && settings.kind_enabled(kind)
        };
        allowed && !self.is_muted().await
    }

    async fn sounds_enabled(&self) -> bool {
        self.settings.read().await.enabled
    }

    /// Stops playback and marks the loop paused, keeping the overdue set.
    async fn pause_loop(&self) {
        self.overdue.lock().await.loop_running = false;
        self.output.stop().await;
    }

    /// Marks the loop running again when overdue orders remain. Returns
    /// whether the caller should start playback.
    async fn restart_loop(&self) -> bool {
        let mut overdue = self.overdue.lock().await;
        if overdue.orders.is_empty() {
            return false;
        }
        overdue.loop_running = true;
        true
    }

    /// Resolves the slot to a custom upload when one exists, otherwise the
    /// bundled default. A storage error degrades to the default.
    async fn request_for(&self, kind: SoundKind, looping: bool) -> PlaybackRequest {
        let settings = self.settings.read().await;
        let source = match settings.custom_file(kind) {
            Some(name) => match self.storage.exists(name).await {
                Ok(true) => SoundSource::Custom(name.to_string()),
                Ok(false) => builtin(kind),
                Err(error) => {
                    tracing::warn!(%error, file = name, "custom sound unavailable, using default");
                    builtin(kind)
                }
            },
            None => builtin(kind),
        };
        PlaybackRequest {
            source,
            looping,
            volume: settings.volume,
        }
    }

    async fn play_with_retry(&self, request: PlaybackRequest) {
        let mut blocked = false;
        for attempt in 1..=PLAY_ATTEMPTS {
            match self.output.play(request.clone()).await {
                Ok(()) => return,
                Err(AudioOutputError::Blocked) => {
                    blocked = true;
                    tracing::debug!(attempt, "audio output blocked, retrying");
                }
                Err(AudioOutputError::Failed(reason)) => {
                    blocked = false;
                    tracing::warn!(attempt, %reason, "audio playback failed");
                }
            }
            if attempt < PLAY_ATTEMPTS {
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
        if blocked {
            // The display shows an "enable sound" prompt off this flag.
            self.needs_interaction.store(true, Ordering::SeqCst);
        }
    }
}

fn builtin(kind: SoundKind) -> SoundSource {
    match kind {
        SoundKind::NewOrder => SoundSource::BuiltinNewOrder,
        SoundKind::NearFinish => SoundSource::BuiltinNearFinish,
    }
}
