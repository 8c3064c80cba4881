//! Presentation sequencer — simulated typing delays for NPC replies.
//!
//! DESIGN
//! ======
//! A reply is held back for `clamp(base + chars / speed, base, max)` before
//! it is shown, then for a fixed extra delay when it came from one of the
//! heavier backend paths (AI opinion, free-form chat). Time is injected via
//! the [`Pause`] trait so the policy is testable without a real clock.

#[cfg(test)]
#[path = "pacing_test.rs"]
mod pacing_test;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

pub const DEFAULT_TYPING_BASE_MS: u64 = 600;
pub const DEFAULT_TYPING_MAX_MS: u64 = 2000;
pub const DEFAULT_TYPING_CHARS_PER_SEC: u32 = 35;
pub const DEFAULT_OPINION_EXTRA_MS: u64 = 500;
pub const DEFAULT_FREEFORM_EXTRA_MS: u64 = 700;

// =============================================================================
// PAUSE
// =============================================================================

/// Source of fire-once delays.
#[async_trait::async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Production pause backed by the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

#[async_trait::async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

// =============================================================================
// POLICY
// =============================================================================

/// Which backend path produced a reply. Heavier paths get an extra delay
/// layered on top of the length-based one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyWeight {
    Standard,
    Opinion,
    Freeform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub base: Duration,
    pub max: Duration,
    pub chars_per_sec: u32,
    pub opinion_extra: Duration,
    pub freeform_extra: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(DEFAULT_TYPING_BASE_MS),
            max: Duration::from_millis(DEFAULT_TYPING_MAX_MS),
            chars_per_sec: DEFAULT_TYPING_CHARS_PER_SEC,
            opinion_extra: Duration::from_millis(DEFAULT_OPINION_EXTRA_MS),
            freeform_extra: Duration::from_millis(DEFAULT_FREEFORM_EXTRA_MS),
        }
    }
}

impl PacingPolicy {
    /// A policy that never delays anything.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            base: Duration::ZERO,
            max: Duration::ZERO,
            chars_per_sec: DEFAULT_TYPING_CHARS_PER_SEC,
            opinion_extra: Duration::ZERO,
            freeform_extra: Duration::ZERO,
        }
    }

    /// Length-based typing delay, bounded below by `base` and above by `max`.
    #[must_use]
    pub fn typing_delay(&self, chars: usize) -> Duration {
        let chars = u64::try_from(chars).unwrap_or(u64::MAX);
        let typed = Duration::from_millis(chars.saturating_mul(1000) / u64::from(self.chars_per_sec.max(1)));
        // min then max: a misconfigured ceiling below the floor yields the floor.
        self.base.saturating_add(typed).min(self.max).max(self.base)
    }

    #[must_use]
    pub fn extra_delay(&self, weight: ReplyWeight) -> Duration {
        match weight {
            ReplyWeight::Standard => Duration::ZERO,
            ReplyWeight::Opinion => self.opinion_extra,
            ReplyWeight::Freeform => self.freeform_extra,
        }
    }
}

// =============================================================================
// SEQUENCER
// =============================================================================

/// Paces replies according to a [`PacingPolicy`].
#[derive(Clone)]
pub struct Sequencer {
    policy: PacingPolicy,
    pause: Arc<dyn Pause>,
}

impl Sequencer {
    #[must_use]
    pub fn new(policy: PacingPolicy, pause: Arc<dyn Pause>) -> Self {
        Self { policy, pause }
    }

    #[must_use]
    pub fn policy(&self) -> &PacingPolicy {
        &self.policy
    }

    /// Shared handle to the underlying pause source.
    #[must_use]
    pub fn pause_source(&self) -> Arc<dyn Pause> {
        Arc::clone(&self.pause)
    }

    /// Wait out the typing delay for `reply`, then any extra delay for its
    /// weight. Returns the total time spent waiting.
    pub async fn pace(&self, reply: &str, weight: ReplyWeight) -> Duration {
        let typing = self.policy.typing_delay(reply.chars().count());
        let extra = self.policy.extra_delay(weight);
        debug!(typing_ms = typing.as_millis(), extra_ms = extra.as_millis(), ?weight, "pacing: reply");

        self.pause.pause(typing).await;
        if !extra.is_zero() {
            self.pause.pause(extra).await;
        }
        typing + extra
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::{Mutex, PoisonError};
    use std::time::Duration;

    use super::Pause;

    /// Pause that returns immediately and records every requested duration.
    #[derive(Default)]
    pub struct RecordingPause {
        pub calls: Mutex<Vec<Duration>>,
    }

    impl RecordingPause {
        pub fn calls(&self) -> Vec<Duration> {
            self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }
    }

    #[async_trait::async_trait]
    impl Pause for RecordingPause {
        async fn pause(&self, duration: Duration) {
            self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(duration);
        }
    }
}
