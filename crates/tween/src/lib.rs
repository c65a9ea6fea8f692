//! Cooperative tween scheduling for the transition timeline.
//!
//! A [`TweenDriver`] advances one scalar from a start value toward a target
//! over a fixed duration and reports what happened during each advance as a
//! list of [`TweenEvent`]s. Callers apply those events themselves, so state
//! changes stay in the caller's own state machine instead of hiding inside
//! callbacks.
//!
//! [`Timeline`] is the single-slot driver: starting a tween while another is
//! active replaces it (last request wins) and the replaced tween emits no
//! further events.

use std::time::Duration;

pub use siteconfig::Easing;
use siteconfig::TransitionSettings;

#[derive(Debug, thiserror::Error)]
pub enum TweenError {
    #[error("tween endpoints must be finite (from={from}, to={to})")]
    NonFinite { from: f32, to: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u64);

/// Parameters for one tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    pub easing: Easing,
}

impl TweenSpec {
    /// Tween from `from` to the configured timeline end.
    pub fn toward_end(from: f32, settings: &TransitionSettings) -> Self {
        Self {
            from,
            to: settings.timeline_end,
            duration: settings.duration,
            easing: settings.easing,
        }
    }
}

/// Lifecycle notifications produced by [`TweenDriver::advance`], in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenEvent {
    Started { id: TweenId },
    Updated { id: TweenId, value: f32 },
    Completed { id: TweenId, value: f32 },
}

impl TweenEvent {
    pub fn id(&self) -> TweenId {
        match self {
            TweenEvent::Started { id }
            | TweenEvent::Updated { id, .. }
            | TweenEvent::Completed { id, .. } => *id,
        }
    }
}

pub trait TweenDriver {
    /// Schedules a tween, replacing any tween that is still active.
    fn start(&mut self, spec: TweenSpec) -> Result<TweenId, TweenError>;
    /// Moves the active tween forward and reports its lifecycle events.
    fn advance(&mut self, elapsed: Duration) -> Vec<TweenEvent>;
    fn is_active(&self) -> bool;
}

/// Eased fraction of the way from a tween's start value to its target.
/// `progress` is clamped to `0..=1`, so every curve ends exactly on the target.
pub fn eased_progress(easing: Easing, progress: f32) -> f32 {
    let t = progress.clamp(0.0, 1.0);
    match easing {
        Easing::Linear => t,
        Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
        Easing::EaseInOut if t < 0.5 => 2.0 * t * t,
        Easing::EaseInOut => 1.0 - (2.0 - 2.0 * t).powi(2) / 2.0,
        // Quadratic ease-out, the classic `power1.out`.
        Easing::Power1Out => 1.0 - (1.0 - t).powi(2),
    }
}

struct ActiveTween {
    id: TweenId,
    spec: TweenSpec,
    elapsed: Duration,
    started: bool,
}

impl ActiveTween {
    fn value_at(&self, progress: f32) -> f32 {
        let mix = eased_progress(self.spec.easing, progress);
        self.spec.from + (self.spec.to - self.spec.from) * mix
    }
}

#[derive(Default)]
pub struct Timeline {
    active: Option<ActiveTween>,
    next_id: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_id(&self) -> Option<TweenId> {
        self.active.as_ref().map(|tween| tween.id)
    }
}

impl TweenDriver for Timeline {
    fn start(&mut self, spec: TweenSpec) -> Result<TweenId, TweenError> {
        if !spec.from.is_finite() || !spec.to.is_finite() {
            return Err(TweenError::NonFinite {
                from: spec.from,
                to: spec.to,
            });
        }

        let id = TweenId(self.next_id);
        self.next_id += 1;
        if let Some(previous) = self.active.replace(ActiveTween {
            id,
            spec,
            elapsed: Duration::ZERO,
            started: false,
        }) {
            tracing::debug!(
                replaced = previous.id.0,
                by = id.0,
                "active tween overwritten by newer request"
            );
        }
        Ok(id)
    }

    fn advance(&mut self, elapsed: Duration) -> Vec<TweenEvent> {
        let Some(tween) = self.active.as_mut() else {
            return Vec::new();
        };

        let mut events = Vec::with_capacity(3);
        if !tween.started {
            tween.started = true;
            events.push(TweenEvent::Started { id: tween.id });
        }

        tween.elapsed = tween.elapsed.saturating_add(elapsed);
        let progress =
            tween.elapsed.as_secs_f32() / tween.spec.duration.as_secs_f32().max(f32::EPSILON);

        if progress >= 1.0 {
            let id = tween.id;
            let value = tween.spec.to;
            events.push(TweenEvent::Updated { id, value });
            events.push(TweenEvent::Completed { id, value });
            self.active = None;
        } else {
            events.push(TweenEvent::Updated {
                id: tween.id,
                value: tween.value_at(progress),
            });
        }
        events
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
