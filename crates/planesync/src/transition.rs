//! Crossfade sequencing between the shown image and a newly selected one.
//!
//! A request only schedules a tween. The state machine moves when the tween
//! driver reports events:
//!
//! ```text
//!   Idle ──request──▶ Pending ──Started──▶ Running ──Updated*──▶ Running
//!    ▲                                                   │
//!    └──────────────────────Completed (settle)───────────┘
//! ```
//!
//! On start the target becomes `end_index`, the previous `start_index` and
//! the target are pushed to the shared uniforms, and `start_index` is
//! committed to the target. On completion the timeline drops back to exactly
//! zero.
//!
//! A request arriving while another transition is pending or running replaces
//! it. A replaced transition that never reported its start leaves
//! `start_index` untouched, so the replacing tween fades from the image shown
//! before the replaced request.

use std::time::Duration;

use siteconfig::TransitionSettings;
use tween::{Timeline, TweenDriver, TweenEvent, TweenId, TweenSpec};

use crate::error::EngineError;
use crate::uniforms::SharedMaterial;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionState {
    pub start_index: usize,
    pub end_index: usize,
    pub timeline: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    /// Requested; the tween has not reported its start yet.
    Pending {
        target: usize,
        scroll: bool,
        tween: TweenId,
    },
    Running {
        target: usize,
        scroll: bool,
        tween: TweenId,
    },
}

/// What a tween event did to the transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionEvent {
    Started {
        start_index: usize,
        end_index: usize,
    },
    Progressed {
        timeline: f32,
        /// Image to scroll toward on this tick, for click-initiated transitions.
        scroll_target: Option<usize>,
    },
    Settled {
        index: usize,
    },
}

pub struct TransitionController<D: TweenDriver = Timeline> {
    state: TransitionState,
    phase: TransitionPhase,
    settings: TransitionSettings,
    len: usize,
    driver: D,
}

impl<D: TweenDriver> TransitionController<D> {
    /// Creates an idle controller over `len` images.
    pub fn new(len: usize, settings: TransitionSettings, driver: D) -> Result<Self, EngineError> {
        if len == 0 {
            return Err(EngineError::EmptyScene);
        }
        Ok(Self {
            state: TransitionState {
                start_index: 0,
                end_index: (len - 1).min(1),
                timeline: 0.0,
            },
            phase: TransitionPhase::Idle,
            settings,
            len,
            driver,
        })
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_animating(&self) -> bool {
        !matches!(self.phase, TransitionPhase::Idle)
    }

    pub fn request_transition(&mut self, target: usize) -> Result<TweenId, EngineError> {
        self.request(target, false)
    }

    /// Like [`request_transition`](Self::request_transition), and every
    /// progress tick also asks for a scroll toward the target image.
    pub fn request_transition_and_scroll(&mut self, target: usize) -> Result<TweenId, EngineError> {
        self.request(target, true)
    }

    fn request(&mut self, target: usize, scroll: bool) -> Result<TweenId, EngineError> {
        if target >= self.len {
            return Err(EngineError::IndexOutOfRange {
                index: target,
                len: self.len,
            });
        }

        let spec = TweenSpec::toward_end(self.state.timeline, &self.settings);
        let tween = self.driver.start(spec)?;
        if self.is_animating() {
            tracing::debug!(target, ?tween, "transition superseded by newer request");
        }
        self.phase = TransitionPhase::Pending {
            target,
            scroll,
            tween,
        };
        Ok(tween)
    }

    /// Advances the tween driver and applies its events to the state and the
    /// shared uniforms.
    pub fn advance(
        &mut self,
        elapsed: Duration,
        material: &mut SharedMaterial,
    ) -> Vec<TransitionEvent> {
        self.driver
            .advance(elapsed)
            .into_iter()
            .filter_map(|event| self.apply(event, material))
            .collect()
    }

    fn apply(&mut self, event: TweenEvent, material: &mut SharedMaterial) -> Option<TransitionEvent> {
        match (event, self.phase) {
            (
                TweenEvent::Started { id },
                TransitionPhase::Pending {
                    target,
                    scroll,
                    tween,
                },
            ) if id == tween => {
                let from = self.state.start_index;
                self.state.end_index = target;
                material.set_indices(from, target);
                self.state.start_index = target;
                self.phase = TransitionPhase::Running {
                    target,
                    scroll,
                    tween,
                };
                tracing::debug!(start = from, end = target, "transition started");
                Some(TransitionEvent::Started {
                    start_index: from,
                    end_index: target,
                })
            }
            (
                TweenEvent::Updated { id, value },
                TransitionPhase::Running {
                    target,
                    scroll,
                    tween,
                },
            ) if id == tween => {
                let clamped = value.clamp(0.0, self.settings.timeline_end);
                self.state.timeline = self.state.timeline.max(clamped);
                material.set_timeline(self.state.timeline);
                Some(TransitionEvent::Progressed {
                    timeline: self.state.timeline,
                    scroll_target: scroll.then_some(target),
                })
            }
            (TweenEvent::Completed { id, .. }, TransitionPhase::Running { tween, .. })
                if id == tween =>
            {
                self.state.timeline = 0.0;
                material.set_timeline(0.0);
                self.phase = TransitionPhase::Idle;
                tracing::debug!(index = self.state.start_index, "transition settled");
                Some(TransitionEvent::Settled {
                    index: self.state.start_index,
                })
            }
            (event, phase) => {
                tracing::trace!(?event, ?phase, "ignoring tween event for inactive transition");
                None
            }
        }
    }
}
