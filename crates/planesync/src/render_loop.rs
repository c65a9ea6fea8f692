use anyhow::Result;
use siteconfig::RenderSettings;

use crate::camera::PerspectiveCamera;
use crate::scene::{ImageEntry, SceneSync};
use crate::uniforms::SharedMaterial;

const STATS_INTERVAL_FRAMES: u64 = 600;

/// Everything a draw needs: every plane, drawn with the one shared material.
pub struct Frame<'a> {
    pub index: u64,
    pub camera: &'a PerspectiveCamera,
    pub entries: &'a [ImageEntry],
    pub material: &'a SharedMaterial,
}

/// Submits a frame to whatever renders the scene.
pub trait DrawTarget {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<()>;
}

/// Advances `uTime` by a fixed step per frame and issues one draw.
///
/// The step does not depend on wall-clock time, so shader animation speed
/// follows the display refresh rate.
#[derive(Debug, Clone)]
pub struct RenderLoop {
    time: f32,
    step: f32,
    frames: u64,
    failed_draws: u64,
}

impl RenderLoop {
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            time: 0.0,
            step: settings.time_step,
            frames: 0,
            failed_draws: 0,
        }
    }

    pub fn tick(
        &mut self,
        scene: &SceneSync,
        material: &mut SharedMaterial,
        target: &mut dyn DrawTarget,
    ) {
        self.time += self.step;
        material.set_time(self.time);

        let frame = Frame {
            index: self.frames,
            camera: scene.camera(),
            entries: scene.entries(),
            material,
        };
        if let Err(error) = target.draw(&frame) {
            self.failed_draws += 1;
            let error = format!("{error:#}");
            tracing::warn!(
                frame = self.frames,
                error = %error,
                "draw failed; continuing with next frame"
            );
        }
        self.frames += 1;

        if self.frames % STATS_INTERVAL_FRAMES == 0 {
            tracing::debug!(
                frames = self.frames,
                time = self.time,
                failed_draws = self.failed_draws,
                "render stats"
            );
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn failed_draws(&self) -> u64 {
        self.failed_draws
    }
}
