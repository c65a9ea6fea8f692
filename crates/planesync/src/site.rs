use std::time::Duration;

use siteconfig::SiteConfig;
use tween::{Timeline, TweenDriver, TweenId};

use crate::error::EngineError;
use crate::interaction::{Interaction, InteractionMapper, PointerEvent, Trigger};
use crate::page::Page;
use crate::render_loop::{DrawTarget, RenderLoop};
use crate::scene::{SceneSync, SyncReport};
use crate::textures::{TextureArrayRegistry, TextureLoader};
use crate::transition::{TransitionController, TransitionEvent, TransitionState};
use crate::types::{ElementId, ImageSource};
use crate::uniforms::SharedMaterial;

/// What happened during one [`Site::frame`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub events: Vec<TransitionEvent>,
    /// Document offsets passed to `Page::smooth_scroll_to`, in order.
    pub scrolls: Vec<f32>,
}

/// Owns the planes, the shared material, the transition controller and the
/// render loop, and runs them on the caller's event loop.
pub struct Site<D: TweenDriver = Timeline> {
    scene: SceneSync,
    material: SharedMaterial,
    transitions: TransitionController<D>,
    interactions: InteractionMapper,
    render_loop: RenderLoop,
}

impl Site<Timeline> {
    pub fn new(
        config: &SiteConfig,
        page: &dyn Page,
        images: &[ImageSource],
        links: &[ElementId],
        loader: &mut dyn TextureLoader,
    ) -> Result<Self, EngineError> {
        Self::with_driver(config, page, images, links, loader, Timeline::new())
    }
}

impl<D: TweenDriver> Site<D> {
    pub fn with_driver(
        config: &SiteConfig,
        page: &dyn Page,
        images: &[ImageSource],
        links: &[ElementId],
        loader: &mut dyn TextureLoader,
        driver: D,
    ) -> Result<Self, EngineError> {
        if images.is_empty() {
            return Err(EngineError::EmptyScene);
        }

        let textures =
            TextureArrayRegistry::load(images.iter().map(|image| image.src.as_str()), loader);
        let elements: Vec<ElementId> = images.iter().map(|image| image.element).collect();
        let scene = SceneSync::build(page, &elements, &config.camera);
        let transitions = TransitionController::new(scene.len(), config.transition, driver)?;
        let state = *transitions.state();
        let material = SharedMaterial::new(textures, state.start_index, state.end_index);
        let interactions = InteractionMapper::new(links, scene.len());

        tracing::info!(
            images = scene.len(),
            links = interactions.len(),
            placeholders = material.texture_array().placeholder_count(),
            "site initialised"
        );

        Ok(Self {
            scene,
            material,
            transitions,
            interactions,
            render_loop: RenderLoop::new(&config.render),
        })
    }

    pub fn scene(&self) -> &SceneSync {
        &self.scene
    }

    pub fn material(&self) -> &SharedMaterial {
        &self.material
    }

    pub fn transition_state(&self) -> &TransitionState {
        self.transitions.state()
    }

    pub fn transitions(&self) -> &TransitionController<D> {
        &self.transitions
    }

    pub fn interactions(&self) -> &InteractionMapper {
        &self.interactions
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    pub fn resize(&mut self, page: &dyn Page) -> Option<SyncReport> {
        self.scene.resize(page)
    }

    pub fn request_transition(&mut self, target: usize) -> Result<TweenId, EngineError> {
        self.transitions.request_transition(target)
    }

    pub fn request_transition_and_scroll(&mut self, target: usize) -> Result<TweenId, EngineError> {
        self.transitions.request_transition_and_scroll(target)
    }

    /// Routes a link hover or click to the matching transition request.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<Interaction, EngineError> {
        let interaction = self.interactions.map(event)?;
        match interaction.trigger {
            Trigger::Transition(index) => self.request_transition(index)?,
            Trigger::TransitionAndScroll(index) => self.request_transition_and_scroll(index)?,
        };
        Ok(interaction)
    }

    /// Runs one display refresh: tween events first, then the draw.
    pub fn frame(
        &mut self,
        elapsed: Duration,
        page: &mut dyn Page,
        target: &mut dyn DrawTarget,
    ) -> FrameReport {
        let events = self.transitions.advance(elapsed, &mut self.material);
        let mut scrolls = Vec::new();
        for event in &events {
            if let TransitionEvent::Progressed {
                scroll_target: Some(index),
                ..
            } = event
            {
                match self.scroll_to_image(page, *index) {
                    Ok(top) => scrolls.push(top),
                    Err(error) => tracing::debug!(%error, "skipping scroll this tick"),
                }
            }
        }

        self.render_loop
            .tick(&self.scene, &mut self.material, target);

        FrameReport { events, scrolls }
    }

    fn scroll_to_image(&self, page: &mut dyn Page, index: usize) -> Result<f32, EngineError> {
        let entry = self
            .scene
            .entry(index)
            .ok_or(EngineError::IndexOutOfRange {
                index,
                len: self.scene.len(),
            })?;
        let rect = page
            .element_rect(entry.element)
            .filter(|rect| rect.top.is_finite())
            .ok_or(EngineError::LayoutUnavailable {
                element: entry.element,
            })?;
        let top = rect.top + page.scroll_y();
        page.smooth_scroll_to(top);
        Ok(top)
    }
}
