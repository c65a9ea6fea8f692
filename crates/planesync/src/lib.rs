//! Keeps GPU image planes glued to page elements and drives the crossfade
//! timeline shared by all of them.
//!
//! ```text
//!   pointer events ──▶ InteractionMapper ──▶ TransitionController ──┐
//!                                                 ▲                 │ indices / uTimeline
//!                                     TweenDriver │                 ▼
//!   resize ──▶ SceneSync ──▶ LayoutBinding     Site::frame ──▶ SharedMaterial ──▶ RenderLoop ──▶ DrawTarget
//!                  │                                                                   ▲
//!                  └─────────────────────── plane transforms ──────────────────────────┘
//! ```
//!
//! The host owns the event loop. It forwards resizes and link pointer events
//! to [`Site`] and calls [`Site::frame`] once per display refresh. Layout is
//! read through the [`Page`] trait, image pixels through [`TextureLoader`],
//! and drawing goes through [`DrawTarget`]; none of those are implemented
//! here beyond the headless [`StaticPage`] and the file-backed
//! [`ImageDecoder`].

pub mod camera;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod page;
pub mod render_loop;
pub mod scene;
pub mod site;
pub mod textures;
pub mod transition;
pub mod types;
pub mod uniforms;

pub use camera::PerspectiveCamera;
pub use error::EngineError;
pub use interaction::{Interaction, InteractionMapper, PointerEvent, Trigger};
pub use page::{Page, StaticPage};
pub use render_loop::{DrawTarget, Frame, RenderLoop};
pub use scene::{ImageEntry, SceneSync, SyncReport};
pub use site::{FrameReport, Site};
pub use textures::{ImageDecoder, TextureArrayRegistry, TextureData, TextureLoader};
pub use transition::{TransitionController, TransitionEvent, TransitionPhase, TransitionState};
pub use types::{ElementId, ImageSource, LayoutRect, Mesh, PlaneGeometry, Transform, ViewportSize};
pub use uniforms::{SharedMaterial, TransitionUniforms};
