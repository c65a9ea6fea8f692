use siteconfig::CameraSettings;

use crate::camera::PerspectiveCamera;
use crate::error::EngineError;
use crate::layout;
use crate::page::Page;
use crate::types::{ElementId, Mesh, PlaneGeometry, ViewportSize};

/// One image on the page and the plane drawn over it.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub element: ElementId,
    pub mesh: Mesh,
    pub original_width: f32,
    pub original_height: f32,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub synced: usize,
    pub skipped: usize,
}

/// Keeps every plane aligned with its element's layout box.
///
/// Layout is re-read on construction and on resize only; scrolling does not
/// move the planes.
#[derive(Debug, Clone)]
pub struct SceneSync {
    entries: Vec<ImageEntry>,
    camera: PerspectiveCamera,
    viewport: ViewportSize,
}

impl SceneSync {
    /// Creates one plane per element, sized to the element's current layout
    /// box, and runs an initial sync.
    pub fn build(page: &dyn Page, elements: &[ElementId], camera: &CameraSettings) -> Self {
        let viewport = page.viewport();
        let entries = elements
            .iter()
            .enumerate()
            .map(|(index, &element)| {
                let geometry = page
                    .element_rect(element)
                    .filter(|rect| rect.is_usable())
                    .map(|rect| PlaneGeometry {
                        width: rect.width,
                        height: rect.height,
                    })
                    .unwrap_or_else(|| {
                        tracing::debug!(index, ?element, "no layout at creation; using unit plane");
                        PlaneGeometry::UNIT
                    });
                ImageEntry {
                    element,
                    mesh: Mesh::new(geometry),
                    original_width: geometry.width,
                    original_height: geometry.height,
                    index,
                }
            })
            .collect();

        let mut scene = Self {
            entries,
            camera: PerspectiveCamera::new(camera, viewport),
            viewport,
        };
        let report = scene.sync_layout(page);
        tracing::debug!(
            planes = scene.entries.len(),
            synced = report.synced,
            skipped = report.skipped,
            "scene built"
        );
        scene
    }

    /// Refits the camera to the page's viewport and re-lays every plane.
    /// An empty viewport is ignored and returns `None`.
    pub fn resize(&mut self, page: &dyn Page) -> Option<SyncReport> {
        let viewport = page.viewport();
        if !self.camera.set_viewport(viewport) {
            tracing::warn!(
                width = viewport.width,
                height = viewport.height,
                "ignoring resize to empty viewport"
            );
            return None;
        }
        self.viewport = viewport;
        let report = self.sync_layout(page);
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            fov = self.camera.fov,
            synced = report.synced,
            skipped = report.skipped,
            "scene resized"
        );
        Some(report)
    }

    /// Re-lays every plane against current layout. Entries without a usable
    /// layout box keep their previous transform.
    pub fn sync_layout(&mut self, page: &dyn Page) -> SyncReport {
        let viewport = self.viewport;
        let mut report = SyncReport::default();
        for entry in &mut self.entries {
            let bound = page
                .element_rect(entry.element)
                .is_some_and(|rect| layout::bind_mesh(&mut entry.mesh, &rect, viewport));
            if bound {
                report.synced += 1;
            } else {
                let error = EngineError::LayoutUnavailable {
                    element: entry.element,
                };
                tracing::debug!(index = entry.index, %error, "skipping plane sync");
                report.skipped += 1;
            }
        }
        report
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }
}
