//! Maps a page element's layout box onto a plane mesh.
//!
//! The camera is set up so one world unit equals one viewport pixel at z = 0
//! with the origin at the viewport centre and +y pointing up. A plane whose
//! unscaled geometry is `geometry.width × geometry.height` therefore covers
//! the element exactly when it is centred on the element and scaled by the
//! ratio of the element's current size to that geometry.

use crate::types::{LayoutRect, Mesh, PlaneGeometry, Transform, ViewportSize};

/// Computes the transform that lays a plane of `geometry` over `rect`.
///
/// Returns `None` when the rect has no usable area.
pub fn layout_transform(
    rect: &LayoutRect,
    viewport: ViewportSize,
    geometry: PlaneGeometry,
) -> Option<Transform> {
    if !rect.is_usable() {
        return None;
    }
    let x = rect.left - viewport.width / 2.0 + rect.width / 2.0;
    let y = -rect.top + viewport.height / 2.0 - rect.height / 2.0;
    Some(Transform {
        position: [x, y, 0.0],
        scale: [
            rect.width / geometry.width,
            rect.height / geometry.height,
            1.0,
        ],
    })
}

/// Overwrites the mesh transform in place. Leaves the mesh untouched and
/// returns `false` when the rect is unusable.
pub fn bind_mesh(mesh: &mut Mesh, rect: &LayoutRect, viewport: ViewportSize) -> bool {
    match layout_transform(rect, viewport, mesh.geometry) {
        Some(transform) => {
            mesh.transform = transform;
            true
        }
        None => false,
    }
}
