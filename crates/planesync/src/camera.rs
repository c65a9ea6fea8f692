use glam::{Mat4, Vec3};
use siteconfig::CameraSettings;

use crate::types::ViewportSize;

/// Field of view used before the first non-empty viewport is known.
const FALLBACK_FOV_DEGREES: f32 = 75.0;

/// Vertical field of view (degrees) at which `height` pixels span the view
/// exactly at `distance` from the camera.
pub fn pixel_perfect_fov(height: f32, distance: f32) -> f32 {
    2.0 * (height / 2.0 / distance).atan() * (180.0 / std::f32::consts::PI)
}

/// Perspective camera looking down -z from `(0, 0, distance)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
}

impl PerspectiveCamera {
    pub fn new(settings: &CameraSettings, viewport: ViewportSize) -> Self {
        let mut camera = Self {
            fov: FALLBACK_FOV_DEGREES,
            aspect: 1.0,
            near: settings.near,
            far: settings.far,
            distance: settings.distance,
        };
        camera.set_viewport(viewport);
        camera
    }

    /// Refits aspect and field of view to the viewport. Empty viewports are
    /// ignored and reported with `false`.
    pub fn set_viewport(&mut self, viewport: ViewportSize) -> bool {
        if viewport.is_empty() {
            return false;
        }
        self.aspect = viewport.aspect();
        self.fov = pixel_perfect_fov(viewport.height, self.distance);
        true
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Projects a world-space point into viewport pixels (origin top-left).
    pub fn project(&self, point: [f32; 3], viewport: ViewportSize) -> [f32; 2] {
        let ndc = self.view_projection().project_point3(Vec3::from(point));
        [
            (ndc.x + 1.0) / 2.0 * viewport.width,
            (1.0 - ndc.y) / 2.0 * viewport.height,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(viewport: ViewportSize) -> PerspectiveCamera {
        PerspectiveCamera::new(&CameraSettings::default(), viewport)
    }

    #[test]
    fn fov_matches_viewport_height_at_plane_distance() {
        let cam = camera(ViewportSize::new(1920.0, 1080.0));
        let expected = 2.0 * (540.0_f32 / 200.0).atan().to_degrees();
        assert!((cam.fov - expected).abs() < 1e-4);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn empty_viewport_keeps_previous_fit() {
        let mut cam = camera(ViewportSize::new(800.0, 600.0));
        let before = cam;
        assert!(!cam.set_viewport(ViewportSize::new(0.0, 600.0)));
        assert_eq!(cam, before);
    }

    #[test]
    fn camera_without_layout_uses_fallback_fov() {
        let cam = camera(ViewportSize::default());
        assert_eq!(cam.fov, FALLBACK_FOV_DEGREES);
        assert_eq!(cam.aspect, 1.0);
    }

    #[test]
    fn one_world_unit_projects_to_one_pixel() {
        let viewport = ViewportSize::new(1280.0, 720.0);
        let cam = camera(viewport);
        let centre = cam.project([0.0, 0.0, 0.0], viewport);
        assert!((centre[0] - 640.0).abs() < 1e-2);
        assert!((centre[1] - 360.0).abs() < 1e-2);

        let corner = cam.project([-640.0, 360.0, 0.0], viewport);
        assert!(corner[0].abs() < 1e-2);
        assert!(corner[1].abs() < 1e-2);

        let offset = cam.project([100.0, -50.0, 0.0], viewport);
        assert!((offset[0] - 740.0).abs() < 1e-2);
        assert!((offset[1] - 410.0).abs() < 1e-2);
    }

    #[test]
    fn plane_origin_sits_between_clip_planes() {
        let cam = camera(ViewportSize::new(1280.0, 720.0));
        let ndc = cam.view_projection().project_point3(Vec3::ZERO);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);

        let behind_far = cam
            .view_projection()
            .project_point3(Vec3::new(0.0, 0.0, 200.0 - 2500.0));
        assert!(behind_far.z > 1.0);
    }
}
