//! Orthographic 2D camera used to drive chunk culling.
//!
//! World Y grows upward; screen Y grows downward from the top-left corner.

use glam::{Vec2, Vec3};

use crate::frustum::{Frustum, FrustumSource, Plane};

/// Minimum zoom level (zoomed out).
pub const MIN_ZOOM: f32 = 0.05;

/// Maximum zoom level (zoomed in).
pub const MAX_ZOOM: f32 = 20.0;

/// Default zoom level.
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Half depth of the view volume along Z.
pub const DEPTH_HALF_EXTENT: f32 = 1000.0;

/// Orthographic camera over the terrain plane.
#[derive(Debug, Clone)]
pub struct OrthoCamera {
    /// Centre of view in world coordinates.
    pub position: Vec2,
    /// Zoom level (1.0 = one world unit per pixel).
    pub zoom: f32,
    /// Viewport size in pixels (width, height).
    pub viewport_size: (u32, u32),
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: DEFAULT_ZOOM,
            viewport_size: (1280, 720),
        }
    }
}

impl OrthoCamera {
    /// Creates a camera at the origin with the given viewport size.
    #[must_use]
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport_size: (viewport_width, viewport_height),
            ..Self::default()
        }
    }

    /// Move by delta in world units.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Zoom in/out by factor (clamped).
    ///
    /// Factor > 1.0 zooms in, < 1.0 zooms out.
    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Set absolute zoom level (clamped).
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Center on a world position.
    pub fn center_on(&mut self, world: Vec2) {
        self.position = world;
    }

    /// Set the viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_size = (width, height);
    }

    fn half_view(&self) -> Vec2 {
        Vec2::new(self.viewport_size.0 as f32, self.viewport_size.1 as f32) / (2.0 * self.zoom)
    }

    /// Visible world rectangle as (min, max).
    #[must_use]
    pub fn visible_bounds(&self) -> (Vec2, Vec2) {
        let half = self.half_view();
        (self.position - half, self.position + half)
    }

    /// Convert screen coordinates to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let half_screen = Vec2::new(self.viewport_size.0 as f32, self.viewport_size.1 as f32) / 2.0;
        let offset = (screen - half_screen) / self.zoom;
        Vec2::new(self.position.x + offset.x, self.position.y - offset.y)
    }

    /// Convert world coordinates to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let half_screen = Vec2::new(self.viewport_size.0 as f32, self.viewport_size.1 as f32) / 2.0;
        let offset = (world - self.position) * self.zoom;
        Vec2::new(half_screen.x + offset.x, half_screen.y - offset.y)
    }

    /// Smoothly interpolate toward a target position.
    pub fn lerp_to(&mut self, target: Vec2, t: f32) {
        self.position = self.position.lerp(target, t.clamp(0.0, 1.0));
    }
}

impl FrustumSource for OrthoCamera {
    /// Four side planes around the visible rectangle plus a near/far slab.
    fn frustum(&self) -> Frustum {
        let (min, max) = self.visible_bounds();
        Frustum::new(vec![
            Plane::new(Vec3::X, -min.x),
            Plane::new(Vec3::NEG_X, max.x),
            Plane::new(Vec3::Y, -min.y),
            Plane::new(Vec3::NEG_Y, max.y),
            Plane::new(Vec3::Z, DEPTH_HALF_EXTENT),
            Plane::new(Vec3::NEG_Z, DEPTH_HALF_EXTENT),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frustum::Aabb;

    #[test]
    fn test_camera_creation() {
        let camera = OrthoCamera::new(1920, 1080);
        assert_eq!(camera.viewport_size, (1920, 1080));
        assert!((camera.zoom - DEFAULT_ZOOM).abs() < f32::EPSILON);
    }

    #[test]
    fn test_camera_translate() {
        let mut camera = OrthoCamera::default();
        camera.translate(Vec2::new(100.0, 50.0));
        assert!((camera.position.x - 100.0).abs() < f32::EPSILON);
        assert!((camera.position.y - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = OrthoCamera::default();
        camera.zoom_by(1000.0);
        assert!((camera.zoom - MAX_ZOOM).abs() < f32::EPSILON);
        camera.set_zoom(0.0);
        assert!((camera.zoom - MIN_ZOOM).abs() < f32::EPSILON);
    }

    #[test]
    fn test_visible_bounds() {
        let mut camera = OrthoCamera::new(200, 100);
        camera.set_zoom(2.0);
        camera.center_on(Vec2::new(10.0, 10.0));
        let (min, max) = camera.visible_bounds();
        assert_eq!(min, Vec2::new(-40.0, -15.0));
        assert_eq!(max, Vec2::new(60.0, 35.0));
    }

    #[test]
    fn test_screen_world_roundtrip() {
        let mut camera = OrthoCamera::new(800, 600);
        camera.center_on(Vec2::new(5.0, -3.0));
        camera.set_zoom(2.0);
        let world = camera.screen_to_world(Vec2::new(100.0, 50.0));
        let back = camera.world_to_screen(world);
        assert!((back - Vec2::new(100.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn test_screen_top_is_world_up() {
        let camera = OrthoCamera::new(100, 100);
        let top = camera.screen_to_world(Vec2::new(50.0, 0.0));
        assert!(top.y > 0.0);
    }

    #[test]
    fn test_lerp_to() {
        let mut camera = OrthoCamera::default();
        camera.lerp_to(Vec2::new(10.0, 0.0), 0.5);
        assert!((camera.position.x - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_frustum_culls_offscreen_box() {
        let camera = OrthoCamera::new(100, 100);
        let frustum = camera.frustum();
        assert_eq!(frustum.planes().len(), 6);

        let on = Aabb::new(Vec3::new(40.0, 0.0, 0.0), Vec3::splat(5.0));
        let off = Aabb::new(Vec3::new(200.0, 0.0, 0.0), Vec3::splat(5.0));
        let below = Aabb::new(Vec3::new(0.0, -60.0, 0.0), Vec3::splat(5.0));
        assert!(frustum.intersects_aabb(&on));
        assert!(!frustum.intersects_aabb(&off));
        assert!(!frustum.intersects_aabb(&below));
    }
}
