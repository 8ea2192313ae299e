//! View frustum planes and box culling.

use glam::Vec3;

/// A plane `normal · p + distance = 0` whose normal points into the
/// visible half-space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal, pointing inward
    pub normal: Vec3,
    /// Offset along the normal
    pub distance: f32,
}

impl Plane {
    /// Creates a plane from an inward normal and offset.
    #[must_use]
    pub const fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Signed distance from the plane, positive on the visible side.
    #[must_use]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Axis-aligned box given by centre and half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Box centre
    pub center: Vec3,
    /// Half size along each axis
    pub extents: Vec3,
}

impl Aabb {
    /// Creates a box from centre and half extents.
    #[must_use]
    pub const fn new(center: Vec3, extents: Vec3) -> Self {
        Self { center, extents }
    }

    /// Minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.center - self.extents
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.center + self.extents
    }
}

/// A convex set of planes. A box is visible unless it lies entirely
/// behind one of them.
///
/// The default frustum has no planes and accepts everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frustum {
    planes: Vec<Plane>,
}

impl Frustum {
    /// Creates a frustum from its planes.
    #[must_use]
    pub fn new(planes: Vec<Plane>) -> Self {
        Self { planes }
    }

    /// Returns the planes.
    #[must_use]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Conservative box test: false only if the box is fully outside a plane.
    #[must_use]
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            let radius = aabb.extents.dot(plane.normal.abs());
            plane.signed_distance(aabb.center) + radius >= 0.0
        })
    }
}

/// Anything that can report the current view frustum.
pub trait FrustumSource {
    /// The frustum to cull against this tick.
    fn frustum(&self) -> Frustum;
}

impl FrustumSource for Frustum {
    fn frustum(&self) -> Frustum {
        self.clone()
    }
}
