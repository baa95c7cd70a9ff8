//! Lifting sketches into solids

use super::Sdf2;
use crate::sdf::{Aabb, Sdf, UNBOUNDED};
use glam::{Vec2, Vec3};

/// Plane a sketch is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchPlane {
    /// Sketch (x, y), extruded along Z
    Xy,
    /// Sketch (x, z), extruded along Y
    Xz,
}

impl SketchPlane {
    /// Split a point into sketch coordinates and the axial coordinate
    fn project(self, p: Vec3) -> (Vec2, f32) {
        match self {
            SketchPlane::Xy => (Vec2::new(p.x, p.y), p.z),
            SketchPlane::Xz => (Vec2::new(p.x, p.z), p.y),
        }
    }

    fn lift(self, sketch: Vec2, axial: f32) -> Vec3 {
        match self {
            SketchPlane::Xy => Vec3::new(sketch.x, sketch.y, axial),
            SketchPlane::Xz => Vec3::new(sketch.x, axial, sketch.y),
        }
    }
}

/// A sketch swept along its plane normal between `lo` and `hi`
///
/// Infinite limits give an open prism. The distance is exact outside for
/// an exact profile.
pub struct Extrusion<S: Sdf2> {
    pub profile: S,
    pub plane: SketchPlane,
    pub lo: f32,
    pub hi: f32,
}

impl<S: Sdf2> Extrusion<S> {
    pub fn new(profile: S, plane: SketchPlane, lo: f32, hi: f32) -> Self {
        Self {
            profile,
            plane,
            lo: lo.min(hi),
            hi: lo.max(hi),
        }
    }
}

impl<S: Sdf2> Sdf for Extrusion<S> {
    fn distance(&self, p: Vec3) -> f32 {
        let (uv, axial) = self.plane.project(p);
        let w = Vec2::new(self.profile.distance(uv), (self.lo - axial).max(axial - self.hi));
        w.x.max(w.y).min(0.0) + w.max(Vec2::ZERO).length()
    }

    fn bounds(&self) -> Aabb {
        let b = self.profile.bounds();
        let lo = self.lo.max(-UNBOUNDED);
        let hi = self.hi.min(UNBOUNDED);
        let a = self.plane.lift(b.min, lo);
        let c = self.plane.lift(b.max, hi);
        Aabb::new(a.min(c), a.max(c))
    }
}
