//! SDF Transforms - Translation, rotation about Z, mirroring

use super::{Aabb, Sdf};
use glam::{Mat2, Vec3};

// ============================================================================
// Basic Transforms
// ============================================================================

/// Translation transform
pub struct Translate<S: Sdf> {
    pub inner: S,
    pub offset: Vec3,
}

impl<S: Sdf> Translate<S> {
    pub fn new(inner: S, offset: Vec3) -> Self {
        Self { inner, offset }
    }
}

impl<S: Sdf + Send + Sync> Sdf for Translate<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(p - self.offset)
    }

    fn bounds(&self) -> Aabb {
        let b = self.inner.bounds();
        Aabb::new(b.min + self.offset, b.max + self.offset)
    }
}

/// Rotation about the Z axis
pub struct RotateZ<S: Sdf> {
    pub inner: S,
    pub angle: f32,
}

impl<S: Sdf> RotateZ<S> {
    pub fn new(inner: S, angle: f32) -> Self {
        Self { inner, angle }
    }
}

impl<S: Sdf + Send + Sync> Sdf for RotateZ<S> {
    fn distance(&self, p: Vec3) -> f32 {
        let xy = Mat2::from_angle(-self.angle) * p.truncate();
        self.inner.distance(xy.extend(p.z))
    }

    fn bounds(&self) -> Aabb {
        let b = self.inner.bounds();
        let turn = Mat2::from_angle(self.angle);
        let corners = [
            turn * b.min.truncate(),
            turn * glam::Vec2::new(b.max.x, b.min.y),
            turn * glam::Vec2::new(b.min.x, b.max.y),
            turn * b.max.truncate(),
        ];
        let lo = corners.iter().copied().reduce(glam::Vec2::min).unwrap_or_default();
        let hi = corners.iter().copied().reduce(glam::Vec2::max).unwrap_or_default();
        Aabb::new(lo.extend(b.min.z), hi.extend(b.max.z))
    }
}

/// Mirror across a plane through the origin
///
/// Points on the negative side are reflected, so the result is the shape
/// plus its mirror image. With a non-zero `blend` the fold is smoothed
/// within `blend` of the plane, which fillets the seam where the two
/// halves meet.
pub struct Mirror<S: Sdf> {
    pub inner: S,
    pub axis: Vec3,
    pub blend: f32,
}

impl<S: Sdf> Mirror<S> {
    pub fn new(inner: S, axis: Vec3, blend: f32) -> Self {
        Self {
            inner,
            axis: axis.normalize(),
            blend: blend.max(0.0),
        }
    }
}

impl<S: Sdf + Send + Sync> Sdf for Mirror<S> {
    fn distance(&self, p: Vec3) -> f32 {
        let d = p.dot(self.axis);
        let folded = smooth_abs(d, self.blend);
        self.inner.distance(p + (folded - d) * self.axis)
    }

    fn bounds(&self) -> Aabb {
        let b = self.inner.bounds();
        // Mirror expands bounds to include both sides
        let mirrored_min = reflect_point(b.min, self.axis);
        let mirrored_max = reflect_point(b.max, self.axis);
        Aabb::new(
            b.min.min(mirrored_min).min(b.max).min(mirrored_max),
            b.max.max(mirrored_max).max(b.min).max(mirrored_min),
        )
    }
}

fn reflect_point(p: Vec3, axis: Vec3) -> Vec3 {
    p - 2.0 * p.dot(axis) * axis
}

/// `|x|` with the kink replaced by a parabola within `k` of zero
fn smooth_abs(x: f32, k: f32) -> f32 {
    let a = x.abs();
    if a >= k {
        a
    } else {
        x * x / (2.0 * k) + k * 0.5
    }
}
