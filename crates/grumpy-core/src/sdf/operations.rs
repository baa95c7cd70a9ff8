//! SDF Operations - Boolean and edge-breaking booleans
//!
//! The rounded and chamfered booleans follow the hg_sdf formulation: they
//! only change the field where both operands are within `r` of their
//! surface, so only the seam between the two operands is broken.

use super::{Aabb, Sdf};
use glam::{Vec2, Vec3};
use std::f32::consts::FRAC_1_SQRT_2;

// ============================================================================
// Boolean Operations
// ============================================================================

/// Union of two SDFs (combine shapes)
pub struct Union<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Union<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf + Send + Sync, B: Sdf + Send + Sync> Sdf for Union<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        self.a.distance(p).min(self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds().union(&self.b.bounds())
    }
}

/// Subtraction of two SDFs (cut B from A)
pub struct Subtract<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Subtract<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf + Send + Sync, B: Sdf + Send + Sync> Sdf for Subtract<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        self.a.distance(p).max(-self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds() // Subtraction can only reduce, not expand
    }
}

/// Intersection of two SDFs (keep only overlap)
pub struct Intersect<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Intersect<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf + Send + Sync, B: Sdf + Send + Sync> Sdf for Intersect<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        self.a.distance(p).max(self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds().intersection(&self.b.bounds())
    }
}

// ============================================================================
// Fillet Operations
// ============================================================================

/// Union with a circular fillet in the seam
pub struct RoundUnion<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub r: f32,
}

impl<A: Sdf, B: Sdf> RoundUnion<A, B> {
    pub fn new(a: A, b: B, r: f32) -> Self {
        Self { a, b, r }
    }
}

impl<A: Sdf + Send + Sync, B: Sdf + Send + Sync> Sdf for RoundUnion<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        round_min(self.a.distance(p), self.b.distance(p), self.r)
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds().union(&self.b.bounds())
    }
}

/// Subtraction with circular fillets on the cut edges
pub struct RoundSubtract<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub r: f32,
}

impl<A: Sdf, B: Sdf> RoundSubtract<A, B> {
    pub fn new(a: A, b: B, r: f32) -> Self {
        Self { a, b, r }
    }
}

impl<A: Sdf + Send + Sync, B: Sdf + Send + Sync> Sdf for RoundSubtract<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        round_max(self.a.distance(p), -self.b.distance(p), self.r)
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds()
    }
}

// ============================================================================
// Chamfer Operations
// ============================================================================

/// Intersection with 45 degree chamfers on the new edges
pub struct ChamferIntersect<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub r: f32,
}

impl<A: Sdf, B: Sdf> ChamferIntersect<A, B> {
    pub fn new(a: A, b: B, r: f32) -> Self {
        Self { a, b, r }
    }
}

impl<A: Sdf + Send + Sync, B: Sdf + Send + Sync> Sdf for ChamferIntersect<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        chamfer_max(self.a.distance(p), self.b.distance(p), self.r)
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds().intersection(&self.b.bounds())
    }
}

/// Subtraction with 45 degree chamfers on the cut edges
pub struct ChamferSubtract<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub r: f32,
}

impl<A: Sdf, B: Sdf> ChamferSubtract<A, B> {
    pub fn new(a: A, b: B, r: f32) -> Self {
        Self { a, b, r }
    }
}

impl<A: Sdf + Send + Sync, B: Sdf + Send + Sync> Sdf for ChamferSubtract<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        chamfer_max(self.a.distance(p), -self.b.distance(p), self.r)
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Minimum of two distances with a circular fillet of radius `r`
pub fn round_min(a: f32, b: f32, r: f32) -> f32 {
    let u = Vec2::new(r - a, r - b).max(Vec2::ZERO);
    r.max(a.min(b)) - u.length()
}

/// Maximum of two distances with a circular fillet of radius `r`
pub fn round_max(a: f32, b: f32, r: f32) -> f32 {
    let u = Vec2::new(r + a, r + b).max(Vec2::ZERO);
    (-r).min(a.max(b)) + u.length()
}

/// Maximum of two distances with a 45 degree chamfer of size `r`
pub fn chamfer_max(a: f32, b: f32, r: f32) -> f32 {
    a.max(b).max((a + b + r) * FRAC_1_SQRT_2)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::primitives::{below_z, box3, sphere};
    use crate::sdf::transforms::Translate;
    use approx::assert_relative_eq;

    // ------------------------------------------------------------------------
    // Boolean Operations
    // ------------------------------------------------------------------------

    #[test]
    fn union_takes_minimum_distance() {
        let a = sphere(1.0);
        let b = box3(Vec3::splat(2.0)); // half-extent 1.0
        let u = Union::new(a, b);
        // At origin, both are -1.0, so union is -1.0
        assert_relative_eq!(u.distance(Vec3::ZERO), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn subtract_carves_out_shape() {
        let s = Subtract::new(sphere(2.0), sphere(1.0));
        assert!(s.distance(Vec3::ZERO) > 0.0);
        assert!(s.distance(Vec3::new(1.5, 0.0, 0.0)) < 0.0);
        assert!(s.distance(Vec3::new(3.0, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn intersect_keeps_overlap_only() {
        let a = sphere(1.0);
        let b = Translate::new(sphere(1.0), Vec3::new(1.5, 0.0, 0.0));
        let i = Intersect::new(a, b);
        assert!(i.distance(Vec3::ZERO) > 0.0);
        assert!(i.distance(Vec3::new(0.75, 0.0, 0.0)) < 0.0);
        assert!(i.distance(Vec3::new(2.0, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn intersect_bounds_are_the_overlap() {
        let a = box3(Vec3::splat(2.0));
        let b = Translate::new(box3(Vec3::splat(2.0)), Vec3::X);
        let bounds = Intersect::new(a, b).bounds();
        assert_relative_eq!(bounds.min.x, 0.0);
        assert_relative_eq!(bounds.max.x, 1.0);
    }

    // ------------------------------------------------------------------------
    // Edge-breaking Operations
    // ------------------------------------------------------------------------

    #[test]
    fn chamfer_removes_the_corner() {
        // Box edge at x = 1, z = 1; the corner point is inside a sharp box
        let sharp = box3(Vec3::splat(2.0));
        let corner = Vec3::new(0.95, 0.0, 0.95);
        assert!(sharp.distance(corner) < 0.0);

        let chamfered = ChamferIntersect::new(
            box3(Vec3::new(2.0, 2.0, 10.0)),
            box3(Vec3::new(10.0, 10.0, 2.0)),
            0.5,
        );
        assert!(chamfered.distance(corner) > 0.0);
        // Face centres are untouched
        assert_relative_eq!(chamfered.distance(Vec3::new(1.0, 0.0, 0.0)), 0.0);
        assert_relative_eq!(chamfered.distance(Vec3::new(0.0, 0.0, 1.0)), 0.0);
    }

    #[test]
    fn chamfer_cut_is_forty_five_degrees() {
        // Corner of the quadrant x <= 0, z <= 0; the chamfer plane passes
        // through (-r, 0) and (0, -r)
        let r = 1.0;
        assert!(chamfer_max(-0.4, -0.4, r) > 0.0);
        assert!(chamfer_max(-0.6, -0.6, r) < 0.0);
        assert_relative_eq!(chamfer_max(-0.5, -0.5, r), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn round_max_fillets_convex_corner() {
        let r = 1.0;
        // Point on the fillet arc centre diagonal, just outside the arc
        let t = -1.0 + std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(round_max(t, t, r), 0.0, epsilon = 1e-5);
        // Far from the corner the field is the plain maximum
        assert_relative_eq!(round_max(-3.0, 0.5, r), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn round_min_fills_concave_corner() {
        let r = 1.0;
        // Inside the seam both shapes are outside, the fillet is inside
        assert!(round_min(0.2, 0.2, r) < 0.0);
        // Away from the seam nothing changes
        assert_relative_eq!(round_min(5.0, -0.5, r), -0.5, epsilon = 1e-6);
    }

    #[test]
    fn zero_radius_edge_ops_match_sharp_sign() {
        for (a, b) in [(-1.0, -2.0), (0.5, -0.2), (0.3, 0.4), (-0.1, 2.0)] {
            let sharp = f32::max(a, b);
            assert_eq!(chamfer_max(a, b, 0.0) > 0.0, sharp > 0.0);
            assert_relative_eq!(round_max(a, b, 0.0), {
                if a > 0.0 || b > 0.0 {
                    Vec2::new(a, b).max(Vec2::ZERO).length()
                } else {
                    sharp
                }
            });
        }
    }

    #[test]
    fn round_subtract_softens_the_rim() {
        let block = box3(Vec3::new(10.0, 10.0, 2.0));
        let hole = box3(Vec3::new(2.0, 2.0, 10.0));
        let sharp = Subtract::new(block, hole);
        let soft = RoundSubtract::new(block, hole, 0.5);
        // Near the rim of the hole, at the top face
        let p = Vec3::new(1.1, 0.0, 0.9);
        assert!(sharp.distance(p) < 0.0);
        assert!(soft.distance(p) > 0.0);
    }

    #[test]
    fn chamfer_against_half_space() {
        // A 2 mm chamfer on the top edge of a slab
        let slab = box3(Vec3::new(10.0, 10.0, 100.0));
        let top = below_z(0.0);
        let c = ChamferIntersect::new(slab, top, 2.0);
        assert!(c.distance(Vec3::new(4.5, 0.0, -0.2)) > 0.0);
        assert!(c.distance(Vec3::new(2.5, 0.0, -0.2)) < 0.0);
    }
}
