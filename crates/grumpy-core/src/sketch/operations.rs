//! Sketch booleans and transforms

use super::{Bounds2, Sdf2};
use crate::sdf::operations::{round_max, round_min};
use glam::{Mat2, Vec2};

// ============================================================================
// Booleans
// ============================================================================

pub struct Union2<A: Sdf2, B: Sdf2> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf2, B: Sdf2> Union2<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf2, B: Sdf2> Sdf2 for Union2<A, B> {
    fn distance(&self, p: Vec2) -> f32 {
        self.a.distance(p).min(self.b.distance(p))
    }

    fn bounds(&self) -> Bounds2 {
        self.a.bounds().union(&self.b.bounds())
    }
}

pub struct Subtract2<A: Sdf2, B: Sdf2> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf2, B: Sdf2> Subtract2<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf2, B: Sdf2> Sdf2 for Subtract2<A, B> {
    fn distance(&self, p: Vec2) -> f32 {
        self.a.distance(p).max(-self.b.distance(p))
    }

    fn bounds(&self) -> Bounds2 {
        self.a.bounds()
    }
}

pub struct Intersect2<A: Sdf2, B: Sdf2> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf2, B: Sdf2> Intersect2<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf2, B: Sdf2> Sdf2 for Intersect2<A, B> {
    fn distance(&self, p: Vec2) -> f32 {
        self.a.distance(p).max(self.b.distance(p))
    }

    fn bounds(&self) -> Bounds2 {
        self.a.bounds().intersection(&self.b.bounds())
    }
}

pub struct RoundUnion2<A: Sdf2, B: Sdf2> {
    pub a: A,
    pub b: B,
    pub r: f32,
}

impl<A: Sdf2, B: Sdf2> RoundUnion2<A, B> {
    pub fn new(a: A, b: B, r: f32) -> Self {
        Self { a, b, r }
    }
}

impl<A: Sdf2, B: Sdf2> Sdf2 for RoundUnion2<A, B> {
    fn distance(&self, p: Vec2) -> f32 {
        round_min(self.a.distance(p), self.b.distance(p), self.r)
    }

    fn bounds(&self) -> Bounds2 {
        self.a.bounds().union(&self.b.bounds())
    }
}

pub struct RoundSubtract2<A: Sdf2, B: Sdf2> {
    pub a: A,
    pub b: B,
    pub r: f32,
}

impl<A: Sdf2, B: Sdf2> RoundSubtract2<A, B> {
    pub fn new(a: A, b: B, r: f32) -> Self {
        Self { a, b, r }
    }
}

impl<A: Sdf2, B: Sdf2> Sdf2 for RoundSubtract2<A, B> {
    fn distance(&self, p: Vec2) -> f32 {
        round_max(self.a.distance(p), -self.b.distance(p), self.r)
    }

    fn bounds(&self) -> Bounds2 {
        self.a.bounds()
    }
}

// ============================================================================
// Transforms
// ============================================================================

pub struct Translate2<S: Sdf2> {
    pub inner: S,
    pub offset: Vec2,
}

impl<S: Sdf2> Translate2<S> {
    pub fn new(inner: S, offset: Vec2) -> Self {
        Self { inner, offset }
    }
}

impl<S: Sdf2> Sdf2 for Translate2<S> {
    fn distance(&self, p: Vec2) -> f32 {
        self.inner.distance(p - self.offset)
    }

    fn bounds(&self) -> Bounds2 {
        self.inner.bounds().translate(self.offset)
    }
}

/// Rotation about the origin
pub struct Rotate2<S: Sdf2> {
    pub inner: S,
    pub angle: f32,
    inverse: Mat2,
}

impl<S: Sdf2> Rotate2<S> {
    pub fn new(inner: S, angle: f32) -> Self {
        Self {
            inner,
            angle,
            inverse: Mat2::from_angle(-angle),
        }
    }
}

impl<S: Sdf2> Sdf2 for Rotate2<S> {
    fn distance(&self, p: Vec2) -> f32 {
        self.inner.distance(self.inverse * p)
    }

    fn bounds(&self) -> Bounds2 {
        self.inner.bounds().rotate(self.angle)
    }
}

pub struct Offset2<S: Sdf2> {
    pub inner: S,
    pub amount: f32,
}

impl<S: Sdf2> Offset2<S> {
    pub fn new(inner: S, amount: f32) -> Self {
        Self { inner, amount }
    }
}

impl<S: Sdf2> Sdf2 for Offset2<S> {
    fn distance(&self, p: Vec2) -> f32 {
        self.inner.distance(p) - self.amount
    }

    fn bounds(&self) -> Bounds2 {
        self.inner.bounds().expand(self.amount.max(0.0))
    }
}

/// The `x >= 0` half reflected onto `x < 0`
pub struct MirrorX2<S: Sdf2> {
    pub inner: S,
}

impl<S: Sdf2> MirrorX2<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Sdf2> Sdf2 for MirrorX2<S> {
    fn distance(&self, p: Vec2) -> f32 {
        self.inner.distance(Vec2::new(p.x.abs(), p.y))
    }

    fn bounds(&self) -> Bounds2 {
        let b = self.inner.bounds();
        let reach = b.max.x.abs().max(b.min.x.abs());
        Bounds2::new(Vec2::new(-reach, b.min.y), Vec2::new(reach, b.max.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::shapes::{circle, rect};
    use approx::assert_relative_eq;

    #[test]
    fn subtract_opens_a_hole() {
        let s = Subtract2::new(rect(10.0, 10.0), rect(4.0, 4.0));
        assert_relative_eq!(s.distance(Vec2::ZERO), 2.0);
        assert_relative_eq!(s.distance(Vec2::new(3.5, 0.0)), -1.5);
        assert_relative_eq!(s.bounds().max.x, 5.0);
    }

    #[test]
    fn intersect_bounds_shrink() {
        let s = Intersect2::new(rect(10.0, 2.0), rect(2.0, 10.0));
        let b = s.bounds();
        assert_relative_eq!(b.size().x, 2.0);
        assert_relative_eq!(b.size().y, 2.0);
    }

    #[test]
    fn round_subtract_rounds_the_new_corners() {
        // Notch out the top right quadrant; the convex corner left at (0, 5)
        // gets a fillet
        let notch = Translate2::new(rect(10.0, 10.0), Vec2::new(5.0, 5.0));
        let sharp = Subtract2::new(
            rect(10.0, 10.0),
            Translate2::new(rect(10.0, 10.0), Vec2::new(5.0, 5.0)),
        );
        let soft = RoundSubtract2::new(rect(10.0, 10.0), notch, 1.0);
        let p = Vec2::new(-0.1, 4.9);
        assert!(sharp.distance(p) < 0.0);
        assert!(soft.distance(p) > 0.0);
        // far from the corner nothing changes
        let q = Vec2::new(-3.0, 2.0);
        assert_relative_eq!(sharp.distance(q), soft.distance(q), epsilon = 1e-6);
    }

    #[test]
    fn rotate_about_origin() {
        let bar = Translate2::new(rect(2.0, 1.0), Vec2::new(3.0, 0.0));
        let turned = Rotate2::new(bar, std::f32::consts::FRAC_PI_2);
        assert!(turned.distance(Vec2::new(0.0, 3.0)) < 0.0);
        assert!(turned.distance(Vec2::new(3.0, 0.0)) > 0.0);
        let b = turned.bounds();
        assert_relative_eq!(b.min.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(b.max.y, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn offset_grows_and_shrinks() {
        let grown = Offset2::new(circle(2.0), 1.0);
        let shrunk = Offset2::new(circle(2.0), -1.0);
        assert_relative_eq!(grown.distance(Vec2::new(3.0, 0.0)), 0.0);
        assert_relative_eq!(shrunk.distance(Vec2::new(1.0, 0.0)), 0.0);
        assert_relative_eq!(grown.bounds().max.x, 3.0);
    }

    #[test]
    fn mirror_x_reflects_right_half() {
        let m = MirrorX2::new(Translate2::new(circle(1.0), Vec2::new(4.0, 1.0)));
        assert_relative_eq!(m.distance(Vec2::new(-4.0, 1.0)), -1.0);
        assert_relative_eq!(m.distance(Vec2::new(4.0, 1.0)), -1.0);
        assert_relative_eq!(m.bounds().min.x, -5.0);
    }
}
