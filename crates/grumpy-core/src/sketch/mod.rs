//! 2D sketches
//!
//! Sketches are closed 2D profiles described by a signed distance field,
//! combined with the same boolean vocabulary as the 3D layer and lifted
//! into solids with [`SketchExt::extrude`].
//!
//! ```rust
//! use grumpy_core::sketch::{Sdf2, SketchExt, shapes::rect};
//! use glam::Vec2;
//!
//! let plate = rect(40.0, 20.0).subtract(rect(14.0, 14.0).translate(10.0, 0.0));
//! assert!(plate.distance(Vec2::new(10.0, 0.0)) > 0.0);
//! assert!(plate.distance(Vec2::new(-10.0, 0.0)) < 0.0);
//! ```

pub mod contour;
pub mod extrude;
pub mod operations;
pub mod shapes;

use crate::sdf::{SdfNode, UNBOUNDED};
use glam::{Mat2, Vec2};
use std::sync::Arc;

pub use extrude::{Extrusion, SketchPlane};

/// A 2D shape that can compute distance from a point
pub trait Sdf2: Send + Sync {
    /// Signed distance from `p` to the outline, negative inside
    fn distance(&self, p: Vec2) -> f32;

    /// Approximate bounding rectangle
    fn bounds(&self) -> Bounds2 {
        Bounds2::square(UNBOUNDED)
    }
}

/// Axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square centered at origin
    pub fn square(half_size: f32) -> Self {
        Self::new(Vec2::splat(-half_size), Vec2::splat(half_size))
    }

    pub fn expand(&self, margin: f32) -> Self {
        Self::new(
            self.min - Vec2::splat(margin),
            self.max + Vec2::splat(margin),
        )
    }

    pub fn union(&self, other: &Bounds2) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn intersection(&self, other: &Bounds2) -> Self {
        Self::new(self.min.max(other.min), self.max.min(other.max))
    }

    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Bounds of this rectangle rotated about the origin
    pub fn rotate(&self, angle: f32) -> Self {
        let m = Mat2::from_angle(angle);
        let corners = [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            Vec2::new(self.min.x, self.max.y),
            self.max,
        ];
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for corner in corners {
            let rotated = m * corner;
            min = min.min(rotated);
            max = max.max(rotated);
        }
        Self::new(min, max)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// A sketch node that can be composed and transformed
#[derive(Clone)]
pub struct SketchNode {
    inner: Arc<dyn Sdf2>,
}

impl SketchNode {
    pub fn new<S: Sdf2 + 'static>(sketch: S) -> Self {
        Self {
            inner: Arc::new(sketch),
        }
    }
}

impl Sdf2 for SketchNode {
    fn distance(&self, p: Vec2) -> f32 {
        self.inner.distance(p)
    }

    fn bounds(&self) -> Bounds2 {
        self.inner.bounds()
    }
}

/// Extension trait providing chainable operations on sketches
pub trait SketchExt: Sdf2 + Sized + 'static {
    // === Boolean Operations ===

    fn union<S: Sdf2 + 'static>(self, other: S) -> SketchNode {
        SketchNode::new(operations::Union2::new(self, other))
    }

    fn subtract<S: Sdf2 + 'static>(self, other: S) -> SketchNode {
        SketchNode::new(operations::Subtract2::new(self, other))
    }

    fn intersect<S: Sdf2 + 'static>(self, other: S) -> SketchNode {
        SketchNode::new(operations::Intersect2::new(self, other))
    }

    /// Union with the concave corners of the seam filleted by `r`
    fn round_union<S: Sdf2 + 'static>(self, other: S, r: f32) -> SketchNode {
        SketchNode::new(operations::RoundUnion2::new(self, other, r))
    }

    /// Subtraction with the new corners filleted by `r`
    fn round_subtract<S: Sdf2 + 'static>(self, other: S, r: f32) -> SketchNode {
        SketchNode::new(operations::RoundSubtract2::new(self, other, r))
    }

    // === Transforms ===

    fn translate(self, x: f32, y: f32) -> SketchNode {
        SketchNode::new(operations::Translate2::new(self, Vec2::new(x, y)))
    }

    fn translate_by(self, offset: Vec2) -> SketchNode {
        self.translate(offset.x, offset.y)
    }

    /// Rotate about the origin (angle in radians, counter-clockwise)
    fn rotate(self, angle: f32) -> SketchNode {
        SketchNode::new(operations::Rotate2::new(self, angle))
    }

    /// Grow (positive) or shrink (negative) the outline
    fn offset(self, amount: f32) -> SketchNode {
        SketchNode::new(operations::Offset2::new(self, amount))
    }

    /// Keep the `x >= 0` half and reflect it across the y axis
    fn mirror_x(self) -> SketchNode {
        SketchNode::new(operations::MirrorX2::new(self))
    }

    /// Wall of `thickness` inside the outline, open where it leaves `keep`
    ///
    /// Traces the outline once, so build it outside hot loops.
    fn open_shell<K: Sdf2 + 'static>(self, thickness: f32, keep: K) -> SketchNode {
        SketchNode::new(contour::OpenShell2::new(self, keep, thickness))
    }

    // === Solids ===

    /// Extrude along +Z between `z0` and `z1`
    fn extrude(self, z0: f32, z1: f32) -> SdfNode {
        SdfNode::new(Extrusion::new(self, SketchPlane::Xy, z0, z1))
    }

    /// Extrusion without end caps
    fn prism(self) -> SdfNode {
        SdfNode::new(Extrusion::new(
            self,
            SketchPlane::Xy,
            f32::NEG_INFINITY,
            f32::INFINITY,
        ))
    }

    /// Extrude from the given sketch plane between `lo` and `hi` along its normal
    fn extrude_on(self, plane: SketchPlane, lo: f32, hi: f32) -> SdfNode {
        SdfNode::new(Extrusion::new(self, plane, lo, hi))
    }
}

impl<T: Sdf2 + 'static> SketchExt for T {}

/// Union of any number of sketches; `None` when the iterator is empty
pub fn union_all<I>(parts: I) -> Option<SketchNode>
where
    I: IntoIterator<Item = SketchNode>,
{
    parts.into_iter().reduce(|acc, part| acc.union(part))
}

/// Union of sketches with every seam filleted by `r`
pub fn round_union_all<I>(parts: I, r: f32) -> Option<SketchNode>
where
    I: IntoIterator<Item = SketchNode>,
{
    parts.into_iter().reduce(|acc, part| acc.round_union(part, r))
}
