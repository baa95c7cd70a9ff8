//! Signed Distance Functions (SDF) for 3D solid construction
//!
//! SDFs represent solids as functions that return the distance from any
//! point to the nearest surface. Negative values are inside, positive values
//! are outside, and zero is exactly on the surface.
//!
//! The case is modelled Z-up, in millimetres. Fillets and chamfers are the
//! rounded and chamfered variants of the boolean operations: they break the
//! edges created where the two operands meet and leave every other edge
//! sharp.
//!
//! ## Example
//!
//! ```rust
//! use grumpy_core::sdf::{Sdf, SdfExt, primitives::{box3, cylinder}};
//! use glam::Vec3;
//!
//! let block = box3(Vec3::new(10.0, 10.0, 5.0));
//! let drilled = block.chamfer_subtract(cylinder(3.0, 20.0), 0.5);
//! assert!(drilled.distance(Vec3::ZERO) > 0.0);
//! ```

pub mod operations;
pub mod primitives;
pub mod transforms;

use glam::Vec3;

/// The core SDF trait - any type that can compute distance from a point
pub trait Sdf: Send + Sync {
    /// Calculate the signed distance from point `p` to the surface.
    ///
    /// - Returns negative values for points inside the shape
    /// - Returns positive values for points outside the shape
    /// - Returns zero for points exactly on the surface
    fn distance(&self, p: Vec3) -> f32;

    /// Get an approximate bounding box for this SDF.
    /// Used to size the meshing grid.
    fn bounds(&self) -> Aabb {
        Aabb::cube(UNBOUNDED)
    }
}

/// Half-size used for shapes without a finite extent
pub const UNBOUNDED: f32 = 1.0e4;

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a cube centered at origin
    pub fn cube(half_size: f32) -> Self {
        Self::new(Vec3::splat(-half_size), Vec3::splat(half_size))
    }

    /// Expand the bounding box by a margin
    pub fn expand(&self, margin: f32) -> Self {
        Self::new(
            self.min - Vec3::splat(margin),
            self.max + Vec3::splat(margin),
        )
    }

    /// Merge two bounding boxes
    pub fn union(&self, other: &Aabb) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Overlap of two bounding boxes
    pub fn intersection(&self, other: &Aabb) -> Self {
        Self::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Get the size of the bounding box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// False when any axis is inverted or unbounded
    pub fn is_finite_volume(&self) -> bool {
        let size = self.size();
        size.cmpgt(Vec3::ZERO).all() && size.max_element() < UNBOUNDED
    }
}

/// An SDF node that can be composed and transformed
#[derive(Clone)]
pub struct SdfNode {
    inner: std::sync::Arc<dyn Sdf>,
}

impl SdfNode {
    /// Create a new SDF node from any type implementing Sdf
    pub fn new<S: Sdf + 'static>(sdf: S) -> Self {
        Self {
            inner: std::sync::Arc::new(sdf),
        }
    }
}

impl Sdf for SdfNode {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(p)
    }

    fn bounds(&self) -> Aabb {
        self.inner.bounds()
    }
}

/// Extension trait providing chainable operations on SDFs
pub trait SdfExt: Sdf + Sized + 'static {
    // === Boolean Operations ===

    /// Union: combine two shapes (OR)
    fn union<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Union::new(self, other))
    }

    /// Subtraction: cut shape `other` from `self`
    fn subtract<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Subtract::new(self, other))
    }

    /// Intersection: keep only where both shapes overlap (AND)
    fn intersect<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Intersect::new(self, other))
    }

    // === Edge-breaking Boolean Operations ===

    /// Union with a fillet of radius `r` in the concave seam
    fn round_union<S: Sdf + 'static>(self, other: S, r: f32) -> SdfNode {
        SdfNode::new(operations::RoundUnion::new(self, other, r))
    }

    /// Subtraction with the cut edges filleted by radius `r`
    fn round_subtract<S: Sdf + 'static>(self, other: S, r: f32) -> SdfNode {
        SdfNode::new(operations::RoundSubtract::new(self, other, r))
    }

    /// Intersection with the new edges chamfered by `r`
    fn chamfer_intersect<S: Sdf + 'static>(self, other: S, r: f32) -> SdfNode {
        SdfNode::new(operations::ChamferIntersect::new(self, other, r))
    }

    /// Subtraction with the cut edges chamfered by `r`
    fn chamfer_subtract<S: Sdf + 'static>(self, other: S, r: f32) -> SdfNode {
        SdfNode::new(operations::ChamferSubtract::new(self, other, r))
    }

    // === Transforms ===

    /// Translate (move) the shape
    fn translate(self, x: f32, y: f32, z: f32) -> SdfNode {
        SdfNode::new(transforms::Translate::new(self, Vec3::new(x, y, z)))
    }

    /// Rotate around Z axis (angle in radians)
    fn rotate_z(self, angle: f32) -> SdfNode {
        SdfNode::new(transforms::RotateZ::new(self, angle))
    }

    /// Mirror across a plane through the origin, keeping both halves
    fn mirror(self, axis: Vec3) -> SdfNode {
        SdfNode::new(transforms::Mirror::new(self, axis, 0.0))
    }

    /// Mirror across the YZ plane with the seam filleted by `blend`
    fn mirror_x_blended(self, blend: f32) -> SdfNode {
        SdfNode::new(transforms::Mirror::new(self, Vec3::X, blend))
    }
}

// Implement SdfExt for all types that implement Sdf
impl<T: Sdf + 'static> SdfExt for T {}

/// Union of any number of solids; `None` when the iterator is empty
pub fn union_all<I>(parts: I) -> Option<SdfNode>
where
    I: IntoIterator<Item = SdfNode>,
{
    parts.into_iter().reduce(|acc, part| acc.union(part))
}

// Re-exports
pub use operations::*;
pub use primitives::*;
pub use transforms::*;
