//! SDF Primitive solids
//!
//! All primitives are centered at the origin. Use transforms to position them.

use super::{Aabb, Sdf, UNBOUNDED};
use glam::{Vec2, Vec3};

// ============================================================================
// Constructor functions (ergonomic API)
// ============================================================================

/// Create a sphere with given radius
pub fn sphere(radius: f32) -> Sphere {
    Sphere::new(radius)
}

/// Create a box with given full size along each axis
pub fn box3(size: Vec3) -> Box3 {
    Box3::new(size * 0.5)
}

/// Create a cylinder (Z-axis aligned) with given radius and height
pub fn cylinder(radius: f32, height: f32) -> Cylinder {
    Cylinder::new(radius, height)
}

/// Create a half-space `p . normal + offset <= 0`
pub fn plane(normal: Vec3, offset: f32) -> Plane {
    Plane::new(normal, offset)
}

/// Everything at or below `z`
pub fn below_z(z: f32) -> Plane {
    Plane::new(Vec3::Z, -z)
}

/// Everything at or above `z`
pub fn above_z(z: f32) -> Plane {
    Plane::new(Vec3::NEG_Z, z)
}

// ============================================================================
// Primitive Structs
// ============================================================================

/// Sphere centered at origin
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub radius: f32,
}

impl Sphere {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl Sdf for Sphere {
    fn distance(&self, p: Vec3) -> f32 {
        p.length() - self.radius
    }

    fn bounds(&self) -> Aabb {
        Aabb::cube(self.radius)
    }
}

/// Axis-aligned box (rectangular prism)
#[derive(Debug, Clone, Copy)]
pub struct Box3 {
    pub half_extents: Vec3,
}

impl Box3 {
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }
}

impl Sdf for Box3 {
    fn distance(&self, p: Vec3) -> f32 {
        let q = p.abs() - self.half_extents;
        q.max(Vec3::ZERO).length() + q.x.max(q.y.max(q.z)).min(0.0)
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(-self.half_extents, self.half_extents)
    }
}

/// Cylinder aligned with Z axis
#[derive(Debug, Clone, Copy)]
pub struct Cylinder {
    pub radius: f32,
    pub half_height: f32,
}

impl Cylinder {
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius,
            half_height: height * 0.5,
        }
    }
}

impl Sdf for Cylinder {
    fn distance(&self, p: Vec3) -> f32 {
        let d = Vec2::new(Vec2::new(p.x, p.y).length(), p.z).abs()
            - Vec2::new(self.radius, self.half_height);
        d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length()
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(
            Vec3::new(-self.radius, -self.radius, -self.half_height),
            Vec3::new(self.radius, self.radius, self.half_height),
        )
    }
}

/// Half-space bounded by a plane
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    pub fn new(normal: Vec3, offset: f32) -> Self {
        Self {
            normal: normal.normalize(),
            offset,
        }
    }
}

impl Sdf for Plane {
    fn distance(&self, p: Vec3) -> f32 {
        p.dot(self.normal) + self.offset
    }

    fn bounds(&self) -> Aabb {
        // Only an axis-aligned half-space has a useful bound
        let mut bounds = Aabb::cube(UNBOUNDED);
        let limit = -self.offset;
        if self.normal == Vec3::Z {
            bounds.max.z = limit;
        } else if self.normal == Vec3::NEG_Z {
            bounds.min.z = -limit;
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn box_distance_is_exact_on_faces() {
        let b = box3(Vec3::new(4.0, 2.0, 2.0));
        assert_relative_eq!(b.distance(Vec3::ZERO), -1.0);
        assert_relative_eq!(b.distance(Vec3::new(3.0, 0.0, 0.0)), 1.0);
        assert_relative_eq!(b.distance(Vec3::new(2.0, 1.0, 0.0)), 0.0);
    }

    #[test]
    fn box_distance_to_corner() {
        let b = box3(Vec3::splat(2.0));
        let d = b.distance(Vec3::new(2.0, 2.0, 1.0));
        assert_relative_eq!(d, 2f32.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn cylinder_stands_on_z() {
        let c = cylinder(1.0, 4.0);
        assert!(c.distance(Vec3::new(0.0, 0.0, 1.9)) < 0.0);
        assert!(c.distance(Vec3::new(0.0, 0.0, 2.1)) > 0.0);
        assert_relative_eq!(c.distance(Vec3::new(2.0, 0.0, 0.0)), 1.0);
        assert_relative_eq!(c.bounds().max.z, 2.0);
    }

    #[test]
    fn half_spaces() {
        assert!(below_z(3.0).distance(Vec3::new(0.0, 0.0, 2.0)) < 0.0);
        assert!(below_z(3.0).distance(Vec3::new(0.0, 0.0, 4.0)) > 0.0);
        assert!(above_z(3.0).distance(Vec3::new(0.0, 0.0, 4.0)) < 0.0);
        assert_relative_eq!(above_z(3.0).distance(Vec3::new(5.0, 5.0, 1.0)), 2.0);
    }

    #[test]
    fn half_space_bounds_are_clipped_on_z() {
        assert_relative_eq!(below_z(3.0).bounds().max.z, 3.0);
        assert_relative_eq!(above_z(3.0).bounds().min.z, 3.0);
    }
}
