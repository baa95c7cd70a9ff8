//! Sketch primitives
//!
//! Shapes are centred at the origin unless stated otherwise.

use super::{Bounds2, Sdf2};
use crate::sdf::UNBOUNDED;
use glam::{Vec2, Vec4};

/// Sharp rectangle with full `width` and `height`
pub fn rect(width: f32, height: f32) -> Rect {
    Rect::new(Vec2::new(width, height), Corners::ZERO)
}

/// Rectangle with every corner filleted by `radius`
pub fn rounded_rect(width: f32, height: f32, radius: f32) -> Rect {
    Rect::new(Vec2::new(width, height), Corners::uniform(radius))
}

/// Rectangle with an individual fillet per corner
pub fn rect_with_corners(width: f32, height: f32, corners: Corners) -> Rect {
    Rect::new(Vec2::new(width, height), corners)
}

pub fn circle(radius: f32) -> Circle {
    Circle { radius }
}

/// Everything on the side of the line `p . normal + offset <= 0`
pub fn half_plane(normal: Vec2, offset: f32) -> HalfPlane {
    HalfPlane {
        normal: normal.normalize(),
        offset,
    }
}

/// A sketch with no area, the identity of union
pub fn empty() -> Empty {
    Empty
}

/// Fillet radius per rectangle corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Corners {
    pub top_right: f32,
    pub bottom_right: f32,
    pub top_left: f32,
    pub bottom_left: f32,
}

impl Corners {
    pub const ZERO: Self = Self::uniform(0.0);

    pub const fn uniform(r: f32) -> Self {
        Self {
            top_right: r,
            bottom_right: r,
            top_left: r,
            bottom_left: r,
        }
    }

    /// `right` on both +x corners, `left` on both -x corners
    pub const fn sides(right: f32, left: f32) -> Self {
        Self {
            top_right: right,
            bottom_right: right,
            top_left: left,
            bottom_left: left,
        }
    }

    /// `top` on both +y corners, `bottom` on both -y corners
    pub const fn ends(top: f32, bottom: f32) -> Self {
        Self {
            top_right: top,
            bottom_right: bottom,
            top_left: top,
            bottom_left: bottom,
        }
    }

    fn as_vec4(self) -> Vec4 {
        Vec4::new(
            self.top_right,
            self.bottom_right,
            self.top_left,
            self.bottom_left,
        )
    }
}

/// Rectangle with per-corner fillets
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub half_size: Vec2,
    radii: Vec4,
}

impl Rect {
    /// Radii are clamped to half the shorter side
    pub fn new(size: Vec2, corners: Corners) -> Self {
        let half_size = size.abs() * 0.5;
        let limit = half_size.min_element();
        Self {
            half_size,
            radii: corners.as_vec4().clamp(Vec4::ZERO, Vec4::splat(limit)),
        }
    }
}

impl Sdf2 for Rect {
    fn distance(&self, p: Vec2) -> f32 {
        let pair = if p.x > 0.0 {
            Vec2::new(self.radii.x, self.radii.y)
        } else {
            Vec2::new(self.radii.z, self.radii.w)
        };
        let r = if p.y > 0.0 { pair.x } else { pair.y };
        let q = p.abs() - self.half_size + Vec2::splat(r);
        q.x.max(q.y).min(0.0) + q.max(Vec2::ZERO).length() - r
    }

    fn bounds(&self) -> Bounds2 {
        Bounds2::new(-self.half_size, self.half_size)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub radius: f32,
}

impl Sdf2 for Circle {
    fn distance(&self, p: Vec2) -> f32 {
        p.length() - self.radius
    }

    fn bounds(&self) -> Bounds2 {
        Bounds2::square(self.radius)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HalfPlane {
    pub normal: Vec2,
    pub offset: f32,
}

impl Sdf2 for HalfPlane {
    fn distance(&self, p: Vec2) -> f32 {
        p.dot(self.normal) + self.offset
    }

    fn bounds(&self) -> Bounds2 {
        let mut bounds = Bounds2::square(UNBOUNDED);
        let limit = -self.offset;
        if self.normal == Vec2::X {
            bounds.max.x = limit;
        } else if self.normal == Vec2::NEG_X {
            bounds.min.x = -limit;
        } else if self.normal == Vec2::Y {
            bounds.max.y = limit;
        } else if self.normal == Vec2::NEG_Y {
            bounds.min.y = -limit;
        }
        bounds
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Empty;

impl Sdf2 for Empty {
    fn distance(&self, _p: Vec2) -> f32 {
        f32::INFINITY
    }

    fn bounds(&self) -> Bounds2 {
        Bounds2::new(Vec2::splat(UNBOUNDED), Vec2::splat(-UNBOUNDED))
    }
}
