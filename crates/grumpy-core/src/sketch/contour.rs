//! Traced outlines and open shells
//!
//! Booleans only bound the distance inside a union, so shrinking a composed
//! outline leaves walls wherever a cut-away edge sits close to the part that
//! remains. An [`OpenShell2`] measures to the traced boundary instead and
//! drops the stretches that fall outside its `keep` region.

use super::{Bounds2, Sdf2};
use glam::{IVec2, Vec2};
use rayon::prelude::*;

/// Grid step used to trace outlines for shells
pub const TRACE_STEP: f32 = 0.2;

/// Upper limit on grid cells along either axis of a trace
const MAX_TRACE_CELLS: f32 = 4096.0;

/// Distances past the wall are only needed as a bound
const REACH_MARGIN: f32 = 2.0;

pub type Segment = [Vec2; 2];

/// Zero contour of `sketch` inside `bounds`, by marching squares
///
/// The step is coarsened when `bounds` would need more than
/// `MAX_TRACE_CELLS` cells along an axis.
pub fn trace<S: Sdf2 + ?Sized>(sketch: &S, bounds: Bounds2, step: f32) -> Vec<Segment> {
    let size = bounds.size();
    let step = step.max(size.max_element() / MAX_TRACE_CELLS);
    let nx = (size.x / step).ceil().max(1.0) as usize;
    let ny = (size.y / step).ceil().max(1.0) as usize;
    let origin = bounds.min;
    let at = move |i: usize, j: usize| origin + Vec2::new(i as f32, j as f32) * step;

    let values: Vec<f32> = (0..=ny)
        .into_par_iter()
        .flat_map_iter(|j| (0..=nx).map(move |i| sketch.distance(at(i, j))))
        .collect();
    let value = |i: usize, j: usize| values[j * (nx + 1) + i];

    let mut segments = Vec::new();
    for j in 0..ny {
        for i in 0..nx {
            let corners = [(i, j), (i + 1, j), (i + 1, j + 1), (i, j + 1)];
            let d = corners.map(|(ci, cj)| value(ci, cj));
            let inside = d.map(|v| v < 0.0);
            if inside.iter().all(|&v| v) || !inside.iter().any(|&v| v) {
                continue;
            }

            // Edge k runs from corner k to corner k + 1
            let mut hits = [None; 4];
            for k in 0..4 {
                let l = (k + 1) % 4;
                if inside[k] != inside[l] {
                    let (ai, aj) = corners[k];
                    let (bi, bj) = corners[l];
                    let t = d[k] / (d[k] - d[l]);
                    hits[k] = Some(at(ai, aj).lerp(at(bi, bj), t));
                }
            }

            if let [Some(e0), Some(e1), Some(e2), Some(e3)] = hits {
                // Saddle: the centre decides which diagonal is connected
                let centre = d.iter().sum::<f32>() * 0.25;
                if (centre < 0.0) == inside[0] {
                    segments.push([e0, e1]);
                    segments.push([e2, e3]);
                } else {
                    segments.push([e3, e0]);
                    segments.push([e1, e2]);
                }
            } else {
                let mut found = hits.iter().flatten();
                if let (Some(&a), Some(&b)) = (found.next(), found.next()) {
                    segments.push([a, b]);
                }
            }
        }
    }
    segments
}

/// Keep the parts of `segments` inside `keep`, cutting those that cross it
pub fn clip<K: Sdf2 + ?Sized>(segments: Vec<Segment>, keep: &K) -> Vec<Segment> {
    segments
        .into_iter()
        .filter_map(|[a, b]| {
            let (da, db) = (keep.distance(a), keep.distance(b));
            match (da <= 0.0, db <= 0.0) {
                (true, true) => Some([a, b]),
                (false, false) => None,
                (a_in, _) => {
                    let cut = a.lerp(b, da / (da - db));
                    Some(if a_in { [a, cut] } else { [cut, b] })
                }
            }
        })
        .collect()
}

fn segment_distance(p: Vec2, [a, b]: Segment) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    let t = if len2 > 0.0 {
        ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance(a + ab * t)
}

/// Segments bucketed on a grid for nearby distance queries
pub struct Contour {
    segments: Vec<Segment>,
    buckets: Vec<Vec<usize>>,
    origin: Vec2,
    dims: IVec2,
    reach: f32,
}

impl Contour {
    /// Index `segments` for distance queries out to `reach`
    pub fn new(segments: Vec<Segment>, reach: f32) -> Self {
        let reach = reach.max(f32::EPSILON);
        let (min, max) = segments.iter().flatten().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        );
        if segments.is_empty() {
            return Self {
                segments,
                buckets: Vec::new(),
                origin: Vec2::ZERO,
                dims: IVec2::ZERO,
                reach,
            };
        }

        // Buckets are `reach` wide, so a query only looks at its neighbours
        let dims = ((max - min) / reach).floor().as_ivec2() + IVec2::ONE;
        let mut buckets = vec![Vec::new(); (dims.x * dims.y) as usize];
        for (index, &[a, b]) in segments.iter().enumerate() {
            let lo = ((a.min(b) - min) / reach).floor().as_ivec2().max(IVec2::ZERO);
            let hi = ((a.max(b) - min) / reach).floor().as_ivec2().min(dims - IVec2::ONE);
            for y in lo.y..=hi.y {
                for x in lo.x..=hi.x {
                    buckets[(y * dims.x + x) as usize].push(index);
                }
            }
        }

        Self {
            segments,
            buckets,
            origin: min,
            dims,
            reach,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Unsigned distance to the nearest segment, capped at the reach
    pub fn distance(&self, p: Vec2) -> f32 {
        let cell = ((p - self.origin) / self.reach).floor().as_ivec2();
        let lo = (cell - IVec2::ONE).max(IVec2::ZERO);
        let hi = (cell + IVec2::ONE).min(self.dims - IVec2::ONE);

        let mut best = self.reach;
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                for &index in &self.buckets[(y * self.dims.x + x) as usize] {
                    best = best.min(segment_distance(p, self.segments[index]));
                }
            }
        }
        best
    }
}

/// Wall of `thickness` inside `outline`, cut off and left open at the
/// boundary of `keep`
///
/// Only the stretches of the outline inside `keep` carry a wall, so an edge
/// that `keep` cuts away leaves no wall behind even when it runs close to
/// the cut.
pub struct OpenShell2<S: Sdf2, K: Sdf2> {
    pub outline: S,
    pub keep: K,
    pub thickness: f32,
    contour: Contour,
}

impl<S: Sdf2, K: Sdf2> OpenShell2<S, K> {
    pub fn new(outline: S, keep: K, thickness: f32) -> Self {
        let bounds = outline
            .bounds()
            .intersection(&keep.bounds())
            .expand(2.0 * TRACE_STEP);
        let segments = clip(trace(&outline, bounds, TRACE_STEP), &keep);
        tracing::debug!(segments = segments.len(), "traced shell outline");
        let contour = Contour::new(segments, thickness + REACH_MARGIN);
        Self {
            outline,
            keep,
            thickness,
            contour,
        }
    }
}

impl<S: Sdf2, K: Sdf2> Sdf2 for OpenShell2<S, K> {
    fn distance(&self, p: Vec2) -> f32 {
        self.outline
            .distance(p)
            .max(self.keep.distance(p))
            .max(self.contour.distance(p) - self.thickness)
    }

    fn bounds(&self) -> Bounds2 {
        self.outline.bounds().intersection(&self.keep.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::SketchExt;
    use crate::sketch::shapes::{circle, half_plane, rect};
    use approx::assert_relative_eq;

    #[test]
    fn traced_square_has_its_perimeter() {
        let square = rect(4.0, 4.0);
        let segments = trace(&square, square.bounds().expand(0.5), 0.25);
        let perimeter: f32 = segments.iter().map(|[a, b]| a.distance(*b)).sum();
        // Each corner is cut across one cell
        assert_relative_eq!(perimeter, 16.0, epsilon = 1.0);
        for [a, b] in &segments {
            assert!(square.distance(*a).abs() < 1e-3);
            assert!(square.distance(*b).abs() < 1e-3);
        }
    }

    #[test]
    fn traced_circle_is_closed() {
        let c = circle(3.0);
        let segments = trace(&c, c.bounds().expand(0.5), 0.2);
        assert!(!segments.is_empty());
        let perimeter: f32 = segments.iter().map(|[a, b]| a.distance(*b)).sum();
        assert_relative_eq!(perimeter, 2.0 * std::f32::consts::PI * 3.0, max_relative = 0.02);
    }

    #[test]
    fn clip_cuts_crossing_segments() {
        let segments = vec![
            [Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0)],
            [Vec2::new(-2.0, 1.0), Vec2::new(-1.0, 1.0)],
            [Vec2::new(1.0, 1.0), Vec2::new(3.0, 1.0)],
        ];
        let kept = clip(segments, &half_plane(Vec2::NEG_X, 0.0));
        assert_eq!(kept.len(), 2);
        assert_relative_eq!(kept[0][0].x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(kept[0][1].x, 2.0);
        assert_relative_eq!(kept[1][0].x, 1.0);
    }

    #[test]
    fn contour_distance_is_capped() {
        let contour = Contour::new(vec![[Vec2::ZERO, Vec2::new(10.0, 0.0)]], 2.0);
        assert_eq!(contour.len(), 1);
        assert_relative_eq!(contour.distance(Vec2::new(5.0, 1.5)), 1.5);
        assert_relative_eq!(contour.distance(Vec2::new(-1.0, 0.0)), 1.0);
        assert_relative_eq!(contour.distance(Vec2::new(5.0, 3.0)), 2.0);
        assert_relative_eq!(contour.distance(Vec2::new(500.0, -300.0)), 2.0);
        assert!(Contour::new(Vec::new(), 2.0).is_empty());
    }

    #[test]
    fn open_shell_has_no_wall_at_the_cut() {
        // The square reaches 1 mm past the cut, closer than the wall is thick
        let square = rect(10.0, 10.0).translate(4.0, 0.0);
        let shell = OpenShell2::new(square.clone(), half_plane(Vec2::NEG_X, 0.0), 2.0);
        // Walls along the kept edges
        assert!(shell.distance(Vec2::new(8.0, 0.0)) < 0.0);
        assert!(shell.distance(Vec2::new(4.0, 4.0)) < 0.0);
        assert!(shell.distance(Vec2::new(0.5, -4.0)) < 0.0);
        // Open where the cut-away edge was
        assert!(shell.distance(Vec2::new(0.5, 0.0)) > 0.0);
        assert!(shell.distance(Vec2::new(4.0, 0.0)) > 0.0);
        // Nothing past the cut
        assert!(shell.distance(Vec2::new(-0.5, 4.0)) > 0.0);

        // A plain inward offset keeps the wall
        let offset_wall = square.clone().subtract(square.offset(-2.0));
        assert!(offset_wall.distance(Vec2::new(0.5, 0.0)) < 0.0);
    }
}
