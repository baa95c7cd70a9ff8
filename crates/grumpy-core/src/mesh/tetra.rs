//! Surface extraction inside one grid cell
//!
//! Every cell is cut into the same six tetrahedra sharing the diagonal from
//! corner 0 to corner 7. Crossings are always interpolated from the corner
//! with the lower grid index, so neighbouring cells produce bit-identical
//! vertices on shared edges.

use super::Grid;
use glam::Vec3;

/// Cube corners are numbered `x + 2y + 4z`
const TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 7, 1, 3],
    [0, 7, 3, 2],
    [0, 7, 2, 6],
    [0, 7, 6, 4],
    [0, 7, 4, 5],
    [0, 7, 5, 1],
];

#[derive(Debug, Clone, Copy, Default)]
struct Corner {
    index: usize,
    position: Vec3,
    value: f32,
}

impl Corner {
    fn is_inside(&self) -> bool {
        self.value < 0.0
    }
}

/// Triangles of every cell in the slab `z..z + 1`
pub(crate) fn polygonise_slab(grid: &Grid, values: &[f32], z: usize) -> Vec<[Vec3; 3]> {
    let mut triangles = Vec::new();

    for y in 0..grid.cells[1] {
        for x in 0..grid.cells[0] {
            let mut corners = [Corner::default(); 8];
            for (i, corner) in corners.iter_mut().enumerate() {
                let (cx, cy, cz) = (x + (i & 1), y + ((i >> 1) & 1), z + (i >> 2));
                let index = grid.index(cx, cy, cz);
                *corner = Corner {
                    index,
                    position: grid.position(cx, cy, cz),
                    value: values[index],
                };
            }

            let inside = corners.iter().filter(|c| c.is_inside()).count();
            if inside == 0 || inside == 8 {
                continue;
            }

            for tet in &TETRAHEDRA {
                polygonise_tetrahedron(tet.map(|i| corners[i]), &mut triangles);
            }
        }
    }

    triangles
}

fn polygonise_tetrahedron(tet: [Corner; 4], out: &mut Vec<[Vec3; 3]>) {
    let mut inside = [Corner::default(); 4];
    let mut outside = [Corner::default(); 4];
    let (mut n_in, mut n_out) = (0, 0);
    for corner in tet {
        if corner.is_inside() {
            inside[n_in] = corner;
            n_in += 1;
        } else {
            outside[n_out] = corner;
            n_out += 1;
        }
    }
    let inside = &inside[..n_in];
    let outside = &outside[..n_out];

    if inside.is_empty() || outside.is_empty() {
        return;
    }

    let mean = |corners: &[Corner]| {
        corners.iter().map(|c| c.position).sum::<Vec3>() / corners.len() as f32
    };
    let outward = mean(outside) - mean(inside);

    match (inside, outside) {
        ([a], [b, c, d]) | ([b, c, d], [a]) => {
            emit(
                [crossing(*a, *b), crossing(*a, *c), crossing(*a, *d)],
                outward,
                out,
            );
        }
        ([a, b], [c, d]) => {
            let quad = [
                crossing(*a, *c),
                crossing(*a, *d),
                crossing(*b, *d),
                crossing(*b, *c),
            ];
            emit([quad[0], quad[1], quad[2]], outward, out);
            emit([quad[0], quad[2], quad[3]], outward, out);
        }
        _ => {}
    }
}

/// Zero crossing on the edge between two corners of opposite sign
fn crossing(a: Corner, b: Corner) -> Vec3 {
    let (a, b) = if a.index < b.index { (a, b) } else { (b, a) };
    let t = a.value / (a.value - b.value);
    a.position + (b.position - a.position) * t
}

/// Push `tri` wound so its normal faces `outward`
fn emit(tri: [Vec3; 3], outward: Vec3, out: &mut Vec<[Vec3; 3]>) {
    let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
    if normal.dot(outward) < 0.0 {
        out.push([tri[0], tri[2], tri[1]]);
    } else {
        out.push(tri);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn corner(index: usize, position: Vec3, value: f32) -> Corner {
        Corner {
            index,
            position,
            value,
        }
    }

    fn cube_corner(i: usize) -> Vec3 {
        Vec3::new((i & 1) as f32, ((i >> 1) & 1) as f32, (i >> 2) as f32)
    }

    #[test]
    fn tetrahedra_fill_the_cube() {
        let volume: f32 = TETRAHEDRA
            .iter()
            .map(|t| {
                let [a, b, c, d] = t.map(cube_corner);
                ((b - a).cross(c - a).dot(d - a) / 6.0).abs()
            })
            .sum();
        assert_relative_eq!(volume, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn crossing_is_symmetric() {
        let a = corner(3, Vec3::new(0.1, 0.2, 0.3), -0.7);
        let b = corner(9, Vec3::new(1.3, -0.4, 0.9), 0.35);
        assert_eq!(crossing(a, b), crossing(b, a));
        assert_relative_eq!(crossing(a, b).x, 0.1 + 1.2 * (2.0 / 3.0), epsilon = 1e-6);
    }

    #[test]
    fn single_inside_corner_gives_one_outward_triangle() {
        let tet = [
            corner(0, Vec3::ZERO, -0.5),
            corner(1, Vec3::X, 0.5),
            corner(2, Vec3::Y, 0.5),
            corner(4, Vec3::Z, 0.5),
        ];
        let mut out = Vec::new();
        polygonise_tetrahedron(tet, &mut out);
        assert_eq!(out.len(), 1);
        let [a, b, c] = out[0];
        let normal = (b - a).cross(c - a);
        assert!(normal.dot(Vec3::ONE) > 0.0);
        for p in out[0] {
            assert_relative_eq!(p.length(), 0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn split_tetrahedron_gives_a_quad() {
        let tet = [
            corner(0, Vec3::ZERO, -0.5),
            corner(1, Vec3::X, 0.5),
            corner(2, Vec3::Y, -0.5),
            corner(4, Vec3::Z, 0.5),
        ];
        let mut out = Vec::new();
        polygonise_tetrahedron(tet, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn uniform_tetrahedron_is_skipped() {
        let tet = [
            corner(0, Vec3::ZERO, 1.0),
            corner(1, Vec3::X, 1.0),
            corner(2, Vec3::Y, 0.0),
            corner(4, Vec3::Z, 2.0),
        ];
        let mut out = Vec::new();
        polygonise_tetrahedron(tet, &mut out);
        assert!(out.is_empty());
    }
}
