//! Vertex welding and mesh statistics

use super::{Mesh, Vertex};
use crate::sdf::Aabb;
use glam::{IVec3, Vec3};
use std::collections::HashMap;

/// Summary of a closed triangle mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStats {
    pub vertices: usize,
    pub triangles: usize,
    pub bounds: Aabb,
    /// Signed enclosed volume, positive for outward winding
    pub volume: f32,
    /// Edges used by exactly one triangle
    pub open_edges: usize,
}

impl MeshStats {
    pub fn is_closed(&self) -> bool {
        self.open_edges == 0
    }
}

impl Mesh {
    /// Merge vertices closer than `threshold` and drop collapsed triangles
    pub fn weld_vertices(&mut self, threshold: f32) {
        if self.vertices.is_empty() {
            return;
        }

        let threshold_sq = threshold * threshold;
        // Spatial hash with cells twice the threshold, so a match is always
        // in one of the 27 neighbouring cells
        let cell_size = (threshold * 2.0).max(f32::MIN_POSITIVE);
        let key = |p: Vec3| (p / cell_size).floor().as_ivec3();

        let mut buckets: HashMap<IVec3, Vec<u32>> = HashMap::new();
        let mut welded: Vec<Vertex> = Vec::with_capacity(self.vertices.len() / 2);
        let mut remap: Vec<u32> = Vec::with_capacity(self.vertices.len());

        for v in &self.vertices {
            let pos = v.position();
            let home = key(pos);

            let mut found = None;
            'search: for dz in -1..=1 {
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let Some(bucket) = buckets.get(&(home + IVec3::new(dx, dy, dz))) else {
                            continue;
                        };
                        for &j in bucket {
                            if pos.distance_squared(welded[j as usize].position()) <= threshold_sq {
                                found = Some(j);
                                break 'search;
                            }
                        }
                    }
                }
            }

            let index = found.unwrap_or_else(|| {
                let index = welded.len() as u32;
                welded.push(*v);
                buckets.entry(home).or_default().push(index);
                index
            });
            remap.push(index);
        }

        let mut indices = Vec::with_capacity(self.indices.len());
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| remap[i as usize]);
            if a != b && b != c && c != a {
                indices.extend_from_slice(&[a, b, c]);
            }
        }

        tracing::trace!(
            before = self.vertices.len(),
            after = welded.len(),
            "welded vertices"
        );
        self.vertices = welded;
        self.indices = indices;
    }

    /// Bounds of all vertices, inverted when the mesh is empty
    pub fn bounds(&self) -> Aabb {
        self.vertices.iter().fold(
            Aabb::new(Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |b, v| Aabb::new(b.min.min(v.position()), b.max.max(v.position())),
        )
    }

    /// Enclosed volume by the divergence theorem
    pub fn volume(&self) -> f32 {
        let sum: f64 = self
            .triangles()
            .map(|[a, b, c]| f64::from(a.dot(b.cross(c))))
            .sum();
        (sum / 6.0) as f32
    }

    /// Number of edges not shared by two triangles
    pub fn open_edge_count(&self) -> usize {
        let mut edges: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in self.indices.chunks_exact(3) {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                *edges.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }
        edges.values().filter(|&&n| n == 1).count()
    }

    pub fn stats(&self) -> MeshStats {
        MeshStats {
            vertices: self.vertex_count(),
            triangles: self.triangle_count(),
            bounds: self.bounds(),
            volume: self.volume(),
            open_edges: self.open_edge_count(),
        }
    }
}
