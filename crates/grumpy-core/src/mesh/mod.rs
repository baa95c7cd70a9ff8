//! Mesh generation from SDFs using marching tetrahedra
//!
//! The distance field is sampled on a regular grid with Rayon, each cell is
//! split into six tetrahedra around its main diagonal, and the zero level
//! set is extracted per tetrahedron. The split is the same in every cell,
//! so neighbouring cells agree on their shared faces and the result is a
//! closed surface once coincident vertices are welded.

mod optimize;
mod tetra;

use crate::sdf::{Aabb, Sdf};
use crate::{Error, Result};
use glam::Vec3;
use rayon::prelude::*;

pub use optimize::MeshStats;

/// A vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// A triangle mesh, counter-clockwise seen from outside
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Corner positions of every triangle
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize].position(),
                self.vertices[tri[1] as usize].position(),
                self.vertices[tri[2] as usize].position(),
            ]
        })
    }

    /// Smooth vertex normals from area weighted face normals
    pub fn recalculate_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = [0.0, 0.0, 0.0];
        }

        for tri in self.indices.chunks_exact(3) {
            let p0 = self.vertices[tri[0] as usize].position();
            let p1 = self.vertices[tri[1] as usize].position();
            let p2 = self.vertices[tri[2] as usize].position();
            let face_normal = (p1 - p0).cross(p2 - p0);

            for &i in tri {
                let n = &mut self.vertices[i as usize].normal;
                n[0] += face_normal.x;
                n[1] += face_normal.y;
                n[2] += face_normal.z;
            }
        }

        for v in &mut self.vertices {
            v.normal = Vec3::from_array(v.normal).normalize_or_zero().to_array();
        }
    }
}

/// Configuration for mesh generation
#[derive(Debug, Clone)]
pub struct MeshConfig {
    /// Target edge length of a grid cell
    pub cell_size: f32,
    /// Region to sample, the SDF's own bounds when `None`
    pub bounds: Option<Aabb>,
    /// Margin added around the bounds so the surface is never clipped
    pub padding: f32,
    /// ISO level (distance value for surface extraction)
    pub iso_level: f32,
    /// Vertices closer than this fraction of the cell size are merged
    pub weld_tolerance: f32,
    /// Upper limit on sampled grid points
    pub max_samples: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            cell_size: 0.5,
            bounds: None,
            padding: 1.0,
            iso_level: 0.0,
            weld_tolerance: 1.0e-3,
            max_samples: 256 * 1024 * 1024,
        }
    }
}

impl MeshConfig {
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_iso_level(mut self, iso_level: f32) -> Self {
        self.iso_level = iso_level;
        self
    }
}

/// Extension trait to generate meshes from SDFs
pub trait SdfToMesh: Sdf + Sync {
    /// Generate a mesh from this SDF
    ///
    /// Uses Rayon for parallel mesh generation across all CPU cores.
    fn to_mesh(&self, config: &MeshConfig) -> Result<Mesh> {
        generate_mesh(self, config)
    }
}

impl<T: Sdf + Sync> SdfToMesh for T {}

/// Sampling grid: `cells` cells per axis of size `step` starting at `origin`
#[derive(Debug, Clone, Copy)]
pub(crate) struct Grid {
    pub origin: Vec3,
    pub step: Vec3,
    pub cells: [usize; 3],
}

impl Grid {
    fn new(bounds: Aabb, cell_size: f32) -> Self {
        let size = bounds.size();
        let cells = (size / cell_size).ceil().max(Vec3::ONE);
        Self {
            origin: bounds.min,
            step: size / cells,
            cells: [cells.x as usize, cells.y as usize, cells.z as usize],
        }
    }

    /// Grid points along each axis
    fn points(&self) -> [usize; 3] {
        [self.cells[0] + 1, self.cells[1] + 1, self.cells[2] + 1]
    }

    fn sample_count(&self) -> usize {
        let [nx, ny, nz] = self.points();
        nx.saturating_mul(ny).saturating_mul(nz)
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let [nx, ny, _] = self.points();
        (z * ny + y) * nx + x
    }

    fn position(&self, x: usize, y: usize, z: usize) -> Vec3 {
        self.origin + Vec3::new(x as f32, y as f32, z as f32) * self.step
    }
}

/// Generate a mesh from an SDF
///
/// Uses Rayon for parallel processing:
/// - Parallel SDF sampling to build the distance field
/// - Parallel slab processing for the tetrahedra
pub fn generate_mesh<S: Sdf + ?Sized + Sync>(sdf: &S, config: &MeshConfig) -> Result<Mesh> {
    if !(config.cell_size.is_finite() && config.cell_size > 0.0) {
        return Err(Error::MeshGeneration(format!(
            "cell size must be positive, got {}",
            config.cell_size
        )));
    }

    let bounds = config
        .bounds
        .unwrap_or_else(|| sdf.bounds())
        .expand(config.padding.max(0.0));
    if !bounds.is_finite_volume() {
        return Err(Error::MeshGeneration(
            "shape is unbounded, pass explicit bounds".to_string(),
        ));
    }

    let grid = Grid::new(bounds, config.cell_size);
    let samples = grid.sample_count();
    if samples > config.max_samples {
        return Err(Error::MeshGeneration(format!(
            "{samples} grid samples exceed the limit of {}, use a larger cell size",
            config.max_samples
        )));
    }
    tracing::debug!(cells = ?grid.cells, samples, "sampling distance field");

    // === Phase 1: Parallel SDF sampling ===
    let [nx, ny, _] = grid.points();
    let values: Vec<f32> = (0..samples)
        .into_par_iter()
        .map(|idx| {
            let x = idx % nx;
            let y = (idx / nx) % ny;
            let z = idx / (nx * ny);
            sdf.distance(grid.position(x, y, z)) - config.iso_level
        })
        .collect();

    // === Phase 2: Parallel polygonisation, one z slab per task ===
    let slabs: Vec<Vec<[Vec3; 3]>> = (0..grid.cells[2])
        .into_par_iter()
        .map(|z| tetra::polygonise_slab(&grid, &values, z))
        .collect();

    // === Phase 3: Merge and weld ===
    let mut mesh = Mesh::new();
    let triangle_total: usize = slabs.iter().map(Vec::len).sum();
    mesh.vertices.reserve(triangle_total * 3);
    mesh.indices.reserve(triangle_total * 3);
    for tri in slabs.into_iter().flatten() {
        for corner in tri {
            mesh.indices.push(mesh.vertices.len() as u32);
            mesh.vertices.push(Vertex::new(corner, Vec3::ZERO));
        }
    }

    if mesh.is_empty() {
        return Err(Error::MeshGeneration(
            "no surface found inside the sampled bounds".to_string(),
        ));
    }

    let tolerance = config.weld_tolerance * grid.step.min_element();
    mesh.weld_vertices(tolerance);
    mesh.recalculate_normals();

    tracing::debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "mesh extracted"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::sdf::{SdfExt, box3, sphere};
    use approx::assert_relative_eq;

    #[test]
    fn box_meshes_to_its_volume() {
        let b = box3(Vec3::new(4.0, 3.0, 2.0));
        // Odd padding keeps the samples off the faces
        let config = MeshConfig::default().with_cell_size(0.25).with_padding(0.55);
        let mesh = b.to_mesh(&config).unwrap();
        let stats = mesh.stats();
        // Sharp edges come out bevelled across one cell, about 0.5 mm^3 here
        assert_relative_eq!(stats.volume, 24.0, epsilon = 1.0);
        assert!(stats.volume < 24.0);
        assert_relative_eq!(stats.bounds.min.x, -2.0, epsilon = 0.05);
        assert_relative_eq!(stats.bounds.max.z, 1.0, epsilon = 0.05);
        assert_eq!(stats.open_edges, 0);
    }

    #[test]
    fn sphere_volume_converges() {
        let s = sphere(2.0);
        let mesh = s.to_mesh(&MeshConfig::default().with_cell_size(0.1)).unwrap();
        let exact = 4.0 / 3.0 * std::f32::consts::PI * 8.0;
        assert_relative_eq!(mesh.stats().volume, exact, max_relative = 0.02);
    }

    #[test]
    fn normals_point_outward() {
        let mesh = sphere(1.0)
            .translate(3.0, 0.0, 0.0)
            .to_mesh(&MeshConfig::default().with_cell_size(0.2))
            .unwrap();
        let center = Vec3::new(3.0, 0.0, 0.0);
        for v in &mesh.vertices {
            let outward = v.position() - center;
            assert!(Vec3::from_array(v.normal).dot(outward) > 0.0);
        }
    }

    #[test]
    fn unbounded_shapes_need_bounds() {
        let half_space = crate::sdf::below_z(0.0);
        let err = half_space.to_mesh(&MeshConfig::default());
        assert!(matches!(err, Err(Error::MeshGeneration(_))));

        let clipped = half_space.to_mesh(
            &MeshConfig::default()
                .with_bounds(Aabb::cube(1.0))
                .with_cell_size(0.25),
        );
        assert!(clipped.is_ok());
    }

    #[test]
    fn bad_cell_size_is_rejected() {
        let err = sphere(1.0).to_mesh(&MeshConfig::default().with_cell_size(0.0));
        assert!(matches!(err, Err(Error::MeshGeneration(_))));
    }

    #[test]
    fn sample_limit_is_enforced() {
        let mut config = MeshConfig::default().with_cell_size(0.01);
        config.max_samples = 1000;
        let err = sphere(1.0).to_mesh(&config);
        assert!(matches!(err, Err(Error::MeshGeneration(_))));
    }

    #[test]
    fn empty_region_is_an_error() {
        let config = MeshConfig::default()
            .with_bounds(Aabb::new(Vec3::splat(10.0), Vec3::splat(12.0)))
            .with_padding(0.0);
        let err = sphere(1.0).to_mesh(&config);
        assert!(matches!(err, Err(Error::MeshGeneration(_))));
    }

    #[test]
    fn grid_is_not_required_to_be_cubic() {
        let grid = Grid::new(Aabb::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 0.3)), 0.25);
        assert_eq!(grid.cells, [4, 8, 2]);
        assert_relative_eq!(grid.step.z, 0.15);
        assert_eq!(grid.index(4, 8, 2), grid.sample_count() - 1);
    }
}
