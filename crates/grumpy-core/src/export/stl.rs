//! STL file export (Binary format)
//!
//! Binary STL is what slicers expect. It has no shared vertices, so every
//! facet repeats its three corners.
//!
//! Layout:
//! - 80 bytes: Header (arbitrary text)
//! - 4 bytes: Number of triangles (u32 little-endian)
//! - For each triangle (50 bytes):
//!   - 12 bytes: Normal vector (3 x f32 little-endian)
//!   - 36 bytes: 3 vertices (9 x f32 little-endian)
//!   - 2 bytes: Attribute byte count (0)

use crate::mesh::Mesh;
use crate::{Error, Result};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One facet record without its attribute count
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct Facet {
    normal: [f32; 3],
    corners: [[f32; 3]; 3],
}

/// Export a mesh to a binary STL file
pub fn export_stl(mesh: &Mesh, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_stl(mesh, &mut writer)?;
    writer.flush()?;
    tracing::info!(path = %path.display(), triangles = mesh.triangle_count(), "wrote STL");
    Ok(())
}

/// Write a mesh as binary STL
pub fn write_stl<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    let count = u32::try_from(mesh.triangle_count())
        .map_err(|_| Error::Export("too many triangles for STL".to_string()))?;

    let header = format!(
        "Grumpy STL Export - {} vertices, {} triangles",
        mesh.vertex_count(),
        count
    );
    let mut header_bytes = [b' '; 80];
    let header_len = header.len().min(80);
    header_bytes[..header_len].copy_from_slice(&header.as_bytes()[..header_len]);
    writer.write_all(&header_bytes)?;
    writer.write_all(&count.to_le_bytes())?;

    for [a, b, c] in mesh.triangles() {
        // Facet normal, not the smoothed vertex normals
        let normal = (b - a).cross(c - a).try_normalize().unwrap_or(Vec3::Z);
        let facet = Facet {
            normal: normal.to_array(),
            corners: [a.to_array(), b.to_array(), c.to_array()],
        };
        for value in bytemuck::cast::<Facet, [f32; 12]>(facet) {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mesh::Vertex;

    fn mesh(positions: &[[f32; 3]], indices: Vec<u32>) -> Mesh {
        Mesh {
            vertices: positions
                .iter()
                .map(|&p| Vertex::new(Vec3::from_array(p), Vec3::Z))
                .collect(),
            indices,
        }
    }

    fn read_f32(bytes: &[u8], offset: usize) -> f32 {
        f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn single_triangle() {
        let tri = mesh(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2],
        );
        let mut bytes = Vec::new();
        write_stl(&tri, &mut bytes).unwrap();

        // 80 (header) + 4 (count) + 50 (one triangle)
        assert_eq!(bytes.len(), 134);
        assert!(bytes.starts_with(b"Grumpy STL Export"));
        assert_eq!(u32::from_le_bytes(bytes[80..84].try_into().unwrap()), 1);
        // Facet normal is +Z
        assert_eq!(read_f32(&bytes, 84 + 8), 1.0);
        // Second corner
        assert_eq!(read_f32(&bytes, 84 + 24), 1.0);
        assert_eq!(&bytes[132..134], &[0, 0]);
    }

    #[test]
    fn cube_file_size() {
        let cube = mesh(
            &[
                [-0.5, -0.5, 0.5],
                [0.5, -0.5, 0.5],
                [0.5, 0.5, 0.5],
                [-0.5, 0.5, 0.5],
                [-0.5, -0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, 0.5, -0.5],
                [-0.5, 0.5, -0.5],
            ],
            vec![
                0, 1, 2, 0, 2, 3, // front
                5, 4, 7, 5, 7, 6, // back
                4, 0, 3, 4, 3, 7, // left
                1, 5, 6, 1, 6, 2, // right
                3, 2, 6, 3, 6, 7, // top
                4, 5, 1, 4, 1, 0, // bottom
            ],
        );

        let path = std::env::temp_dir().join("grumpy_test_cube.stl");
        export_stl(&cube, &path).unwrap();
        let metadata = std::fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), 84 + 50 * 12);
        let _ = std::fs::remove_file(&path);
    }
}
