//! OBJ file export

use crate::Result;
use crate::mesh::Mesh;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export a mesh to OBJ format
pub fn export_obj(mesh: &Mesh, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer)?;
    writer.flush()?;
    tracing::info!(path = %path.display(), triangles = mesh.triangle_count(), "wrote OBJ");
    Ok(())
}

/// Write positions, normals and faces, units in millimetres
pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Grumpy OBJ Export")?;
    writeln!(writer, "# Vertices: {}", mesh.vertex_count())?;
    writeln!(writer, "# Triangles: {}", mesh.triangle_count())?;

    for v in &mesh.vertices {
        let [x, y, z] = v.position;
        writeln!(writer, "v {x} {y} {z}")?;
    }

    for v in &mesh.vertices {
        let [x, y, z] = v.normal;
        writeln!(writer, "vn {x} {y} {z}")?;
    }

    // OBJ indices are 1-based
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
        writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mesh::Vertex;
    use glam::Vec3;

    #[test]
    fn writes_one_line_per_element() {
        let mesh = Mesh {
            vertices: vec![
                Vertex::new(Vec3::ZERO, Vec3::Z),
                Vertex::new(Vec3::X, Vec3::Z),
                Vertex::new(Vec3::Y, Vec3::Z),
                Vertex::new(Vec3::ONE, Vec3::Z),
            ],
            indices: vec![0, 1, 2, 1, 3, 2],
        };
        let mut bytes = Vec::new();
        write_obj(&mesh, &mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let count = |prefix: &str| text.lines().filter(|l| l.starts_with(prefix)).count();
        assert_eq!(count("v "), 4);
        assert_eq!(count("vn "), 4);
        assert_eq!(count("f "), 2);
        assert!(text.lines().any(|l| l == "f 2//2 4//4 3//3"));
        assert!(text.lines().any(|l| l == "v 1 1 1"));
    }
}
