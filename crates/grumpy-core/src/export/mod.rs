//! Export functionality for meshes

mod obj;
mod stl;

use crate::Result;
use crate::mesh::Mesh;
use std::path::Path;

pub use obj::{export_obj, write_obj};
pub use stl::{export_stl, write_stl};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Stl,
    Obj,
}

impl ExportFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("stl") {
            Some(Self::Stl)
        } else if ext.eq_ignore_ascii_case("obj") {
            Some(Self::Obj)
        } else {
            None
        }
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
        }
    }

    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stl => "STL (Binary)",
            Self::Obj => "OBJ",
        }
    }
}

/// Extension trait for exporting meshes
pub trait MeshExport {
    /// Export mesh to file, auto-detecting format from extension
    fn export<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    fn export_stl<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    fn export_obj<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

impl MeshExport for Mesh {
    fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match ExportFormat::from_extension(path) {
            Some(ExportFormat::Stl) => self.export_stl(path),
            Some(ExportFormat::Obj) => self.export_obj(path),
            None => Err(crate::Error::Export(format!(
                "Unknown file extension: {}",
                path.display()
            ))),
        }
    }

    fn export_stl<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        export_stl(self, path.as_ref())
    }

    fn export_obj<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        export_obj(self, path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension() {
        let detect = |p: &str| ExportFormat::from_extension(&PathBuf::from(p));
        assert_eq!(detect("case.stl"), Some(ExportFormat::Stl));
        assert_eq!(detect("out/CASE.STL"), Some(ExportFormat::Stl));
        assert_eq!(detect("case.obj"), Some(ExportFormat::Obj));
        assert_eq!(detect("case.glb"), None);
        assert_eq!(detect("case"), None);
    }

    #[test]
    fn unknown_extension_is_an_export_error() {
        let err = Mesh::new().export(std::env::temp_dir().join("grumpy_test.ply"));
        assert!(matches!(err, Err(crate::Error::Export(_))));
    }
}
