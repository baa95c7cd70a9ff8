//! # Grumpy Core
//!
//! Parametric geometry for a split, column-staggered keyboard case.
//!
//! A [`params::CaseParams`] set drives everything: the key [`layout`], the
//! 2D [`sketch`] profiles of the outline and the cutouts, and the solids
//! built from them in [`case`]. Solids are signed distance functions
//! ([`sdf`]) that are polygonised by [`mesh`] and written out by
//! [`export`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grumpy_core::prelude::*;
//!
//! let builder = CaseBuilder::new(CaseParams::default())?;
//! let case = builder.build(Part::Full);
//! let mesh = case.to_mesh(&MeshConfig::default())?;
//! mesh.export("case.stl")?;
//! # Ok::<(), grumpy_core::Error>(())
//! ```
//!
//! ## Units and Conventions
//!
//! - **Distances**: millimetres
//! - **Angles**: degrees in [`params::CaseParams`], radians everywhere else
//! - **Coordinate system**: right-handed, Z-up, the case sits on `z = 0`
//!   and is symmetric about the YZ plane

pub mod case;
pub mod export;
pub mod layout;
pub mod mesh;
pub mod params;
pub mod sdf;
pub mod sketch;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::case::{CaseBuilder, Part};
    pub use crate::params::CaseParams;

    // Geometry layers
    pub use crate::sdf::{Aabb, Sdf, SdfExt, SdfNode};
    pub use crate::sketch::{Sdf2, SketchExt, SketchNode};

    // Mesh generation and export
    pub use crate::export::{ExportFormat, MeshExport};
    pub use crate::mesh::{Mesh, MeshConfig, MeshStats, SdfToMesh, Vertex};

    pub use glam::{Vec2, Vec3};

    pub use crate::{Error, Result};
}
