//! The keyboard case
//!
//! [`CaseBuilder`] turns a validated [`CaseParams`] into the solid of the
//! whole case or one of its printable slabs. The right half is assembled
//! first and mirrored about the YZ plane with a filleted seam; the groove
//! and the USB port are then cut across both halves.
//!
//! ```rust
//! use grumpy_core::case::{CaseBuilder, Part};
//! use grumpy_core::params::CaseParams;
//! use grumpy_core::sdf::Sdf;
//! use glam::Vec3;
//!
//! let builder = CaseBuilder::new(CaseParams::default())?;
//! let case = builder.build(Part::Full);
//! assert!(case.distance(Vec3::new(0.0, 0.0, 100.0)) > 0.0);
//! # Ok::<(), grumpy_core::Error>(())
//! ```

pub mod parts;
pub mod sketches;

use crate::params::CaseParams;
use crate::sdf::{SdfExt, SdfNode};
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A printable piece of the case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Part {
    /// Everything in one piece
    #[default]
    Full,
    /// Hollow rim below the plate, with the posts
    Bottom,
    Plate,
    /// Rim around the keycaps
    Top,
}

impl Part {
    pub const ALL: [Part; 4] = [Part::Full, Part::Bottom, Part::Plate, Part::Top];

    pub fn name(&self) -> &'static str {
        match self {
            Part::Full => "full",
            Part::Bottom => "bottom",
            Part::Plate => "plate",
            Part::Top => "top",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Part {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Part::ALL
            .into_iter()
            .find(|part| part.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid("part", format!("unknown part `{s}`")))
    }
}

/// Builds case solids from one parameter set
#[derive(Debug, Clone)]
pub struct CaseBuilder {
    params: CaseParams,
}

impl CaseBuilder {
    /// Validate `params` and wrap them in a builder
    pub fn new(params: CaseParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &CaseParams {
        &self.params
    }

    /// Right half of `part`, before mirroring
    pub fn half(&self, part: Part) -> SdfNode {
        let p = &self.params;
        match part {
            Part::Full => self
                .bottom_with_posts()
                .union(parts::plate(p))
                .union(parts::top(p)),
            Part::Bottom => self.bottom_with_posts(),
            Part::Plate => parts::plate(p),
            Part::Top => parts::top(p),
        }
    }

    fn bottom_with_posts(&self) -> SdfNode {
        let p = &self.params;
        let bottom = parts::bottom(p);
        match parts::bumpons(p) {
            Some(posts) => bottom.union(posts),
            None => bottom,
        }
    }

    /// The finished solid of `part`, both halves
    pub fn build(&self, part: Part) -> SdfNode {
        let p = &self.params;
        tracing::info!(%part, hand_angle = p.hand_angle_deg, "building case");

        let mut case = self.half(part).mirror_x_blended(p.mirror_fillet);

        if matches!(part, Part::Full | Part::Top) {
            tracing::debug!(offset = p.groove_offset_y, depth = p.groove_depth, "cutting groove");
            case = case.round_subtract(parts::groove(p), p.outer_radius_small);
        }

        tracing::debug!("cutting usb port");
        let (opening, recess) = parts::usb_cuts(p);
        case.chamfer_subtract(opening, p.usb.chamfer)
            .chamfer_subtract(recess, p.usb.chamfer)
    }
}
