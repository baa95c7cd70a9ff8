//! Case parameters
//!
//! Every dimension of the case derives from [`CaseParams`]. The defaults
//! describe the reference build: MX spacing, hot-swap sockets below a 1.6 mm
//! PCB, a 14 degree splay per hand. All lengths are millimetres.
//!
//! Parameters can be loaded from TOML; missing fields fall back to the
//! defaults, so a file only needs the values it changes:
//!
//! ```toml
//! hand_angle_deg = 12.0
//! wall_width = 6.0
//!
//! [usb]
//! inner_width = 9.0
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of alpha rows on each hand
pub const ROW_COUNT: u32 = 3;

/// Number of key columns across both hands, used for the nominal case width
pub const NOMINAL_COLUMNS: f32 = 10.0;

/// Scalar parameter set for one case build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseParams {
    /// Key pitch (MX spacing)
    pub spacing: f32,
    /// Plate switch hole size
    pub hole_size: f32,
    pub pcb_thickness: f32,
    /// Hot-swap socket thickness below the PCB
    pub hotswap_thickness: f32,
    /// Extra room to hide hot-swap sockets
    pub hotswap_safety: f32,

    /// Gap between keycap and case
    pub key_safety: f32,
    /// PCB top to plate top
    pub switch_mount_height: f32,
    /// Gap between PCB and plate
    pub space_above_pcb: f32,
    /// Column stagger in units of `spacing`
    pub stagger_ratio: f32,
    /// Rim height measured from the plate
    pub height_above_plate: f32,

    /// Radius of the outer outline fillets
    pub outer_radius: f32,
    /// Radius of the other outline fillets
    pub outer_radius_small: f32,
    /// Side wall width
    pub wall_width: f32,
    /// Minimum wall around keys, also the shell thickness
    pub min_wall_width: f32,

    /// Splay of each hand in degrees
    pub hand_angle_deg: f32,
    /// Hand frame x offset from the centre line
    pub hand_offset_x: f32,
    /// Depth of the lowered centre area
    pub center_inset: f32,

    /// Plate thickness kept above the switch clip slots
    pub clip_ledge: f32,
    pub clip_slot_width: f32,

    /// Fillet radius on the mirror seam
    pub mirror_fillet: f32,
    pub groove_offset_y: f32,
    pub groove_depth: f32,

    pub top_chamfer: f32,
    pub keyhole_chamfer: f32,
    pub inset_chamfer: f32,
    pub bottom_chamfer: f32,
    /// Corner fillet of the keycap openings
    pub key_fillet: f32,

    pub outline: OutlineParams,
    pub usb: UsbParams,
    pub bumpon: BumponParams,
}

impl Default for CaseParams {
    fn default() -> Self {
        Self {
            spacing: 19.05,
            hole_size: 14.0,
            pcb_thickness: 1.6,
            hotswap_thickness: 1.85,
            hotswap_safety: 1.0,
            key_safety: 0.5,
            switch_mount_height: 5.0,
            space_above_pcb: 0.25,
            stagger_ratio: 0.25,
            height_above_plate: 8.5,
            outer_radius: 5.0,
            outer_radius_small: 1.5,
            wall_width: 5.5,
            min_wall_width: 3.0,
            hand_angle_deg: 14.0,
            hand_offset_x: 4.33,
            center_inset: 2.0,
            clip_ledge: 1.5,
            clip_slot_width: 5.0,
            mirror_fillet: 1.0,
            groove_offset_y: 33.0,
            groove_depth: 2.0,
            top_chamfer: 1.0,
            keyhole_chamfer: 0.5,
            inset_chamfer: 0.5,
            bottom_chamfer: 0.7,
            key_fillet: 1.0,
            outline: OutlineParams::default(),
            usb: UsbParams::default(),
            bumpon: BumponParams::default(),
        }
    }
}

/// Palm block and centre notch of the outline, in the hand frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineParams {
    /// Palm centre relative to `(case_width / 4, 0)`
    pub palm_offset: [f32; 2],
    /// Added to `case_width / 2` for the palm width
    pub palm_extra_width: f32,
    /// Added to `2 * spacing + 2 * wall_width` for the palm height
    pub palm_extra_height: f32,
    /// Centre of the notch cut between the hands
    pub notch_center: [f32; 2],
    /// Notch width before subtracting `min_wall_width`
    pub notch_width: f32,
    pub notch_height: f32,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self {
            palm_offset: [-2.0, -8.0],
            palm_extra_width: 10.0,
            palm_extra_height: 12.5,
            notch_center: [-21.2, 5.0],
            notch_width: 40.0,
            notch_height: 46.9,
        }
    }
}

/// USB opening in the back wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsbParams {
    pub inner_width: f32,
    pub inner_height: f32,
    pub inner_fillet: f32,
    pub inner_depth: f32,
    pub recess_width: f32,
    pub recess_height: f32,
    /// Vertical shift of the recess centre above the opening centre
    pub recess_shift: f32,
    pub recess_fillet: f32,
    pub recess_depth: f32,
    pub chamfer: f32,
}

impl Default for UsbParams {
    fn default() -> Self {
        Self {
            inner_width: 10.0,
            inner_height: 5.0,
            inner_fillet: 1.5,
            inner_depth: 10.0,
            recess_width: 12.5,
            recess_height: 10.5,
            recess_shift: 1.5,
            recess_fillet: 2.5,
            recess_depth: 1.0,
            chamfer: 0.75,
        }
    }
}

/// Posts under the plate at the outer corners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BumponParams {
    pub enabled: bool,
    /// Gap between the bed and the post
    pub floor_gap: f32,
}

impl Default for BumponParams {
    fn default() -> Self {
        Self {
            enabled: true,
            floor_gap: 1.0,
        }
    }
}

impl CaseParams {
    /// Parse parameters from TOML, filling missing fields with defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let params: Self = toml::from_str(source)?;
        params.validate()?;
        Ok(params)
    }

    /// Load parameters from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    // === Derived dimensions ===

    /// Stagger between neighbouring columns
    pub fn col_stagger(&self) -> f32 {
        self.stagger_ratio * self.spacing
    }

    pub fn plate_height(&self) -> f32 {
        self.switch_mount_height - self.space_above_pcb
    }

    /// Rim height that hides the PCB and sockets
    pub fn height_below_plate(&self) -> f32 {
        self.pcb_thickness + self.hotswap_thickness + self.hotswap_safety
    }

    pub fn overall_height(&self) -> f32 {
        self.height_above_plate + self.height_below_plate() + self.plate_height()
    }

    /// Nominal width across both hands
    pub fn case_width(&self) -> f32 {
        NOMINAL_COLUMNS * self.spacing + 2.0 * self.wall_width
    }

    pub fn case_height(&self) -> f32 {
        ROW_COUNT as f32 * self.spacing + 2.0 * self.wall_width + 3.0 * self.col_stagger()
    }

    /// Splay of each hand in radians
    pub fn hand_angle(&self) -> f32 {
        self.hand_angle_deg.to_radians()
    }

    /// Smallest non-zero chamfer, the finest detail a mesh has to resolve
    pub fn finest_chamfer(&self) -> Option<f32> {
        [
            self.top_chamfer,
            self.keyhole_chamfer,
            self.inset_chamfer,
            self.bottom_chamfer,
            self.usb.chamfer,
        ]
        .into_iter()
        .filter(|&c| c > 0.0)
        .reduce(f32::min)
    }

    /// Z of the plate underside
    pub fn plate_bottom(&self) -> f32 {
        self.height_below_plate()
    }

    /// Z of the plate top
    pub fn plate_top(&self) -> f32 {
        self.height_below_plate() + self.plate_height()
    }

    /// Check that every dimension is usable before geometry is built
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("spacing", self.spacing),
            ("hole_size", self.hole_size),
            ("pcb_thickness", self.pcb_thickness),
            ("height_above_plate", self.height_above_plate),
            ("wall_width", self.wall_width),
            ("min_wall_width", self.min_wall_width),
            ("clip_slot_width", self.clip_slot_width),
            ("usb.inner_width", self.usb.inner_width),
            ("usb.inner_height", self.usb.inner_height),
            ("usb.recess_width", self.usb.recess_width),
            ("usb.recess_height", self.usb.recess_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::invalid(name, format!("must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("hotswap_thickness", self.hotswap_thickness),
            ("hotswap_safety", self.hotswap_safety),
            ("key_safety", self.key_safety),
            ("space_above_pcb", self.space_above_pcb),
            ("stagger_ratio", self.stagger_ratio),
            ("outer_radius", self.outer_radius),
            ("outer_radius_small", self.outer_radius_small),
            ("center_inset", self.center_inset),
            ("mirror_fillet", self.mirror_fillet),
            ("groove_depth", self.groove_depth),
            ("top_chamfer", self.top_chamfer),
            ("keyhole_chamfer", self.keyhole_chamfer),
            ("inset_chamfer", self.inset_chamfer),
            ("bottom_chamfer", self.bottom_chamfer),
            ("key_fillet", self.key_fillet),
            ("usb.inner_fillet", self.usb.inner_fillet),
            ("usb.recess_fillet", self.usb.recess_fillet),
            ("usb.chamfer", self.usb.chamfer),
            ("bumpon.floor_gap", self.bumpon.floor_gap),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::invalid(
                    name,
                    format!("must be zero or positive, got {value}"),
                ));
            }
        }

        if self.plate_height() <= 0.0 {
            return Err(Error::invalid(
                "space_above_pcb",
                format!(
                    "leaves no plate below switch_mount_height {}",
                    self.switch_mount_height
                ),
            ));
        }
        if self.hole_size + 2.0 >= self.spacing {
            return Err(Error::invalid(
                "hole_size",
                format!("clip slot of {} does not fit the key pitch", self.hole_size + 2.0),
            ));
        }
        if self.clip_ledge <= 0.0 || self.clip_ledge >= self.plate_height() {
            return Err(Error::invalid(
                "clip_ledge",
                format!("must lie inside the plate height {}", self.plate_height()),
            ));
        }
        if self.center_inset + self.top_chamfer >= self.height_above_plate {
            return Err(Error::invalid(
                "center_inset",
                "lowered centre cuts through the rim above the plate",
            ));
        }
        if self.groove_depth >= self.height_above_plate {
            return Err(Error::invalid(
                "groove_depth",
                "groove cuts through the rim above the plate",
            ));
        }
        if 2.0 * self.key_fillet >= self.spacing + self.key_safety {
            return Err(Error::invalid("key_fillet", "larger than the keycap opening"));
        }
        if 2.0 * self.outer_radius >= 2.0 * self.spacing + 2.0 * self.wall_width {
            return Err(Error::invalid("outer_radius", "larger than the palm block"));
        }
        if self.outer_radius_small >= self.min_wall_width + self.spacing / 2.0 {
            return Err(Error::invalid(
                "outer_radius_small",
                "larger than the wall around a key",
            ));
        }
        if self.bottom_chamfer >= self.height_below_plate() {
            return Err(Error::invalid(
                "bottom_chamfer",
                "larger than the rim below the plate",
            ));
        }
        if 2.0 * self.usb.inner_fillet > self.usb.inner_width.min(self.usb.inner_height) {
            return Err(Error::invalid("usb.inner_fillet", "larger than the opening"));
        }
        if self.usb.inner_width >= self.usb.recess_width {
            return Err(Error::invalid(
                "usb.inner_width",
                "opening must be narrower than the recess",
            ));
        }
        if self.bumpon.enabled && self.bumpon.floor_gap >= self.height_below_plate() {
            return Err(Error::invalid(
                "bumpon.floor_gap",
                "posts would not reach the plate",
            ));
        }
        if !(self.hand_angle_deg.is_finite() && self.hand_angle_deg.abs() < 45.0) {
            return Err(Error::invalid(
                "hand_angle_deg",
                format!("must be within +-45 degrees, got {}", self.hand_angle_deg),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_valid() {
        CaseParams::default().validate().unwrap();
    }

    #[test]
    fn derived_heights() {
        let p = CaseParams::default();
        assert_relative_eq!(p.plate_height(), 4.75, epsilon = 1e-5);
        assert_relative_eq!(p.height_below_plate(), 4.45, epsilon = 1e-5);
        assert_relative_eq!(p.overall_height(), 17.7, epsilon = 1e-4);
        assert_relative_eq!(p.plate_top(), 9.2, epsilon = 1e-5);
    }

    #[test]
    fn finest_chamfer_skips_disabled_ones() {
        let mut p = CaseParams::default();
        assert_eq!(p.finest_chamfer(), Some(0.5));
        p.keyhole_chamfer = 0.0;
        p.inset_chamfer = 0.0;
        assert_eq!(p.finest_chamfer(), Some(0.7));
        p.top_chamfer = 0.0;
        p.bottom_chamfer = 0.0;
        p.usb.chamfer = 0.0;
        assert_eq!(p.finest_chamfer(), None);
    }

    #[test]
    fn derived_case_footprint() {
        let p = CaseParams::default();
        assert_relative_eq!(p.col_stagger(), 4.7625, epsilon = 1e-5);
        assert_relative_eq!(p.case_width(), 201.5, epsilon = 1e-3);
        assert_relative_eq!(p.case_height(), 82.4375, epsilon = 1e-3);
        assert_relative_eq!(p.hand_angle(), 14f32.to_radians());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let p = CaseParams::from_toml_str(
            r#"
            wall_width = 6.0

            [usb]
            inner_depth = 12.0
            "#,
        )
        .unwrap();
        assert_relative_eq!(p.wall_width, 6.0);
        assert_relative_eq!(p.usb.inner_depth, 12.0);
        assert_relative_eq!(p.usb.inner_width, 10.0);
        assert_relative_eq!(p.spacing, 19.05);
    }

    #[test]
    fn toml_round_trip_preserves_defaults() {
        let p = CaseParams::default();
        let text = p.to_toml_string().unwrap();
        assert_eq!(CaseParams::from_toml_str(&text).unwrap(), p);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = CaseParams::from_toml_str("spacing = \"wide\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_negative_spacing() {
        let p = CaseParams {
            spacing: -1.0,
            ..CaseParams::default()
        };
        let err = p.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "spacing", .. }));
    }

    #[test]
    fn rejects_clip_ledge_thicker_than_plate() {
        let p = CaseParams {
            clip_ledge: 5.0,
            ..CaseParams::default()
        };
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter { name: "clip_ledge", .. })
        ));
    }

    #[test]
    fn rejects_hole_larger_than_pitch() {
        let p = CaseParams {
            hole_size: 18.0,
            ..CaseParams::default()
        };
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter { name: "hole_size", .. })
        ));
    }

    #[test]
    fn rejects_inset_through_rim() {
        let p = CaseParams {
            center_inset: 8.0,
            ..CaseParams::default()
        };
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter { name: "center_inset", .. })
        ));
    }

    #[test]
    fn rejects_oversized_usb_fillet() {
        let mut p = CaseParams::default();
        p.usb.inner_fillet = 3.0;
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter { name: "usb.inner_fillet", .. })
        ));
    }

    #[test]
    fn rejects_no_plate() {
        let p = CaseParams {
            space_above_pcb: 5.0,
            ..CaseParams::default()
        };
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter { name: "space_above_pcb", .. })
        ));
    }
}
