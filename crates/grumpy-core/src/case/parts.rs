//! Solids of the right half
//!
//! The case is stacked from three slabs that share the outline: the hollow
//! bottom rim, the switch plate, and the top rim around the keycaps.

use super::sketches;
use crate::params::CaseParams;
use crate::sdf::{SdfExt, SdfNode, above_z, below_z, cylinder, union_all};
use crate::sketch::{SketchExt, SketchPlane};

/// Hollow rim under the plate
///
/// The wall is `min_wall_width` thick, open at the top, the floor and the
/// centre line, with the outer floor edge chamfered.
pub fn bottom(p: &CaseParams) -> SdfNode {
    // The unclipped outline keeps the floor chamfer off the centre line
    sketches::hand_outline(p)
        .prism()
        .chamfer_intersect(above_z(0.0), p.bottom_chamfer)
        .intersect(sketches::rim(p).prism())
        .intersect(below_z(p.height_below_plate()))
}

/// Switch plate with holes and clip relief
pub fn plate(p: &CaseParams) -> SdfNode {
    let z0 = p.plate_bottom();
    let z1 = p.plate_top();
    // Slots start below the plate so no skin is left on its underside
    let slots = sketches::clip_slots(p).extrude(z0 - 1.0, z1 - p.clip_ledge);
    sketches::hand_outline(p)
        .extrude(z0, z1)
        .subtract(sketches::switch_holes(p).prism())
        .subtract(slots)
}

/// Rim above the plate
///
/// Chamfers the outer top edge and the keycap openings separately, then
/// lowers the centre region. The inset chamfer breaks the convex edges the
/// lowering creates, where the floor meets a keycap opening and where the
/// step meets the rim top.
pub fn top(p: &CaseParams) -> SdfNode {
    let h = p.overall_height();
    let outer = sketches::hand_outline(p)
        .prism()
        .chamfer_intersect(below_z(h), p.top_chamfer);
    let openings = below_z(h).chamfer_subtract(sketches::keycap_cutout(p).prism(), p.keyhole_chamfer);
    let inset = sketches::centre_region(p).extrude(h - p.center_inset, h + 1.0);

    outer
        .intersect(openings)
        .intersect(above_z(p.plate_top()))
        .chamfer_subtract(inset, p.inset_chamfer)
}

/// Posts under the plate, `None` when disabled
pub fn bumpons(p: &CaseParams) -> Option<SdfNode> {
    if !p.bumpon.enabled {
        return None;
    }
    let z0 = p.bumpon.floor_gap;
    let z1 = p.height_below_plate();
    let posts = sketches::bumpon_centers(p).into_iter().map(|c| {
        cylinder(p.outer_radius, z1 - z0).translate(c.x, c.y, (z0 + z1) * 0.5)
    });
    union_all(posts)
}

/// Groove across the centre of the top, both halves
pub fn groove(p: &CaseParams) -> SdfNode {
    let h = p.overall_height();
    sketches::groove(p).extrude(h - p.groove_depth, h + 1.0)
}

/// USB opening and plug recess through the back wall at `x = 0`
pub fn usb_cuts(p: &CaseParams) -> (SdfNode, SdfNode) {
    let back = sketches::palm(p).back_y();
    let u = &p.usb;
    let opening =
        sketches::usb_opening(p).extrude_on(SketchPlane::Xz, back - u.inner_depth, back + 1.0);
    let recess =
        sketches::usb_recess(p).extrude_on(SketchPlane::Xz, back - u.recess_depth, back + 1.0);
    (opening, recess)
}
