//! 2D profiles of the case
//!
//! Profiles are drawn in the hand frame, where the key layout lives, and
//! returned in world XY for the right hand. The USB profiles are the
//! exception: they are drawn on the XZ plane of the back wall.

use crate::layout::{self, HandFrame};
use crate::params::CaseParams;
use crate::sketch::shapes::{Corners, empty, half_plane, rect, rect_with_corners, rounded_rect};
use crate::sketch::{SketchExt, SketchNode, round_union_all, union_all};
use glam::Vec2;
use std::f32::consts::PI;

/// The palm block, axis aligned in world XY
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palm {
    pub center: Vec2,
    pub size: Vec2,
}

impl Palm {
    /// Y of the back face, where the USB port sits
    pub fn back_y(&self) -> f32 {
        self.center.y + self.size.y * 0.5
    }

    pub fn front_y(&self) -> f32 {
        self.center.y - self.size.y * 0.5
    }

    /// X of the outer face
    pub fn right_x(&self) -> f32 {
        self.center.x + self.size.x * 0.5
    }
}

/// Centre of the palm block in the hand frame
fn palm_center_local(p: &CaseParams) -> Vec2 {
    let [dx, dy] = p.outline.palm_offset;
    Vec2::new(p.case_width() / 4.0 + dx, dy)
}

pub fn palm(p: &CaseParams) -> Palm {
    let frame = HandFrame::new(p);
    Palm {
        center: frame.to_world(palm_center_local(p)),
        size: Vec2::new(
            p.case_width() / 2.0 + p.outline.palm_extra_width,
            2.0 * p.spacing + 2.0 * p.wall_width + p.outline.palm_extra_height,
        ),
    }
}

fn place(sketch: SketchNode, frame: &HandFrame) -> SketchNode {
    sketch.rotate(frame.angle).translate_by(frame.offset)
}

/// One rectangle per alpha column plus one per thumb key
///
/// Columns are `s + grow` wide, thumbs `1.5 s + grow`, all with `fillet`
/// corners.
fn key_blocks(p: &CaseParams, grow: f32, fillet: f32) -> Vec<SketchNode> {
    let s = p.spacing;
    let columns = layout::columns(p).into_iter().map(|col| {
        rounded_rect(s + grow, col.span() + s + grow, fillet).translate(col.x, col.center_y())
    });
    let thumbs = layout::thumb_key_positions(p)
        .into_iter()
        .map(|key| rounded_rect(1.5 * s + grow, s + grow, fillet).translate_by(key));
    columns.chain(thumbs).collect()
}

fn outline_local(p: &CaseParams) -> SketchNode {
    let l = p.min_wall_width;
    let f = p.outer_radius_small;
    let o = &p.outline;

    // The palm is square to the world, so it is turned back against the hand
    let size = palm(p).size;
    let palm = rect_with_corners(size.x, size.y, Corners::sides(p.outer_radius, f))
        .rotate(-p.hand_angle())
        .translate_by(palm_center_local(p));

    let notch = rect(o.notch_width - l, o.notch_height)
        .translate(o.notch_center[0], o.notch_center[1]);

    key_blocks(p, 2.0 * l, f)
        .into_iter()
        .fold(palm, |body, block| body.round_union(block, f))
        .round_subtract(notch, f)
}

/// Outline of the right hand, extending past the centre line
///
/// Solids are built from this profile so that nothing closes the case
/// along `x = 0` before it is mirrored.
pub fn hand_outline(p: &CaseParams) -> SketchNode {
    place(outline_local(p), &HandFrame::new(p))
}

/// Outline of the right half, `x >= 0`
pub fn outline(p: &CaseParams) -> SketchNode {
    hand_outline(p).intersect(half_plane(Vec2::NEG_X, 0.0))
}

/// Footprint of the bottom rim's wall, open along the centre line
///
/// Edges of the hand outline that lie past `x = 0` carry no wall, so the
/// cavity runs through once the halves are mirrored together.
pub fn rim(p: &CaseParams) -> SketchNode {
    hand_outline(p).open_shell(p.min_wall_width, half_plane(Vec2::NEG_X, 0.0))
}

fn keycap_cutout_local(p: &CaseParams) -> SketchNode {
    let r = p.key_fillet;
    round_union_all(key_blocks(p, p.key_safety, r), r)
        .unwrap_or_else(|| SketchNode::new(empty()))
}

/// Openings around the keycaps
pub fn keycap_cutout(p: &CaseParams) -> SketchNode {
    place(keycap_cutout_local(p), &HandFrame::new(p))
}

fn at_every_key(p: &CaseParams, width: f32, height: f32) -> SketchNode {
    let blocks = layout::all_key_positions(p)
        .into_iter()
        .map(|key| SketchNode::new(rect(width, height)).translate_by(key));
    let merged = union_all(blocks).unwrap_or_else(|| SketchNode::new(empty()));
    place(merged, &HandFrame::new(p))
}

/// Square plate holes at every switch
pub fn switch_holes(p: &CaseParams) -> SketchNode {
    at_every_key(p, p.hole_size, p.hole_size)
}

/// Relief for the switch clips under the plate
pub fn clip_slots(p: &CaseParams) -> SketchNode {
    at_every_key(p, p.clip_slot_width, p.hole_size + 2.0)
}

/// The flat between the inner column and the centre line
///
/// Bounded by the inner edge of the innermost keycap opening and the top
/// of the thumb opening.
pub fn centre_region(p: &CaseParams) -> SketchNode {
    let half_gap = (p.spacing + p.key_safety) * 0.5;
    let inner_edge = layout::columns(p)
        .first()
        .map_or(0.0, |col| col.x - half_gap);
    let thumb_top = layout::thumb_key_positions(p)
        .iter()
        .map(|key| key.y + half_gap)
        .fold(f32::NEG_INFINITY, f32::max);

    let region = outline_local(p)
        .intersect(half_plane(Vec2::X, -inner_edge))
        .intersect(half_plane(Vec2::NEG_Y, thumb_top))
        .subtract(keycap_cutout_local(p));
    place(region, &HandFrame::new(p))
}

/// Both halves of the centre region turned end for end and shifted back
pub fn groove(p: &CaseParams) -> SketchNode {
    centre_region(p)
        .mirror_x()
        .rotate(PI)
        .translate(0.0, p.groove_offset_y)
}

/// USB connector opening on the XZ plane, centred on the plate underside
pub fn usb_opening(p: &CaseParams) -> SketchNode {
    let u = &p.usb;
    rounded_rect(u.inner_width, u.inner_height, u.inner_fillet)
        .translate(0.0, p.plate_bottom())
}

/// Recess for the cable plug around the USB opening
pub fn usb_recess(p: &CaseParams) -> SketchNode {
    let u = &p.usb;
    rect_with_corners(
        u.recess_width,
        u.recess_height,
        Corners::ends(u.recess_fillet, 0.0),
    )
    .translate(0.0, -u.recess_shift)
    .rotate(PI)
    .translate(0.0, p.plate_bottom())
}

/// Post centres near the two outer palm corners, right half
pub fn bumpon_centers(p: &CaseParams) -> [Vec2; 2] {
    let palm = palm(p);
    let inset = p.outer_radius + p.min_wall_width;
    let x = palm.right_x() - inset;
    [
        Vec2::new(x, palm.back_y() - inset),
        Vec2::new(x, palm.front_y() + inset),
    ]
}
