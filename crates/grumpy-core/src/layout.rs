//! Key-switch layout
//!
//! Pure functions from [`CaseParams`] to switch centres of the right hand,
//! in the hand frame. Rows count from the top; the middle finger column is
//! the highest, the inner column the lowest. [`HandFrame`] places hand
//! coordinates in the world.

use crate::params::{CaseParams, ROW_COUNT};
use glam::{Mat2, Vec2};
use serde::Serialize;

/// Y of the switch centre of an unstaggered column in `row`
pub fn top_switch_y(p: &CaseParams, row: u32) -> f32 {
    p.case_height() / 2.0 - p.wall_width - p.spacing / 2.0 - row as f32 * p.spacing
}

/// Switch centres of one row, right hand
///
/// The outer column (4.5) starts at the second row and the inner column
/// (0.5) stops before the last one.
pub fn row_positions(p: &CaseParams, row: u32) -> Vec<Vec2> {
    let s = p.spacing;
    let c = p.col_stagger();
    let y = top_switch_y(p, row);

    let mut points = vec![
        Vec2::new(1.5 * s, y - 2.0 * c),
        Vec2::new(2.5 * s, y - c),
        Vec2::new(3.5 * s, y - 2.0 * c),
    ];
    if row > 0 {
        points.push(Vec2::new(4.5 * s, y));
    }
    if row + 1 < ROW_COUNT {
        points.push(Vec2::new(0.5 * s, y - 4.0 * c));
    }
    points
}

/// All alpha switch centres, row by row
pub fn alpha_key_positions(p: &CaseParams) -> Vec<Vec2> {
    (0..ROW_COUNT).flat_map(|row| row_positions(p, row)).collect()
}

/// The thumb switch centre
pub fn thumb_key_positions(p: &CaseParams) -> Vec<Vec2> {
    let c = p.col_stagger();
    vec![Vec2::new(
        0.25 * p.spacing,
        top_switch_y(p, ROW_COUNT - 1) - 4.0 * c,
    )]
}

pub fn all_key_positions(p: &CaseParams) -> Vec<Vec2> {
    let mut keys = alpha_key_positions(p);
    keys.extend(thumb_key_positions(p));
    keys
}

/// A vertical run of alpha keys sharing one x coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Column {
    pub x: f32,
    /// Lowest switch centre
    pub y_min: f32,
    /// Highest switch centre
    pub y_max: f32,
}

impl Column {
    pub fn center_y(&self) -> f32 {
        (self.y_min + self.y_max) * 0.5
    }

    /// Distance between the outer switch centres
    pub fn span(&self) -> f32 {
        self.y_max - self.y_min
    }
}

/// Alpha keys grouped into columns, sorted by x
pub fn columns(p: &CaseParams) -> Vec<Column> {
    let tolerance = p.spacing * 1e-3;
    let mut columns: Vec<Column> = Vec::new();

    for key in alpha_key_positions(p) {
        match columns.iter_mut().find(|col| (col.x - key.x).abs() < tolerance) {
            Some(col) => {
                col.y_min = col.y_min.min(key.y);
                col.y_max = col.y_max.max(key.y);
            }
            None => columns.push(Column {
                x: key.x,
                y_min: key.y,
                y_max: key.y,
            }),
        }
    }

    columns.sort_by(|a, b| a.x.total_cmp(&b.x));
    columns
}

/// Rotated and shifted frame of the right hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandFrame {
    pub angle: f32,
    pub offset: Vec2,
}

impl HandFrame {
    pub fn new(p: &CaseParams) -> Self {
        Self {
            angle: p.hand_angle(),
            offset: Vec2::new(p.hand_offset_x, 0.0),
        }
    }

    /// Map a hand-frame point to world XY
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        Mat2::from_angle(self.angle) * local + self.offset
    }

    /// Map a world XY point into the hand frame
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        Mat2::from_angle(-self.angle) * (world - self.offset)
    }
}
