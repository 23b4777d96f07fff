// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

//! Maps detected faces to drawable overlay primitives.
//!
//! Every coordinate produced here lives in "percent space": 0 is the left
//! (or top) edge of the displayed image and 100 the right (or bottom) edge.
//! Nothing is clamped, so a malformed box from the service shows up as a
//! box hanging off the image instead of an error.

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::{FaceRecord, Pose};
use crate::math::{direction_endpoint, AngleUnit, Point};

pub const DEFAULT_LINE_LENGTH: f64 = 200.0;
pub const DEFAULT_FRONTAL_YAW_LIMIT: f64 = 8.0;
pub const DEFAULT_HEAD_DOWN_PITCH: f64 = -1.0;

/// Display constants for one render pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    /// Length of the direction lines, in percent space. The default is far
    /// larger than any box so the lines stay visible.
    pub line_length: f64,
    pub angle_unit: AngleUnit,
    /// Yaw must lie strictly inside `(-limit, limit)` for a frontal face.
    pub frontal_yaw_limit: f64,
    /// Pitch strictly below this value means the head is down.
    pub head_down_pitch: f64,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        OverlayOptions {
            line_length: DEFAULT_LINE_LENGTH,
            angle_unit: AngleUnit::Raw,
            frontal_yaw_limit: DEFAULT_FRONTAL_YAW_LIMIT,
            head_down_pitch: DEFAULT_HEAD_DOWN_PITCH,
        }
    }
}

impl OverlayOptions {
    pub fn is_head_down(&self, pose: &Pose) -> bool {
        pose.pitch() < self.head_down_pitch
    }

    pub fn is_frontal(&self, pose: &Pose) -> bool {
        if self.is_head_down(pose) {
            return false;
        }
        pose.yaw() > -self.frontal_yaw_limit && pose.yaw() < self.frontal_yaw_limit
    }
}

/// Bounding box in CSS percentage units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoxPercent {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DirectionLine {
    pub start: Point<f64>,
    pub end: Point<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DirectionLines {
    pub yaw: DirectionLine,
    pub pitch: DirectionLine,
    pub roll: DirectionLine,
}

/// Everything needed to draw one face: box, label, lines and table row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverlayGeometry {
    /// Position of the face in the service response; doubles as its label.
    pub index: usize,
    pub box_percent: BoxPercent,
    pub center: Point<f64>,
    pub lines: DirectionLines,
    pub frontal: bool,
    pub head_down: bool,
    pub pose: Pose,
}

pub fn compute_bounding_box_style(face: &FaceRecord) -> BoxPercent {
    let bbox = face.bbox();
    BoxPercent {
        left: bbox.left() * 100.0,
        top: bbox.top() * 100.0,
        width: bbox.width() * 100.0,
        height: bbox.height() * 100.0,
    }
}

pub fn box_center(face: &FaceRecord) -> Point<f64> {
    let bbox = face.bbox();
    Point::new(
        bbox.left() * 100.0 + bbox.width() * 50.0,
        bbox.top() * 100.0 + bbox.height() * 50.0,
    )
}

pub fn compute_direction_lines(face: &FaceRecord, options: &OverlayOptions) -> DirectionLines {
    let center = box_center(face);
    let line = |angle: f64| DirectionLine {
        start: center,
        end: direction_endpoint(
            center,
            options.angle_unit.to_radians(angle),
            options.line_length,
        ),
    };

    let pose = face.pose();
    DirectionLines {
        yaw: line(pose.yaw()),
        pitch: line(pose.pitch()),
        roll: line(pose.roll()),
    }
}

/// Frontal check with the default thresholds: pitch of at least -1 and a
/// yaw strictly between -8 and 8.
pub fn classify_frontal(face: &FaceRecord) -> bool {
    OverlayOptions::default().is_frontal(face.pose())
}

pub fn classify_head_down(face: &FaceRecord) -> bool {
    OverlayOptions::default().is_head_down(face.pose())
}

pub fn compute_overlay(index: usize, face: &FaceRecord, options: &OverlayOptions) -> OverlayGeometry {
    OverlayGeometry {
        index,
        box_percent: compute_bounding_box_style(face),
        center: box_center(face),
        lines: compute_direction_lines(face, options),
        frontal: options.is_frontal(face.pose()),
        head_down: options.is_head_down(face.pose()),
        pose: *face.pose(),
    }
}

/// One overlay per face, in input order.
#[cfg(feature = "rayon")]
pub fn compute_overlays(faces: &[FaceRecord], options: &OverlayOptions) -> Vec<OverlayGeometry> {
    faces
        .par_iter()
        .enumerate()
        .map(|(index, face)| compute_overlay(index, face, options))
        .collect()
}

/// One overlay per face, in input order.
#[cfg(not(feature = "rayon"))]
pub fn compute_overlays(faces: &[FaceRecord], options: &OverlayOptions) -> Vec<OverlayGeometry> {
    faces
        .iter()
        .enumerate()
        .map(|(index, face)| compute_overlay(index, face, options))
        .collect()
}
