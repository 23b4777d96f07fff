// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::fmt;
use std::str::FromStr;

use num::Float;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Point { x, y }
    }
}

/// How pose angles are fed into `sin`/`cos` when drawing direction lines.
///
/// `Raw` passes the reported value through untouched, which is what the
/// overlay has always drawn. `Degrees` converts to radians first and gives
/// geometrically correct directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Raw,
    Degrees,
}

impl AngleUnit {
    pub fn to_radians<T: Float>(self, angle: T) -> T {
        match self {
            AngleUnit::Raw => angle,
            AngleUnit::Degrees => angle.to_radians(),
        }
    }
}

impl FromStr for AngleUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(AngleUnit::Raw),
            "degrees" | "deg" => Ok(AngleUnit::Degrees),
            other => Err(format!("unknown angle unit '{}', expected raw or degrees", other)),
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AngleUnit::Raw => write!(f, "raw"),
            AngleUnit::Degrees => write!(f, "degrees"),
        }
    }
}

/// End of a line of `length` leaving `center` at `angle` radians, where
/// zero points straight up and angles grow clockwise.
pub fn direction_endpoint<T: Float>(center: Point<T>, angle: T, length: T) -> Point<T> {
    Point::new(
        center.x + length * angle.sin(),
        center.y - length * angle.cos(),
    )
}

/// Liang-Barsky clipping of the segment `start`-`end` against the axis
/// aligned rectangle spanning `min` to `max`. Returns `None` when nothing
/// of the segment is inside.
pub fn clip_segment<T: Float>(
    start: Point<T>,
    end: Point<T>,
    min: Point<T>,
    max: Point<T>,
) -> Option<(Point<T>, Point<T>)> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let mut t0 = T::zero();
    let mut t1 = T::one();

    for (p, q) in [
        (-dx, start.x - min.x),
        (dx, max.x - start.x),
        (-dy, start.y - min.y),
        (dy, max.y - start.y),
    ] {
        if p == T::zero() {
            // parallel to this edge
            if q < T::zero() {
                return None;
            }
            continue;
        }

        let r = q / p;
        if p < T::zero() {
            if r > t1 {
                return None;
            }
            if r > t0 {
                t0 = r;
            }
        } else {
            if r < t0 {
                return None;
            }
            if r < t1 {
                t1 = r;
            }
        }
    }

    Some((
        Point::new(start.x + t0 * dx, start.y + t0 * dy),
        Point::new(start.x + t1 * dx, start.y + t1 * dy),
    ))
}
