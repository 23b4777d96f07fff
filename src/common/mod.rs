// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use serde::{Deserialize, Serialize};

/// Face rectangle expressed as fractions of the image width and height,
/// measured from the top-left corner of the image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        BoundingBox {
            left,
            top,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Head rotation reported by the detection service, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    yaw: f64,
    pitch: f64,
    roll: f64,
}

impl Pose {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Pose { yaw, pitch, roll }
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn roll(&self) -> f64 {
        self.roll
    }
}

/// One face as returned by the detection service.
///
/// Records are never edited after they are received: a new submission
/// replaces the whole list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceRecord {
    bbox: BoundingBox,
    pose: Pose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
}

impl FaceRecord {
    pub fn new(bbox: BoundingBox, pose: Pose) -> Self {
        FaceRecord {
            bbox,
            pose,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Service confidence in the 0-100 range, if the service reported one.
    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_defaults_to_none() {
        let face = FaceRecord::new(BoundingBox::new(0.1, 0.2, 0.3, 0.4), Pose::default());
        assert_eq!(None, face.confidence());
        assert_eq!(Some(99.5), face.with_confidence(99.5).confidence());
    }

    #[test]
    fn test_record_deserializes_without_confidence() {
        let json = r#"{"bbox":{"left":0.5,"top":0.25,"width":0.1,"height":0.2},
                       "pose":{"yaw":1.0,"pitch":-2.0,"roll":3.0}}"#;
        let face: FaceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(0.25, face.bbox().top());
        assert_eq!(-2.0, face.pose().pitch());
        assert_eq!(None, face.confidence());
    }
}
