// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

mod rekognition;
mod replay;

use std::future::Future;

use serde::Deserialize;

use crate::common::{BoundingBox, FaceRecord, Pose};
use crate::error::{Error, Result};

pub use self::rekognition::RekognitionDetector;
pub use self::replay::ReplayDetector;

pub const DEFAULT_MIN_CONFIDENCE: f64 = 70.0;
pub const DEFAULT_MAX_FACES: usize = 50;

/// Limits applied to each detection response once it arrives. The
/// service is not told about them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    /// Faces reported with a confidence below this (0-100) are dropped.
    pub min_confidence: f64,
    /// At most this many faces are kept, in service order.
    pub max_faces: usize,
}

impl Default for DetectionParams {
    fn default() -> Self {
        DetectionParams {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_faces: DEFAULT_MAX_FACES,
        }
    }
}

impl DetectionParams {
    /// Applies the limits to a service response. Faces without a reported
    /// confidence are kept.
    pub fn apply(&self, faces: Vec<FaceRecord>) -> Vec<FaceRecord> {
        faces
            .into_iter()
            .filter(|face| match face.confidence() {
                Some(confidence) => confidence >= self.min_confidence,
                None => true,
            })
            .take(self.max_faces)
            .collect()
    }
}

/// Face detection service.
///
/// # Examples
///
/// ```no_run
/// use face_overlay::{DetectionParams, Detector, ReplayDetector};
///
/// # async fn run(image: Vec<u8>) -> face_overlay::Result<()> {
/// let detector = ReplayDetector::new("response.json");
/// for face in detector.detect(&image, &DetectionParams::default()).await? {
///     println!("found face: {:?}", face);
/// }
/// # Ok(())
/// # }
/// ```
pub trait Detector {
    /// Detect faces on the encoded image (JPEG, PNG or anything else the
    /// service accepts).
    ///
    /// The call is made exactly once: there is no timeout and no retry.
    /// Any failure is returned as `Error::Detection`, and a response with a
    /// face missing its bounding box or pose as `Error::MalformedResponse`.
    fn detect(
        &self,
        image: &[u8],
        params: &DetectionParams,
    ) -> impl Future<Output = Result<Vec<FaceRecord>>> + Send;
}

/// Body of a `DetectFaces` response as the service serializes it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DetectFacesResponse {
    #[serde(default)]
    pub face_details: Vec<FaceDetail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct FaceDetail {
    pub bounding_box: Option<WireBox>,
    pub pose: Option<WirePose>,
    pub confidence: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireBox {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WirePose {
    pub yaw: Option<f64>,
    pub pitch: Option<f64>,
    pub roll: Option<f64>,
}

fn required(value: Option<f64>, index: usize, field: &'static str) -> Result<f64> {
    value.ok_or(Error::MalformedResponse { index, field })
}

impl FaceDetail {
    pub fn into_record(self, index: usize) -> Result<FaceRecord> {
        let wire_box = self.bounding_box.ok_or(Error::MalformedResponse {
            index,
            field: "BoundingBox",
        })?;
        let wire_pose = self.pose.ok_or(Error::MalformedResponse {
            index,
            field: "Pose",
        })?;

        let bbox = BoundingBox::new(
            required(wire_box.left, index, "BoundingBox.Left")?,
            required(wire_box.top, index, "BoundingBox.Top")?,
            required(wire_box.width, index, "BoundingBox.Width")?,
            required(wire_box.height, index, "BoundingBox.Height")?,
        );
        let pose = Pose::new(
            required(wire_pose.yaw, index, "Pose.Yaw")?,
            required(wire_pose.pitch, index, "Pose.Pitch")?,
            required(wire_pose.roll, index, "Pose.Roll")?,
        );

        let record = FaceRecord::new(bbox, pose);
        Ok(match self.confidence {
            Some(confidence) => record.with_confidence(confidence),
            None => record,
        })
    }
}

/// Converts every face of a response, failing on the first incomplete one.
pub(crate) fn into_records(details: Vec<FaceDetail>) -> Result<Vec<FaceRecord>> {
    details
        .into_iter()
        .enumerate()
        .map(|(index, detail)| detail.into_record(index))
        .collect()
}

/// Parses a recorded `DetectFaces` JSON response.
pub fn parse_response(json: &[u8]) -> Result<Vec<FaceRecord>> {
    let response: DetectFacesResponse = serde_json::from_slice(json)?;
    into_records(response.face_details)
}
