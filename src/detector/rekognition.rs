// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::time::Instant;

use aws_config::BehaviorVersion;
use aws_sdk_rekognition::config::{Credentials, Region};
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Attribute, Image};
use aws_sdk_rekognition::Client;
use tracing::{debug, info};

use super::{into_records, DetectionParams, Detector, FaceDetail, WireBox, WirePose};
use crate::common::FaceRecord;
use crate::config::DetectionConfig;
use crate::error::{Error, Result};

/// Detector backed by AWS Rekognition `DetectFaces`.
pub struct RekognitionDetector {
    client: Client,
}

impl RekognitionDetector {
    /// Builds a client for the configured region. Static credentials from
    /// the config take precedence over the SDK's default provider chain.
    pub async fn from_config(config: &DetectionConfig) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

        if let Some((key, secret)) = config.static_credentials() {
            debug!("using static credentials from configuration");
            loader = loader.credentials_provider(Credentials::new(
                key,
                secret,
                None,
                None,
                "face-overlay-config",
            ));
        }

        let sdk_config = loader.load().await;
        RekognitionDetector {
            client: Client::new(&sdk_config),
        }
    }

    pub fn with_client(client: Client) -> Self {
        RekognitionDetector { client }
    }
}

impl Detector for RekognitionDetector {
    async fn detect(&self, image: &[u8], params: &DetectionParams) -> Result<Vec<FaceRecord>> {
        let now = Instant::now();
        let output = self
            .client
            .detect_faces()
            .image(Image::builder().bytes(Blob::new(image.to_vec())).build())
            .attributes(Attribute::Default)
            .send()
            .await
            .map_err(|err| Error::Detection(DisplayErrorContext(&err).to_string()))?;

        let details = output.face_details().iter().map(face_detail).collect();
        let faces = params.apply(into_records(details)?);
        info!(
            "Rekognition returned {} faces in {} ms",
            faces.len(),
            now.elapsed().as_millis()
        );
        Ok(faces)
    }
}

fn face_detail(detail: &aws_sdk_rekognition::types::FaceDetail) -> FaceDetail {
    FaceDetail {
        bounding_box: detail.bounding_box().map(|bbox| WireBox {
            left: bbox.left().map(f64::from),
            top: bbox.top().map(f64::from),
            width: bbox.width().map(f64::from),
            height: bbox.height().map(f64::from),
        }),
        pose: detail.pose().map(|pose| WirePose {
            yaw: pose.yaw().map(f64::from),
            pitch: pose.pitch().map(f64::from),
            roll: pose.roll().map(f64::from),
        }),
        confidence: detail.confidence().map(f64::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{BoundingBox, Pose};
    use aws_sdk_rekognition::types;

    fn sdk_face(with_pose: bool) -> types::FaceDetail {
        let bbox = types::BoundingBox::builder()
            .left(0.375)
            .top(0.125)
            .width(0.25)
            .height(0.5)
            .build();
        let builder = types::FaceDetail::builder().bounding_box(bbox).confidence(99.5);
        if with_pose {
            builder
                .pose(types::Pose::builder().yaw(-3.0).pitch(7.25).roll(1.5).build())
                .build()
        } else {
            builder.build()
        }
    }

    #[test]
    fn test_sdk_face_detail_to_record() {
        let faces = into_records(vec![face_detail(&sdk_face(true))]).unwrap();

        assert_eq!(1, faces.len());
        assert_eq!(BoundingBox::new(0.375, 0.125, 0.25, 0.5), *faces[0].bbox());
        assert_eq!(Pose::new(-3.0, 7.25, 1.5), *faces[0].pose());
        assert_eq!(Some(99.5), faces[0].confidence());
    }

    #[test]
    fn test_sdk_face_without_pose_is_malformed() {
        let details = vec![face_detail(&sdk_face(true)), face_detail(&sdk_face(false))];

        assert!(matches!(
            into_records(details),
            Err(Error::MalformedResponse { index: 1, field: "Pose" })
        ));
    }
}
