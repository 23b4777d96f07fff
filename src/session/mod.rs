// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

//! State owned by one overlay view: the selected image, the faces found on
//! it, the submission in flight and the last failure.
//!
//! Every change goes through a transition method. A response is only
//! accepted for the newest submission, so a slow reply for an older image
//! can never overwrite the current one.

use tracing::{debug, warn};

use crate::common::FaceRecord;
use crate::detector::{DetectionParams, Detector};
use crate::error::{Error, Result};
use crate::input::SourceImage;
use crate::overlay::{compute_overlays, OverlayGeometry, OverlayOptions};

/// Identifies one submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Outcome of [`Session::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The faces replaced the previous list.
    Applied,
    /// The detection failed; the previous faces were kept.
    Failed,
    /// The ticket was superseded and the result was dropped.
    Stale,
}

#[derive(Debug, Default)]
pub struct Session {
    image: Option<SourceImage>,
    faces: Vec<FaceRecord>,
    pending: Option<Ticket>,
    last_error: Option<String>,
    next_ticket: u64,
}

/// Snapshot of a session prepared for rendering.
#[derive(Clone, Debug)]
pub struct SessionView<'a> {
    pub image: Option<&'a SourceImage>,
    pub overlays: Vec<OverlayGeometry>,
    pub processing: bool,
    pub error: Option<&'a str>,
}

impl<'a> SessionView<'a> {
    /// The results table is only shown when there is something in it.
    pub fn table_hidden(&self) -> bool {
        self.overlays.is_empty()
    }
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn faces(&self) -> &[FaceRecord] {
        &self.faces
    }

    pub fn is_processing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Shows a new image. Faces of the previous image are cleared at once
    /// and any submission still in flight becomes stale.
    pub fn select_image(&mut self, image: SourceImage) {
        debug!("Selected image {}", image.name());
        self.image = Some(image);
        self.faces.clear();
        self.last_error = None;
        self.pending = None;
    }

    /// Starts a submission of the current image.
    pub fn submit(&mut self) -> Result<Ticket> {
        if self.image.is_none() {
            return Err(Error::NoImageSelected);
        }
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);
        self.last_error = None;
        Ok(ticket)
    }

    /// Delivers the result of the submission identified by `ticket`.
    pub fn resolve(&mut self, ticket: Ticket, result: Result<Vec<FaceRecord>>) -> Transition {
        if self.pending != Some(ticket) {
            debug!("Dropping result of superseded submission {:?}", ticket);
            return Transition::Stale;
        }
        self.pending = None;

        match result {
            Ok(faces) => {
                self.faces = faces;
                Transition::Applied
            }
            Err(err) => {
                warn!(%err, "Face detection failed");
                self.last_error = Some(err.to_string());
                Transition::Failed
            }
        }
    }

    /// Submits the current image to `detector` and resolves the answer.
    pub async fn detect_with<D: Detector>(
        &mut self,
        detector: &D,
        params: &DetectionParams,
    ) -> Result<Transition> {
        let ticket = self.submit()?;
        let result = match &self.image {
            Some(image) => detector.detect(image.bytes(), params).await,
            None => Err(Error::NoImageSelected),
        };
        Ok(self.resolve(ticket, result))
    }

    pub fn view(&self, options: &OverlayOptions) -> SessionView<'_> {
        SessionView {
            image: self.image.as_ref(),
            overlays: compute_overlays(&self.faces, options),
            processing: self.is_processing(),
            error: self.last_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{BoundingBox, Pose};

    fn image(name: &str) -> SourceImage {
        SourceImage::new(name, vec![0xFF, 0xD8, 0xFF])
    }

    fn faces(count: usize) -> Vec<FaceRecord> {
        (0..count)
            .map(|i| {
                FaceRecord::new(
                    BoundingBox::new(0.1 * i as f64, 0.1, 0.1, 0.1),
                    Pose::new(0.0, 0.0, 0.0),
                )
            })
            .collect()
    }

    struct FixedDetector(Vec<FaceRecord>);

    impl Detector for FixedDetector {
        async fn detect(&self, _image: &[u8], params: &DetectionParams) -> Result<Vec<FaceRecord>> {
            Ok(params.apply(self.0.clone()))
        }
    }

    struct FailingDetector;

    impl Detector for FailingDetector {
        async fn detect(&self, _image: &[u8], _params: &DetectionParams) -> Result<Vec<FaceRecord>> {
            Err(Error::Detection("credentials rejected".to_string()))
        }
    }

    #[test]
    fn test_submit_without_image() {
        let mut session = Session::new();
        assert!(matches!(session.submit(), Err(Error::NoImageSelected)));
        assert!(!session.is_processing());
    }

    #[test]
    fn test_successful_submission() {
        let mut session = Session::new();
        session.select_image(image("a.jpg"));
        let ticket = session.submit().unwrap();
        assert!(session.is_processing());

        assert_eq!(Transition::Applied, session.resolve(ticket, Ok(faces(2))));
        assert!(!session.is_processing());
        assert_eq!(2, session.faces().len());
    }

    #[test]
    fn test_new_image_clears_overlays() {
        let mut session = Session::new();
        session.select_image(image("a.jpg"));
        let ticket = session.submit().unwrap();
        session.resolve(ticket, Ok(faces(3)));
        assert_eq!(3, session.view(&OverlayOptions::default()).overlays.len());

        session.select_image(image("b.jpg"));
        let view = session.view(&OverlayOptions::default());
        assert!(view.overlays.is_empty());
        assert!(view.table_hidden());
        assert_eq!(Some("b.jpg"), view.image.map(SourceImage::name));
    }

    #[test]
    fn test_out_of_order_response_is_stale() {
        let mut session = Session::new();
        session.select_image(image("a.jpg"));
        let old = session.submit().unwrap();
        session.select_image(image("b.jpg"));
        let new = session.submit().unwrap();

        assert_eq!(Transition::Applied, session.resolve(new, Ok(faces(1))));
        assert_eq!(Transition::Stale, session.resolve(old, Ok(faces(5))));
        assert_eq!(1, session.faces().len());
    }

    #[test]
    fn test_resubmission_supersedes_pending() {
        let mut session = Session::new();
        session.select_image(image("a.jpg"));
        let first = session.submit().unwrap();
        let second = session.submit().unwrap();
        assert_ne!(first, second);

        assert_eq!(Transition::Stale, session.resolve(first, Ok(faces(4))));
        assert!(session.is_processing());
        assert_eq!(Transition::Applied, session.resolve(second, Ok(faces(2))));
        assert_eq!(2, session.faces().len());
    }

    #[test]
    fn test_failure_keeps_previous_faces() {
        let mut session = Session::new();
        session.select_image(image("a.jpg"));
        let ticket = session.submit().unwrap();
        session.resolve(ticket, Ok(faces(2)));

        let ticket = session.submit().unwrap();
        let result = Err(Error::Detection("network unreachable".to_string()));
        assert_eq!(Transition::Failed, session.resolve(ticket, result));
        assert!(!session.is_processing());
        assert_eq!(2, session.faces().len());
        assert_eq!(
            Some("face detection failed: network unreachable"),
            session.last_error()
        );
    }

    #[test]
    fn test_zero_faces_hide_table() {
        let mut session = Session::new();
        session.select_image(image("a.jpg"));
        let ticket = session.submit().unwrap();
        session.resolve(ticket, Ok(Vec::new()));

        let view = session.view(&OverlayOptions::default());
        assert!(view.overlays.is_empty());
        assert!(view.table_hidden());
        assert!(!view.processing);
    }

    #[tokio::test]
    async fn test_detect_with_detector() {
        let mut session = Session::new();
        session.select_image(image("a.jpg"));
        let detector = FixedDetector(faces(3));
        let transition = session
            .detect_with(&detector, &DetectionParams::default())
            .await
            .unwrap();
        assert_eq!(Transition::Applied, transition);
        assert_eq!(3, session.faces().len());
    }

    #[tokio::test]
    async fn test_detect_with_failing_detector() {
        let mut session = Session::new();
        session.select_image(image("a.jpg"));
        let transition = session
            .detect_with(&FailingDetector, &DetectionParams::default())
            .await
            .unwrap();
        assert_eq!(Transition::Failed, transition);
        assert!(!session.is_processing());
        assert!(session.last_error().is_some());
    }
}
