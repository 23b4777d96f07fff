// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

mod common;
mod error;
mod input;
mod session;
pub mod config;
pub mod detector;
pub mod math;
pub mod overlay;
pub mod render;

pub use common::{BoundingBox, FaceRecord, Pose};
pub use config::AppConfig;
pub use detector::{DetectionParams, Detector, RekognitionDetector, ReplayDetector};
pub use error::{Error, Result};
pub use input::{load_image, SourceImage};
pub use math::AngleUnit;
pub use overlay::{
    classify_frontal, classify_head_down, compute_bounding_box_style, compute_direction_lines,
    compute_overlays, OverlayGeometry, OverlayOptions,
};
pub use session::{Session, SessionView, Ticket, Transition};

use std::path::Path;

/// Run one full submission: read the image, ask `detector` for faces and
/// return the session holding the outcome.
///
/// A failed detection is not an error here: it is recorded in the session
/// (see [`Session::last_error`]) so that it can be shown next to the image.
/// Only reading the image can fail.
///
/// # Examples
///
/// ```no_run
/// use face_overlay::{render, DetectionParams, OverlayOptions, ReplayDetector};
/// use std::path::Path;
///
/// # async fn run() -> face_overlay::Result<()> {
/// let detector = ReplayDetector::new("response.json");
/// let session = face_overlay::annotate(Path::new("group.jpg"), &detector, &DetectionParams::default()).await?;
/// let view = session.view(&OverlayOptions::default());
/// render::write_html(Path::new("overlay.html"), &view)?;
/// # Ok(())
/// # }
/// ```
pub async fn annotate<D: Detector>(
    image_path: &Path,
    detector: &D,
    params: &DetectionParams,
) -> Result<Session> {
    let image = load_image(image_path).await?;
    let mut session = Session::new();
    session.select_image(image);
    session.detect_with(detector, params).await?;
    Ok(session)
}
