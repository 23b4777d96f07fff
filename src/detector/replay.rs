// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::path::{Path, PathBuf};

use tracing::info;

use super::{parse_response, DetectionParams, Detector};
use crate::common::FaceRecord;
use crate::error::{Error, Result};

/// Answers every request with a `DetectFaces` response recorded on disk.
///
/// The file is read again on each call, so it can be edited between runs.
pub struct ReplayDetector {
    path: PathBuf,
}

impl ReplayDetector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ReplayDetector { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Detector for ReplayDetector {
    async fn detect(&self, _image: &[u8], params: &DetectionParams) -> Result<Vec<FaceRecord>> {
        let json = tokio::fs::read(&self.path)
            .await
            .map_err(|err| Error::read(self.path.display().to_string(), err))?;
        let faces = params.apply(parse_response(&json)?);
        info!("Replayed {} faces from {}", faces.len(), self.path.display());
        Ok(faces)
    }
}
