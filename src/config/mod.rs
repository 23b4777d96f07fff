// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::detector::{DetectionParams, DEFAULT_MAX_FACES, DEFAULT_MIN_CONFIDENCE};
use crate::error::{Error, Result};
use crate::overlay::OverlayOptions;

pub const DEFAULT_REGION: &str = "us-east-1";

/// Settings read from a JSON file. Missing sections and fields fall back
/// to their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detection: DetectionConfig,
    pub overlay: OverlayOptions,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub min_confidence: f64,
    pub max_faces: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            region: DEFAULT_REGION.to_string(),
            access_key_id: None,
            secret_access_key: None,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_faces: DEFAULT_MAX_FACES,
        }
    }
}

// Hand-written so the secret never reaches a log line.
impl fmt::Debug for DetectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DetectionConfig")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("min_confidence", &self.min_confidence)
            .field("max_faces", &self.max_faces)
            .finish()
    }
}

impl DetectionConfig {
    pub fn params(&self) -> DetectionParams {
        DetectionParams {
            min_confidence: self.min_confidence,
            max_faces: self.max_faces,
        }
    }

    /// Key pair to hand to the SDK, only when both halves are present.
    pub fn static_credentials(&self) -> Option<(String, String)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(key), Some(secret)) => Some((key.clone(), secret.clone())),
            _ => None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| Error::read(path.display().to_string(), err))?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let detection = &self.detection;
        if !(0.0..=100.0).contains(&detection.min_confidence) {
            return Err(Error::Config(format!(
                "min_confidence must be between 0 and 100, got {}",
                detection.min_confidence
            )));
        }
        if detection.max_faces == 0 {
            return Err(Error::Config("max_faces must be > 0".to_string()));
        }
        if detection.region.trim().is_empty() {
            return Err(Error::Config("region must not be empty".to_string()));
        }
        if detection.access_key_id.is_some() != detection.secret_access_key.is_some() {
            return Err(Error::Config(
                "access_key_id and secret_access_key must be given together".to_string(),
            ));
        }

        let overlay = &self.overlay;
        if !overlay.line_length.is_finite() || overlay.line_length < 0.0 {
            return Err(Error::Config(format!(
                "line_length must be a non-negative number, got {}",
                overlay.line_length
            )));
        }
        if !overlay.frontal_yaw_limit.is_finite() || overlay.frontal_yaw_limit <= 0.0 {
            return Err(Error::Config(format!(
                "frontal_yaw_limit must be > 0, got {}",
                overlay.frontal_yaw_limit
            )));
        }
        if !overlay.head_down_pitch.is_finite() {
            return Err(Error::Config("head_down_pitch must be finite".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::AngleUnit;
    use std::io::Write;

    fn load_str(json: &str) -> Result<AppConfig> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        AppConfig::load(file.path())
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!("us-east-1", config.detection.region);
        assert_eq!(DetectionParams::default(), config.detection.params());
        assert_eq!(200.0, config.overlay.line_length);
        assert_eq!(AngleUnit::Raw, config.overlay.angle_unit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = load_str(r#"{"overlay": {"angle_unit": "degrees"}}"#).unwrap();
        assert_eq!(AngleUnit::Degrees, config.overlay.angle_unit);
        assert_eq!(200.0, config.overlay.line_length);
        assert_eq!(50, config.detection.max_faces);
    }

    #[test]
    fn test_rejects_half_credentials() {
        let result = load_str(r#"{"detection": {"access_key_id": "AKIA"}}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_out_of_range_confidence() {
        let result = load_str(r#"{"detection": {"min_confidence": 120}}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_static_credentials() {
        let config = load_str(
            r#"{"detection": {"access_key_id": "AKIA", "secret_access_key": "s3cr3t"}}"#,
        )
        .unwrap();
        assert_eq!(
            Some(("AKIA".to_string(), "s3cr3t".to_string())),
            config.detection.static_credentials()
        );
        assert!(!format!("{:?}", config.detection).contains("s3cr3t"));
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::load(Path::new("/nonexistent/face-overlay.json"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
