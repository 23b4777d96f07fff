// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

mod html;
mod raster;

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::info;

pub use self::html::HtmlPage;
pub use self::raster::render_raster;

use crate::error::{Error, Result};
use crate::overlay::OverlayGeometry;
use crate::session::SessionView;

pub fn write_html(path: &Path, view: &SessionView) -> Result<()> {
    let page = HtmlPage::new(view).to_string();
    fs::write(path, page).map_err(|err| Error::write(path.display().to_string(), err))?;
    info!("Saved page to {}", path.display());
    Ok(())
}

/// Burns the overlays into the view's image and saves it; the format
/// follows the file extension.
pub fn write_raster(path: &Path, view: &SessionView) -> Result<()> {
    let image = view.image.ok_or(Error::NoImageSelected)?.decode()?;
    render_raster(&image, &view.overlays)
        .save(path)
        .map_err(|source| Error::Encode {
            path: path.display().to_string(),
            source,
        })?;
    info!("Saved annotated image to {}", path.display());
    Ok(())
}

pub fn write_json(path: &Path, overlays: &[OverlayGeometry]) -> Result<()> {
    let json = serde_json::to_string_pretty(overlays)?;
    fs::write(path, json).map_err(|err| Error::write(path.display().to_string(), err))?;
    info!("Saved overlay geometry to {}", path.display());
    Ok(())
}

/// Plain-text version of the results table.
pub struct SummaryTable<'a>(pub &'a [OverlayGeometry]);

impl<'a> fmt::Display for SummaryTable<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No faces found");
        }

        writeln!(
            f,
            "{:>4}  {:<7}  {:<9}  {:>10}  {:>10}  {:>10}",
            "Face", "Frontal", "Head down", "Yaw", "Pitch", "Roll"
        )?;
        for overlay in self.0 {
            writeln!(
                f,
                "{:>4}  {:<7}  {:<9}  {:>10.3}  {:>10.3}  {:>10.3}",
                overlay.index,
                if overlay.frontal { "yes" } else { "no" },
                if overlay.head_down { "yes" } else { "no" },
                overlay.pose.yaw(),
                overlay.pose.pitch(),
                overlay.pose.roll()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{BoundingBox, FaceRecord, Pose};
    use crate::input::SourceImage;
    use crate::overlay::{compute_overlays, OverlayOptions};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, Rgb([200, 200, 200])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_summary_table() {
        let faces = vec![FaceRecord::new(
            BoundingBox::new(0.1, 0.1, 0.2, 0.2),
            Pose::new(5.0, -2.0, 0.5),
        )];
        let overlays = compute_overlays(&faces, &OverlayOptions::default());
        let table = SummaryTable(&overlays).to_string();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(2, lines.len());
        assert!(lines[0].starts_with("Face  Frontal  Head down"));
        assert_eq!(
            "   0  no       yes             5.000      -2.000       0.500",
            lines[1]
        );
    }

    #[test]
    fn test_summary_table_empty() {
        assert_eq!("No faces found\n", SummaryTable(&[]).to_string());
    }

    #[test]
    fn test_write_failures_name_the_operation() {
        let dir = tempfile::tempdir().unwrap();
        let image = SourceImage::new("face.png", png_bytes());
        let view = SessionView {
            image: Some(&image),
            overlays: Vec::new(),
            processing: false,
            error: None,
        };

        let path = dir.path().join("missing").join("overlay.html");
        match write_html(&path, &view) {
            Err(err @ Error::Io { operation: "write", .. }) => {
                assert!(err.to_string().starts_with("failed to write "));
            }
            other => panic!("expected write error, got {:?}", other),
        }

        let path = dir.path().join("missing").join("overlay.png");
        match write_raster(&path, &view) {
            Err(err @ Error::Encode { .. }) => {
                assert!(err.to_string().starts_with("failed to encode image "));
            }
            other => panic!("expected encode error, got {:?}", other),
        }

        let path = dir.path().join("missing").join("overlays.json");
        assert!(matches!(
            write_json(&path, &[]),
            Err(Error::Io { operation: "write", .. })
        ));
    }

    #[test]
    fn test_write_raster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.png");
        let image = SourceImage::new("face.png", png_bytes());
        let view = SessionView {
            image: Some(&image),
            overlays: Vec::new(),
            processing: false,
            error: None,
        };

        write_raster(&path, &view).unwrap();
        let saved = image::open(&path).unwrap();
        assert_eq!((8, 6), (saved.width(), saved.height()));
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlays.json");
        let faces = vec![FaceRecord::new(
            BoundingBox::new(0.25, 0.25, 0.5, 0.5),
            Pose::new(0.0, 0.0, 0.0),
        )];
        write_json(&path, &compute_overlays(&faces, &OverlayOptions::default())).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(0, value[0]["index"]);
        assert_eq!(25.0, value[0]["box_percent"]["left"]);
        assert_eq!(-150.0, value[0]["lines"]["yaw"]["end"]["y"]);
        assert_eq!(true, value[0]["frontal"]);
    }
}
