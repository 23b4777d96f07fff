// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::error::{Error, Result};

const UNKNOWN_MIME: &str = "application/octet-stream";

/// An image picked for submission: its raw bytes plus what is needed to
/// show it. The bytes are not validated.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceImage {
    name: String,
    bytes: Vec<u8>,
    mime: &'static str,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime = sniff_mime(&bytes);
        SourceImage {
            name: name.into(),
            bytes,
            mime,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Decodes the bytes. Only the raster output needs pixels.
    pub fn decode(&self) -> Result<DynamicImage> {
        Ok(image::load_from_memory(&self.bytes)?)
    }
}

/// Reads one image file in a single asynchronous operation.
pub async fn load_image(path: &Path) -> Result<SourceImage> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| Error::read(path.display().to_string(), err))?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let image = SourceImage::new(name, bytes);
    debug!(
        "Read {} ({} bytes, {})",
        image.name(),
        image.bytes().len(),
        image.mime()
    );
    Ok(image)
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Bmp) => "image/bmp",
        Ok(ImageFormat::Tiff) => "image/tiff",
        Ok(ImageFormat::Ico) => "image/x-icon",
        _ => UNKNOWN_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 2, Rgb([10, 20, 30])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_png_is_sniffed() {
        let image = SourceImage::new("face.png", png_bytes());
        assert_eq!("image/png", image.mime());
        assert!(image.data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
        let decoded = image.decode().unwrap();
        assert_eq!((4, 2), (decoded.width(), decoded.height()));
    }

    #[test]
    fn test_unknown_bytes_pass_through() {
        let image = SourceImage::new("notes.txt", b"hello".to_vec());
        assert_eq!(UNKNOWN_MIME, image.mime());
        assert_eq!("data:application/octet-stream;base64,aGVsbG8=", image.data_url());
        assert!(matches!(image.decode(), Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn test_load_image_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let image = load_image(&path).await.unwrap();
        assert_eq!("face.png", image.name());
        assert_eq!(png_bytes(), image.bytes());
    }

    #[tokio::test]
    async fn test_load_image_missing_file() {
        let result = load_image(Path::new("/nonexistent/face.png")).await;
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
