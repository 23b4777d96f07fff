// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to encode image {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("face detection failed: {0}")]
    Detection(String),

    #[error("malformed detection response: face {index} has no {field}")]
    MalformedResponse { index: usize, field: &'static str },

    #[error("no image selected")]
    NoImageSelected,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn read(path: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            operation: "read",
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            operation: "write",
            path: path.into(),
            source,
        }
    }
}
