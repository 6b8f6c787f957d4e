// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::io;
use std::path::PathBuf;

/// Errors that abort an export call.
///
/// Conditions that are expected during normal operation, such as a label
/// that does not fit anywhere or a layer without polygons, are reported
/// through `Option` or `bool` results instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No candidate font file could be found.
    #[error("no usable font found (tried {tried:?})")]
    FontNotFound {
        /// Every location that was probed, in order.
        tried: Vec<PathBuf>,
    },
    /// A font file was found but could not be parsed.
    #[error("font data in {path:?} could not be parsed")]
    InvalidFont {
        /// Path of the font, if it came from a file.
        path: Option<PathBuf>,
    },
    /// The pixel buffer for a canvas could not be allocated.
    #[error("cannot allocate a {width}x{height} canvas")]
    CanvasAllocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// Reading or writing a file failed.
    #[error("i/o error on {path:?}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// Encoding an image failed.
    #[error("failed to encode {path:?}: {source}")]
    Encode {
        /// The image being written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: image::ImageError,
    },
    /// The layer stack contained no polygons at all.
    #[error("layer stack is empty")]
    EmptyStack,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
