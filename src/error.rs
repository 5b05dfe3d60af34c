// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong before, during, or just after a render.
//! The arithmetic itself cannot fail; these are all configuration or
//! I/O problems.

use std::io;

/// The error type for this crate.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// A raster with no pixels.
    #[fail(display = "raster dimensions must be positive, got {}x{}", width, height)]
    EmptyRaster {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// The real axis of the viewport is empty, inverted, or not finite.
    #[fail(display = "real axis of the viewport is invalid: {} .. {}", min, max)]
    RealAxis {
        /// Left edge.
        min: f64,
        /// Right edge.
        max: f64,
    },

    /// The imaginary axis of the viewport is empty, inverted, or not finite.
    #[fail(display = "imaginary axis of the viewport is invalid: {} .. {}", min, max)]
    ImagAxis {
        /// Bottom edge.
        min: f64,
        /// Top edge.
        max: f64,
    },

    /// A sub-raster that does not fit inside the raster.
    #[fail(
        display = "region {}x{} at ({}, {}) does not fit a {}x{} raster",
        width, height, left, top, raster_width, raster_height
    )]
    RegionOutOfBounds {
        /// Region left column.
        left: usize,
        /// Region top row.
        top: usize,
        /// Region width.
        width: usize,
        /// Region height.
        height: usize,
        /// Full raster width.
        raster_width: usize,
        /// Full raster height.
        raster_height: usize,
    },

    /// A threaded render was asked to run on zero threads.
    #[fail(display = "at least one render thread is required")]
    NoThreads,

    /// One of the render workers panicked.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// A raster too large to address or to encode as an image.
    #[fail(display = "raster {}x{} is too large", width, height)]
    RasterTooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// I/O failure while writing an artifact, including an image
    /// format the encoder does not know.
    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> RenderError {
        RenderError::Io(err)
    }
}
