#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time renderer
//!
//! The Mandelbrot and Julia sets are drawn by the same trick.  Each
//! pixel of a raster stands for a point on the complex plane.  That
//! point feeds the recurrence z <- z*z - c: for the Mandelbrot set z
//! starts at zero and the point is c; for a Julia set z starts at the
//! point and c is fixed.  After a fixed number of steps an orbit is
//! either still inside a circle of radius two, and the pixel is black,
//! or it has left, and the pixel gets a shade of blue chosen by the
//! step counter.
//!
//! The `planes` module maps pixels to points, `engine` runs the
//! orbits and paints a `PixelBuffer`, and `request` bundles the
//! parameters of a render pass for drivers.

extern crate crossbeam;
extern crate image;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

#[cfg(test)]
extern crate tempfile;

pub mod buffer;
pub mod engine;
pub mod error;
pub mod palette;
pub mod planes;
pub mod request;
pub mod tones;

pub use buffer::PixelBuffer;
pub use engine::{Coloring, Engine, Mode, Orbit, OrbitResult, Step, MAX_ITERATIONS};
pub use error::RenderError;
pub use palette::{Band, ESCAPE_BOUND_SQ};
pub use planes::{Pixel, PlaneMapper, Viewport};
pub use request::RenderRequest;
pub use tones::Tones;
