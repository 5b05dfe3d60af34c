// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A render request: everything a driver has to say about one render
//! pass.  Requests are checked once, up front, and turned into an
//! Engine; nothing is computed for a request that does not check out.

use engine::{Coloring, Engine, Mode};
use buffer::PixelBuffer;
use error::RenderError;
use planes::{PlaneMapper, Viewport};
use tones::Tones;

/// Default raster width.
pub const DEFAULT_WIDTH: usize = 800;
/// Default raster height.
pub const DEFAULT_HEIGHT: usize = 600;

/// The parameters of a render pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderRequest {
    /// Raster width in pixels.
    pub width: usize,
    /// Raster height in pixels.
    pub height: usize,
    /// The complex rectangle to draw.
    pub viewport: Viewport,
    /// Mandelbrot, or Julia with its constant.
    pub mode: Mode,
    /// How orbit steps become colors.
    pub coloring: Coloring,
    /// Worker threads; one renders on the calling thread.
    pub threads: usize,
}

impl Default for RenderRequest {
    fn default() -> RenderRequest {
        RenderRequest {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            viewport: Viewport::default(),
            mode: Mode::default(),
            coloring: Coloring::default(),
            threads: 1,
        }
    }
}

impl RenderRequest {
    /// Validates the request and builds its engine.
    pub fn engine(&self) -> Result<Engine, RenderError> {
        if self.threads == 0 {
            return Err(RenderError::NoThreads);
        }
        let plane = PlaneMapper::new(self.width, self.height, self.viewport)?;
        Ok(Engine::new(plane, self.mode, self.coloring))
    }

    /// Validates and renders.
    pub fn render(&self) -> Result<PixelBuffer, RenderError> {
        let engine = self.engine()?;
        if self.threads == 1 {
            Ok(engine.render())
        } else {
            engine.render_threaded(self.threads)
        }
    }

    /// Validates and returns the request's tone sequence.
    pub fn tones(&self) -> Result<Tones, RenderError> {
        Ok(Tones::new(&self.engine()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    #[test]
    fn defaults_are_the_classic_render() {
        let request = RenderRequest::default();
        assert_eq!((request.width, request.height), (800, 600));
        assert_eq!(request.viewport, Viewport::default());
        assert_eq!(request.mode, Mode::Mandelbrot);
        assert_eq!(request.coloring, Coloring::LastIteration);
    }

    #[test]
    fn bad_requests_fail_before_rendering() {
        let request = RenderRequest {
            width: 0,
            ..RenderRequest::default()
        };
        assert!(request.render().is_err());

        let request = RenderRequest {
            viewport: Viewport::from_corners(Complex::new(2.5, -1.5), Complex::new(-1.5, 1.5)),
            ..RenderRequest::default()
        };
        match request.engine() {
            Err(RenderError::RealAxis { .. }) => (),
            other => panic!("expected a real axis error, got {:?}", other),
        }

        let request = RenderRequest {
            threads: 0,
            ..RenderRequest::default()
        };
        assert!(request.tones().is_err());
    }

    #[test]
    fn thread_count_does_not_change_the_picture() {
        let one = RenderRequest {
            width: 40,
            height: 30,
            ..RenderRequest::default()
        };
        let four = RenderRequest { threads: 4, ..one };
        assert_eq!(one.render().unwrap(), four.render().unwrap());
    }
}
