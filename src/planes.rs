// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a raster of pixels with an origin at the top left, and a
//! rectangle on the complex plane (the viewport).  Raster rows grow
//! downward; imaginary values grow upward, so the vertical axis is
//! flipped in the mapping.
use num::Complex;

use error::RenderError;

/// Describes the width and height of the raster.  The raster is
/// assumed to start at 0,0 in its top left corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel in the raster: column first, then row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The rectangle of the complex plane mapped onto the raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge.
    pub real_min: f64,
    /// Right edge.
    pub real_max: f64,
    /// Bottom edge.
    pub imag_min: f64,
    /// Top edge.
    pub imag_max: f64,
}

impl Viewport {
    /// Builds a viewport from its left-lower and right-upper corners.
    pub fn from_corners(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Viewport {
        Viewport {
            real_min: leftlower.re,
            real_max: rightupper.re,
            imag_min: leftlower.im,
            imag_max: rightupper.im,
        }
    }

    /// Checks that both axes are finite and non-empty.
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.real_min.is_finite() && self.real_max.is_finite())
            || self.real_min >= self.real_max
        {
            return Err(RenderError::RealAxis {
                min: self.real_min,
                max: self.real_max,
            });
        }
        if !(self.imag_min.is_finite() && self.imag_max.is_finite())
            || self.imag_min >= self.imag_max
        {
            return Err(RenderError::ImagAxis {
                min: self.imag_min,
                max: self.imag_max,
            });
        }
        Ok(())
    }

    fn width(&self) -> f64 {
        self.real_max - self.real_min
    }

    fn height(&self) -> f64 {
        self.imag_max - self.imag_min
    }
}

impl Default for Viewport {
    /// The classic window: a = -1.5 + m/200, b = 1.5 - n/200 on an
    /// 800x600 raster.
    fn default() -> Viewport {
        Viewport {
            real_min: -1.5,
            real_max: 2.5,
            imag_min: -1.5,
            imag_max: 1.5,
        }
    }
}

/// Contains the definitions of two planes: the integral raster and the
/// complex viewport.  Maps points from one to the other.  Once built,
/// a PlaneMapper is immutable for the length of a render pass.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// Width and height of the raster.
    pub integral_plane: IntegralPlane,
    /// The complex rectangle the raster covers.
    pub viewport: Viewport,
}

impl PlaneMapper {
    /// Constructor.  Fails fast if the raster is empty, too large to
    /// hold as RGB bytes or to encode, or if the viewport is inverted on
    /// either axis.
    pub fn new(width: usize, height: usize, viewport: Viewport) -> Result<PlaneMapper, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyRaster { width, height });
        }
        let bytes = width.checked_mul(height).and_then(|n| n.checked_mul(3));
        if width > u32::MAX as usize || height > u32::MAX as usize || bytes.is_none() {
            return Err(RenderError::RasterTooLarge { width, height });
        }
        viewport.validate()?;
        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            viewport,
        })
    }

    /// Raster width in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Raster height in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of pixels in the raster.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Never true for a validated mapper; kept for symmetry with len().
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel in the raster, return the complex number at that
    /// pixel's top left corner.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let vp = &self.viewport;
        // Multiply before dividing: (m * 4.0) / 800.0 rounds exactly like m / 200.0.
        Complex::new(
            vp.real_min + (pixel.0 as f64) * vp.width() / (self.integral_plane.0 as f64),
            vp.imag_max - (pixel.1 as f64) * vp.height() / (self.integral_plane.1 as f64),
        )
    }

    /// The inverse transform: the fractional raster coordinates
    /// (column, row) of a complex number.
    pub fn point_to_coords(&self, point: &Complex<f64>) -> (f64, f64) {
        let vp = &self.viewport;
        (
            (point.re - vp.real_min) * (self.integral_plane.0 as f64) / vp.width(),
            (vp.imag_max - point.im) * (self.integral_plane.1 as f64) / vp.height(),
        )
    }

    /// Given a complex number, find the nearest pixel, or None if the
    /// number falls outside the raster.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let (left, top) = self.point_to_coords(point);
        let (left, top) = (left.round(), top.round());
        if left < 0.0
            || top < 0.0
            || left >= (self.integral_plane.0 as f64)
            || top >= (self.integral_plane.1 as f64)
        {
            return None;
        }
        Some(Pixel(left as usize, top as usize))
    }

    /// The row-major offset of a pixel from the start of the buffer.
    pub fn offset(&self, pixel: &Pixel) -> usize {
        pixel.1 * self.integral_plane.0 + pixel.0
    }
}
