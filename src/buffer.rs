// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render result: a dense, row-major raster of RGB triples.  The
//! engine builds one per render pass and hands ownership to the caller,
//! who may inspect it, paste regions into it, or save it to disk.

use image::{self, ColorType, Rgb};
use std::path::Path;

use error::RenderError;
use planes::Pixel;

/// An owned RGB raster.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    raw: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps raw row-major RGB bytes.  The engine is the only producer,
    /// and it always sizes the vector to width * height * 3 for a raster
    /// that PlaneMapper::new has already accepted.
    pub(crate) fn from_raw(width: usize, height: usize, raw: Vec<u8>) -> PixelBuffer {
        debug_assert_eq!(raw.len(), width * height * 3);
        PixelBuffer { width, height, raw }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    fn offset(&self, pixel: &Pixel) -> usize {
        assert!(
            pixel.0 < self.width && pixel.1 < self.height,
            "pixel {:?} outside a {}x{} buffer",
            pixel,
            self.width,
            self.height
        );
        (pixel.1 * self.width + pixel.0) * 3
    }

    /// The color at a pixel.  Panics when the pixel is out of bounds,
    /// like slice indexing does.
    pub fn get(&self, pixel: &Pixel) -> Rgb<u8> {
        let at = self.offset(pixel);
        Rgb([self.raw[at], self.raw[at + 1], self.raw[at + 2]])
    }

    /// Iterates over every pixel with its coordinates, row by row.
    pub fn pixels<'a>(&'a self) -> impl Iterator<Item = (Pixel, Rgb<u8>)> + 'a {
        let width = self.width;
        self.raw
            .chunks(3)
            .enumerate()
            .map(move |(i, rgb)| (Pixel(i % width, i / width), Rgb([rgb[0], rgb[1], rgb[2]])))
    }

    /// The raw bytes, three per pixel, row-major.
    pub fn as_raw(&self) -> &[u8] {
        &self.raw
    }

    /// Copies another buffer into this one with its top left corner at
    /// `at`.  Anything hanging past the edge is clipped.
    pub fn paste(&mut self, region: &PixelBuffer, at: &Pixel) {
        if at.0 >= self.width || at.1 >= self.height {
            return;
        }
        let columns = region.width.min(self.width - at.0);
        let rows = region.height.min(self.height - at.1);
        for row in 0..rows {
            let from = row * region.width * 3;
            let to = ((at.1 + row) * self.width + at.0) * 3;
            self.raw[to..to + columns * 3].copy_from_slice(&region.raw[from..from + columns * 3]);
        }
    }

    /// Writes the buffer to disk.  The container (BMP, PNG, JPEG, PNM...)
    /// is chosen from the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        image::save_buffer(
            path,
            &self.raw,
            self.width as u32,
            self.height as u32,
            ColorType::RGB(8),
        )?;
        Ok(())
    }
}
