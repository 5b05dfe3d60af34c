// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time engine.  Every pixel is mapped to a point on the
//! complex plane, the point seeds the recurrence z <- z*z - c, and the
//! orbit is run for exactly twenty-one steps.  There is no early exit:
//! every step that can be classified repaints the pixel, so the color
//! that survives is the one chosen by the last classifiable step.
//!
//! An escaping orbit blows up fast enough to overflow to infinity, and
//! then to NaN, well inside twenty-one steps.  NaN compares false
//! against the bound both ways, so from that step on nothing repaints
//! the pixel and it keeps the color of the last finite comparison.
//! That is what gives the classic renders their bands, and it is
//! reproduced here bit for bit.

use image::Rgb;
use num::Complex;
use std::iter::Enumerate;
use std::slice::ChunksMut;
use std::sync::{Arc, Mutex};

use buffer::PixelBuffer;
use error::RenderError;
use palette::{Band, BLACK};
use planes::{Pixel, PlaneMapper};

/// The highest value of the iteration counter.  The counter runs from
/// zero to this inclusive, so every orbit has MAX_ITERATIONS + 1 steps.
pub const MAX_ITERATIONS: usize = 20;

type RowQueue<'a> = Arc<Mutex<Enumerate<ChunksMut<'a, u8>>>>;

/// Which member of the z*z - c family to draw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Mode {
    /// z starts at zero, c is the pixel's point.
    Mandelbrot,
    /// z starts at the pixel's point, c is fixed for the whole render.
    Julia(Complex<f64>),
}

impl Default for Mode {
    fn default() -> Mode {
        Mode::Mandelbrot
    }
}

/// How an orbit's steps pick the pixel color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Coloring {
    /// Every classifiable step repaints; the last one wins.  This is
    /// what the classic renders look like.
    LastIteration,
    /// Stop at the first step outside the bound and color by its
    /// counter; black if the orbit never leaves.
    FirstEscape,
}

impl Default for Coloring {
    fn default() -> Coloring {
        Coloring::LastIteration
    }
}

/// One application of the recurrence.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Step {
    /// Zero for the first step.
    pub counter: usize,
    /// The new value of z.
    pub z: Complex<f64>,
    /// The squared modulus of the new z.
    pub mzsq: f64,
}

impl Step {
    /// The ramp rule this step matches, if any.
    pub fn band(&self) -> Option<Band> {
        Band::classify(self.counter, self.mzsq)
    }
}

/// The orbit of a single point: an iterator over its steps.  A clone
/// taken before stepping replays the same steps.
#[derive(Clone, Debug)]
pub struct Orbit {
    z: Complex<f64>,
    c: Complex<f64>,
    counter: usize,
}

impl Orbit {
    /// Seeds the recurrence for `point` according to `mode`.
    pub fn new(point: Complex<f64>, mode: Mode) -> Orbit {
        let (z, c) = match mode {
            Mode::Mandelbrot => (Complex::new(0.0, 0.0), point),
            Mode::Julia(c) => (point, c),
        };
        Orbit { z, c, counter: 0 }
    }
}

impl Iterator for Orbit {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.counter > MAX_ITERATIONS {
            return None;
        }
        let (x, y) = (self.z.re, self.z.im);
        // Spelled out rather than z * z - c so the rounding matches the
        // classic component-wise form exactly.
        let x_new = x * x - y * y - self.c.re;
        let y_new = 2.0 * x * y - self.c.im;
        let step = Step {
            counter: self.counter,
            z: Complex::new(x_new, y_new),
            mzsq: x_new * x_new + y_new * y_new,
        };
        self.z = step.z;
        self.counter += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (MAX_ITERATIONS + 1).saturating_sub(self.counter);
        (left, Some(left))
    }
}

/// The step of an orbit that decided a pixel's color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrbitResult {
    /// The step's counter.
    pub counter: usize,
    /// The step's squared modulus.
    pub mzsq: f64,
    /// The ramp rule the step matched.
    pub band: Band,
}

impl OrbitResult {
    fn from_step(step: &Step) -> Option<OrbitResult> {
        step.band().map(|band| OrbitResult {
            counter: step.counter,
            mzsq: step.mzsq,
            band,
        })
    }

    /// The pixel color.
    pub fn color(&self) -> Rgb<u8> {
        self.band.color()
    }
}

/// The Engine holds the parameters of one render pass.  Once built, it
/// is immutable and may be shared between threads.
#[derive(Copy, Clone, Debug)]
pub struct Engine {
    plane: PlaneMapper,
    mode: Mode,
    coloring: Coloring,
}

impl Engine {
    /// Takes an already validated plane, the recurrence to run, and the
    /// coloring rule.
    pub fn new(plane: PlaneMapper, mode: Mode, coloring: Coloring) -> Engine {
        Engine {
            plane,
            mode,
            coloring,
        }
    }

    /// The raster and viewport this engine renders.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// The recurrence this engine runs.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The coloring rule this engine applies.
    pub fn coloring(&self) -> Coloring {
        self.coloring
    }

    /// The orbit of a point under this engine's mode.
    pub fn orbit(&self, point: Complex<f64>) -> Orbit {
        Orbit::new(point, self.mode)
    }

    /// Runs the orbit of a point and reports the step that colors it.
    /// None only if no step at all could be classified, in which case
    /// the pixel stays black.
    pub fn evaluate(&self, point: Complex<f64>) -> Option<OrbitResult> {
        let steps = self.orbit(point);
        match self.coloring {
            Coloring::LastIteration => steps.filter_map(|s| OrbitResult::from_step(&s)).last(),
            Coloring::FirstEscape => {
                let mut last = None;
                for step in steps {
                    match OrbitResult::from_step(&step) {
                        Some(result) if result.band != Band::Bounded => return Some(result),
                        Some(result) => last = Some(result),
                        None => (),
                    }
                }
                last
            }
        }
    }

    /// The color of a point.
    pub fn color(&self, point: Complex<f64>) -> Rgb<u8> {
        self.evaluate(point)
            .map(|result| result.color())
            .unwrap_or(BLACK)
    }

    /// The color of a pixel of this engine's raster.
    pub fn color_pixel(&self, pixel: &Pixel) -> Rgb<u8> {
        self.color(self.plane.pixel_to_point(pixel))
    }

    /// Paints one raster row, starting at column `left`, into `out`.
    /// `out` holds three bytes per pixel; its length sets how many
    /// pixels are painted.
    fn paint_row(&self, row: usize, left: usize, out: &mut [u8]) {
        for (i, rgb) in out.chunks_mut(3).enumerate() {
            let color = self.color_pixel(&Pixel(left + i, row));
            rgb.copy_from_slice(&color.0);
        }
    }

    /// The single-threaded render.
    pub fn render(&self) -> PixelBuffer {
        let (width, height) = (self.plane.width(), self.plane.height());
        debug!("rendering {}x{} {:?} on one thread", width, height, self.mode);
        let mut raw = vec![0 as u8; width * height * 3];
        for (row, out) in raw.chunks_mut(width * 3).enumerate() {
            self.paint_row(row, 0, out);
        }
        PixelBuffer::from_raw(width, height, raw)
    }

    /// A multi-threaded version of the render function.  Rows are
    /// handed out one at a time from a shared queue; each worker owns
    /// the rows it takes, so the buffer itself is never locked.
    pub fn render_threaded(&self, threads: usize) -> Result<PixelBuffer, RenderError> {
        if threads == 0 {
            return Err(RenderError::NoThreads);
        }
        let (width, height) = (self.plane.width(), self.plane.height());
        debug!(
            "rendering {}x{} {:?} on {} threads",
            width, height, self.mode, threads
        );
        let mut raw = vec![0 as u8; width * height * 3];
        {
            let rows: RowQueue = Arc::new(Mutex::new(raw.chunks_mut(width * 3).enumerate()));
            crossbeam::scope(|spawner| {
                for worker in 0..threads {
                    let rows = rows.clone();
                    spawner.spawn(move |_| {
                        let mut painted = 0;
                        loop {
                            let row = { rows.lock().ok().and_then(|mut rows| rows.next()) };
                            match row {
                                Some((row, out)) => {
                                    self.paint_row(row, 0, out);
                                    painted += 1;
                                }
                                None => {
                                    break;
                                }
                            }
                        }
                        trace!("worker {} painted {} rows", worker, painted);
                    });
                }
            })
            .map_err(|_| RenderError::WorkerPanicked)?;
        }
        Ok(PixelBuffer::from_raw(width, height, raw))
    }

    /// Renders only the sub-raster of `width` x `height` pixels whose
    /// top left corner is `corner`.  Each pixel is colored exactly as
    /// the full render would color it.
    pub fn render_region(
        &self,
        corner: &Pixel,
        width: usize,
        height: usize,
    ) -> Result<PixelBuffer, RenderError> {
        let Pixel(left, top) = *corner;
        if width == 0
            || height == 0
            || left + width > self.plane.width()
            || top + height > self.plane.height()
        {
            return Err(RenderError::RegionOutOfBounds {
                left,
                top,
                width,
                height,
                raster_width: self.plane.width(),
                raster_height: self.plane.height(),
            });
        }
        trace!("rendering region {}x{} at ({}, {})", width, height, left, top);
        let mut raw = vec![0 as u8; width * height * 3];
        for (i, out) in raw.chunks_mut(width * 3).enumerate() {
            self.paint_row(top + i, left, out);
        }
        Ok(PixelBuffer::from_raw(width, height, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::{BLUE, BRIGHT, DEEP, VIOLET};
    use planes::Viewport;

    fn classic(mode: Mode, coloring: Coloring) -> Engine {
        let plane = PlaneMapper::new(800, 600, Viewport::default()).unwrap();
        Engine::new(plane, mode, coloring)
    }

    fn small(mode: Mode) -> Engine {
        let plane = PlaneMapper::new(64, 48, Viewport::default()).unwrap();
        Engine::new(plane, mode, Coloring::LastIteration)
    }

    /// A literal, loop-and-repaint trace of one Mandelbrot point,
    /// returning the surviving color and the counter that painted it.
    fn brute_force(a: f64, b: f64) -> (Rgb<u8>, usize) {
        let (mut x, mut y) = (0.0_f64, 0.0_f64);
        let (mut color, mut painted) = (BLACK, 0);
        let mut counter = 0;
        while counter <= 20 {
            let x_new = x * x - y * y - a;
            let y_new = 2.00 * x * y - b;
            let mzsq = x_new * x_new + y_new * y_new;
            if mzsq > 4.0 && counter <= 13 {
                color = DEEP;
                painted = counter;
            } else if mzsq > 4.0 && 14 <= counter && counter <= 15 {
                color = BLUE;
                painted = counter;
            } else if mzsq > 4.0 && 16 <= counter && counter <= 17 {
                color = VIOLET;
                painted = counter;
            } else if mzsq > 4.0 && 18 <= counter && counter <= 20 {
                color = BRIGHT;
                painted = counter;
            } else if mzsq <= 4.0 {
                color = BLACK;
                painted = counter;
            }
            x = x_new;
            y = y_new;
            counter += 1;
        }
        (color, painted)
    }

    #[test]
    fn every_orbit_has_twenty_one_steps() {
        let orbit = Orbit::new(Complex::new(2.0, 1.0), Mode::Mandelbrot);
        assert_eq!(orbit.size_hint(), (21, Some(21)));
        let counters: Vec<usize> = orbit.map(|s| s.counter).collect();
        assert_eq!(counters, (0..21).collect::<Vec<usize>>());
    }

    #[test]
    fn origin_is_a_fixed_point() {
        let engine = classic(Mode::Mandelbrot, Coloring::LastIteration);
        for step in engine.orbit(Complex::new(0.0, 0.0)) {
            assert_eq!(step.z, Complex::new(0.0, 0.0));
            assert_eq!(step.mzsq, 0.0);
        }
        let result = engine.evaluate(Complex::new(0.0, 0.0)).unwrap();
        assert_eq!(result.counter, 20);
        assert_eq!(result.band, Band::Bounded);
        assert_eq!(engine.color_pixel(&Pixel(300, 300)), BLACK);
    }

    #[test]
    fn far_point_keeps_the_color_of_its_last_finite_step() {
        let engine = classic(Mode::Mandelbrot, Coloring::LastIteration);
        let point = Complex::new(2.0, 1.0);
        let first = engine.orbit(point).next().unwrap();
        assert!(first.mzsq > 4.0);
        let (expected, painted) = brute_force(2.0, 1.0);
        let result = engine.evaluate(point).unwrap();
        assert_eq!(result.counter, painted);
        assert_eq!(result.counter, 10);
        assert_eq!(result.color(), expected);
        assert_eq!(result.color(), DEEP);
        assert!(engine.orbit(point).last().unwrap().mzsq.is_nan());
    }

    #[test]
    fn engine_agrees_with_brute_force_on_a_coarse_grid() {
        let engine = classic(Mode::Mandelbrot, Coloring::LastIteration);
        for m in (0..800).step_by(13) {
            for n in (0..600).step_by(11) {
                let a = -1.5 + (m as f64) / 200.0;
                let b = 1.5 - (n as f64) / 200.0;
                let (color, _) = brute_force(a, b);
                assert_eq!(engine.color_pixel(&Pixel(m, n)), color, "pixel {},{}", m, n);
            }
        }
    }

    #[test]
    fn each_band_shows_up_where_expected() {
        let engine = classic(Mode::Mandelbrot, Coloring::LastIteration);
        assert_eq!(engine.color_pixel(&Pixel(0, 0)), DEEP);
        assert_eq!(engine.color_pixel(&Pixel(203, 217)), BLUE);
        assert_eq!(engine.color_pixel(&Pixel(210, 217)), VIOLET);
        assert_eq!(engine.color_pixel(&Pixel(210, 224)), BRIGHT);
        assert_eq!(engine.color_pixel(&Pixel(210, 231)), BLACK);
    }

    #[test]
    fn julia_starts_at_the_pixel_and_subtracts_the_constant() {
        let c = Complex::new(0.8, 0.12);
        let point = Complex::new(0.5, 0.25);
        let julia = Orbit::new(point, Mode::Julia(c)).next().unwrap();
        assert_eq!(julia.z.re, 0.5 * 0.5 - 0.25 * 0.25 - 0.8);
        assert_eq!(julia.z.im, 2.0 * 0.5 * 0.25 - 0.12);
        let mandelbrot = Orbit::new(point, Mode::Mandelbrot).next().unwrap();
        assert_eq!(mandelbrot.z, Complex::new(-0.5, -0.25));
    }

    #[test]
    fn julia_and_mandelbrot_disagree() {
        let mandelbrot = classic(Mode::Mandelbrot, Coloring::LastIteration);
        let julia = classic(Mode::Julia(Complex::new(0.8, 0.12)), Coloring::LastIteration);
        // a = 1.75, b = 0: inside the Mandelbrot set, outside this Julia set.
        assert_eq!(mandelbrot.color_pixel(&Pixel(650, 300)), BLACK);
        assert_eq!(julia.color_pixel(&Pixel(650, 300)), DEEP);
        // a = -1, b = 0: the other way around.
        assert_eq!(mandelbrot.color_pixel(&Pixel(100, 300)), DEEP);
        assert_eq!(julia.color_pixel(&Pixel(100, 300)), BLACK);
    }

    #[test]
    fn first_escape_colors_by_the_escape_step() {
        let last = classic(Mode::Mandelbrot, Coloring::LastIteration);
        let first = classic(Mode::Mandelbrot, Coloring::FirstEscape);
        let point = last.plane().pixel_to_point(&Pixel(203, 217));
        assert_eq!(last.evaluate(point).unwrap().counter, 14);
        let escaped = first.evaluate(point).unwrap();
        assert_eq!(escaped.counter, 5);
        assert_eq!(escaped.color(), DEEP);
        assert_eq!(first.color_pixel(&Pixel(300, 300)), BLACK);
        assert_eq!(first.evaluate(Complex::new(2.0, 1.0)).unwrap().counter, 0);
    }

    #[test]
    fn renders_are_deterministic() {
        let engine = small(Mode::Mandelbrot);
        assert_eq!(engine.render(), engine.render());
    }

    #[test]
    fn threaded_render_matches_single() {
        let engine = small(Mode::Julia(Complex::new(0.8, 0.12)));
        let single = engine.render();
        for threads in 1..6 {
            assert_eq!(engine.render_threaded(threads).unwrap(), single);
        }
    }

    #[test]
    fn threaded_render_needs_a_thread() {
        match small(Mode::Mandelbrot).render_threaded(0) {
            Err(RenderError::NoThreads) => (),
            other => panic!("expected NoThreads, got {:?}", other),
        }
    }

    #[test]
    fn regions_paste_into_the_full_render() {
        let engine = small(Mode::Mandelbrot);
        let full = engine.render();
        let mut assembled = engine.render_region(&Pixel(0, 0), 64, 48).unwrap();
        let region = engine.render_region(&Pixel(10, 7), 20, 30).unwrap();
        assert_eq!(region.get(&Pixel(0, 0)), full.get(&Pixel(10, 7)));
        assembled.paste(&region, &Pixel(10, 7));
        assert_eq!(assembled, full);

        let mut tiled = PixelBuffer::from_raw(64, 48, vec![255; 64 * 48 * 3]);
        for top in (0..48).step_by(16) {
            for left in (0..64).step_by(16) {
                let tile = engine.render_region(&Pixel(left, top), 16, 16).unwrap();
                tiled.paste(&tile, &Pixel(left, top));
            }
        }
        assert_eq!(tiled, full);
    }

    #[test]
    fn regions_must_fit() {
        let engine = small(Mode::Mandelbrot);
        assert!(engine.render_region(&Pixel(60, 0), 5, 1).is_err());
        assert!(engine.render_region(&Pixel(0, 40), 1, 9).is_err());
        assert!(engine.render_region(&Pixel(0, 0), 0, 1).is_err());
        assert!(engine.render_region(&Pixel(63, 47), 1, 1).is_ok());
    }
}
