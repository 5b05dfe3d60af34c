// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! "Listening" to a render.  Every orbit step that lands in one of the
//! two late bands becomes a note: E5 for the 16..=17 band and C5 for
//! the 18..=20 band.  Pixels are visited column by column, top to
//! bottom, and each pixel's steps in order.
//!
//! The sequence is computed lazily, straight from the engine, and is
//! capped so that it is always finite.  Clone a Tones before draining
//! it to play the same sequence again.  Playing the notes is somebody
//! else's job.

use itertools::Product;
use std::ops::Range;

use engine::{Engine, Orbit};
use palette::Band;
use planes::Pixel;

/// Note for a step in the 16..=17 band, in Hz.
pub const E5: f64 = 2.0 * 329.6276;
/// Note for a step in the 18..=20 band, in Hz.
pub const C5: f64 = 2.0 * 261.6256;
/// The default cap on the length of a sequence.
pub const MAX_TONES: usize = 500_000;

/// The note for a band, if the band sings.
pub fn tone(band: Band) -> Option<f64> {
    match band {
        Band::Violet => Some(E5),
        Band::Bright => Some(C5),
        _ => None,
    }
}

/// A lazy, finite, restartable sequence of note frequencies drawn from
/// an engine's orbits.  The steps are classified by the ramp's rules
/// one by one, whatever coloring rule the engine paints with.
#[derive(Clone)]
pub struct Tones {
    engine: Engine,
    pixels: Product<Range<usize>, Range<usize>>,
    orbit: Option<Orbit>,
    emitted: usize,
    limit: usize,
}

impl Tones {
    /// The sequence for an engine, capped at MAX_TONES.
    pub fn new(engine: &Engine) -> Tones {
        Tones::with_limit(engine, MAX_TONES)
    }

    /// The sequence for an engine, capped at `limit`.
    pub fn with_limit(engine: &Engine, limit: usize) -> Tones {
        let plane = engine.plane();
        Tones {
            engine: *engine,
            pixels: iproduct!(0..plane.width(), 0..plane.height()),
            orbit: None,
            emitted: 0,
            limit,
        }
    }
}

impl Iterator for Tones {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        while self.emitted < self.limit {
            match self.orbit.as_mut().and_then(|orbit| orbit.next()) {
                Some(step) => {
                    if let Some(freq) = step.band().and_then(tone) {
                        self.emitted += 1;
                        return Some(freq);
                    }
                }
                None => {
                    let (column, row) = self.pixels.next()?;
                    let point = self.engine.plane().pixel_to_point(&Pixel(column, row));
                    self.orbit = Some(self.engine.orbit(point));
                }
            }
        }
        None
    }
}
