// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The color ramp.  Four shades of blue for escaping orbits, banded by
//! the iteration counter, and black for bounded ones.

use image::Rgb;

/// Bounded orbits, and the fresh canvas.
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
/// Escaping at counter 0 through 13.
pub const DEEP: Rgb<u8> = Rgb([25, 15, 105]);
/// Escaping at counter 14 or 15.
pub const BLUE: Rgb<u8> = Rgb([45, 20, 160]);
/// Escaping at counter 16 or 17.
pub const VIOLET: Rgb<u8> = Rgb([65, 25, 180]);
/// Escaping at counter 18 through 20.
pub const BRIGHT: Rgb<u8> = Rgb([75, 30, 235]);

/// The squared-modulus bound beyond which an orbit is escaping.
pub const ESCAPE_BOUND_SQ: f64 = 4.0;

/// Which rule of the ramp a single iteration step matched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    /// mzsq <= 4.0
    Bounded,
    /// mzsq > 4.0, counter 0..=13
    Deep,
    /// mzsq > 4.0, counter 14..=15
    Blue,
    /// mzsq > 4.0, counter 16..=17
    Violet,
    /// mzsq > 4.0, counter 18..=20
    Bright,
}

impl Band {
    /// Evaluates the ramp's rules in order for one step.  Returns None
    /// when no rule matches: a NaN modulus compares false both ways,
    /// and an escaping counter past 20 falls off the end of the ramp.
    pub fn classify(counter: usize, mzsq: f64) -> Option<Band> {
        if mzsq > ESCAPE_BOUND_SQ {
            match counter {
                0..=13 => Some(Band::Deep),
                14..=15 => Some(Band::Blue),
                16..=17 => Some(Band::Violet),
                18..=20 => Some(Band::Bright),
                _ => None,
            }
        } else if mzsq <= ESCAPE_BOUND_SQ {
            Some(Band::Bounded)
        } else {
            None
        }
    }

    /// The pixel color for this band.
    pub fn color(self) -> Rgb<u8> {
        match self {
            Band::Bounded => BLACK,
            Band::Deep => DEEP,
            Band::Blue => BLUE,
            Band::Violet => VIOLET,
            Band::Bright => BRIGHT,
        }
    }
}
