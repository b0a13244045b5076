// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Scalar fields and the dimensional flipper
//!
//! The seam search only ever walks top to bottom.  A horizontal seam
//! is found by handing it a `Flipper`, a read-only proxy that swaps
//! width for height and every x for y, so the left-to-right search over
//! the real map is the same top-to-bottom search over the flipped one.
//! Nothing is copied.

use crate::twodmap::TwoDimensionalMap;

/// A read-only grid of scalars, as consumed by the seam search.
pub trait Field {
    fn dimensions(&self) -> (u32, u32);

    fn value(&self, x: u32, y: u32) -> f64;

    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }
}

impl Field for TwoDimensionalMap<f64> {
    fn dimensions(&self) -> (u32, u32) {
        TwoDimensionalMap::dimensions(self)
    }

    #[inline]
    fn value(&self, x: u32, y: u32) -> f64 {
        self[(x, y)]
    }
}

/// A field viewed transposed.
pub struct Flipper<'a, F: Field> {
    pub field: &'a F,
}

impl<'a, F: Field> Flipper<'a, F> {
    pub fn new(field: &'a F) -> Self {
        Flipper { field }
    }
}

impl<'a, F: Field> Field for Flipper<'a, F> {
    fn dimensions(&self) -> (u32, u32) {
        let (x, y) = self.field.dimensions();
        (y, x)
    }

    #[inline]
    fn value(&self, x: u32, y: u32) -> f64 {
        self.field.value(y, x)
    }
}
