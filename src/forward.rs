// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The "Forward Energy" cost model (Rubinstein, Shamir & Avidan, 2008)
//!
//! Removing a pixel makes its left and right neighbours adjacent, and
//! if the seam steps diagonally it also makes the pixel above adjacent
//! to one of them.  Forward energy charges the seam for the new edges it
//! would create, which keeps it from slicing straight through places
//! where removal would leave a visible jag.
//!
//! Standard differences, with `L` the luminance:
//!
//! ```text
//!   CU(x,y) = |L(x+1,y) − L(x−1,y)|
//!   CL(x,y) = CU(x,y) + |L(x,y−1) − L(x−1,y)|
//!   CR(x,y) = CU(x,y) + |L(x,y−1) − L(x+1,y)|
//!
//!             ⎧ M(x−1,y−1) + CL(x,y)
//!   M(x,y) = min⎨ M(x,y−1)   + CU(x,y)     + e(x,y)
//!             ⎩ M(x+1,y−1) + CR(x,y)
//!
//!   M(x,0) = e(x,0) + CU(x,0)
//! ```
//!
//! Neighbours off the edge are clamped to the edge, the same as the
//! energy map does.

use crate::flipper::Field;
use crate::seamfinder::SeamFinder;
use std::cmp::min;

#[derive(Debug, Default, Copy, Clone)]
pub struct ForwardEnergy;

// The new horizontal edge between (x − 1, y) and (x + 1, y).
fn cost_up<F: Field>(luma: &F, x: u32, y: u32) -> f64 {
    let last = luma.width() - 1;
    (luma.value(min(x + 1, last), y) - luma.value(x.saturating_sub(1), y)).abs()
}

impl SeamFinder for ForwardEnergy {
    fn top_cost<F: Field>(&self, energy: &F, luma: &F, x: u32) -> f64 {
        energy.value(x, 0) + cost_up(luma, x, 0)
    }

    fn step_cost<F: Field>(&self, luma: &F, x: u32, y: u32, parent: u32) -> f64 {
        let up = cost_up(luma, x, y);
        if parent == x {
            up
        } else {
            up + (luma.value(x, y - 1) - luma.value(parent, y)).abs()
        }
    }
}
