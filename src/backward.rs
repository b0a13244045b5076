// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The classic cost model from Avidan & Shamir (2007)
//!
//! A seam costs exactly the sum of the energies of the pixels it
//! crosses:
//!
//! ```text
//!   M(x,0) = e(x,0)
//!   M(x,y) = e(x,y) + min(M(x−1,y−1), M(x,y−1), M(x+1,y−1))
//! ```
//!
//! with neighbours that fall off the edge left out of the min.

use crate::flipper::Field;
use crate::seamfinder::SeamFinder;

#[derive(Debug, Default, Copy, Clone)]
pub struct BackwardEnergy;

impl SeamFinder for BackwardEnergy {
    fn top_cost<F: Field>(&self, energy: &F, _luma: &F, x: u32) -> f64 {
        energy.value(x, 0)
    }

    fn step_cost<F: Field>(&self, _luma: &F, _x: u32, _y: u32, _parent: u32) -> f64 {
        0.0
    }
}
