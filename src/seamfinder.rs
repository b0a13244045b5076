// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Finding the cheapest seam
//!
//! Dynamic programming over the energy map.  The first pass fills a
//! table with, for every pixel, the cheapest cost of any connected path
//! from the top row down to it, and which pixel in the row above that
//! path came through.  The second pass starts at the cheapest pixel in
//! the bottom row and walks the back pointers up to the top.  Both
//! passes are plain loops over an array, so the stack never grows with
//! the image.
//!
//! Ties are broken the same way every time.  At the bottom row the
//! pixel nearest the center column wins, then the leftmost; walking
//! back, the pixel straight above wins, then the one to the left, then
//! the one to the right.
//!
//! Horizontal seams are vertical seams of the flipped map.

use crate::backward::BackwardEnergy;
use crate::energy::EnergyMap;
use crate::error::SeamError;
use crate::flipper::{Field, Flipper};
use crate::forward::ForwardEnergy;
use crate::seam::{Orientation, Seam};
use crate::twodmap::TwoDimensionalMap;
use std::str::FromStr;

/// One cell of the dynamic-programming table.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct CostAndParent {
    pub cost: f64,
    pub parent: u32,
}

/// A seam cost model.  Implementors say what a seam costs to start and
/// what each step down costs on top of the energy of the pixel stepped
/// onto; the search itself is shared.
pub trait SeamFinder {
    /// Total cost of a seam that starts (and so far ends) at (x, 0).
    fn top_cost<F: Field>(&self, energy: &F, luma: &F, x: u32) -> f64;

    /// Extra cost of stepping from (parent, y − 1) to (x, y), not
    /// counting the energy at (x, y).
    fn step_cost<F: Field>(&self, luma: &F, x: u32, y: u32, parent: u32) -> f64;

    /// The cheapest top-to-bottom seam: one x coordinate per row.
    fn find_vertical(&self, map: &EnergyMap) -> Result<Seam, SeamError> {
        check_not_empty(map)?;
        Ok(Seam::new(
            Orientation::Vertical,
            seam_path(self, map.energy(), map.luma()),
        ))
    }

    /// The cheapest left-to-right seam: one y coordinate per column.
    fn find_horizontal(&self, map: &EnergyMap) -> Result<Seam, SeamError> {
        check_not_empty(map)?;
        Ok(Seam::new(
            Orientation::Horizontal,
            seam_path(
                self,
                &Flipper::new(map.energy()),
                &Flipper::new(map.luma()),
            ),
        ))
    }

    fn find(&self, map: &EnergyMap, orientation: Orientation) -> Result<Seam, SeamError> {
        match orientation {
            Orientation::Vertical => self.find_vertical(map),
            Orientation::Horizontal => self.find_horizontal(map),
        }
    }
}

fn check_not_empty(map: &EnergyMap) -> Result<(), SeamError> {
    let (width, height) = map.dimensions();
    if width == 0 || height == 0 {
        return Err(SeamError::EmptyMap { width, height });
    }
    Ok(())
}

// Fill, then backtrack.
fn seam_path<S, F>(finder: &S, energy: &F, luma: &F) -> Vec<u32>
where
    S: SeamFinder + ?Sized,
    F: Field,
{
    let (width, height) = energy.dimensions();
    let last = width - 1;
    let mut table = TwoDimensionalMap::filled(
        width,
        height,
        CostAndParent {
            cost: 0.0,
            parent: 0,
        },
    );

    for x in 0..width {
        table[(x, 0)] = CostAndParent {
            cost: finder.top_cost(energy, luma, x),
            parent: x,
        };
    }

    // Every cell in a row depends only on the row above it.  Neighbours
    // are tried straight-above first, so only a strictly cheaper left
    // or right parent displaces it.
    for y in 1..height {
        for x in 0..width {
            let through = |p: u32| table[(p, y - 1)].cost + finder.step_cost(luma, x, y, p);
            let mut best = CostAndParent {
                cost: through(x),
                parent: x,
            };
            let sides = [x.checked_sub(1), Some(x + 1).filter(|&p| p <= last)];
            for &p in sides.iter().flatten() {
                let cost = through(p);
                if cost < best.cost {
                    best = CostAndParent { cost, parent: p };
                }
            }
            table[(x, y)] = CostAndParent {
                cost: energy.value(x, y) + best.cost,
                parent: best.parent,
            };
        }
    }

    backtrack(&table)
}

// Pick the cheapest cell of the bottom row, nearest the center on a
// tie, and follow the parents back up.
fn backtrack(table: &TwoDimensionalMap<CostAndParent>) -> Vec<u32> {
    let (width, height) = table.dimensions();
    let bottom = height - 1;
    let center = (width - 1) / 2;
    let distance = |x: u32| if x > center { x - center } else { center - x };

    let mut end = center;
    for x in 0..width {
        let (cost, best) = (table[(x, bottom)].cost, table[(end, bottom)].cost);
        if cost < best || (cost == best && distance(x) < distance(end)) {
            end = x;
        }
    }

    let mut path = vec![0; height as usize];
    let mut x = end;
    for y in (0..height).rev() {
        path[y as usize] = x;
        x = table[(x, y)].parent;
    }
    path
}

/// The seam cost models on offer.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum CostModel {
    /// A seam costs the sum of the energies it crosses.
    Backward,
    /// A seam also pays for the new edges its removal creates.
    Forward,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel::Backward
    }
}

impl FromStr for CostModel {
    type Err = SeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backward" => Ok(CostModel::Backward),
            "forward" => Ok(CostModel::Forward),
            _ => Err(SeamError::UnknownSetting {
                kind: "cost",
                name: s.to_string(),
            }),
        }
    }
}

impl CostModel {
    pub fn find(self, map: &EnergyMap, orientation: Orientation) -> Result<Seam, SeamError> {
        match self {
            CostModel::Backward => BackwardEnergy.find(map, orientation),
            CostModel::Forward => ForwardEnergy.find(map, orientation),
        }
    }
}
