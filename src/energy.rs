// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! Given a pixel buffer, calculate how much every pixel matters.  The
//! energy of a pixel is the sum of the gradient magnitudes towards its
//! four neighbours:
//!
//! ```text
//!   e(x,y) = |I(x+1,y) − I(x,y)| + |I(x,y) − I(x−1,y)|
//!          + |I(x,y+1) − I(x,y)| + |I(x,y) − I(x,y−1)|
//! ```
//!
//! where `I` is the luminance (or, for `ChannelMean`, each color
//! channel in turn, averaged).  Neighbours off the edge of the image
//! are replaced by the nearest pixel that is on it, so a border pixel
//! is never compared against anything that isn't there.  Everything is
//! done in `f64` on channels scaled to 0.0-1.0; flat regions come out
//! as exactly zero.

use crate::error::SeamError;
use crate::pixelbuffer::{PixelBuffer, Sample};
use crate::twodmap::TwoDimensionalMap;
use std::cmp::min;
use std::str::FromStr;

/// Which intensity the gradients are taken over.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum EnergyFunction {
    /// Gradients of luminance.
    Luminance,
    /// Gradients of each of R, G and B, averaged.
    ChannelMean,
}

impl Default for EnergyFunction {
    fn default() -> Self {
        EnergyFunction::Luminance
    }
}

impl FromStr for EnergyFunction {
    type Err = SeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "luminance" => Ok(EnergyFunction::Luminance),
            "channel-mean" => Ok(EnergyFunction::ChannelMean),
            _ => Err(SeamError::UnknownSetting {
                kind: "energy",
                name: s.to_string(),
            }),
        }
    }
}

// Rec. 709 weights, as used by the usual rgb-to-gray conversions.
const LUMA_WEIGHTS: [f64; 3] = [0.2125, 0.7154, 0.0721];

/// Luminance of a sample, 0.0-1.0.  Alpha is ignored.
pub fn luminance(p: Sample) -> f64 {
    LUMA_WEIGHTS
        .iter()
        .zip(p.0.iter())
        .map(|(w, &c)| w * f64::from(c))
        .sum::<f64>()
        / 255.0
}

/// The per-pixel energy of an image, plus the luminance plane it was
/// computed from (the forward cost model needs it).
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyMap {
    energy: TwoDimensionalMap<f64>,
    luma: TwoDimensionalMap<f64>,
}

impl EnergyMap {
    /// Compute the energy of every pixel in a buffer.
    pub fn compute(buffer: &PixelBuffer, function: EnergyFunction) -> Self {
        let pixels = buffer.pixels();
        let luma = pixels.map(luminance);
        let energy = match function {
            EnergyFunction::Luminance => gradient_energy(&[&luma]),
            EnergyFunction::ChannelMean => {
                let planes: Vec<TwoDimensionalMap<f64>> = (0..3)
                    .map(|c| pixels.map(|p| f64::from(p.0[c]) / 255.0))
                    .collect();
                let refs: Vec<&TwoDimensionalMap<f64>> = planes.iter().collect();
                gradient_energy(&refs)
            }
        };
        EnergyMap { energy, luma }
    }

    /// Wraps precomputed row-major energies.  The luminance plane is
    /// left flat, so the forward cost model degrades to the backward
    /// one on such a map.
    pub fn from_raw(width: u32, height: u32, energies: Vec<f64>) -> Result<Self, SeamError> {
        let actual = energies.len();
        let energy = TwoDimensionalMap::from_vec(width, height, energies).map_err(|_| {
            SeamError::DimensionMismatch {
                width,
                height,
                expected: width as usize * height as usize,
                actual,
            }
        })?;
        Ok(EnergyMap {
            energy,
            luma: TwoDimensionalMap::filled(width, height, 0.0),
        })
    }

    pub fn width(&self) -> u32 {
        self.energy.width()
    }

    pub fn height(&self) -> u32 {
        self.energy.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.energy.dimensions()
    }

    pub fn get(&self, x: u32, y: u32) -> Result<f64, SeamError> {
        if !self.energy.contains(x, y) {
            let (width, height) = self.dimensions();
            return Err(SeamError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        Ok(self.energy[(x, y)])
    }

    /// Row-major scores.
    pub fn as_slice(&self) -> &[f64] {
        self.energy.as_slice()
    }

    /// The highest score in the map, zero for an empty one.
    pub fn max(&self) -> f64 {
        self.energy.iter().cloned().fold(0.0, f64::max)
    }

    pub(crate) fn energy(&self) -> &TwoDimensionalMap<f64> {
        &self.energy
    }

    pub(crate) fn luma(&self) -> &TwoDimensionalMap<f64> {
        &self.luma
    }

    // Makes every unmasked pixel so expensive that the cheapest seam
    // is always the one crossing the most masked pixels.  A seam has at
    // most max(width, height) pixels, and no single step (energy plus
    // any forward transition cost, which is at most 2.0 on luminance)
    // can outweigh the penalty.
    pub(crate) fn favoring(&self, mask: &TwoDimensionalMap<bool>) -> Self {
        let (width, height) = self.dimensions();
        let penalty = (self.max() + 2.0) * f64::from(width.max(height)) + 1.0;
        let energy = TwoDimensionalMap::from_fn(width, height, |x, y| {
            if mask[(x, y)] {
                self.energy[(x, y)]
            } else {
                self.energy[(x, y)] + penalty
            }
        });
        EnergyMap {
            energy,
            luma: self.luma.clone(),
        }
    }
}

#[inline]
fn gradient(plane: &TwoDimensionalMap<f64>, x: u32, y: u32) -> f64 {
    let (mw, mh) = (plane.width() - 1, plane.height() - 1);
    let current = plane[(x, y)];
    let (left, right, up, down) = (
        plane[(x.saturating_sub(1), y)],
        plane[(min(x + 1, mw), y)],
        plane[(x, y.saturating_sub(1))],
        plane[(x, min(y + 1, mh))],
    );
    (right - current).abs()
        + (current - left).abs()
        + (down - current).abs()
        + (current - up).abs()
}

// Image -> Energy Map, averaged over however many intensity planes
// the energy function asked for.
fn gradient_energy(planes: &[&TwoDimensionalMap<f64>]) -> TwoDimensionalMap<f64> {
    let (width, height) = planes[0].dimensions();
    let count = planes.len() as f64;
    let mut energy = TwoDimensionalMap::filled(width, height, 0.0);
    fill_rows(&mut energy, |y, row| {
        for (x, cell) in row.iter_mut().enumerate() {
            let total: f64 = planes
                .iter()
                .map(|plane| gradient(plane, x as u32, y))
                .sum();
            *cell = total / count;
        }
    });
    energy
}

#[cfg(not(feature = "threaded"))]
fn fill_rows<F>(map: &mut TwoDimensionalMap<f64>, f: F)
where
    F: Fn(u32, &mut [f64]) + Sync,
{
    let width = map.width() as usize;
    for (y, row) in map.as_mut_slice().chunks_mut(width).enumerate() {
        f(y as u32, row);
    }
}

// Every row of the energy map depends only on the source planes, so
// the map is broken into bands of whole rows with chunks_mut and each
// band is handed to its own thread.
#[cfg(feature = "threaded")]
fn fill_rows<F>(map: &mut TwoDimensionalMap<f64>, f: F)
where
    F: Fn(u32, &mut [f64]) + Sync,
{
    let width = map.width() as usize;
    let height = map.height() as usize;
    let threads = num_cpus::get().max(1);
    let band = ((height + threads - 1) / threads).max(1);
    let f = &f;
    let result = crossbeam::scope(|scope| {
        for (index, rows) in map.as_mut_slice().chunks_mut(width * band).enumerate() {
            scope.spawn(move |_| {
                for (offset, row) in rows.chunks_mut(width).enumerate() {
                    f((index * band + offset) as u32, row);
                }
            });
        }
    });
    if let Err(panic) = result {
        std::panic::resume_unwind(panic);
    }
}
