// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pictures of the intermediate products
//!
//! Renders an energy map as a grayscale image, and paints a seam onto
//! a copy of a buffer, so the carver's decisions can be looked at.

use crate::energy::EnergyMap;
use crate::error::SeamError;
use crate::pixelbuffer::{PixelBuffer, Sample};
use crate::seam::Seam;
use image::{GrayImage, ImageBuffer, Luma};

/// The energy map scaled so the most energetic pixel is white.  A map
/// with no energy at all comes out black.
pub fn energy_to_image(energy: &EnergyMap) -> GrayImage {
    let (width, height) = energy.dimensions();
    let factor = energy.max();
    let scores = energy.as_slice();
    ImageBuffer::from_fn(width, height, |x, y| {
        let e = scores[(y as usize) * (width as usize) + (x as usize)];
        let level = if factor > 0.0 {
            (e / factor * 255.0).round().min(255.0)
        } else {
            0.0
        };
        Luma([level as u8])
    })
}

/// A copy of `buffer` with every pixel on `seam` set to `color`.
pub fn mark_seam(buffer: &PixelBuffer, seam: &Seam, color: Sample) -> Result<PixelBuffer, SeamError> {
    seam.validate(buffer.width(), buffer.height())?;
    let mut marked = buffer.clone();
    for (x, y) in seam.coordinates() {
        marked.set(x, y, color)?;
    }
    Ok(marked)
}
