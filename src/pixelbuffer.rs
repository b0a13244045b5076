// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel buffer
//!
//! The image being carved.  A buffer is built once from decoded pixels
//! and from then on only changes shape through the seam transforms,
//! each of which hands back a new buffer and leaves the old one alone.

use crate::error::SeamError;
use crate::seam::{Orientation, Seam};
use crate::twodmap::TwoDimensionalMap;
use image::{GenericImageView, ImageBuffer, Pixel, Primitive, Rgba, RgbaImage};
use itertools::iproduct;
use num_traits::NumCast;

/// One RGBA sample, eight bits per channel.
pub type Sample = Rgba<u8>;

#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pixels: TwoDimensionalMap<Sample>,
}

// Rescale a channel of any primitive type to 0..=255.
fn channel_to_u8<S: Primitive>(c: S) -> u8 {
    let max: f64 = NumCast::from(S::DEFAULT_MAX_VALUE).unwrap_or(255.0);
    let value: f64 = NumCast::from(c).unwrap_or(0.0);
    (value / max * 255.0).round().max(0.0).min(255.0) as u8
}

/// The rounded per-channel mean of two samples.
pub fn average(a: Sample, b: Sample) -> Sample {
    let mut out = a;
    for (o, (&ca, &cb)) in out.0.iter_mut().zip(a.0.iter().zip(b.0.iter())) {
        *o = ((ca as u16 + cb as u16 + 1) / 2) as u8;
    }
    out
}

impl PixelBuffer {
    /// Wraps row-major samples.
    pub fn new(width: u32, height: u32, samples: Vec<Sample>) -> Result<Self, SeamError> {
        if width == 0 || height == 0 {
            return Err(SeamError::EmptyMap { width, height });
        }
        let actual = samples.len();
        let pixels = TwoDimensionalMap::from_vec(width, height, samples).map_err(|_| {
            SeamError::DimensionMismatch {
                width,
                height,
                expected: width as usize * height as usize,
                actual,
            }
        })?;
        Ok(PixelBuffer { pixels })
    }

    /// Builds a buffer from interleaved 8-bit RGB (three channels) or
    /// RGBA (four channels) bytes.  RGB samples are made opaque.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: usize,
        bytes: &[u8],
    ) -> Result<Self, SeamError> {
        let expected = width as usize * height as usize;
        if !(channels == 3 || channels == 4) || bytes.len() != expected * channels {
            return Err(SeamError::DimensionMismatch {
                width,
                height,
                expected,
                actual: bytes.len() / channels.max(1),
            });
        }
        let samples = bytes
            .chunks(channels)
            .map(|c| Rgba([c[0], c[1], c[2], if channels == 4 { c[3] } else { 255 }]))
            .collect();
        PixelBuffer::new(width, height, samples)
    }

    /// Copies any image into a buffer, rescaling every channel to eight
    /// bits.
    pub fn from_image<I, P, S>(image: &I) -> Result<Self, SeamError>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
    {
        let (width, height) = image.dimensions();
        let samples = iproduct!(0..height, 0..width)
            .map(|(y, x)| {
                let c = image.get_pixel(x, y).to_rgba().0;
                Rgba([
                    channel_to_u8(c[0]),
                    channel_to_u8(c[1]),
                    channel_to_u8(c[2]),
                    channel_to_u8(c[3]),
                ])
            })
            .collect();
        PixelBuffer::new(width, height, samples)
    }

    /// A uniform buffer, mostly useful for tests and benchmarks.
    pub fn filled(width: u32, height: u32, sample: Sample) -> Result<Self, SeamError> {
        PixelBuffer::new(
            width,
            height,
            vec![sample; width as usize * height as usize],
        )
    }

    /// Hands the pixels to the `image` crate for encoding.
    pub fn to_image(&self) -> RgbaImage {
        ImageBuffer::from_fn(self.width(), self.height(), |x, y| self.pixels[(x, y)])
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn samples(&self) -> &[Sample] {
        self.pixels.as_slice()
    }

    pub(crate) fn pixels(&self) -> &TwoDimensionalMap<Sample> {
        &self.pixels
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<(), SeamError> {
        if self.pixels.contains(x, y) {
            Ok(())
        } else {
            Err(SeamError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Result<Sample, SeamError> {
        self.check_bounds(x, y)?;
        Ok(self.pixels[(x, y)])
    }

    pub fn set(&mut self, x: u32, y: u32, sample: Sample) -> Result<(), SeamError> {
        self.check_bounds(x, y)?;
        self.pixels[(x, y)] = sample;
        Ok(())
    }

    // Checks that a seam both fits this buffer and runs the way the
    // caller expects.
    fn check_seam(&self, seam: &Seam, orientation: Orientation) -> Result<(), SeamError> {
        if seam.orientation() != orientation {
            return Err(SeamError::invalid_seam(format!(
                "expected a {:?} seam, got a {:?} one",
                orientation,
                seam.orientation()
            )));
        }
        seam.validate(self.width(), self.height())
    }

    fn without_seam(&self, seam: &Seam, orientation: Orientation) -> Result<Self, SeamError> {
        self.check_seam(seam, orientation)?;
        let (_, length) = orientation.lanes(self.width(), self.height());
        if length == 1 {
            let (width, height) = orientation.dimensions(seam.len() as u32, 0);
            return Err(SeamError::EmptyMap { width, height });
        }
        Ok(PixelBuffer {
            pixels: self.pixels.without_seam(orientation, seam.as_slice()),
        })
    }

    fn with_seam_inserted(&self, seam: &Seam, orientation: Orientation) -> Result<Self, SeamError> {
        self.check_seam(seam, orientation)?;
        let positions: Vec<Vec<u32>> = seam.as_slice().iter().map(|&p| vec![p]).collect();
        Ok(PixelBuffer {
            pixels: self.pixels.with_seams_inserted(orientation, &positions, average),
        })
    }

    /// A copy of this buffer one column narrower, with the vertical
    /// seam's pixels removed and everything right of it shifted left.
    pub fn without_column(&self, seam: &Seam) -> Result<Self, SeamError> {
        self.without_seam(seam, Orientation::Vertical)
    }

    /// A copy of this buffer one row shorter.
    pub fn without_row(&self, seam: &Seam) -> Result<Self, SeamError> {
        self.without_seam(seam, Orientation::Horizontal)
    }

    /// A copy of this buffer one column wider.  A new pixel is placed
    /// at every seam coordinate, colored with the average of the seam
    /// pixel's left and right neighbours; the seam pixel and the rest
    /// of its row move one place right.
    pub fn with_inserted_column(&self, seam: &Seam) -> Result<Self, SeamError> {
        self.with_seam_inserted(seam, Orientation::Vertical)
    }

    /// A copy of this buffer one row taller.
    pub fn with_inserted_row(&self, seam: &Seam) -> Result<Self, SeamError> {
        self.with_seam_inserted(seam, Orientation::Horizontal)
    }

    /// Inserts many seams at once.  `positions[lane]` lists the
    /// positions, in this buffer's coordinates, where the lane gains a
    /// pixel; each lane must list the same number of distinct
    /// positions.  Used for batch enlargement, where the seams were
    /// found on successively carved copies and so need not be connected
    /// once mapped back onto this buffer.
    pub fn with_inserted_seams(
        &self,
        orientation: Orientation,
        mut positions: Vec<Vec<u32>>,
    ) -> Result<Self, SeamError> {
        let (lanes, length) = orientation.lanes(self.width(), self.height());
        if positions.len() != lanes as usize {
            return Err(SeamError::invalid_seam(format!(
                "{} lanes of insertions for an image with {} lanes",
                positions.len(),
                lanes
            )));
        }
        let grow = positions.first().map_or(0, Vec::len);
        for (lane, marks) in positions.iter_mut().enumerate() {
            marks.sort_unstable();
            marks.dedup();
            if marks.len() != grow {
                return Err(SeamError::invalid_seam(format!(
                    "lane {} grows by {} pixels, lane 0 by {}",
                    lane,
                    marks.len(),
                    grow
                )));
            }
            if marks.last().map_or(false, |&p| p >= length) {
                return Err(SeamError::invalid_seam(format!(
                    "insertion in lane {} is past the lane length {}",
                    lane, length
                )));
            }
        }
        Ok(PixelBuffer {
            pixels: self.pixels.with_seams_inserted(orientation, &positions, average),
        })
    }
}
