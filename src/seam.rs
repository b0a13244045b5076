// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seams
//!
//! A seam is a connected, one-pixel-wide path across the image.  A
//! vertical seam runs top to bottom and has one x coordinate for every
//! row; a horizontal seam runs left to right and has one y coordinate
//! for every column.
//!
//! Most of the index math in this crate talks about *lanes* and
//! *positions* so that both orientations share one implementation: a
//! lane is the row (vertical seam) or column (horizontal seam) the seam
//! crosses, and the position is where along that lane it crosses.

use crate::error::SeamError;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Orientation {
    /// Top to bottom; removing one narrows the image.
    Vertical,
    /// Left to right; removing one shortens the image.
    Horizontal,
}

impl Orientation {
    /// Number of lanes and length of each lane for an image of the
    /// given dimensions.
    pub fn lanes(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Orientation::Vertical => (height, width),
            Orientation::Horizontal => (width, height),
        }
    }

    /// (lane, position) -> (x, y)
    #[inline]
    pub fn point(self, lane: u32, position: u32) -> (u32, u32) {
        match self {
            Orientation::Vertical => (position, lane),
            Orientation::Horizontal => (lane, position),
        }
    }

    /// (x, y) -> (lane, position)
    #[inline]
    pub fn split(self, x: u32, y: u32) -> (u32, u32) {
        match self {
            Orientation::Vertical => (y, x),
            Orientation::Horizontal => (x, y),
        }
    }

    /// Image dimensions for a given lane count and lane length.
    pub fn dimensions(self, lanes: u32, length: u32) -> (u32, u32) {
        match self {
            Orientation::Vertical => (length, lanes),
            Orientation::Horizontal => (lanes, length),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seam {
    orientation: Orientation,
    path: Vec<u32>,
}

impl Seam {
    /// Wraps a path of cross-axis coordinates.  Nothing is checked
    /// here; the buffer transforms validate a seam against the image
    /// they are about to rewrite.
    pub fn new(orientation: Orientation, path: Vec<u32>) -> Self {
        Seam { orientation, path }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// The cross-axis coordinate for every lane, in lane order.
    pub fn as_slice(&self) -> &[u32] {
        &self.path
    }

    /// The (x, y) address of every pixel on the seam.
    pub fn coordinates<'a>(&'a self) -> impl Iterator<Item = (u32, u32)> + 'a {
        let orientation = self.orientation;
        self.path
            .iter()
            .enumerate()
            .map(move |(lane, &position)| orientation.point(lane as u32, position))
    }

    /// Checks the seam against an image of the given dimensions:
    /// exactly one coordinate per lane, every coordinate inside the
    /// lane, and no step larger than one pixel between lanes.
    pub fn validate(&self, width: u32, height: u32) -> Result<(), SeamError> {
        let (lanes, length) = self.orientation.lanes(width, height);
        if self.path.len() != lanes as usize {
            return Err(SeamError::invalid_seam(format!(
                "{:?} seam has {} coordinates, image has {} lanes",
                self.orientation,
                self.path.len(),
                lanes
            )));
        }
        if let Some((lane, position)) = self
            .path
            .iter()
            .enumerate()
            .find(|(_, &position)| position >= length)
        {
            return Err(SeamError::invalid_seam(format!(
                "coordinate {} in lane {} is past the lane length {}",
                position, lane, length
            )));
        }
        if let Some(lane) = self
            .path
            .windows(2)
            .position(|pair| (i64::from(pair[0]) - i64::from(pair[1])).abs() > 1)
        {
            return Err(SeamError::invalid_seam(format!(
                "seam jumps from {} to {} between lanes {} and {}",
                self.path[lane],
                self.path[lane + 1],
                lane,
                lane + 1
            )));
        }
        Ok(())
    }
}
