// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Two-dimensional maps
//!
//! Every grid in the crate is one of these: the pixels, the energies,
//! the luminance plane, the dynamic-programming table, the object mask
//! and the index maps used when growing an image.  Carving a seam out
//! of (or into) a map is written once here, generically, so that the
//! pixels and whatever rides along with them are always cut the same
//! way.

use crate::seam::Orientation;
use std::cmp::min;
use std::ops::{Index, IndexMut};

/// An addressable two-dimensional field of `P`, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Copy> {
    width: u32,
    height: u32,
    data: Vec<P>,
}

/// Where a cell in a rewritten lane gets its value.
#[derive(Debug, Copy, Clone)]
enum Source {
    Copy(u32),
    Blend(u32),
}

impl<P: Copy> TwoDimensionalMap<P> {
    /// A map with every cell set to `value`.
    pub fn filled(width: u32, height: u32, value: P) -> Self {
        TwoDimensionalMap {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Wraps row-major data.  Returns the data back if it does not
    /// cover `width * height` cells.
    pub fn from_vec(width: u32, height: u32, data: Vec<P>) -> Result<Self, Vec<P>> {
        if data.len() != width as usize * height as usize {
            return Err(data);
        }
        Ok(TwoDimensionalMap {
            width,
            height,
            data,
        })
    }

    /// Builds a map by calling `f` for every (x, y), row by row.
    pub fn from_fn<F: FnMut(u32, u32) -> P>(width: u32, height: u32, mut f: F) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        TwoDimensionalMap {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [P] {
        &mut self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.data.iter()
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.
    #[inline]
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// A map of the same shape with `f` applied to every cell.
    pub fn map<Q: Copy, F: Fn(P) -> Q>(&self, f: F) -> TwoDimensionalMap<Q> {
        TwoDimensionalMap {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|p| f(*p)).collect(),
        }
    }

    /// Removes one cell from every lane.  `path` holds the position to
    /// drop in each lane and must already have been validated against
    /// this map.
    pub fn without_seam(&self, orientation: Orientation, path: &[u32]) -> Self {
        let (_, length) = orientation.lanes(self.width, self.height);
        let lanes: Vec<Vec<Source>> = path
            .iter()
            .map(|&cut| {
                (0..length)
                    .filter(|&position| position != cut)
                    .map(Source::Copy)
                    .collect()
            })
            .collect();
        self.remap(orientation, length - 1, &lanes, |p, _| p)
    }

    /// Inserts new cells into every lane.  `positions[lane]` lists,
    /// sorted and without repeats, the positions in *this* map in front
    /// of which a new cell is placed; every lane must grow by the same
    /// amount.  The new cell is `blend` of the two lane neighbours of
    /// the cell it is placed in front of, clamped at the lane ends.
    pub fn with_seams_inserted<B>(
        &self,
        orientation: Orientation,
        positions: &[Vec<u32>],
        blend: B,
    ) -> Self
    where
        B: Fn(P, P) -> P,
    {
        let (_, length) = orientation.lanes(self.width, self.height);
        let grow = positions.first().map_or(0, |p| p.len() as u32);
        let lanes: Vec<Vec<Source>> = positions
            .iter()
            .map(|marks| {
                let mut marks = marks.iter().peekable();
                let mut lane = Vec::with_capacity((length + grow) as usize);
                for position in 0..length {
                    if marks.peek() == Some(&&position) {
                        marks.next();
                        lane.push(Source::Blend(position));
                    }
                    lane.push(Source::Copy(position));
                }
                lane
            })
            .collect();
        self.remap(orientation, length + grow, &lanes, blend)
    }

    // Produces a new map whose lanes are `new_length` long, each cell
    // sourced from this map according to `lanes`.  The output is still
    // written row-major whatever the orientation.
    fn remap<B>(
        &self,
        orientation: Orientation,
        new_length: u32,
        lanes: &[Vec<Source>],
        blend: B,
    ) -> Self
    where
        B: Fn(P, P) -> P,
    {
        let (lane_count, length) = orientation.lanes(self.width, self.height);
        debug_assert_eq!(lanes.len(), lane_count as usize);
        let last = length.saturating_sub(1);
        let (width, height) = orientation.dimensions(lane_count, new_length);
        TwoDimensionalMap::from_fn(width, height, |x, y| {
            let (lane, position) = orientation.split(x, y);
            let at = |p: u32| self[orientation.point(lane, p)];
            match lanes[lane as usize][position as usize] {
                Source::Copy(p) => at(p),
                Source::Blend(p) => blend(at(p.saturating_sub(1)), at(min(p + 1, last))),
            }
        })
    }
}

impl<P: Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}
