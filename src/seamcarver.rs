// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - the main loop
//!
//! The resizer holds the working buffer and, one seam at a time,
//! carves or stretches it until it matches the target.  Every step
//! computes a fresh energy map, finds one seam, and replaces the buffer
//! with the result of removing or inserting it.  By default the width
//! is finished completely before the height is touched.

use crate::energy::EnergyMap;
use crate::error::SeamError;
use crate::options::{Growth, Options, Order};
use crate::pixelbuffer::PixelBuffer;
use crate::seam::{Orientation, Seam};
use crate::seamoperator;
use crate::twodmap::TwoDimensionalMap;
use log::{debug, trace, warn};
use std::cmp::min;
use std::convert::TryFrom;
use std::sync::atomic::{AtomicBool, Ordering};

/// The size a resize should end at.  Fixed for the whole operation.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct ResizeTarget {
    width: u32,
    height: u32,
}

impl ResizeTarget {
    /// Both dimensions must be positive.
    pub fn new(width: i64, height: i64) -> Result<Self, SeamError> {
        if width <= 0 || height <= 0 {
            return Err(SeamError::invalid_target(
                width,
                height,
                "dimensions must be positive",
            ));
        }
        match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) => Ok(ResizeTarget {
                width: w,
                height: h,
            }),
            _ => Err(SeamError::invalid_target(width, height, "dimensions are too large")),
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
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Axis {
    Width,
    Height,
}

impl Axis {
    fn turn(self) -> Self {
        match self {
            Axis::Width => Axis::Height,
            Axis::Height => Axis::Width,
        }
    }

    /// Carving the width takes vertical seams, and vice versa.
    pub fn orientation(self) -> Orientation {
        match self {
            Axis::Width => Orientation::Vertical,
            Axis::Height => Orientation::Horizontal,
        }
    }

    fn of(self, (width, height): (u32, u32)) -> u32 {
        match self {
            Axis::Width => width,
            Axis::Height => height,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum State {
    Shrinking(Axis),
    Growing(Axis),
    Done,
}

impl State {
    /// What to do next with a buffer of `current` size, given where it
    /// has to end up and which axis the previous step worked on.
    pub fn next(current: (u32, u32), target: (u32, u32), order: Order, last: Option<Axis>) -> Self {
        let axis = match (current.0 != target.0, current.1 != target.1) {
            (false, false) => return State::Done,
            (true, false) => Axis::Width,
            (false, true) => Axis::Height,
            (true, true) => match order {
                Order::WidthFirst => Axis::Width,
                Order::Interleaved => last.map_or(Axis::Width, Axis::turn),
            },
        };
        if axis.of(current) > axis.of(target) {
            State::Shrinking(axis)
        } else {
            State::Growing(axis)
        }
    }
}

/// The outcome of a resize run.
#[derive(Debug, Clone, PartialEq)]
pub struct Resized {
    /// The last fully produced buffer.
    pub buffer: PixelBuffer,
    /// Seams removed or inserted.
    pub steps: usize,
    /// True if the run stopped early because it was asked to; the
    /// buffer is then whole but not at the target size.
    pub cancelled: bool,
}

#[derive(Debug, Clone)]
pub struct Resizer {
    options: Options,
}

impl Default for Resizer {
    fn default() -> Self {
        Resizer::new(Options::default())
    }
}

impl Resizer {
    pub fn new(options: Options) -> Self {
        Resizer { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Checks a target against the growth bound for an image of
    /// `original` size and returns the size the resize will really aim
    /// for (only different from the target when clamping is on).
    pub fn plan(&self, original: (u32, u32), target: ResizeTarget) -> Result<(u32, u32), SeamError> {
        let (tw, th) = target.dimensions();
        let factor = self.options.max_growth;
        if !factor.is_finite() || factor < 1.0 {
            return Err(SeamError::invalid_target(
                i64::from(tw),
                i64::from(th),
                format!("growth factor {} must be a finite number of at least 1", factor),
            ));
        }
        let limit = |size: u32| (f64::from(size) * factor).floor().min(f64::from(u32::MAX)) as u32;
        let (lw, lh) = (limit(original.0), limit(original.1));
        if tw <= lw && th <= lh {
            return Ok((tw, th));
        }
        if !self.options.clamp_growth {
            return Err(SeamError::invalid_target(
                i64::from(tw),
                i64::from(th),
                format!(
                    "{}x{} cannot grow past {}x{} ({}x)",
                    original.0, original.1, lw, lh, factor
                ),
            ));
        }
        let clamped = (min(tw, lw), min(th, lh));
        warn!(
            "target {}x{} exceeds {}x growth, clamping to {}x{}",
            tw, th, factor, clamped.0, clamped.1
        );
        Ok(clamped)
    }

    /// Given an image and a desired new size, repeatedly carve or
    /// stretch it until it matches.
    pub fn resize(&self, buffer: PixelBuffer, target: ResizeTarget) -> Result<PixelBuffer, SeamError> {
        Ok(self.run(buffer, target, None)?.buffer)
    }

    /// As `resize`, but checks `cancel` before every step and stops,
    /// handing back the last complete buffer, once it is set.
    pub fn resize_cancellable(
        &self,
        buffer: PixelBuffer,
        target: ResizeTarget,
        cancel: &AtomicBool,
    ) -> Result<Resized, SeamError> {
        self.run(buffer, target, Some(cancel))
    }

    fn run(
        &self,
        buffer: PixelBuffer,
        target: ResizeTarget,
        cancel: Option<&AtomicBool>,
    ) -> Result<Resized, SeamError> {
        let goal = self.plan(buffer.dimensions(), target)?;
        let (width, height) = buffer.dimensions();
        debug!("resizing {}x{} to {}x{}", width, height, goal.0, goal.1);

        let mut buffer = buffer;
        let mut steps = 0;
        let mut last = None;
        loop {
            let state = State::next(buffer.dimensions(), goal, self.options.order, last);
            let axis = match state {
                State::Done => break,
                State::Shrinking(axis) | State::Growing(axis) => axis,
            };
            if cancel.map_or(false, |c| c.load(Ordering::Relaxed)) {
                debug!("resize cancelled after {} steps", steps);
                return Ok(Resized {
                    buffer,
                    steps,
                    cancelled: true,
                });
            }
            let (next, applied) = match state {
                State::Shrinking(_) => (self.shrink(&buffer, axis)?, 1),
                _ => {
                    // Interleaving takes one seam per turn while the
                    // other axis still has work to do.
                    let other = axis.turn();
                    let alternating = self.options.order == Order::Interleaved
                        && other.of(buffer.dimensions()) != other.of(goal);
                    self.grow(&buffer, axis, axis.of(goal), !alternating)?
                }
            };
            buffer = next;
            steps += applied;
            last = Some(axis);
            trace!("{:?}: now {}x{}", state, buffer.width(), buffer.height());
        }

        debug!("resize finished after {} steps", steps);
        Ok(Resized {
            buffer,
            steps,
            cancelled: false,
        })
    }

    fn seam(&self, buffer: &PixelBuffer, orientation: Orientation) -> Result<Seam, SeamError> {
        let energy = EnergyMap::compute(buffer, self.options.energy);
        self.options.cost.find(&energy, orientation)
    }

    fn shrink(&self, buffer: &PixelBuffer, axis: Axis) -> Result<PixelBuffer, SeamError> {
        let seam = self.seam(buffer, axis.orientation())?;
        seamoperator::remove(buffer, &seam)
    }

    // One growth step: a single seam, or under batch growth (when
    // `batch` allows it) as many seams as the buffer can supply at once.
    fn grow(
        &self,
        buffer: &PixelBuffer,
        axis: Axis,
        goal: u32,
        batch: bool,
    ) -> Result<(PixelBuffer, usize), SeamError> {
        let current = axis.of(buffer.dimensions());
        let count = min(goal - current, current - 1);
        if !batch || self.options.growth == Growth::Iterative || count < 2 {
            let seam = self.seam(buffer, axis.orientation())?;
            return Ok((seamoperator::insert(buffer, &seam)?, 1));
        }
        let positions = self.find_seams(buffer, axis.orientation(), count)?;
        let grown = buffer.with_inserted_seams(axis.orientation(), positions)?;
        Ok((grown, count as usize))
    }

    /// The first `count` seams that removing `count` seams would take,
    /// as positions in `buffer`'s own coordinates: one list per lane.
    /// Every pixel's original position rides along in an index map that
    /// is carved exactly like the working copy.
    pub fn find_seams(
        &self,
        buffer: &PixelBuffer,
        orientation: Orientation,
        count: u32,
    ) -> Result<Vec<Vec<u32>>, SeamError> {
        let (width, height) = buffer.dimensions();
        let (lanes, length) = orientation.lanes(width, height);
        if count >= length {
            return Err(SeamError::invalid_target(
                i64::from(width),
                i64::from(height),
                format!("cannot find {} seams across {} pixels", count, length),
            ));
        }
        let mut working = buffer.clone();
        let mut index = TwoDimensionalMap::from_fn(width, height, |x, y| orientation.split(x, y).1);
        let mut positions = vec![Vec::with_capacity(count as usize); lanes as usize];
        for _ in 0..count {
            let seam = self.seam(&working, orientation)?;
            for (lane, xy) in seam.coordinates().enumerate() {
                positions[lane].push(index[xy]);
            }
            working = seamoperator::remove(&working, &seam)?;
            index = index.without_seam(orientation, seam.as_slice());
        }
        Ok(positions)
    }

    /// Removes every pixel set in `mask` and then grows the image back
    /// to its original size.  Seams are run the way that needs fewer of
    /// them, and each one is forced through as many masked pixels as
    /// it can reach.
    pub fn remove_object(
        &self,
        buffer: PixelBuffer,
        mask: &TwoDimensionalMap<bool>,
    ) -> Result<PixelBuffer, SeamError> {
        let (width, height) = buffer.dimensions();
        if mask.dimensions() != (width, height) {
            return Err(SeamError::DimensionMismatch {
                width,
                height,
                expected: width as usize * height as usize,
                actual: mask.as_slice().len(),
            });
        }

        let widest = |orientation: Orientation| {
            let (lanes, length) = orientation.lanes(width, height);
            (0..lanes)
                .map(|lane| {
                    (0..length)
                        .filter(|&p| mask[orientation.point(lane, p)])
                        .count() as u32
                })
                .max()
                .unwrap_or(0)
        };
        let (across, down) = (widest(Orientation::Vertical), widest(Orientation::Horizontal));
        if across == 0 {
            return Ok(buffer);
        }
        // An axis can only clear the mask if every lane keeps at least
        // one unmasked pixel.
        let fits = |axis: Axis, needed: u32| needed < axis.of((width, height));
        let preferred = if across <= down { Axis::Width } else { Axis::Height };
        let axis = match (preferred, fits(Axis::Width, across), fits(Axis::Height, down)) {
            (Axis::Width, true, _) | (Axis::Height, true, false) => Axis::Width,
            (Axis::Height, _, true) | (Axis::Width, false, true) => Axis::Height,
            _ => {
                return Err(SeamError::invalid_target(
                    i64::from(width),
                    i64::from(height),
                    "the mask covers the whole image",
                ))
            }
        };
        let orientation = axis.orientation();
        debug!(
            "removing a {}x{} object with {:?} seams",
            across, down, orientation
        );

        let mut working = buffer;
        let mut mask = mask.clone();
        let mut removed = 0;
        while mask.iter().any(|&m| m) {
            if axis.of(working.dimensions()) <= 1 {
                return Err(SeamError::invalid_target(
                    i64::from(width),
                    i64::from(height),
                    "the mask covers the whole image",
                ));
            }
            let energy = EnergyMap::compute(&working, self.options.energy).favoring(&mask);
            let seam = self.options.cost.find(&energy, orientation)?;
            working = seamoperator::remove(&working, &seam)?;
            mask = mask.without_seam(orientation, seam.as_slice());
            removed += 1;
            trace!("object removal: {} seams out", removed);
        }

        let goal = axis.of((width, height));
        let batch = Resizer::new(self.options.clone().with_growth(Growth::Batch));
        while axis.of(working.dimensions()) < goal {
            working = batch.grow(&working, axis, goal, true)?.0;
        }
        debug!("object removed with {} seams", removed);
        Ok(working)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::EnergyFunction;
    use crate::seamfinder::CostModel;
    use image::Rgba;
    use itertools::iproduct;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn gray(v: u8) -> Rgba<u8> {
        Rgba([v, v, v, 255])
    }

    fn target(width: i64, height: i64) -> ResizeTarget {
        ResizeTarget::new(width, height).unwrap()
    }

    // Smooth horizontal ramp with a little vertical texture.
    fn scene(width: u32, height: u32) -> PixelBuffer {
        let samples = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                gray(((x * 37 + y * 11) % 200) as u8)
            })
            .collect();
        PixelBuffer::new(width, height, samples).unwrap()
    }

    #[test]
    fn targets_must_be_positive() {
        assert!(matches!(
            ResizeTarget::new(-1, 5),
            Err(SeamError::InvalidTarget { width: -1, .. })
        ));
        assert!(ResizeTarget::new(5, 0).is_err());
        assert!(ResizeTarget::new(i64::from(u32::MAX) + 1, 5).is_err());
        assert_eq!(target(3, 4).dimensions(), (3, 4));
    }

    #[test]
    fn uniform_gray_loses_its_center_column() {
        let buffer = PixelBuffer::filled(4, 4, gray(128)).unwrap();
        let energy = EnergyMap::compute(&buffer, EnergyFunction::Luminance);
        let seam = CostModel::Backward
            .find(&energy, Orientation::Vertical)
            .unwrap();
        assert_eq!(seam.as_slice(), &[1, 1, 1, 1]);

        let resized = Resizer::default().resize(buffer, target(3, 4)).unwrap();
        assert_eq!(resized.dimensions(), (3, 4));
        assert!(resized.samples().iter().all(|&p| p == gray(128)));
    }

    #[test]
    fn bright_pixels_survive() {
        let mut buffer = PixelBuffer::filled(3, 3, BLACK).unwrap();
        buffer.set(1, 1, WHITE).unwrap();
        let resized = Resizer::default().resize(buffer, target(2, 3)).unwrap();
        assert_eq!(resized.dimensions(), (2, 3));
        let row: Vec<_> = (0..2).map(|x| resized.get(x, 1).unwrap()).collect();
        assert!(row.contains(&WHITE));
    }

    #[test]
    fn refuses_to_grow_too_far() {
        let resizer = Resizer::default();
        let result = resizer.resize(scene(4, 4), target(20, 4));
        assert!(matches!(result, Err(SeamError::InvalidTarget { .. })));
        assert!(resizer.plan((4, 4), target(8, 8)).is_ok());
        assert!(resizer.plan((4, 4), target(8, 9)).is_err());
    }

    #[test]
    fn clamps_growth_when_asked() {
        let resizer = Resizer::new(Options::default().with_clamp_growth(true));
        assert_eq!(resizer.plan((4, 5), target(20, 6)), Ok((8, 6)));
        let resized = resizer.resize(scene(4, 5), target(20, 6)).unwrap();
        assert_eq!(resized.dimensions(), (8, 6));
    }

    #[test]
    fn rejects_nonsense_growth_factors() {
        let resizer = Resizer::new(Options::default().with_max_growth(0.5));
        assert!(resizer.plan((4, 4), target(2, 2)).is_err());
    }

    #[test]
    fn already_there_means_no_work() {
        let buffer = scene(5, 4);
        let never = AtomicBool::new(false);
        let resized = Resizer::default()
            .resize_cancellable(buffer.clone(), target(5, 4), &never)
            .unwrap();
        assert_eq!(resized.steps, 0);
        assert!(!resized.cancelled);
        assert_eq!(resized.buffer, buffer);
    }

    #[test]
    fn shrinks_both_axes() {
        let resized = Resizer::default().resize(scene(7, 6), target(4, 3)).unwrap();
        assert_eq!(resized.dimensions(), (4, 3));
    }

    #[test]
    fn grows_both_axes() {
        for &growth in &[Growth::Iterative, Growth::Batch] {
            let resizer = Resizer::new(Options::default().with_growth(growth));
            let resized = resizer.resize(scene(4, 3), target(7, 5)).unwrap();
            assert_eq!(resized.dimensions(), (7, 5));
        }
    }

    #[test]
    fn mixed_directions_and_models() {
        let options = Options::default()
            .with_order(Order::Interleaved)
            .with_cost(CostModel::Forward)
            .with_energy(EnergyFunction::ChannelMean);
        let resizer = Resizer::new(options);
        let sized = resizer.run(scene(6, 6), target(4, 9), None).unwrap();
        assert_eq!(sized.buffer.dimensions(), (4, 9));
        assert_eq!(sized.steps, 5);
    }

    #[test]
    fn interleaved_batches_wait_for_a_single_axis() {
        let resizer = Resizer::new(
            Options::default()
                .with_order(Order::Interleaved)
                .with_growth(Growth::Batch),
        );
        // Both axes off target the whole way: one seam per turn.
        let sized = resizer.run(scene(4, 4), target(7, 7), None).unwrap();
        assert_eq!(sized.buffer.dimensions(), (7, 7));
        assert_eq!(sized.steps, 6);
        // 5x4, 5x5, then the width alone grows by a batch of three.
        let sized = resizer.run(scene(4, 4), target(8, 5), None).unwrap();
        assert_eq!(sized.buffer.dimensions(), (8, 5));
        assert_eq!(sized.steps, 5);
    }

    #[test]
    fn width_first_then_height() {
        let order = Order::WidthFirst;
        assert_eq!(
            State::next((5, 5), (3, 7), order, Some(Axis::Width)),
            State::Shrinking(Axis::Width)
        );
        assert_eq!(
            State::next((3, 5), (3, 7), order, Some(Axis::Width)),
            State::Growing(Axis::Height)
        );
        assert_eq!(State::next((3, 7), (3, 7), order, None), State::Done);
    }

    #[test]
    fn interleaving_alternates() {
        let order = Order::Interleaved;
        assert_eq!(
            State::next((5, 5), (3, 3), order, None),
            State::Shrinking(Axis::Width)
        );
        assert_eq!(
            State::next((4, 5), (3, 3), order, Some(Axis::Width)),
            State::Shrinking(Axis::Height)
        );
        assert_eq!(
            State::next((3, 4), (3, 3), order, Some(Axis::Width)),
            State::Shrinking(Axis::Height)
        );
    }

    #[test]
    fn cancellation_keeps_the_last_whole_buffer() {
        let buffer = scene(6, 4);
        let stop = AtomicBool::new(true);
        let resized = Resizer::default()
            .resize_cancellable(buffer.clone(), target(3, 4), &stop)
            .unwrap();
        assert!(resized.cancelled);
        assert_eq!(resized.steps, 0);
        assert_eq!(resized.buffer, buffer);
    }

    #[test]
    fn cancelling_mid_run_stops_between_steps() {
        let buffer = scene(120, 40);
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let setter = thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            flag.store(true, Ordering::Relaxed);
        });
        let resized = Resizer::default()
            .resize_cancellable(buffer, target(20, 40), &stop)
            .unwrap();
        setter.join().unwrap();
        assert_eq!(resized.buffer.height(), 40);
        if resized.cancelled {
            assert_eq!(resized.buffer.width() as usize, 120 - resized.steps);
            assert!(resized.steps < 100);
        } else {
            assert_eq!(resized.steps, 100);
            assert_eq!(resized.buffer.width(), 20);
        }
    }

    #[test]
    fn batch_seams_are_distinct_in_every_lane() {
        let buffer = scene(8, 5);
        let resizer = Resizer::default();
        for &orientation in &[Orientation::Vertical, Orientation::Horizontal] {
            let (lanes, length) = orientation.lanes(8, 5);
            let positions = resizer.find_seams(&buffer, orientation, 3).unwrap();
            assert_eq!(positions.len(), lanes as usize);
            for lane in positions {
                let mut sorted = lane.clone();
                sorted.sort();
                sorted.dedup();
                assert_eq!(sorted.len(), 3);
                assert!(sorted.iter().all(|&p| p < length));
            }
        }
        assert!(resizer.find_seams(&buffer, Orientation::Horizontal, 5).is_err());
    }

    #[test]
    fn removes_a_masked_object() {
        let (w, h) = (6, 4);
        let mut buffer = scene(w, h);
        let mut mask = TwoDimensionalMap::filled(w, h, false);
        for y in 0..h {
            buffer.set(2, y, RED).unwrap();
            mask[(2, y)] = true;
        }
        let cleaned = Resizer::default().remove_object(buffer, &mask).unwrap();
        assert_eq!(cleaned.dimensions(), (w, h));
        assert!(cleaned.samples().iter().all(|&p| p != RED));
    }

    #[test]
    fn wide_objects_fall_back_to_the_axis_that_fits() {
        // Four masked columns over the full height: horizontal seams
        // would need all three rows, vertical seams only four of six.
        let (w, h) = (6, 3);
        let mut buffer = scene(w, h);
        let mut mask = TwoDimensionalMap::filled(w, h, false);
        for (x, y) in iproduct!(1..5, 0..h) {
            buffer.set(x, y, RED).unwrap();
            mask[(x, y)] = true;
        }
        let cleaned = Resizer::default().remove_object(buffer, &mask).unwrap();
        assert_eq!(cleaned.dimensions(), (w, h));
        assert!(cleaned.samples().iter().all(|&p| p != RED));

        // The same object on its side.
        let (w, h) = (3, 6);
        let mut buffer = scene(w, h);
        let mut mask = TwoDimensionalMap::filled(w, h, false);
        for (x, y) in iproduct!(0..w, 1..5) {
            buffer.set(x, y, RED).unwrap();
            mask[(x, y)] = true;
        }
        let cleaned = Resizer::default().remove_object(buffer, &mask).unwrap();
        assert_eq!(cleaned.dimensions(), (w, h));
        assert!(cleaned.samples().iter().all(|&p| p != RED));
    }

    #[test]
    fn object_masks_must_fit() {
        let resizer = Resizer::default();
        let small = TwoDimensionalMap::filled(2, 2, true);
        assert!(matches!(
            resizer.remove_object(scene(3, 3), &small),
            Err(SeamError::DimensionMismatch { .. })
        ));
        let everything = TwoDimensionalMap::filled(3, 3, true);
        assert!(matches!(
            resizer.remove_object(scene(3, 3), &everything),
            Err(SeamError::InvalidTarget { .. })
        ));
        let nothing = TwoDimensionalMap::filled(3, 3, false);
        assert_eq!(resizer.remove_object(scene(3, 3), &nothing), Ok(scene(3, 3)));
    }
}
