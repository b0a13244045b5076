// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Content-aware image resizing by seam carving.
//!
//! An image is narrowed (or shortened) by repeatedly removing the
//! connected path of pixels that matters least, and widened by
//! duplicating such paths, so that the interesting parts of the
//! picture keep their shape while the dull parts give way.

pub mod error;
pub use error::SeamError;

pub mod twodmap;
pub use twodmap::TwoDimensionalMap;

pub mod seam;
pub use seam::{Orientation, Seam};

pub mod pixelbuffer;
pub use pixelbuffer::{PixelBuffer, Sample};

pub mod energy;
pub use energy::{EnergyFunction, EnergyMap};

pub mod flipper;

pub mod seamfinder;
pub use seamfinder::{CostModel, SeamFinder};

pub mod backward;
pub mod forward;
pub use backward::BackwardEnergy;
pub use forward::ForwardEnergy;

pub mod seamoperator;

pub mod options;
pub use options::{Growth, Options, Order, DEFAULT_MAX_GROWTH};

pub mod seamcarver;
pub use seamcarver::{Axis, ResizeTarget, Resized, Resizer, State};

pub mod dump;
pub use dump::{energy_to_image, mark_seam};
