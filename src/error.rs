// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors
//!
//! Every failure the carver can report.  None of them are recovered
//! locally: whatever operation raised one is abandoned, and the caller
//! gets the specific kind back.

use failure::Fail;

#[derive(Debug, Fail, PartialEq)]
pub enum SeamError {
    /// The sample data does not cover the claimed dimensions.
    #[fail(
        display = "expected {} samples for a {}x{} image, got {}",
        expected, width, height, actual
    )]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[fail(display = "({}, {}) is outside a {}x{} image", x, y, width, height)]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// A seam that is the wrong length, wanders off the image, or
    /// jumps more than one pixel between lanes.
    #[fail(display = "invalid seam: {}", reason)]
    InvalidSeam { reason: String },

    #[fail(display = "cannot carve an empty {}x{} map", width, height)]
    EmptyMap { width: u32, height: u32 },

    #[fail(display = "invalid target {}x{}: {}", width, height, reason)]
    InvalidTarget {
        width: i64,
        height: i64,
        reason: String,
    },

    #[fail(display = "unknown {} setting '{}'", kind, name)]
    UnknownSetting { kind: &'static str, name: String },
}

impl SeamError {
    pub(crate) fn invalid_seam<S: Into<String>>(reason: S) -> Self {
        SeamError::InvalidSeam {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_target<S: Into<String>>(width: i64, height: i64, reason: S) -> Self {
        SeamError::InvalidTarget {
            width,
            height,
            reason: reason.into(),
        }
    }
}
