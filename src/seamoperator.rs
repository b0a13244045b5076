// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Applying a seam to a buffer
//!
//! Thin dispatch from a seam to the buffer transform for its
//! orientation.  Neither operation touches its input.

use crate::error::SeamError;
use crate::pixelbuffer::PixelBuffer;
use crate::seam::{Orientation, Seam};

/// Cut the seam out: one column narrower for a vertical seam, one row
/// shorter for a horizontal one.
pub fn remove(buffer: &PixelBuffer, seam: &Seam) -> Result<PixelBuffer, SeamError> {
    match seam.orientation() {
        Orientation::Vertical => buffer.without_column(seam),
        Orientation::Horizontal => buffer.without_row(seam),
    }
}

/// Stretch along the seam: every seam pixel gets a new neighbour,
/// colored with the average of the pixels either side of it in `buffer`.
pub fn insert(buffer: &PixelBuffer, seam: &Seam) -> Result<PixelBuffer, SeamError> {
    match seam.orientation() {
        Orientation::Vertical => buffer.with_inserted_column(seam),
        Orientation::Horizontal => buffer.with_inserted_row(seam),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checkerboard(width: u32, height: u32) -> PixelBuffer {
        let samples = (0..width * height)
            .map(|i| {
                let v = if (i % width + i / width) % 2 == 0 { 0 } else { 255 };
                Rgba([v, v, v, 255])
            })
            .collect();
        PixelBuffer::new(width, height, samples).unwrap()
    }

    #[test]
    fn remove_then_insert_restores_the_dimensions() {
        let buffer = checkerboard(5, 4);
        let vertical = Seam::new(Orientation::Vertical, vec![2, 3, 3, 2]);
        let carved = remove(&buffer, &vertical).unwrap();
        assert_eq!(carved.dimensions(), (4, 4));
        let restored = insert(&carved, &vertical).unwrap();
        assert_eq!(restored.dimensions(), (5, 4));
        // Lossy: the reinserted column is an average, not the original.
        assert_ne!(restored, buffer);

        // Valid on both the 5x4 original and the 5x3 carved buffer.
        let horizontal = Seam::new(Orientation::Horizontal, vec![0, 1, 1, 2, 2]);
        let carved = remove(&buffer, &horizontal).unwrap();
        assert_eq!(carved.dimensions(), (5, 3));
        assert_eq!(insert(&carved, &horizontal).unwrap().dimensions(), (5, 4));
    }

    #[test]
    fn inputs_are_left_alone() {
        let buffer = checkerboard(3, 3);
        let copy = buffer.clone();
        let seam = Seam::new(Orientation::Vertical, vec![1, 1, 1]);
        let _ = remove(&buffer, &seam).unwrap();
        let _ = insert(&buffer, &seam).unwrap();
        assert_eq!(buffer, copy);
    }

    #[test]
    fn inserted_pixels_average_their_neighbours() {
        let buffer = checkerboard(3, 1);
        let seam = Seam::new(Orientation::Vertical, vec![1]);
        let grown = insert(&buffer, &seam).unwrap();
        // 0 255 0 -> 0 [avg(0, 0)] 255 0
        let row: Vec<u8> = grown.samples().iter().map(|p| p.0[0]).collect();
        assert_eq!(row, [0, 0, 255, 0]);
    }

    #[test]
    fn broken_seams_are_refused() {
        let buffer = checkerboard(4, 4);
        let short = Seam::new(Orientation::Horizontal, vec![0, 0, 0]);
        assert!(matches!(
            remove(&buffer, &short),
            Err(SeamError::InvalidSeam { .. })
        ));
        assert!(matches!(
            insert(&buffer, &short),
            Err(SeamError::InvalidSeam { .. })
        ));
    }
}
