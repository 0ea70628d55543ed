//! Scale bar overlay.
//!
//! The bar is centred on row `round(0.9 * H)` and extends `half_width` rows
//! above and below it, so a width of 0 draws the single row `round(0.9 * H)`.
//! Columns start at 10. Anything past the image edge is clipped.

use crate::image::{ImageStack, Pixel};

/// Column where the bar starts.
const BAR_COLUMN_OFFSET: usize = 10;

/// Bar row as a fraction of image height.
const BAR_ROW_FRACTION: f64 = 0.9;

/// A solid bar drawn at maximum intensity into every slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleBar {
    /// Bar length in output pixels.
    pub length: usize,
    /// Half-thickness; the bar spans `1 + 2 * half_width` rows.
    pub half_width: usize,
}

impl ScaleBar {
    /// Bar for a physical length in nm, or `None` when `length_nm <= 0`.
    ///
    /// Length in pixels is `round(length_nm / nm_per_pixel * ppu)`.
    pub fn new(length_nm: f64, nm_per_pixel: f64, ppu: f64, half_width: usize) -> Option<Self> {
        if !(length_nm > 0.0) {
            return None;
        }
        let length = (length_nm / nm_per_pixel * ppu).round();
        if length.is_nan() || length < 0.0 {
            return None;
        }
        Some(Self {
            // saturates for lengths beyond usize; drawing clips anyway
            length: length as usize,
            half_width,
        })
    }

    /// Overwrite the bar pixels in every slice, clipped to the image.
    pub fn draw<T: Pixel>(&self, stack: &mut ImageStack<T>) {
        let height = stack.height();
        let width = stack.width();
        if height == 0 || width == 0 || self.length == 0 {
            return;
        }

        let centre = (BAR_ROW_FRACTION * height as f64).round() as usize;
        let top = centre.saturating_sub(self.half_width);
        let bottom = centre.saturating_add(self.half_width).min(height - 1);
        let left = BAR_COLUMN_OFFSET;
        let right = BAR_COLUMN_OFFSET.saturating_add(self.length).min(width);
        if top > bottom || left >= right {
            return;
        }

        for slice in 0..stack.slices() {
            let data = stack.slice_mut(slice);
            for row in top..=bottom {
                data[row * width + left..row * width + right].fill(T::MAX);
            }
        }
    }
}
