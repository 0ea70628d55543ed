//! Quantization of accumulated intensity stacks.
//!
//! Two output encodings, selected by the caller:
//! - auto-contrast: rescale by the global stack maximum into 16 bits
//! - raw: quantize accumulated values directly into 8 bits

use crate::image::ImageStack;

/// Rescale every pixel by `65535 * value / maxint` where `maxint` is the
/// maximum over the whole stack, rounding to the nearest integer.
///
/// A zero (or non-finite) maximum yields an all-zero image.
pub fn auto_contrast(stack: &ImageStack<f64>) -> ImageStack<u16> {
    let maxint = stack.max_value();
    tracing::debug!(maxint, slices = stack.slices(), "Auto-contrast normalization");
    auto_contrast_with_max(stack, maxint)
}

/// Auto-contrast against an externally supplied maximum.
pub fn auto_contrast_with_max(stack: &ImageStack<f64>, maxint: f64) -> ImageStack<u16> {
    if !(maxint.is_finite() && maxint > 0.0) {
        return stack.map(|_| 0u16);
    }
    stack.map(|v| to_u16((v / maxint) * u16::MAX as f64))
}

/// Quantize accumulated values into 8 bits, rounding and saturating at 255.
pub fn quantize_raw(stack: &ImageStack<f64>) -> ImageStack<u8> {
    stack.map(to_u8)
}

#[inline]
fn to_u16(v: f64) -> u16 {
    if v.is_nan() {
        0
    } else {
        v.round().clamp(0.0, u16::MAX as f64) as u16
    }
}

#[inline]
fn to_u8(v: f64) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.round().clamp(0.0, u8::MAX as f64) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_from(values: &[f64], slices: usize) -> ImageStack<f64> {
        let per_slice = values.len() / slices;
        let mut stack = ImageStack::new(1, per_slice, slices);
        for (i, &v) in values.iter().enumerate() {
            stack.set(0, i % per_slice, i / per_slice, v);
        }
        stack
    }

    #[test]
    fn test_auto_contrast_uses_global_max() {
        // maximum lives in the second slice
        let stack = stack_from(&[10.0, 0.0, 20.0, 40.0], 2);
        let out = auto_contrast(&stack);

        assert_eq!(out.get(0, 1, 1), Some(65535));
        assert_eq!(out.get(0, 0, 0), Some(16384));
        assert_eq!(out.get(0, 0, 1), Some(32768));
        assert_eq!(out.get(0, 1, 0), Some(0));
    }

    #[test]
    fn test_auto_contrast_zero_max_is_all_zero() {
        let stack = stack_from(&[0.0, 0.0, 0.0], 1);
        let out = auto_contrast(&stack);
        assert_eq!(out.count_nonzero(), 0);
    }

    #[test]
    fn test_auto_contrast_peak_is_exact() {
        let stack = stack_from(&[0.1, 1234.5678, 3.3], 1);
        assert_eq!(auto_contrast(&stack).max_pixel(), u16::MAX);
    }

    #[test]
    fn test_raw_quantization_saturates() {
        let stack = stack_from(&[0.4, 0.5, 254.6, 6400.0, -3.0, f64::NAN], 1);
        let out = quantize_raw(&stack);
        assert_eq!(out.slice(0), &[0, 1, 255, 255, 0, 0]);
    }
}
