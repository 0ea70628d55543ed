//! Shared test utilities for the storm-render workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Seeded molecule list generators
//! - Fixed rendering fixtures (windows, configurations, small scenes)
//! - Float comparison macros for intensity and coordinate checks
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Tolerance used by [`assert_approx_eq!`] when none is given.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Assert two floats agree within a tolerance (default [`DEFAULT_TOLERANCE`]).
///
/// NaN never compares equal.
///
/// ```ignore
/// assert_approx_eq!(sum, 1.0);
/// assert_approx_eq!(total, 100.0, 1e-6);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr) => {
        $crate::assert_approx_eq!($actual, $expected, $crate::DEFAULT_TOLERANCE)
    };
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (actual, expected, tolerance): (f64, f64, f64) =
            ($actual as f64, $expected as f64, $tolerance as f64);
        let delta = (actual - expected).abs();
        assert!(
            delta <= tolerance,
            "assertion failed: {} = {:?}, expected {:?} (|delta| {:?} > {:?})",
            stringify!($actual),
            actual,
            expected,
            delta,
            tolerance
        );
    }};
}

/// Element-wise [`assert_approx_eq!`] over two float slices of equal length.
#[macro_export]
macro_rules! assert_slices_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let actual: &[f64] = &$actual;
        let expected: &[f64] = &$expected;
        assert_eq!(actual.len(), expected.len(), "slice lengths differ");
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            let delta = (a - e).abs();
            assert!(
                delta <= $tolerance,
                "assertion failed at index {}: {:?} vs {:?} (|delta| {:?})",
                i,
                a,
                e,
                delta
            );
        }
    }};
}
