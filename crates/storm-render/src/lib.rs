//! Image rendering for single-molecule localization (STORM) data.
//!
//! Molecules are binned into a pixel grid, bucketed into width classes by a
//! precision proxy derived from their fitted amplitude, blurred with a
//! class-specific Gaussian and accumulated per z slice:
//! - Coordinate binning and z slicing
//! - Width classes
//! - Gaussian kernels and separable convolution
//! - Accumulation, normalization and scale bar overlay
//! - Grayscale PNG encoding of rendered slices

pub mod accumulate;
pub mod binning;
pub mod classify;
pub mod image;
pub mod kernel;
pub mod normalize;
pub mod png;
pub mod render;
pub mod scalebar;

pub use binning::{histogram_indices, PixelBinner, ZSlices};
pub use classify::WidthClasses;
pub use image::{ImageStack, Pixel};
pub use kernel::{GaussianKernel, KernelCache};
pub use render::{render, render_with_axes, ChannelImage, RenderOutput};
pub use scalebar::ScaleBar;
