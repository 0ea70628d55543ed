//! Gaussian kernels and separable zero-padded convolution.
//!
//! A 2D Gaussian is the outer product of two normalized 1D Gaussians, so the
//! blur runs as a horizontal pass followed by a vertical pass.

use rayon::prelude::*;
use std::collections::HashMap;

/// Half-width of the fixed kernel sampling window (251 taps).
pub const KERNEL_HALF_WIDTH: usize = 125;

/// Minimum rows before the passes are split across threads.
const PARALLEL_THRESHOLD: usize = 64;

/// Normalized 1D Gaussian kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    sigma: f64,
    taps: Vec<f64>,
}

impl GaussianKernel {
    /// Sample a Gaussian of standard deviation `sigma` on the fixed window.
    ///
    /// Taps smaller than `f64::EPSILON` times the peak are zeroed before
    /// normalization, and the resulting all-zero tails are trimmed. A
    /// non-positive or non-finite sigma yields the identity kernel.
    pub fn new(sigma: f64) -> Self {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Self {
                sigma,
                taps: vec![1.0],
            };
        }

        let half = KERNEL_HALF_WIDTH as isize;
        let denom = 2.0 * sigma * sigma;
        let mut taps: Vec<f64> = (-half..=half)
            .map(|i| {
                let x = i as f64;
                (-(x * x) / denom).exp()
            })
            .collect();

        // centre tap is exp(0) = 1
        let cutoff = f64::EPSILON;
        for t in taps.iter_mut() {
            if *t < cutoff {
                *t = 0.0;
            }
        }

        let sum: f64 = taps.iter().sum();
        for t in taps.iter_mut() {
            *t /= sum;
        }

        let centre = KERNEL_HALF_WIDTH;
        let reach = (0..=KERNEL_HALF_WIDTH)
            .rev()
            .find(|&d| taps[centre + d] > 0.0)
            .unwrap_or(0);
        let taps = taps[centre - reach..=centre + reach].to_vec();

        Self { sigma, taps }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Number of taps on each side of the centre.
    pub fn radius(&self) -> usize {
        self.taps.len() / 2
    }

    pub fn is_identity(&self) -> bool {
        self.taps.len() == 1
    }

    /// Convolve a row-major `height x width` image in place, treating pixels
    /// outside the image as zero and keeping the output the same size.
    pub fn convolve(&self, image: &mut [f64], height: usize, width: usize) {
        if self.is_identity() || image.is_empty() {
            return;
        }
        debug_assert_eq!(image.len(), height * width);

        let horizontal = self.horizontal_pass(image, height, width);
        self.vertical_pass(&horizontal, image, height, width);
    }

    fn horizontal_pass(&self, src: &[f64], height: usize, width: usize) -> Vec<f64> {
        let mut out = vec![0.0; src.len()];
        let r = self.radius() as isize;
        let taps = &self.taps;

        let row_op = |(src_row, out_row): (&[f64], &mut [f64])| {
            for (col, &value) in src_row.iter().enumerate() {
                if value == 0.0 {
                    continue;
                }
                // scatter the non-zero source pixel across its neighbourhood
                let lo = (col as isize - r).max(0) as usize;
                let hi = ((col as isize + r) as usize).min(width - 1);
                for dst in lo..=hi {
                    let tap = (dst as isize - col as isize + r) as usize;
                    out_row[dst] += value * taps[tap];
                }
            }
        };

        if height >= PARALLEL_THRESHOLD {
            src.par_chunks(width)
                .zip(out.par_chunks_mut(width))
                .for_each(row_op);
        } else {
            src.chunks(width).zip(out.chunks_mut(width)).for_each(row_op);
        }
        out
    }

    fn vertical_pass(&self, src: &[f64], out: &mut [f64], height: usize, width: usize) {
        let r = self.radius() as isize;
        let taps = &self.taps;

        let row_op = |(row, out_row): (usize, &mut [f64])| {
            out_row.iter_mut().for_each(|v| *v = 0.0);
            let lo = (row as isize - r).max(0) as usize;
            let hi = ((row as isize + r) as usize).min(height - 1);
            for src_row in lo..=hi {
                let weight = taps[(row as isize - src_row as isize + r) as usize];
                let line = &src[src_row * width..(src_row + 1) * width];
                for (o, &v) in out_row.iter_mut().zip(line) {
                    *o += weight * v;
                }
            }
        };

        if height >= PARALLEL_THRESHOLD {
            out.par_chunks_mut(width).enumerate().for_each(row_op);
        } else {
            out.chunks_mut(width).enumerate().for_each(row_op);
        }
    }
}

/// Kernels memoized by radius for the duration of one render call.
#[derive(Debug, Default)]
pub struct KernelCache {
    kernels: HashMap<u64, GaussianKernel>,
}

impl KernelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kernel for `sigma`, built on first use.
    pub fn get(&mut self, sigma: f64) -> &GaussianKernel {
        self.kernels
            .entry(sigma.to_bits())
            .or_insert_with(|| GaussianKernel::new(sigma))
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}
