//! Width classes: bucketing molecules by localization precision.
//!
//! The precision proxy is `sigma = 4 / sqrt(a)` for fitted amplitude `a`.
//! The 1st..99th percentile range of sigma is split into evenly spaced lower
//! edges; class `k` covers `[edges[k], edges[k+1])` and the last class is
//! open-ended. Each class has a blur radius and an intensity weight, paired
//! index-for-index: class 0 (most precise) gets the smallest radius and the
//! largest weight.

use storm_common::config::MAX_WIDTH_CLASSES;

/// Evenly spaced values from `start` to `end` inclusive.
///
/// A single point yields `[end]`; zero points yield an empty vector.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![end],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count - 1).map(|i| start + i as f64 * step).collect();
            values.push(end);
            values
        }
    }
}

/// Precision proxy for one amplitude.
///
/// Non-positive or non-finite amplitudes have no real, finite sigma; they
/// return `None` and the molecule contributes zero intensity.
#[inline]
pub fn precision_proxy(amplitude: f64) -> Option<f64> {
    if !(amplitude.is_finite() && amplitude > 0.0) {
        return None;
    }
    let sigma = 4.0 / amplitude.sqrt();
    sigma.is_finite().then_some(sigma)
}

/// `(min_sig, max_sig)`: the 1st and 99th percentile of the valid sigmas.
///
/// Percentile positions are `round(0.01 * n)` and `round(0.99 * n)` (1-based),
/// never below the first element.
pub fn sigma_range(sigmas: &[Option<f64>]) -> Option<(f64, f64)> {
    let mut sorted: Vec<f64> = sigmas.iter().flatten().copied().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let lo = ((0.01 * n).round() as usize).max(1) - 1;
    let hi = ((0.99 * n).round() as usize).max(1) - 1;
    Some((sorted[lo], sorted[hi.min(sorted.len() - 1)]))
}

/// Default intensity weights: `800 * linspace(0.5, 8, count)` reversed.
pub fn default_weights(count: usize) -> Vec<f64> {
    let mut weights: Vec<f64> = linspace(0.5, 8.0, count).into_iter().map(|v| 800.0 * v).collect();
    weights.reverse();
    weights
}

/// Default blur radii in output pixels:
/// `linspace(0.01 * dot_size, 0.05 * dot_size, count) * ppu`.
pub fn default_radii(count: usize, dot_size: f64, ppu: f64) -> Vec<f64> {
    linspace(0.01 * dot_size, 0.05 * dot_size, count)
        .into_iter()
        .map(|v| v * ppu)
        .collect()
}

/// Width-class table for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct WidthClasses {
    /// Lower edge of each class.
    edges: Vec<f64>,
    /// Gaussian standard deviation per class, in output pixels.
    radii: Vec<f64>,
    /// Intensity weight per class.
    weights: Vec<f64>,
}

impl WidthClasses {
    /// Build the class table for the given sigma range.
    ///
    /// Without explicit radii there are `intervals + 1` classes, with
    /// `intervals` capped at [`MAX_WIDTH_CLASSES`]. Explicit radii define one
    /// class each; the weight table is derived either way.
    pub fn new(
        (min_sig, max_sig): (f64, f64),
        intervals: usize,
        radii: Option<&[f64]>,
        dot_size: f64,
        ppu: f64,
    ) -> Self {
        let (count, radii) = match radii {
            Some(r) if !r.is_empty() => (r.len(), r.to_vec()),
            _ => {
                let count = intervals.min(MAX_WIDTH_CLASSES) + 1;
                (count, default_radii(count, dot_size, ppu))
            }
        };

        let edges = if count == 1 {
            vec![min_sig]
        } else {
            linspace(min_sig, max_sig, count)
        };

        Self {
            edges,
            radii,
            weights: default_weights(count),
        }
    }

    /// Compute sigmas from amplitudes and build the table.
    ///
    /// Returns the table together with per-molecule sigmas, or `None` when no
    /// amplitude yields a valid sigma.
    pub fn from_amplitudes(
        amplitudes: &[f64],
        intervals: usize,
        radii: Option<&[f64]>,
        dot_size: f64,
        ppu: f64,
    ) -> Option<(Self, Vec<Option<f64>>)> {
        let sigmas: Vec<Option<f64>> = amplitudes.iter().map(|&a| precision_proxy(a)).collect();
        let range = sigma_range(&sigmas)?;
        Some((Self::new(range, intervals, radii, dot_size, ppu), sigmas))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn radius(&self, class: usize) -> f64 {
        self.radii[class]
    }

    pub fn weight(&self, class: usize) -> f64 {
        self.weights[class]
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Class containing `sigma`: the last class whose lower edge is `<= sigma`.
    ///
    /// Sigmas below the first edge belong to no class. When edges coincide
    /// (all sigmas equal) the empty intervals are skipped and the molecule
    /// lands in the final, open-ended class.
    pub fn class_of(&self, sigma: f64) -> Option<usize> {
        if !sigma.is_finite() {
            return None;
        }
        match self.edges.partition_point(|&e| e <= sigma) {
            0 => None,
            n => Some(n - 1),
        }
    }

    /// Class per molecule.
    pub fn assign(&self, sigmas: &[Option<f64>]) -> Vec<Option<usize>> {
        sigmas
            .iter()
            .map(|s| s.and_then(|sigma| self.class_of(sigma)))
            .collect()
    }
}
