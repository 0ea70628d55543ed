//! Per-slice accumulation of weighted, blurred class histograms.

use crate::binning::histogram_indices;
use crate::classify::WidthClasses;
use crate::image::ImageStack;
use crate::kernel::KernelCache;

/// Per-molecule assignments for one channel.
///
/// All slices are parallel to the channel's molecule list. A molecule is
/// rendered only when it has a pixel, a class and a slice, and passes the
/// filter.
#[derive(Debug, Clone, Copy)]
pub struct MoleculeBins<'a> {
    pub pixels: &'a [Option<usize>],
    pub classes: &'a [Option<usize>],
    pub slices: &'a [Option<usize>],
    pub filter: Option<&'a [bool]>,
}

impl MoleculeBins<'_> {
    fn eligible(&self, i: usize) -> Option<(usize, usize, usize)> {
        if let Some(filter) = self.filter {
            if !filter[i] {
                return None;
            }
        }
        Some((self.pixels[i]?, self.classes[i]?, self.slices[i]?))
    }
}

/// Result of accumulating one channel.
#[derive(Debug, Clone)]
pub struct Accumulation {
    pub stack: ImageStack<f64>,
    /// Molecules that contributed to some slice.
    pub rendered: usize,
}

/// Render every `(slice, class)` pair and sum class contributions per slice.
///
/// Each pair produces a unit-count histogram of its molecules, scaled by the
/// class weight and, unless `fast` is set, blurred with the class's Gaussian.
pub fn accumulate(
    bins: &MoleculeBins<'_>,
    classes: &WidthClasses,
    height: usize,
    width: usize,
    slices: usize,
    fast: bool,
    kernels: &mut KernelCache,
) -> Accumulation {
    let n_classes = classes.len();
    let mut stack = ImageStack::new(height, width, slices);

    // bucket pixel indices by (slice, class)
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); slices * n_classes];
    let mut rendered = 0;
    for i in 0..bins.pixels.len() {
        if let Some((pixel, class, slice)) = bins.eligible(i) {
            if slice < slices && class < n_classes {
                buckets[slice * n_classes + class].push(pixel);
                rendered += 1;
            }
        }
    }

    let mut histogram = vec![0.0; height * width];
    for slice in 0..slices {
        for class in 0..n_classes {
            let pixels = &buckets[slice * n_classes + class];
            if pixels.is_empty() {
                continue;
            }

            let weight = classes.weight(class);
            histogram_indices(&mut histogram, pixels, weight);

            if !fast {
                kernels
                    .get(classes.radius(class))
                    .convolve(&mut histogram, height, width);
            }

            tracing::trace!(
                slice,
                class,
                molecules = pixels.len(),
                radius = classes.radius(class),
                weight,
                "Accumulated class"
            );

            for (acc, &v) in stack.slice_mut(slice).iter_mut().zip(&histogram) {
                *acc += v;
            }
        }
    }

    Accumulation { stack, rendered }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    fn two_class_table() -> WidthClasses {
        WidthClasses::new((1.0, 2.0), 1, Some(&[1.0, 2.0][..]), 4.0, 1.0)
    }

    #[test]
    fn test_fast_mode_is_weighted_histogram() {
        let classes = two_class_table();
        let pixels = [Some(0), Some(0), Some(5), None];
        let class_ids = [Some(0), Some(0), Some(1), Some(0)];
        let slice_ids = [Some(0); 4];
        let bins = MoleculeBins {
            pixels: &pixels,
            classes: &class_ids,
            slices: &slice_ids,
            filter: None,
        };

        let mut kernels = KernelCache::new();
        let acc = accumulate(&bins, &classes, 3, 3, 1, true, &mut kernels);

        assert_eq!(acc.rendered, 3);
        assert_eq!(acc.stack.slice(0)[0], 2.0 * classes.weight(0));
        assert_eq!(acc.stack.slice(0)[5], classes.weight(1));
        assert_eq!(acc.stack.count_nonzero(), 2);
        assert!(kernels.is_empty());
    }

    #[test]
    fn test_filter_and_slices_respected() {
        let classes = two_class_table();
        let pixels = [Some(1), Some(2), Some(3)];
        let class_ids = [Some(0), Some(0), Some(0)];
        let slice_ids = [Some(0), Some(1), None];
        let filter = [true, false, true];
        let bins = MoleculeBins {
            pixels: &pixels,
            classes: &class_ids,
            slices: &slice_ids,
            filter: Some(&filter[..]),
        };

        let mut kernels = KernelCache::new();
        let acc = accumulate(&bins, &classes, 2, 2, 2, true, &mut kernels);

        assert_eq!(acc.rendered, 1);
        assert_eq!(acc.stack.slice(0)[1], classes.weight(0));
        assert_eq!(acc.stack.slice(1).iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_blur_spreads_but_keeps_interior_mass() {
        let classes = two_class_table();
        let (h, w) = (31, 31);
        let centre = 15 * w + 15;
        let pixels = [Some(centre)];
        let class_ids = [Some(1)];
        let slice_ids = [Some(0)];
        let bins = MoleculeBins {
            pixels: &pixels,
            classes: &class_ids,
            slices: &slice_ids,
            filter: None,
        };

        let mut kernels = KernelCache::new();
        let fast = accumulate(&bins, &classes, h, w, 1, true, &mut kernels);
        let blurred = accumulate(&bins, &classes, h, w, 1, false, &mut kernels);

        assert_eq!(fast.stack.count_nonzero(), 1);
        assert!(blurred.stack.count_nonzero() > 1);
        assert_approx_eq!(fast.stack.sum(), blurred.stack.sum(), 1e-6);
        assert_eq!(kernels.len(), 1);
    }
}
