//! Coordinate binning into the pixel grid and z slices.

use storm_common::{BoundingBox, ImageAxes};

/// Maps molecule positions onto the output pixel grid.
///
/// Pixel coordinates are `xi = x * ppu - min_x * ppu` (columns) and
/// `yi = y * ppu - min_y * ppu` (rows), where `ppu` is the effective
/// magnification. A molecule is binned into the pixel at its rounded pixel
/// coordinate.
#[derive(Debug, Clone, Copy)]
pub struct PixelBinner {
    bbox: BoundingBox,
    ppu: f64,
    height: usize,
    width: usize,
}

impl PixelBinner {
    pub fn new(axes: &ImageAxes) -> Self {
        Self {
            bbox: axes.bbox,
            ppu: axes.pixels_per_unit(),
            height: axes.height,
            width: axes.width,
        }
    }

    /// Transform a position into continuous pixel coordinates `(row, col)`.
    ///
    /// Returns `None` when the position lies outside the half-open window
    /// `[min_x, max_x) x [min_y, max_y)`.
    #[inline]
    pub fn to_pixel(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !self.bbox.contains_half_open(x, y) {
            return None;
        }
        let xi = x * self.ppu - self.bbox.min_x * self.ppu;
        let yi = y * self.ppu - self.bbox.min_y * self.ppu;
        Some((yi, xi))
    }

    /// Flat row-major pixel index for a position.
    ///
    /// Rounded coordinates falling outside `[0, height-1] x [0, width-1]`
    /// are dropped, which can happen when the pixel dimensions were supplied
    /// explicitly or when rounding lands exactly on the far edge.
    #[inline]
    pub fn pixel_index(&self, x: f64, y: f64) -> Option<usize> {
        let (yi, xi) = self.to_pixel(x, y)?;
        let row = yi.round();
        let col = xi.round();
        if row < 0.0 || col < 0.0 || row > (self.height - 1) as f64 || col > (self.width - 1) as f64 {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    /// Pixel index for every molecule; `None` marks molecules excluded from
    /// rendering.
    pub fn bin_all(&self, xs: &[f64], ys: &[f64]) -> Vec<Option<usize>> {
        xs.iter()
            .zip(ys)
            .map(|(&x, &y)| self.pixel_index(x, y))
            .collect()
    }
}

/// Fill `counts` with a histogram of flat pixel indices, each hit adding
/// `weight`. `counts` is cleared first; indices past its end are ignored.
pub fn histogram_indices(counts: &mut [f64], indices: &[usize], weight: f64) {
    counts.fill(0.0);
    for &idx in indices {
        if let Some(c) = counts.get_mut(idx) {
            *c += weight;
        }
    }
}

/// Partition of the z axis into `steps` slices.
///
/// Slice edges are evenly spaced over the nominal range; the first lower and
/// the last upper edge extend to infinity so no molecule is lost for lying
/// outside the range. Slices are half-open `[lower, upper)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ZSlices {
    edges: Vec<f64>,
}

impl ZSlices {
    pub fn new(range: [f64; 2], steps: usize) -> Self {
        let steps = steps.max(1);
        let mut edges = crate::classify::linspace(range[0], range[1], steps + 1);
        edges[0] = f64::NEG_INFINITY;
        edges[steps] = f64::INFINITY;
        Self { edges }
    }

    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(lower, upper)` bounds of a slice.
    pub fn bounds(&self, slice: usize) -> (f64, f64) {
        (self.edges[slice], self.edges[slice + 1])
    }

    /// Slice containing `z`. NaN belongs to no slice unless there is only
    /// one, in which case z is not consulted.
    pub fn slice_of(&self, z: f64) -> Option<usize> {
        if self.len() == 1 {
            return Some(0);
        }
        if z.is_nan() {
            return None;
        }
        let count = self.edges.partition_point(|&e| e <= z);
        // z < +inf always holds for finite z; +inf itself falls past the end
        if count == 0 || count > self.len() {
            None
        } else {
            Some(count - 1)
        }
    }

    /// Slice index per molecule. Without z data every molecule goes into
    /// slice 0 (only valid for a single slice).
    pub fn assign(&self, z: Option<&[f64]>, count: usize) -> Vec<Option<usize>> {
        match z {
            Some(z) if self.len() > 1 => z.iter().map(|&v| self.slice_of(v)).collect(),
            _ => vec![Some(0); count],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    fn axes_10x10() -> ImageAxes {
        ImageAxes::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_pixel_transform() {
        let axes = ImageAxes::new(BoundingBox::new(2.0, 4.0, 6.0, 8.0), 10.0, 1.0).unwrap();
        let binner = PixelBinner::new(&axes);
        let (row, col) = binner.to_pixel(3.0, 5.5).unwrap();
        assert_approx_eq!(col, 10.0);
        assert_approx_eq!(row, 15.0);
        assert_eq!(binner.pixel_index(3.0, 5.5), Some(15 * 40 + 10));
    }

    #[test]
    fn test_window_is_half_open() {
        let binner = PixelBinner::new(&axes_10x10());
        assert_eq!(binner.pixel_index(0.0, 0.0), Some(0));
        assert_eq!(binner.pixel_index(10.0, 5.0), None);
        assert_eq!(binner.pixel_index(5.0, 10.0), None);
        assert_eq!(binner.pixel_index(-0.1, 5.0), None);
    }

    #[test]
    fn test_rounding_past_last_pixel_is_dropped() {
        let binner = PixelBinner::new(&axes_10x10());
        // 9.6 is inside the window but rounds to column 10
        assert_eq!(binner.pixel_index(9.6, 0.0), None);
        assert_eq!(binner.pixel_index(9.4, 0.0), Some(9));
    }

    #[test]
    fn test_explicit_small_dimensions_drop_instead_of_panic() {
        let axes =
            ImageAxes::with_dimensions(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 1.0, 1.0, 3, 3)
                .unwrap();
        let binner = PixelBinner::new(&axes);
        let bins = binner.bin_all(&[1.0, 8.0, 2.0], &[1.0, 8.0, 7.0]);
        assert_eq!(bins, vec![Some(4), None, None]);
    }

    #[test]
    fn test_histogram_counts_duplicates() {
        let binner = PixelBinner::new(&axes_10x10());
        let bins = binner.bin_all(&[1.0, 1.2, 3.0], &[2.0, 1.9, 3.0]);
        let indices: Vec<usize> = bins.into_iter().flatten().collect();

        let mut hist = vec![7.0; 100];
        histogram_indices(&mut hist, &indices, 1.0);
        assert_eq!(hist[2 * 10 + 1], 2.0);
        assert_eq!(hist[3 * 10 + 3], 1.0);
        assert_eq!(hist.iter().sum::<f64>(), 3.0);

        histogram_indices(&mut hist, &indices, 400.0);
        assert_eq!(hist[2 * 10 + 1], 800.0);
        assert_eq!(hist.iter().sum::<f64>(), 1200.0);
    }

    #[test]
    fn test_histogram_ignores_out_of_range_indices() {
        let mut hist = vec![0.0; 4];
        histogram_indices(&mut hist, &[0, 3, 4, 99], 1.0);
        assert_eq!(hist, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_zslices_edges() {
        let slices = ZSlices::new([-500.0, 500.0], 4);
        assert_eq!(slices.len(), 4);
        assert_eq!(slices.bounds(0), (f64::NEG_INFINITY, -250.0));
        assert_eq!(slices.bounds(3), (250.0, f64::INFINITY));

        assert_eq!(slices.slice_of(-10_000.0), Some(0));
        assert_eq!(slices.slice_of(-250.0), Some(1));
        assert_eq!(slices.slice_of(0.0), Some(2));
        assert_eq!(slices.slice_of(-0.001), Some(1));
        assert_eq!(slices.slice_of(10_000.0), Some(3));
        assert_eq!(slices.slice_of(f64::NAN), None);
    }

    #[test]
    fn test_single_slice_ignores_z() {
        let slices = ZSlices::new([-500.0, 500.0], 1);
        assert_eq!(slices.slice_of(f64::NAN), Some(0));
        assert_eq!(slices.assign(None, 3), vec![Some(0); 3]);
        assert_eq!(slices.assign(Some(&[1e9, -1e9]), 2), vec![Some(0); 2]);
    }
}
