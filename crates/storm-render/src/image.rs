//! Multi-slice image buffers.

/// Pixel types a rendered stack can be quantized to.
pub trait Pixel: Copy + Default + PartialEq + PartialOrd + Send + Sync {
    /// Largest representable intensity.
    const MAX: Self;

    fn to_u32(self) -> u32;
}

impl Pixel for u8 {
    const MAX: Self = u8::MAX;

    fn to_u32(self) -> u32 {
        self as u32
    }
}

impl Pixel for u16 {
    const MAX: Self = u16::MAX;

    fn to_u32(self) -> u32 {
        self as u32
    }
}

/// An `height x width x slices` image.
///
/// Data is stored slice-major, each slice in row-major order:
/// `index = slice * height * width + row * width + col`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStack<T> {
    height: usize,
    width: usize,
    slices: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> ImageStack<T> {
    /// Zero-filled stack.
    pub fn new(height: usize, width: usize, slices: usize) -> Self {
        Self {
            height,
            width,
            slices,
            data: vec![T::default(); height * width * slices],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn slices(&self) -> usize {
        self.slices
    }

    /// Pixels in one slice.
    pub fn slice_len(&self) -> usize {
        self.height * self.width
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn index(&self, row: usize, col: usize, slice: usize) -> usize {
        slice * self.slice_len() + row * self.width + col
    }

    /// Value at a position, `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize, slice: usize) -> Option<T> {
        if row >= self.height || col >= self.width || slice >= self.slices {
            return None;
        }
        Some(self.data[self.index(row, col, slice)])
    }

    pub fn set(&mut self, row: usize, col: usize, slice: usize, value: T) {
        if row < self.height && col < self.width && slice < self.slices {
            let idx = self.index(row, col, slice);
            self.data[idx] = value;
        }
    }

    /// Row-major view of one slice.
    pub fn slice(&self, slice: usize) -> &[T] {
        let len = self.slice_len();
        &self.data[slice * len..(slice + 1) * len]
    }

    pub fn slice_mut(&mut self, slice: usize) -> &mut [T] {
        let len = self.slice_len();
        &mut self.data[slice * len..(slice + 1) * len]
    }

    /// Element-wise conversion into another pixel type.
    pub fn map<U: Copy + Default, F: Fn(T) -> U>(&self, f: F) -> ImageStack<U> {
        ImageStack {
            height: self.height,
            width: self.width,
            slices: self.slices,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl<T: Copy + Default + PartialEq> ImageStack<T> {
    /// Number of pixels (across all slices) not equal to the default value.
    pub fn count_nonzero(&self) -> usize {
        let zero = T::default();
        self.data.iter().filter(|&&v| v != zero).count()
    }
}

impl ImageStack<f64> {
    /// Largest finite value across every slice; 0 for an empty or
    /// all-non-finite stack.
    pub fn max_value(&self) -> f64 {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

impl<T: Pixel> ImageStack<T> {
    pub fn max_pixel(&self) -> T {
        self.data
            .iter()
            .copied()
            .fold(T::default(), |acc, v| if v > acc { v } else { acc })
    }
}
