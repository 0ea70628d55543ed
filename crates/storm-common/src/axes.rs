//! Rendering window and rasterization parameters.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, MoleculeList, Positions, StormError, StormResult};

/// Spatial window, magnification and output pixel dimensions.
///
/// Resolved once per render call and returned to the caller so another
/// channel set can be rendered into the identical window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageAxes {
    pub bbox: BoundingBox,
    /// Output pixels per input coordinate unit.
    pub zm: f64,
    /// Extra uniform scale multiplier applied on top of `zm`.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Output height in pixels (rows, along y).
    pub height: usize,
    /// Output width in pixels (columns, along x).
    pub width: usize,
}

fn default_scale() -> f64 {
    1.0
}

impl ImageAxes {
    /// Build axes, deriving pixel dimensions from the window.
    ///
    /// `height = round((max_y - min_y) * zm * scale)` and likewise for width.
    pub fn new(bbox: BoundingBox, zm: f64, scale: f64) -> StormResult<Self> {
        let ppu = zm * scale;
        let height = (bbox.height() * ppu).round();
        let width = (bbox.width() * ppu).round();

        let axes = Self {
            bbox,
            zm,
            scale,
            height: if height.is_finite() && height > 0.0 { height as usize } else { 0 },
            width: if width.is_finite() && width > 0.0 { width as usize } else { 0 },
        };
        axes.validate()?;
        Ok(axes)
    }

    /// Build axes with explicitly supplied pixel dimensions.
    pub fn with_dimensions(
        bbox: BoundingBox,
        zm: f64,
        scale: f64,
        height: usize,
        width: usize,
    ) -> StormResult<Self> {
        let axes = Self {
            bbox,
            zm,
            scale,
            height,
            width,
        };
        axes.validate()?;
        Ok(axes)
    }

    /// Infer the window from the floor/ceil of observed positions across all
    /// channels. Returns `Ok(None)` when there are no finite positions.
    pub fn infer(
        channels: &[MoleculeList],
        correct_drift: bool,
        zm: f64,
        scale: f64,
    ) -> StormResult<Option<Self>> {
        let positions: Vec<_> = channels
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| c.positions(correct_drift))
            .collect();
        Self::infer_from_positions(&positions, zm, scale)
    }

    /// Same as [`ImageAxes::infer`] for coordinates that were already selected.
    pub fn infer_from_positions(
        positions: &[Positions<'_>],
        zm: f64,
        scale: f64,
    ) -> StormResult<Option<Self>> {
        match BoundingBox::from_extent(positions.iter().map(|p| (p.x, p.y))) {
            Some(bbox) => Ok(Some(Self::new(bbox, zm, scale)?)),
            None => Ok(None),
        }
    }

    /// Effective magnification: output pixels per input unit.
    #[inline]
    pub fn pixels_per_unit(&self) -> f64 {
        self.zm * self.scale
    }

    /// Number of pixels in one slice.
    pub fn pixel_count(&self) -> usize {
        self.height * self.width
    }

    pub fn validate(&self) -> StormResult<()> {
        if !(self.zm.is_finite() && self.zm > 0.0) {
            return Err(StormError::InvalidAxes(format!(
                "magnification must be positive, got {}",
                self.zm
            )));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(StormError::InvalidAxes(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if self.height == 0 || self.width == 0 {
            return Err(StormError::InvalidAxes(format!(
                "pixel dimensions must be positive, got {}x{} for window {:?}",
                self.height, self.width, self.bbox
            )));
        }
        Ok(())
    }
}
