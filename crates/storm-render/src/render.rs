//! Render orchestration: molecule lists in, one image stack per channel out.

use std::collections::BTreeMap;
use std::time::Instant;

use storm_common::{ImageAxes, MoleculeList, Positions, RenderConfig, StormError, StormResult};

use crate::accumulate::{accumulate, MoleculeBins};
use crate::binning::{PixelBinner, ZSlices};
use crate::classify::WidthClasses;
use crate::image::{ImageStack, Pixel};
use crate::kernel::KernelCache;
use crate::normalize::{auto_contrast, quantize_raw};
use crate::png;
use crate::scalebar::ScaleBar;

/// A rendered channel in one of the two output encodings.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelImage {
    /// Auto-contrast output scaled to the full 16-bit range.
    Auto16(ImageStack<u16>),
    /// Raw accumulated intensity saturated to 8 bits.
    Raw8(ImageStack<u8>),
}

impl ChannelImage {
    pub fn height(&self) -> usize {
        match self {
            ChannelImage::Auto16(s) => s.height(),
            ChannelImage::Raw8(s) => s.height(),
        }
    }

    pub fn width(&self) -> usize {
        match self {
            ChannelImage::Auto16(s) => s.width(),
            ChannelImage::Raw8(s) => s.width(),
        }
    }

    pub fn slices(&self) -> usize {
        match self {
            ChannelImage::Auto16(s) => s.slices(),
            ChannelImage::Raw8(s) => s.slices(),
        }
    }

    pub fn bit_depth(&self) -> u8 {
        match self {
            ChannelImage::Auto16(_) => 16,
            ChannelImage::Raw8(_) => 8,
        }
    }

    /// Pixel value widened to `u32`.
    pub fn get(&self, row: usize, col: usize, slice: usize) -> Option<u32> {
        match self {
            ChannelImage::Auto16(s) => s.get(row, col, slice).map(Pixel::to_u32),
            ChannelImage::Raw8(s) => s.get(row, col, slice).map(Pixel::to_u32),
        }
    }

    pub fn max_pixel(&self) -> u32 {
        match self {
            ChannelImage::Auto16(s) => s.max_pixel().to_u32(),
            ChannelImage::Raw8(s) => s.max_pixel().to_u32(),
        }
    }

    pub fn count_nonzero(&self) -> usize {
        match self {
            ChannelImage::Auto16(s) => s.count_nonzero(),
            ChannelImage::Raw8(s) => s.count_nonzero(),
        }
    }

    pub fn as_u16(&self) -> Option<&ImageStack<u16>> {
        match self {
            ChannelImage::Auto16(s) => Some(s),
            ChannelImage::Raw8(_) => None,
        }
    }

    pub fn as_u8(&self) -> Option<&ImageStack<u8>> {
        match self {
            ChannelImage::Raw8(s) => Some(s),
            ChannelImage::Auto16(_) => None,
        }
    }

    /// Encode one slice as a grayscale PNG of the matching bit depth.
    pub fn encode_slice_png(&self, slice: usize) -> StormResult<Vec<u8>> {
        if slice >= self.slices() {
            return Err(StormError::EncodeError(format!(
                "slice {} out of range ({} slices)",
                slice,
                self.slices()
            )));
        }
        match self {
            ChannelImage::Auto16(s) => png::encode_gray16(s.slice(slice), s.width(), s.height()),
            ChannelImage::Raw8(s) => png::encode_gray8(s.slice(slice), s.width(), s.height()),
        }
    }
}

/// Output of a render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// Image stack per channel index. Channels without data are absent.
    pub images: BTreeMap<usize, ChannelImage>,
    /// Resolved window, for rendering another channel set identically.
    /// `None` only when nothing was rendered and no axes were supplied.
    pub axes: Option<ImageAxes>,
}

impl RenderOutput {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Render every channel with the given configuration.
///
/// Axes come from `config.axes` when present, otherwise they are inferred
/// from the data at `config.zoom`.
pub fn render(channels: &[MoleculeList], config: &RenderConfig) -> StormResult<RenderOutput> {
    render_inner(channels, config, config.axes)
}

/// Render every channel into a pre-resolved window.
pub fn render_with_axes(
    channels: &[MoleculeList],
    config: &RenderConfig,
    axes: &ImageAxes,
) -> StormResult<RenderOutput> {
    axes.validate()?;
    render_inner(channels, config, Some(*axes))
}

fn render_inner(
    channels: &[MoleculeList],
    config: &RenderConfig,
    axes: Option<ImageAxes>,
) -> StormResult<RenderOutput> {
    config.validate()?;

    // coordinates are selected once per channel; empty channels have none
    let positions: Vec<Option<Positions<'_>>> = channels
        .iter()
        .map(|list| (!list.is_empty()).then(|| list.positions(config.correct_drift)))
        .collect();
    validate_channels(channels, &positions, config)?;

    if positions.iter().all(Option::is_none) {
        tracing::debug!("No channel data, nothing to render");
        return Ok(RenderOutput {
            images: BTreeMap::new(),
            axes,
        });
    }

    let axes = match axes {
        Some(axes) => axes,
        None => {
            let selected: Vec<Positions<'_>> = positions.iter().flatten().copied().collect();
            ImageAxes::infer_from_positions(&selected, config.zoom, 1.0)?.ok_or_else(|| {
                StormError::InvalidAxes("no finite molecule positions to infer a window".into())
            })?
        }
    };

    let zslices = ZSlices::new(config.z_range, config.z_steps);
    let mut kernels = KernelCache::new();
    let mut images = BTreeMap::new();

    tracing::info!(
        channels = channels.len(),
        height = axes.height,
        width = axes.width,
        slices = zslices.len(),
        ppu = axes.pixels_per_unit(),
        fast = config.fast,
        "Rendering molecule lists"
    );

    for (index, (list, selected)) in channels.iter().zip(&positions).enumerate() {
        let Some(selected) = selected else {
            tracing::debug!(channel = index, "Skipping empty channel");
            continue;
        };
        let start = Instant::now();
        let image = render_channel(index, list, selected, config, &axes, &zslices, &mut kernels);
        tracing::info!(
            channel = index,
            molecules = list.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rendered channel"
        );
        images.insert(index, image);
    }

    Ok(RenderOutput {
        images,
        axes: Some(axes),
    })
}

/// Shape checks that must pass before any rendering work starts.
fn validate_channels(
    channels: &[MoleculeList],
    positions: &[Option<Positions<'_>>],
    config: &RenderConfig,
) -> StormResult<()> {
    for (index, (list, selected)) in channels.iter().zip(positions).enumerate() {
        list.validate(index)?;

        if let Some(filter) = config.filter_for(index) {
            if filter.len() != list.len() {
                return Err(StormError::FilterLengthMismatch {
                    channel: index,
                    expected: list.len(),
                    actual: filter.len(),
                });
            }
        }

        if config.z_steps > 1 && selected.is_some_and(|p| p.z.is_none()) {
            return Err(StormError::MissingField {
                channel: index,
                field: "z",
            });
        }
    }
    Ok(())
}

fn render_channel(
    index: usize,
    list: &MoleculeList,
    positions: &Positions<'_>,
    config: &RenderConfig,
    axes: &ImageAxes,
    zslices: &ZSlices,
    kernels: &mut KernelCache,
) -> ChannelImage {
    let ppu = axes.pixels_per_unit();

    let pixels = PixelBinner::new(axes).bin_all(positions.x, positions.y);
    let slices = zslices.assign(positions.z, list.len());

    let stack = match WidthClasses::from_amplitudes(
        &list.a,
        config.width_classes,
        config.blur_radii.as_deref(),
        config.dot_size_for(index),
        ppu,
    ) {
        Some((classes, sigmas)) => {
            let class_ids = classes.assign(&sigmas);
            let bins = MoleculeBins {
                pixels: &pixels,
                classes: &class_ids,
                slices: &slices,
                filter: config.filter_for(index),
            };
            let acc = accumulate(
                &bins,
                &classes,
                axes.height,
                axes.width,
                zslices.len(),
                config.fast,
                kernels,
            );
            tracing::debug!(
                channel = index,
                classes = classes.len(),
                rendered = acc.rendered,
                excluded = list.len() - acc.rendered,
                "Accumulated channel"
            );
            acc.stack
        }
        None => {
            tracing::warn!(
                channel = index,
                "No molecule has a positive amplitude, channel renders empty"
            );
            ImageStack::new(axes.height, axes.width, zslices.len())
        }
    };

    let bar = ScaleBar::new(config.scalebar, config.nm_per_pixel, ppu, config.scalebar_width);

    if config.auto_contrast {
        let mut image = auto_contrast(&stack);
        if let Some(bar) = bar {
            bar.draw(&mut image);
        }
        ChannelImage::Auto16(image)
    } else {
        let mut image = quantize_raw(&stack);
        if let Some(bar) = bar {
            bar.draw(&mut image);
        }
        ChannelImage::Raw8(image)
    }
}
