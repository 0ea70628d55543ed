//! Render configuration.
//!
//! A typed replacement for keyword-style option lists. Every field has a
//! documented default and a declared [`Constraint`]; `validate()` runs all
//! checks before any rendering work starts.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::params::{check_array, check_number, Constraint};
use crate::{ImageAxes, StormError, StormResult};

/// Options for a single render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Number of width-class intervals (`N`); `N + 1` classes are rendered.
    pub width_classes: usize,
    /// Per-channel dot size multiplier. The last entry repeats for channels
    /// beyond the end of the list.
    pub dot_size: Vec<f64>,
    /// Number of z slices.
    pub z_steps: usize,
    /// Nominal z range `[min, max]` partitioned into `z_steps` slices.
    pub z_range: [f64; 2],
    /// Camera pixel calibration in nanometres.
    pub nm_per_pixel: f64,
    /// Scale bar length in nanometres; 0 disables the bar.
    pub scalebar: f64,
    /// Scale bar half-thickness: the bar spans `1 + 2 * scalebar_width` rows.
    pub scalebar_width: usize,
    /// Magnification used when the axes are inferred.
    pub zoom: f64,
    /// Use drift-corrected `xc/yc/zc` coordinates.
    pub correct_drift: bool,
    /// Skip the Gaussian blur and render the weighted histogram only.
    pub fast: bool,
    /// Rescale each channel stack to the full 16-bit range.
    pub auto_contrast: bool,
    /// Per-channel eligibility masks. Channels without a mask use all-true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Option<Vec<bool>>>>,
    /// Explicit blur radii in output pixels, one per width class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_radii: Option<Vec<f64>>,
    /// Pre-resolved axes from an earlier render call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axes: Option<ImageAxes>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width_classes: 6,
            dot_size: vec![4.0],
            z_steps: 1,
            z_range: [-500.0, 500.0],
            nm_per_pixel: 160.0,
            scalebar: 500.0,
            scalebar_width: 1,
            zoom: 10.0,
            correct_drift: true,
            fast: false,
            auto_contrast: true,
            filters: None,
            blur_radii: None,
            axes: None,
        }
    }
}

/// Parameter names accepted by [`RenderConfig::apply`], with their kinds.
pub const PARAMETERS: &[(&str, Constraint)] = &[
    ("width_classes", Constraint::PositiveInteger),
    ("dot_size", Constraint::Array),
    ("z_steps", Constraint::PositiveInteger),
    ("z_range", Constraint::Array),
    ("nm_per_pixel", Constraint::Positive),
    ("scalebar", Constraint::NonNegative),
    ("scalebar_width", Constraint::NonNegativeInteger),
    ("zoom", Constraint::Positive),
    ("correct_drift", Constraint::Boolean),
    ("fast", Constraint::Boolean),
    ("auto_contrast", Constraint::Boolean),
    ("blur_radii", Constraint::Array),
];

/// Upper bound on `width_classes`; each class costs one blur pass per slice.
pub const MAX_WIDTH_CLASSES: usize = 1024;

/// Upper bound on `scalebar_width`, in output pixels.
pub const MAX_SCALEBAR_WIDTH: usize = 1 << 16;

/// Fields that exist but can only be set through a configuration file.
const FILE_ONLY: &[&str] = &["filters", "axes"];

impl RenderConfig {
    /// Parse a flat `name, value, name, value, ...` token list on top of the
    /// defaults.
    pub fn from_args<S: AsRef<str>>(tokens: &[S]) -> StormResult<Self> {
        let mut config = Self::default();
        config.apply_args(tokens)?;
        Ok(config)
    }

    /// Apply a flat `name, value, ...` token list to this configuration and
    /// validate the result.
    pub fn apply_args<S: AsRef<str>>(&mut self, tokens: &[S]) -> StormResult<()> {
        if tokens.len() % 2 != 0 {
            return Err(StormError::OddArgumentCount(tokens.len()));
        }
        for pair in tokens.chunks_exact(2) {
            self.apply(pair[0].as_ref(), pair[1].as_ref())?;
        }
        self.validate()
    }

    /// Set one named parameter from its textual value.
    pub fn apply(&mut self, name: &str, raw: &str) -> StormResult<()> {
        let constraint = match PARAMETERS.iter().find(|(key, _)| *key == name) {
            Some((_, constraint)) => *constraint,
            None if FILE_ONLY.contains(&name) => {
                return Err(StormError::invalid(
                    name,
                    "a value set through a configuration file",
                    format!("'{}'", raw),
                ))
            }
            None => return Err(StormError::UnknownParameter(name.to_string())),
        };

        let value = constraint.parse(name, raw)?;
        let number = value.as_f64();
        let flag = value.as_bool();

        match name {
            "width_classes" => self.width_classes = number.unwrap_or_default() as usize,
            "z_steps" => self.z_steps = number.unwrap_or_default() as usize,
            "nm_per_pixel" => self.nm_per_pixel = number.unwrap_or_default(),
            "scalebar" => self.scalebar = number.unwrap_or_default(),
            "scalebar_width" => self.scalebar_width = number.unwrap_or_default() as usize,
            "zoom" => self.zoom = number.unwrap_or_default(),
            "correct_drift" => self.correct_drift = flag.unwrap_or_default(),
            "fast" => self.fast = flag.unwrap_or_default(),
            "auto_contrast" => self.auto_contrast = flag.unwrap_or_default(),
            "dot_size" => self.dot_size = value.into_array().unwrap_or_default(),
            "blur_radii" => self.blur_radii = value.into_array(),
            "z_range" => {
                let values = value.into_array().unwrap_or_default();
                if values.len() != 2 {
                    return Err(StormError::invalid(
                        name,
                        "an array of two numbers",
                        format!("{:?}", values),
                    ));
                }
                self.z_range = [values[0], values[1]];
            }
            _ => return Err(StormError::UnknownParameter(name.to_string())),
        }
        Ok(())
    }

    /// Load a YAML (or JSON) configuration file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> StormResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> StormResult<Self> {
        let config: RenderConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> StormResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every field against its declared constraint.
    pub fn validate(&self) -> StormResult<()> {
        check_number("width_classes", Constraint::PositiveInteger, self.width_classes as f64)?;
        if self.width_classes > MAX_WIDTH_CLASSES {
            return Err(StormError::invalid(
                "width_classes",
                format!("a positive integer no larger than {}", MAX_WIDTH_CLASSES),
                self.width_classes.to_string(),
            ));
        }
        check_number("z_steps", Constraint::PositiveInteger, self.z_steps as f64)?;
        check_number("nm_per_pixel", Constraint::Positive, self.nm_per_pixel)?;
        check_number("scalebar", Constraint::NonNegative, self.scalebar)?;
        check_number("zoom", Constraint::Positive, self.zoom)?;
        if self.scalebar_width > MAX_SCALEBAR_WIDTH {
            return Err(StormError::invalid(
                "scalebar_width",
                format!("a non-negative integer no larger than {}", MAX_SCALEBAR_WIDTH),
                self.scalebar_width.to_string(),
            ));
        }

        if self.dot_size.is_empty() {
            return Err(StormError::invalid(
                "dot_size",
                "a non-empty array of positive numbers",
                "[]",
            ));
        }
        check_array("dot_size", Constraint::Positive, &self.dot_size)?;

        let [z_min, z_max] = self.z_range;
        if !(z_min.is_finite() && z_max.is_finite() && z_min < z_max) {
            return Err(StormError::invalid(
                "z_range",
                "an increasing pair of finite numbers",
                format!("{:?}", self.z_range),
            ));
        }

        if let Some(radii) = &self.blur_radii {
            if radii.is_empty() {
                return Err(StormError::invalid(
                    "blur_radii",
                    "a non-empty array of non-negative numbers",
                    "[]",
                ));
            }
            check_array("blur_radii", Constraint::NonNegative, radii)?;
        }

        if let Some(axes) = &self.axes {
            axes.validate()?;
        }
        Ok(())
    }

    /// Dot size for a channel; the last configured entry repeats.
    pub fn dot_size_for(&self, channel: usize) -> f64 {
        self.dot_size
            .get(channel)
            .or_else(|| self.dot_size.last())
            .copied()
            .unwrap_or(4.0)
    }

    /// Filter mask for a channel, if one was supplied.
    pub fn filter_for(&self, channel: usize) -> Option<&[bool]> {
        self.filters
            .as_ref()
            .and_then(|f| f.get(channel))
            .and_then(|mask| mask.as_deref())
    }
}
