//! Loading molecule lists, configuration and axes from disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use storm_common::{ImageAxes, MoleculeList, RenderConfig};

/// On-disk layout of a molecule file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MoleculeFile {
    pub channels: Vec<MoleculeList>,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Read every channel from a JSON or YAML molecule file.
pub fn load_channels(path: &Path) -> Result<Vec<MoleculeList>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading molecules from {}", path.display()))?;

    let file: MoleculeFile = if is_yaml(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("parsing YAML molecules in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("parsing JSON molecules in {}", path.display()))?
    };

    for (index, channel) in file.channels.iter().enumerate() {
        channel.validate(index)?;
    }
    Ok(file.channels)
}

/// Defaults, then the optional file, then flat overrides. Validated.
pub fn load_config(path: Option<&Path>, params: &[String]) -> Result<RenderConfig> {
    let mut config = match path {
        Some(path) => RenderConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => RenderConfig::default(),
    };
    config.apply_args(params)?;
    Ok(config)
}

/// Axes written by an earlier render.
pub fn load_axes(path: &Path) -> Result<ImageAxes> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading axes from {}", path.display()))?;
    let axes: ImageAxes = serde_json::from_str(&content)?;
    axes.validate()?;
    Ok(axes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use storm_common::StormError;
    use tempfile::NamedTempFile;

    fn temp_with(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_json_channels() {
        let file = temp_with(
            ".json",
            r#"{"channels": [{"x": [1.0, 2.0], "y": [1.0, 2.0], "a": [4.0, 9.0]}, {"x": [], "y": [], "a": []}]}"#,
        );
        let channels = load_channels(file.path()).unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].len(), 2);
        assert!(channels[0].z.is_none());
        assert!(channels[1].is_empty());
    }

    #[test]
    fn test_load_yaml_channels() {
        let file = temp_with(
            ".yaml",
            "channels:\n  - x: [1.0]\n    y: [2.0]\n    z: [10.0]\n    a: [4.0]\n    xc: [1.5]\n    yc: [2.5]\n",
        );
        let channels = load_channels(file.path()).unwrap();
        assert_eq!(channels[0].z.as_deref(), Some(&[10.0][..]));
        assert!(channels[0].has_drift_correction());
    }

    #[test]
    fn test_mismatched_channel_rejected() {
        let file = temp_with(".json", r#"{"channels": [{"x": [1.0, 2.0], "y": [1.0], "a": [4.0, 4.0]}]}"#);
        let err = load_channels(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StormError>(),
            Some(StormError::LengthMismatch { field: "y", .. })
        ));
    }

    #[test]
    fn test_config_file_then_overrides() {
        let file = temp_with(".yaml", "zoom: 4\nfast: true\n");
        let params = vec!["zoom".to_string(), "2".to_string()];
        let config = load_config(Some(file.path()), &params).unwrap();
        assert_eq!(config.zoom, 2.0);
        assert!(config.fast);
    }

    #[test]
    fn test_bad_override_names_parameter() {
        let params = vec!["bogus".to_string(), "1".to_string()];
        let err = load_config(None, &params).unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_load_axes_validates() {
        let good = temp_with(
            ".json",
            r#"{"bbox": {"min_x": 0.0, "min_y": 0.0, "max_x": 4.0, "max_y": 4.0}, "zm": 2.0, "height": 8, "width": 8}"#,
        );
        let axes = load_axes(good.path()).unwrap();
        assert_eq!(axes.scale, 1.0);
        assert_eq!(axes.pixel_count(), 64);

        let bad = temp_with(
            ".json",
            r#"{"bbox": {"min_x": 0.0, "min_y": 0.0, "max_x": 4.0, "max_y": 4.0}, "zm": 0.0, "height": 8, "width": 8}"#,
        );
        assert!(load_axes(bad.path()).is_err());
    }
}
