//! Writing rendered stacks to disk.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use storm_render::RenderOutput;

pub const AXES_FILE: &str = "axes.json";

/// File name for one channel slice.
pub fn slice_file_name(channel: usize, slice: usize) -> String {
    format!("ch{}_z{}.png", channel, slice)
}

/// Write `ch{c}_z{k}.png` for every rendered slice plus `axes.json`.
///
/// Returns the paths written.
pub fn write_outputs(output: &RenderOutput, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let mut written = Vec::new();
    for (&channel, image) in &output.images {
        for slice in 0..image.slices() {
            let path = dir.join(slice_file_name(channel, slice));
            let png = image.encode_slice_png(slice)?;
            std::fs::write(&path, &png)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::debug!(
                path = %path.display(),
                bytes = png.len(),
                bit_depth = image.bit_depth(),
                "Wrote slice"
            );
            written.push(path);
        }
    }

    if let Some(axes) = &output.axes {
        let path = dir.join(AXES_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(axes)?)
            .with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storm_common::ImageAxes;
    use storm_render::render;
    use test_utils::{raw_fast_config, square_axes, three_molecule_scene};

    #[test]
    fn test_writes_slices_and_axes() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = raw_fast_config(square_axes(10.0, 1.0));
        config.z_steps = 2;
        let scene = three_molecule_scene().with_z(vec![-100.0, 100.0, 200.0]);
        let out = render(&[scene.clone(), scene], &config).unwrap();

        let written = write_outputs(&out, dir.path()).unwrap();
        assert_eq!(written.len(), 5);
        for name in ["ch0_z0.png", "ch0_z1.png", "ch1_z0.png", "ch1_z1.png", AXES_FILE] {
            assert!(dir.path().join(name).is_file(), "missing {}", name);
        }

        let png = std::fs::read(dir.path().join("ch1_z1.png")).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let axes: ImageAxes =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(AXES_FILE)).unwrap())
                .unwrap();
        assert_eq!(Some(axes), out.axes);
    }

    #[test]
    fn test_empty_output_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = render(&[], &storm_common::RenderConfig::default()).unwrap();
        let written = write_outputs(&out, &dir.path().join("nested")).unwrap();
        assert!(written.is_empty());
        assert!(dir.path().join("nested").is_dir());
    }
}
