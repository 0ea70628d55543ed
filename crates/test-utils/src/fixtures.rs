//! Common rendering fixtures.

use storm_common::{BoundingBox, ImageAxes, MoleculeList, RenderConfig};

/// Square window `[0, size) x [0, size)` at the given magnification.
pub fn square_axes(size: f64, zm: f64) -> ImageAxes {
    match ImageAxes::new(BoundingBox::new(0.0, 0.0, size, size), zm, 1.0) {
        Ok(axes) => axes,
        Err(e) => panic!("invalid fixture window {}x{} at {}: {}", size, size, zm, e),
    }
}

/// Configuration with no blur, no auto-contrast and no scale bar.
///
/// Output values then equal the raw class weights, saturated to 8 bits.
pub fn raw_fast_config(axes: ImageAxes) -> RenderConfig {
    RenderConfig {
        fast: true,
        auto_contrast: false,
        scalebar: 0.0,
        zoom: axes.zm,
        axes: Some(axes),
        ..RenderConfig::default()
    }
}

/// Three molecules at `(1,1)`, `(2,2)`, `(3,3)` with amplitude 4 (sigma 2).
pub fn three_molecule_scene() -> MoleculeList {
    MoleculeList::new(
        vec![1.0, 2.0, 3.0],
        vec![1.0, 2.0, 3.0],
        vec![4.0, 4.0, 4.0],
    )
}

/// Molecules spanning a range of amplitudes so every width class is used.
pub fn graded_scene() -> MoleculeList {
    let amplitudes = vec![1.0, 4.0, 16.0, 64.0, 256.0, 1024.0];
    let n = amplitudes.len();
    let coords: Vec<f64> = (0..n).map(|i| 4.0 + 4.0 * i as f64).collect();
    MoleculeList::new(coords.clone(), vec![16.0; n], amplitudes)
}
