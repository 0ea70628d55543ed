//! Synthetic molecule list generators.
//!
//! All generators take an explicit seed so tests stay deterministic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use storm_common::MoleculeList;

/// Molecules scattered uniformly over `[0, extent)` in x and y.
///
/// Amplitudes are drawn from `[amp_min, amp_max)`, z from `[-500, 500)`.
pub fn uniform_cloud(
    count: usize,
    extent: f64,
    (amp_min, amp_max): (f64, f64),
    seed: u64,
) -> MoleculeList {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = Vec::with_capacity(count);
    let mut y = Vec::with_capacity(count);
    let mut z = Vec::with_capacity(count);
    let mut a = Vec::with_capacity(count);
    for _ in 0..count {
        x.push(rng.gen_range(0.0..extent));
        y.push(rng.gen_range(0.0..extent));
        z.push(rng.gen_range(-500.0..500.0));
        a.push(rng.gen_range(amp_min..amp_max));
    }
    MoleculeList::new(x, y, a).with_z(z)
}

/// Tight clusters of molecules around `centres`, with a Gaussian-like
/// spread of roughly `spread` units.
pub fn clustered_cloud(
    centres: &[(f64, f64)],
    per_cluster: usize,
    spread: f64,
    seed: u64,
) -> MoleculeList {
    let mut rng = StdRng::seed_from_u64(seed);
    let total = centres.len() * per_cluster;
    let mut x = Vec::with_capacity(total);
    let mut y = Vec::with_capacity(total);
    let mut a = Vec::with_capacity(total);
    for &(cx, cy) in centres {
        for _ in 0..per_cluster {
            // sum of uniforms approximates a normal well enough here
            let dx: f64 = (0..4).map(|_| rng.gen_range(-1.0..1.0)).sum::<f64>() * spread / 2.0;
            let dy: f64 = (0..4).map(|_| rng.gen_range(-1.0..1.0)).sum::<f64>() * spread / 2.0;
            x.push(cx + dx);
            y.push(cy + dy);
            a.push(rng.gen_range(50.0..5000.0));
        }
    }
    MoleculeList::new(x, y, a)
}

/// Apply a constant drift offset, storing the corrected positions in the
/// `xc`/`yc` fields and keeping the raw ones.
pub fn with_drift(list: MoleculeList, dx: f64, dy: f64) -> MoleculeList {
    let xc = list.x.iter().map(|v| v - dx).collect();
    let yc = list.y.iter().map(|v| v - dy).collect();
    list.with_drift_corrected(xc, yc, None)
}

/// Molecules evenly spaced on the diagonal `(i, i)` for `i` in `start..start + count`.
pub fn diagonal(start: usize, count: usize, amplitude: f64) -> MoleculeList {
    let coords: Vec<f64> = (start..start + count).map(|i| i as f64).collect();
    MoleculeList::new(coords.clone(), coords, vec![amplitude; count])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_cloud_is_seeded() {
        let a = uniform_cloud(100, 32.0, (10.0, 100.0), 7);
        let b = uniform_cloud(100, 32.0, (10.0, 100.0), 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 100);
        assert!(a.x.iter().all(|&v| (0.0..32.0).contains(&v)));
        assert!(a.a.iter().all(|&v| (10.0..100.0).contains(&v)));
        assert!(a.z.is_some());
    }

    #[test]
    fn test_clustered_cloud_size() {
        let list = clustered_cloud(&[(5.0, 5.0), (20.0, 20.0)], 50, 0.5, 3);
        assert_eq!(list.len(), 100);
        assert!(list.validate(0).is_ok());
    }

    #[test]
    fn test_with_drift() {
        let list = with_drift(diagonal(2, 3, 4.0), 1.0, 2.0);
        assert_eq!(list.xc.as_deref(), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(list.yc.as_deref(), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(list.x, vec![2.0, 3.0, 4.0]);
    }
}
