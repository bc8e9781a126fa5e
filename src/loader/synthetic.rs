use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::tensor::FeatureMap;

/// Random binary occupancy grid standing in for a voxelised point cloud.
///
/// Each cell at least `margin` cells away from every edge is set to `1.0`
/// with probability `density` (clamped to `[0, 1]`, NaN counts as zero);
/// cells inside the margin stay zero. The same seed always yields the same map.
pub fn synthetic_feature_map(height: usize, width: usize, density: f64, margin: usize, seed: u64) -> FeatureMap {
    let mut rng = StdRng::seed_from_u64(seed);
    // NaN would reach gen_bool unchanged by clamp
    let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
    let mut map = FeatureMap::zeros(height, width);
    if height <= 2 * margin || width <= 2 * margin {
        return map;
    }
    for row in margin..height - margin {
        for col in margin..width - margin {
            if rng.gen_bool(density) {
                map.set(row, col, 1.0);
            }
        }
    }
    map
}
