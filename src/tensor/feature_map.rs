use std::fmt;

use super::Tensor;

/// A dense single-channel 2D input grid.
///
/// Logically the `[0][0]` plane of a `1 x 1 x H x W` tensor; the sparse engine
/// reads it by `(row, col)` and the dense baselines see it through
/// [`FeatureMap::as_tensor`].
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMap {
    tensor: Tensor,
}

impl FeatureMap {
    /// All-zero map of `height` rows by `width` columns.
    pub fn zeros(height: usize, width: usize) -> Self {
        FeatureMap {
            tensor: Tensor::new(1, 1, height, width),
        }
    }

    /// Build from row-major values. Returns `None` on a length mismatch.
    pub fn from_rows(height: usize, width: usize, values: Vec<f32>) -> Option<Self> {
        Tensor::from_vec(1, 1, height, width, values).map(|tensor| FeatureMap { tensor })
    }

    pub fn height(&self) -> usize {
        self.tensor.h
    }

    pub fn width(&self) -> usize {
        self.tensor.w
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.tensor.get(0, 0, row, col)
    }

    /// Checked lookup.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.height() && col < self.width() {
            Some(self.at(row, col))
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, val: f32) {
        self.tensor.set(0, 0, row, col, val);
    }

    pub fn as_tensor(&self) -> &Tensor {
        &self.tensor
    }

    pub fn into_tensor(self) -> Tensor {
        self.tensor
    }

    /// Fraction of entries that are nonzero.
    pub fn density(&self) -> f64 {
        let total = self.tensor.len();
        if total == 0 {
            return 0.0;
        }
        self.tensor.count_nonzero() as f64 / total as f64
    }
}

impl fmt::Display for FeatureMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height(), self.width())
    }
}
