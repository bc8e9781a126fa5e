/// Dense matrix multiplication baselines.

mod matrix;
mod kernels;
mod strassen;

pub use matrix::Matrix;
pub use kernels::{matmul_at, matmul_bt, matmul_ijk, matmul_ikj, matmul_tiled, matmul_unrolled};
pub use strassen::{strassen, STRASSEN_CUTOFF};

use std::fmt;

use crate::error::{Error, Result};

/// Default block edge for [`MatmulAlgorithm::Tiled`].
pub const DEFAULT_TILE: usize = 256;

/// Selects which matmul variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatmulAlgorithm {
    Ijk,
    Ikj,
    /// i-j-k reading a pre-transposed A.
    TransposedA,
    /// i-j-k reading a pre-transposed B.
    TransposedB,
    Unrolled,
    Tiled(usize),
    Strassen,
}

impl MatmulAlgorithm {
    pub const ALL: [MatmulAlgorithm; 7] = [
        MatmulAlgorithm::Ijk,
        MatmulAlgorithm::Ikj,
        MatmulAlgorithm::TransposedA,
        MatmulAlgorithm::TransposedB,
        MatmulAlgorithm::Unrolled,
        MatmulAlgorithm::Tiled(DEFAULT_TILE),
        MatmulAlgorithm::Strassen,
    ];

    /// Reject parameters the kernels would panic on.
    pub fn validate(&self) -> Result<()> {
        match self {
            MatmulAlgorithm::Tiled(0) => Err(Error::InvalidParameter {
                name: "tile",
                reason: "tile size must be non-zero".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for MatmulAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatmulAlgorithm::Ijk => write!(f, "ijk"),
            MatmulAlgorithm::Ikj => write!(f, "ikj"),
            MatmulAlgorithm::TransposedA => write!(f, "transposed-a"),
            MatmulAlgorithm::TransposedB => write!(f, "transposed-b"),
            MatmulAlgorithm::Unrolled => write!(f, "unrolled"),
            MatmulAlgorithm::Tiled(t) => write!(f, "tiled-{t}"),
            MatmulAlgorithm::Strassen => write!(f, "strassen"),
        }
    }
}

/// Operands prepared once per benchmark, including the transposed copies.
pub struct MatmulOperands {
    pub a: Matrix,
    pub b: Matrix,
    pub at: Matrix,
    pub bt: Matrix,
}

impl MatmulOperands {
    /// Panics if the inner dimensions disagree.
    pub fn new(a: Matrix, b: Matrix) -> Self {
        assert_eq!(a.cols, b.rows, "cannot multiply {a} by {b}");
        let at = a.transpose();
        let bt = b.transpose();
        MatmulOperands { a, b, at, bt }
    }

    /// Compute `A * B` with `algorithm`.
    pub fn multiply(&self, algorithm: MatmulAlgorithm) -> Matrix {
        let mut c = Matrix::zeros(self.a.rows, self.b.cols);
        match algorithm {
            MatmulAlgorithm::Ijk => matmul_ijk(&self.a, &self.b, &mut c),
            MatmulAlgorithm::Ikj => matmul_ikj(&self.a, &self.b, &mut c),
            MatmulAlgorithm::TransposedA => matmul_at(&self.at, &self.b, &mut c),
            MatmulAlgorithm::TransposedB => matmul_bt(&self.a, &self.bt, &mut c),
            MatmulAlgorithm::Unrolled => matmul_unrolled(&self.a, &self.b, &mut c),
            MatmulAlgorithm::Tiled(tile) => matmul_tiled(&self.a, &self.b, &mut c, tile),
            MatmulAlgorithm::Strassen => return strassen(&self.a, &self.b),
        }
        c
    }
}
