/// Dense convolution baselines.
///
/// Provides the algorithms the sparse engine is compared against: direct
/// (reference), Im2col+GEMM and Winograd F(2x2, 3x3).

mod naive;
mod im2col;
mod winograd;
mod simd;

pub use naive::conv2d_naive;
pub use im2col::conv2d_im2col;
pub use winograd::conv2d_winograd;

use std::fmt;

use crate::config::ConvGeometry;
use crate::error::{Error, Result};
use crate::tensor::Tensor;

/// Selects which dense convolution algorithm to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvAlgorithm {
    /// Direct nested loops (reference implementation).
    Naive,
    /// Im2col unfolding + tiled GEMM.
    Im2col,
    /// Winograd F(2x2, 3x3). Falls back to Im2col for non-3x3 kernels or stride != 1.
    Winograd,
}

impl ConvAlgorithm {
    pub const ALL: [ConvAlgorithm; 3] = [ConvAlgorithm::Naive, ConvAlgorithm::Im2col, ConvAlgorithm::Winograd];
}

impl fmt::Display for ConvAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvAlgorithm::Naive => write!(f, "naive"),
            ConvAlgorithm::Im2col => write!(f, "im2col"),
            ConvAlgorithm::Winograd => write!(f, "winograd"),
        }
    }
}

/// `[oc][ic][k][k]` kernel with every weight set to `fill`.
pub fn constant_kernel(g: &ConvGeometry, fill: f32) -> Tensor {
    let [oc, ic, kh, kw] = g.kernel_shape();
    Tensor::filled(oc, ic, kh, kw, fill)
}

/// Run `algorithm` over an NCHW `input` with an `[oc][ic][k][k]` `kernel`.
///
/// Returns a fresh `[batch][oc][out_h][out_w]` tensor.
pub fn conv2d(algorithm: ConvAlgorithm, input: &Tensor, kernel: &Tensor, g: &ConvGeometry) -> Result<Tensor> {
    g.validate()?;
    if input.shape() != g.input_shape() {
        return Err(Error::ShapeMismatch {
            what: "input",
            expected: g.input_shape(),
            got: input.shape(),
        });
    }
    if kernel.shape() != g.kernel_shape() {
        return Err(Error::ShapeMismatch {
            what: "kernel",
            expected: g.kernel_shape(),
            got: kernel.shape(),
        });
    }

    let [n, c, h, w] = g.output_shape();
    let mut output = Tensor::new(n, c, h, w);
    match algorithm {
        ConvAlgorithm::Naive => conv2d_naive(input.data(), kernel.data(), g, output.data_mut()),
        ConvAlgorithm::Im2col => conv2d_im2col(input.data(), kernel.data(), g, output.data_mut()),
        ConvAlgorithm::Winograd => {
            // Winograd only supports 3x3 with stride=1; fall back to Im2col otherwise
            if g.kernel_size == 3 && g.stride == 1 {
                let padded = input.padded(g.padding);
                conv2d_winograd(&padded, kernel, g, &mut output);
            } else {
                conv2d_im2col(input.data(), kernel.data(), g, output.data_mut());
            }
        }
    }
    Ok(output)
}
