/// Im2col + tiled GEMM convolution.
///
/// Unfolds input patches into a column matrix, then performs a tiled matrix multiply
/// for cache-friendly access patterns.

use super::simd;
use crate::config::ConvGeometry;

const TILE: usize = 32;

/// Unfold input patches of one batch item into a column matrix.
///
/// Output shape: rows = `in_channels * kernel_size * kernel_size`, cols = `out_h * out_w`.
/// Taps that fall in the padding border are left at zero.
fn im2col(input: &[f32], g: &ConvGeometry, col: &mut [f32]) {
    let (out_h, out_w) = (g.out_height(), g.out_width());
    let k = g.kernel_size;
    let pad = g.padding as isize;
    let col_cols = out_h * out_w;

    col.fill(0.0);
    for ic in 0..g.in_channels {
        for kh in 0..k {
            for kw in 0..k {
                let row = ic * k * k + kh * k + kw;
                let row_off = row * col_cols;
                for oh in 0..out_h {
                    let ih = (oh * g.stride + kh) as isize - pad;
                    if ih < 0 || ih >= g.height as isize {
                        continue;
                    }
                    let in_row = ic * g.height * g.width + ih as usize * g.width;
                    for ow in 0..out_w {
                        let iw = (ow * g.stride + kw) as isize - pad;
                        if iw < 0 || iw >= g.width as isize {
                            continue;
                        }
                        col[row_off + oh * out_w + ow] = input[in_row + iw as usize];
                    }
                }
            }
        }
    }
}

/// Tiled matrix multiply: C = A * B.
///
/// A: m x k, B: k x n, C: m x n
fn gemm_tiled(a: &[f32], b: &[f32], m: usize, n: usize, k: usize, c: &mut [f32]) {
    c[..m * n].fill(0.0);

    let mut ii = 0;
    while ii < m {
        let i_end = (ii + TILE).min(m);
        let mut pp = 0;
        while pp < k {
            let p_end = (pp + TILE).min(k);
            let mut jj = 0;
            while jj < n {
                let j_end = (jj + TILE).min(n);
                for i in ii..i_end {
                    let c_row = i * n;
                    let a_row = i * k;
                    for p in pp..p_end {
                        let a_val = a[a_row + p];
                        let b_row = p * n;
                        simd::axpy_f32(c, c_row + jj, b, b_row + jj, a_val, j_end - jj);
                    }
                }
                jj += TILE;
            }
            pp += TILE;
        }
        ii += TILE;
    }
}

/// Im2col + GEMM convolution.
///
/// Works with any kernel size, stride and padding.
pub fn conv2d_im2col(input: &[f32], weights: &[f32], g: &ConvGeometry, output: &mut [f32]) {
    let col_rows = g.in_channels * g.kernel_size * g.kernel_size;
    let col_cols = g.out_height() * g.out_width();
    let mut col = vec![0.0f32; col_rows * col_cols];

    let in_spatial = g.in_channels * g.height * g.width;
    let out_spatial = g.out_channels * col_cols;

    for n in 0..g.batch {
        let in_off = n * in_spatial;
        let out_off = n * out_spatial;

        im2col(&input[in_off..in_off + in_spatial], g, &mut col);

        // weights is (out_channels x col_rows), col is (col_rows x col_cols)
        // output slice is (out_channels x col_cols)
        gemm_tiled(
            weights,
            &col,
            g.out_channels,
            col_cols,
            col_rows,
            &mut output[out_off..out_off + out_spatial],
        );
    }
}
