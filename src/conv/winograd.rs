/// Winograd F(2x2, 3x3) convolution.
///
/// Only supports 3x3 kernels with stride=1. For other configurations,
/// the dispatcher falls back to Im2col. Padding is materialised by the caller.

use std::array;

use crate::config::ConvGeometry;
use crate::tensor::Tensor;

type Tile4 = [[f32; 4]; 4];

/// `G * col` for one filter column. G = [1 0 0; .5 .5 .5; .5 -.5 .5; 0 0 1].
#[inline]
fn filter_col(g: [f32; 3]) -> [f32; 4] {
    [g[0], (g[0] + g[1] + g[2]) * 0.5, (g[0] - g[1] + g[2]) * 0.5, g[2]]
}

/// `B^T * col` for one input column.
#[inline]
fn input_col(d: [f32; 4]) -> [f32; 4] {
    [d[0] - d[2], d[1] + d[2], d[2] - d[1], d[1] - d[3]]
}

/// `A^T * col` for one column of the elementwise product.
#[inline]
fn output_col(m: [f32; 4]) -> [f32; 2] {
    [m[0] + m[1] + m[2], m[1] - m[2] - m[3]]
}

/// `T * x * T^T` where `t` applies `T` to a single column.
#[inline]
fn sandwich<const I: usize, const O: usize>(x: &[[f32; I]; I], t: impl Fn([f32; I]) -> [f32; O]) -> [[f32; O]; O] {
    let cols: [[f32; O]; I] = array::from_fn(|j| t(array::from_fn(|i| x[i][j])));
    array::from_fn(|o| t(array::from_fn(|j| cols[j][o])))
}

/// Winograd convolution of an already padded input.
///
/// `padded` is `[batch][ic][H + 2P][W + 2P]`; `output` has the shape
/// `g.output_shape()`. Each input tile is transformed once and reused for every
/// output channel.
pub fn conv2d_winograd(padded: &Tensor, kernel: &Tensor, g: &ConvGeometry, output: &mut Tensor) {
    let (in_channels, out_channels) = (g.in_channels, g.out_channels);
    let (out_h, out_w) = (g.out_height(), g.out_width());

    // U[oc][ic] = G * g * G^T
    let filters: Vec<Tile4> = (0..out_channels * in_channels)
        .map(|i| {
            let (oc, ic) = (i / in_channels, i % in_channels);
            let taps: [[f32; 3]; 3] = array::from_fn(|kh| array::from_fn(|kw| kernel.get(oc, ic, kh, kw)));
            sandwich(&taps, filter_col)
        })
        .collect();

    let mut transformed: Vec<Tile4> = vec![[[0.0; 4]; 4]; in_channels];
    for n in 0..g.batch {
        for th in 0..out_h.div_ceil(2) {
            for tw in 0..out_w.div_ceil(2) {
                let (base_h, base_w) = (th * 2, tw * 2);
                for (ic, v) in transformed.iter_mut().enumerate() {
                    let d: Tile4 = array::from_fn(|dh| {
                        array::from_fn(|dw| {
                            let (ih, iw) = (base_h + dh, base_w + dw);
                            if ih < padded.h && iw < padded.w {
                                padded.get(n, ic, ih, iw)
                            } else {
                                0.0
                            }
                        })
                    });
                    *v = sandwich(&d, input_col);
                }

                for oc in 0..out_channels {
                    let mut acc: Tile4 = [[0.0; 4]; 4];
                    for (u, v) in filters[oc * in_channels..(oc + 1) * in_channels].iter().zip(&transformed) {
                        for r in 0..4 {
                            for c in 0..4 {
                                acc[r][c] += u[r][c] * v[r][c];
                            }
                        }
                    }
                    let y = sandwich(&acc, output_col);

                    // edge tiles may overhang the output
                    for (dy, row) in y.iter().enumerate() {
                        for (dx, &val) in row.iter().enumerate() {
                            let (oh, ow) = (base_h + dy, base_w + dx);
                            if oh < out_h && ow < out_w {
                                output.set(n, oc, oh, ow, val);
                            }
                        }
                    }
                }
            }
        }
    }
}
