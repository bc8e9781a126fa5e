use crate::config::ConvGeometry;

/// Direct 7-nested-loop convolution (reference implementation).
///
/// Input and weights are flat NCHW slices. Padding is applied implicitly:
/// taps with `oh * stride + kh - padding` outside the input read as zero.
pub fn conv2d_naive(input: &[f32], weights: &[f32], g: &ConvGeometry, output: &mut [f32]) {
    let (in_h, in_w) = (g.height as isize, g.width as isize);
    let (out_h, out_w) = (g.out_height(), g.out_width());
    let k = g.kernel_size;
    let pad = g.padding as isize;

    for n in 0..g.batch {
        for oc in 0..g.out_channels {
            for oh in 0..out_h {
                for ow in 0..out_w {
                    let mut sum = 0.0f32;
                    for ic in 0..g.in_channels {
                        for kh in 0..k {
                            for kw in 0..k {
                                let ih = (oh * g.stride + kh) as isize - pad;
                                let iw = (ow * g.stride + kw) as isize - pad;
                                if ih < 0 || ih >= in_h || iw < 0 || iw >= in_w {
                                    continue;
                                }
                                let in_idx = n * g.in_channels * g.height * g.width
                                    + ic * g.height * g.width
                                    + ih as usize * g.width
                                    + iw as usize;
                                let w_idx = oc * g.in_channels * k * k + ic * k * k + kh * k + kw;
                                sum += input[in_idx] * weights[w_idx];
                            }
                        }
                    }
                    let out_idx = n * g.out_channels * out_h * out_w + oc * out_h * out_w + oh * out_w + ow;
                    output[out_idx] = sum;
                }
            }
        }
    }
}
