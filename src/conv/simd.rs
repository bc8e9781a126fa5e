/// SIMD micro-kernel with NEON acceleration and a scalar fallback.

// ── FP32 AXPY: c[c_off..] += a_val * b[b_off..] ──

#[cfg(all(target_arch = "aarch64", feature = "simd"))]
pub fn axpy_f32(c: &mut [f32], c_off: usize, b: &[f32], b_off: usize, a_val: f32, len: usize) {
    use core::arch::aarch64::*;
    assert!(c_off + len <= c.len() && b_off + len <= b.len(), "axpy_f32 out of bounds");
    let mut j = 0usize;
    // SAFETY: the assert above keeps every 4-lane load/store inside both slices.
    unsafe {
        let a_vec = vdupq_n_f32(a_val);
        while j + 4 <= len {
            let b_vec = vld1q_f32(b.as_ptr().add(b_off + j));
            let c_vec = vld1q_f32(c.as_ptr().add(c_off + j));
            let r = vfmaq_f32(c_vec, a_vec, b_vec);
            vst1q_f32(c.as_mut_ptr().add(c_off + j), r);
            j += 4;
        }
    }
    // scalar tail
    while j < len {
        c[c_off + j] += a_val * b[b_off + j];
        j += 1;
    }
}

#[cfg(not(all(target_arch = "aarch64", feature = "simd")))]
pub fn axpy_f32(c: &mut [f32], c_off: usize, b: &[f32], b_off: usize, a_val: f32, len: usize) {
    let c = &mut c[c_off..c_off + len];
    let b = &b[b_off..b_off + len];
    for (cj, bj) in c.iter_mut().zip(b) {
        *cj += a_val * bj;
    }
}
