/// Loop-order, transposition, unrolling and tiling variants of `C = A * B`.
///
/// Every kernel overwrites `c`. Shapes are checked by the dispatcher.

use super::Matrix;

/// Textbook i-j-k order. The inner loop strides down a column of B.
pub fn matmul_ijk(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    let (m, n, k) = (a.rows, b.cols, a.cols);
    let (a, b) = (a.data(), b.data());
    let c = c.data_mut();
    for i in 0..m {
        for j in 0..n {
            let mut sum = 0i64;
            for p in 0..k {
                sum += a[i * k + p] * b[p * n + j];
            }
            c[i * n + j] = sum;
        }
    }
}

/// i-k-j order: the inner loop walks rows of both B and C.
pub fn matmul_ikj(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    let (m, n, k) = (a.rows, b.cols, a.cols);
    let (a, b) = (a.data(), b.data());
    let c = c.data_mut();
    c.fill(0);
    for i in 0..m {
        for p in 0..k {
            let a_val = a[i * k + p];
            let b_row = &b[p * n..(p + 1) * n];
            let c_row = &mut c[i * n..(i + 1) * n];
            for (cj, bj) in c_row.iter_mut().zip(b_row) {
                *cj += a_val * bj;
            }
        }
    }
}

/// i-j-k over a pre-transposed A (`at` is k x m).
pub fn matmul_at(at: &Matrix, b: &Matrix, c: &mut Matrix) {
    let (k, m, n) = (at.rows, at.cols, b.cols);
    let (at, b) = (at.data(), b.data());
    let c = c.data_mut();
    for i in 0..m {
        for j in 0..n {
            let mut sum = 0i64;
            for p in 0..k {
                sum += at[p * m + i] * b[p * n + j];
            }
            c[i * n + j] = sum;
        }
    }
}

/// i-j-k over a pre-transposed B (`bt` is n x k): both operands are read along rows.
pub fn matmul_bt(a: &Matrix, bt: &Matrix, c: &mut Matrix) {
    let (m, k, n) = (a.rows, a.cols, bt.rows);
    let (a, bt) = (a.data(), bt.data());
    let c = c.data_mut();
    for i in 0..m {
        let a_row = &a[i * k..(i + 1) * k];
        for j in 0..n {
            let bt_row = &bt[j * k..(j + 1) * k];
            c[i * n + j] = a_row.iter().zip(bt_row).map(|(x, y)| x * y).sum();
        }
    }
}

/// i-j-k with the k loop unrolled 8 ways, plus a scalar tail.
pub fn matmul_unrolled(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    let (m, n, k) = (a.rows, b.cols, a.cols);
    let (a, b) = (a.data(), b.data());
    let c = c.data_mut();
    let k8 = k - k % 8;
    for i in 0..m {
        let a_row = i * k;
        for j in 0..n {
            let mut sum = 0i64;
            let mut p = 0;
            while p < k8 {
                sum += a[a_row + p] * b[p * n + j];
                sum += a[a_row + p + 1] * b[(p + 1) * n + j];
                sum += a[a_row + p + 2] * b[(p + 2) * n + j];
                sum += a[a_row + p + 3] * b[(p + 3) * n + j];
                sum += a[a_row + p + 4] * b[(p + 4) * n + j];
                sum += a[a_row + p + 5] * b[(p + 5) * n + j];
                sum += a[a_row + p + 6] * b[(p + 6) * n + j];
                sum += a[a_row + p + 7] * b[(p + 7) * n + j];
                p += 8;
            }
            while p < k {
                sum += a[a_row + p] * b[p * n + j];
                p += 1;
            }
            c[i * n + j] = sum;
        }
    }
}

/// Cache-blocked i-j-k with `tile x tile` blocks. Edge blocks are clipped.
pub fn matmul_tiled(a: &Matrix, b: &Matrix, c: &mut Matrix, tile: usize) {
    assert!(tile > 0, "tile size must be non-zero");
    let (m, n, k) = (a.rows, b.cols, a.cols);
    let (a, b) = (a.data(), b.data());
    let c = c.data_mut();
    c.fill(0);
    for ii in (0..m).step_by(tile) {
        let i_end = (ii + tile).min(m);
        for jj in (0..n).step_by(tile) {
            let j_end = (jj + tile).min(n);
            for kk in (0..k).step_by(tile) {
                let k_end = (kk + tile).min(k);
                for i in ii..i_end {
                    for j in jj..j_end {
                        let mut sum = 0i64;
                        for p in kk..k_end {
                            sum += a[i * k + p] * b[p * n + j];
                        }
                        c[i * n + j] += sum;
                    }
                }
            }
        }
    }
}
