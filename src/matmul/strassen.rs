/// Strassen's divide-and-conquer multiplication for square matrices.

use super::kernels::matmul_ijk;
use super::Matrix;

/// Below this size (or at odd sizes) the recursion switches to the i-j-k kernel.
pub const STRASSEN_CUTOFF: usize = 64;

/// `A * B` for square `n x n` operands using seven half-size products per level.
///
/// Panics if the operands are not square matrices of the same size.
pub fn strassen(a: &Matrix, b: &Matrix) -> Matrix {
    assert!(
        a.is_square() && b.is_square() && a.rows == b.rows,
        "strassen needs equal square operands, got {a} and {b}"
    );
    let n = a.rows;
    if n <= STRASSEN_CUTOFF || n % 2 == 1 {
        let mut c = Matrix::zeros(n, n);
        matmul_ijk(a, b, &mut c);
        return c;
    }

    let h = n / 2;
    let (a11, a12, a21, a22) = (a.block(0, 0, h, h), a.block(0, h, h, h), a.block(h, 0, h, h), a.block(h, h, h, h));
    let (b11, b12, b21, b22) = (b.block(0, 0, h, h), b.block(0, h, h, h), b.block(h, 0, h, h), b.block(h, h, h, h));

    let s1 = strassen(&a12.sub(&a22), &b21.add(&b22));
    let s2 = strassen(&a11.add(&a22), &b11.add(&b22));
    let s3 = strassen(&a11.sub(&a21), &b11.add(&b12));
    let s4 = strassen(&a11.add(&a12), &b22);
    let s5 = strassen(&a11, &b12.sub(&b22));
    let s6 = strassen(&a22, &b21.sub(&b11));
    let s7 = strassen(&a21.add(&a22), &b11);

    let mut c = Matrix::zeros(n, n);
    c.put_block(0, 0, &s1.add(&s2).sub(&s4).add(&s6));
    c.put_block(0, h, &s4.add(&s5));
    c.put_block(h, 0, &s6.add(&s7));
    c.put_block(h, h, &s2.sub(&s3).add(&s5).sub(&s7));
    c
}
