use std::fmt;

use rand::Rng;

/// Row-major integer matrix.
///
/// Integer entries keep every multiplication variant bit-exact against the
/// naive product, so correctness checks compare with `==`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<i64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<i64>) -> Self {
        assert_eq!(data.len(), rows * cols, "matrix data length does not match {rows}x{cols}");
        Matrix { rows, cols, data }
    }

    /// Entries drawn uniformly from `0..max`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, max: i64, rng: &mut R) -> Self {
        let data = (0..rows * cols).map(|_| rng.gen_range(0..max)).collect();
        Matrix { rows, cols, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Matrix::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1);
        }
        m
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> i64 {
        self.data[r * self.cols + c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, val: i64) {
        self.data[r * self.cols + c] = val;
    }

    pub fn data(&self) -> &[i64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [i64] {
        &mut self.data
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn transpose(&self) -> Matrix {
        let mut t = Matrix::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                t.set(c, r, self.get(r, c));
            }
        }
        t
    }

    /// Element-wise sum. Panics on a shape mismatch.
    pub fn add(&self, other: &Matrix) -> Matrix {
        self.zip_with(other, "add", |a, b| a + b)
    }

    /// Element-wise difference. Panics on a shape mismatch.
    pub fn sub(&self, other: &Matrix) -> Matrix {
        self.zip_with(other, "subtract", |a, b| a - b)
    }

    fn zip_with(&self, other: &Matrix, op: &str, f: impl Fn(i64, i64) -> i64) -> Matrix {
        assert!(
            self.rows == other.rows && self.cols == other.cols,
            "cannot {op} {}x{} and {}x{}",
            self.rows,
            self.cols,
            other.rows,
            other.cols
        );
        let data = self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect();
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    /// Copy of the `rows x cols` block starting at `(r0, c0)`.
    pub fn block(&self, r0: usize, c0: usize, rows: usize, cols: usize) -> Matrix {
        assert!(r0 + rows <= self.rows && c0 + cols <= self.cols, "block out of range");
        let mut out = Matrix::zeros(rows, cols);
        for r in 0..rows {
            let src = (r0 + r) * self.cols + c0;
            out.data[r * cols..(r + 1) * cols].copy_from_slice(&self.data[src..src + cols]);
        }
        out
    }

    /// Write `src` into this matrix with its top-left corner at `(r0, c0)`.
    pub fn put_block(&mut self, r0: usize, c0: usize, src: &Matrix) {
        assert!(r0 + src.rows <= self.rows && c0 + src.cols <= self.cols, "block out of range");
        for r in 0..src.rows {
            let dst = (r0 + r) * self.cols + c0;
            self.data[dst..dst + src.cols].copy_from_slice(&src.data[r * src.cols..(r + 1) * src.cols]);
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
