use std::fmt;

/// A 4D floating-point tensor stored as one contiguous buffer.
///
/// Layout is NCHW (batch, channels, height, width), row-major. Element
/// `(n, c, h, w)` lives at `n*C*H*W + c*H*W + h*W + w`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    pub n: usize,
    pub c: usize,
    pub h: usize,
    pub w: usize,
    data: Vec<f32>,
}

impl Tensor {
    /// Zero-filled tensor of the given shape.
    pub fn new(n: usize, c: usize, h: usize, w: usize) -> Self {
        Tensor::filled(n, c, h, w, 0.0)
    }

    pub fn filled(n: usize, c: usize, h: usize, w: usize, val: f32) -> Self {
        Tensor {
            n,
            c,
            h,
            w,
            data: vec![val; n * c * h * w],
        }
    }

    /// Wrap an existing buffer. Returns `None` if the length does not match the shape.
    pub fn from_vec(n: usize, c: usize, h: usize, w: usize, data: Vec<f32>) -> Option<Self> {
        if data.len() != n * c * h * w {
            return None;
        }
        Some(Tensor { n, c, h, w, data })
    }

    pub fn empty() -> Self {
        Tensor::new(0, 0, 0, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn shape(&self) -> [usize; 4] {
        [self.n, self.c, self.h, self.w]
    }

    #[inline]
    pub fn index(&self, n: usize, c: usize, h: usize, w: usize) -> usize {
        n * self.c * self.h * self.w + c * self.h * self.w + h * self.w + w
    }

    /// Flat index of `(n, c, h, w)`, or `None` if any coordinate is out of range.
    pub fn checked_index(&self, n: usize, c: usize, h: usize, w: usize) -> Option<usize> {
        (n < self.n && c < self.c && h < self.h && w < self.w).then(|| self.index(n, c, h, w))
    }

    pub fn get_checked(&self, n: usize, c: usize, h: usize, w: usize) -> Option<f32> {
        self.checked_index(n, c, h, w).map(|i| self.data[i])
    }

    pub fn fill(&mut self, val: f32) {
        self.data.fill(val);
    }

    #[inline]
    pub fn get(&self, n: usize, c: usize, h: usize, w: usize) -> f32 {
        self.data[self.index(n, c, h, w)]
    }

    #[inline]
    pub fn set(&mut self, n: usize, c: usize, h: usize, w: usize, val: f32) {
        let idx = self.index(n, c, h, w);
        self.data[idx] = val;
    }

    /// `self[n, c, h, w] += val`
    #[inline]
    pub fn add(&mut self, n: usize, c: usize, h: usize, w: usize, val: f32) {
        let idx = self.index(n, c, h, w);
        self.data[idx] += val;
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Number of elements that are not exactly zero.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0.0).count()
    }

    /// Largest absolute element-wise difference. Shapes must match.
    pub fn max_abs_diff(&self, other: &Tensor) -> f32 {
        assert_eq!(self.shape(), other.shape(), "tensor shapes differ");
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max)
    }

    /// Copy with `pad` zeros added on every side of the spatial dimensions.
    pub fn padded(&self, pad: usize) -> Tensor {
        if pad == 0 {
            return self.clone();
        }
        let mut out = Tensor::new(self.n, self.c, self.h + 2 * pad, self.w + 2 * pad);
        for n in 0..self.n {
            for c in 0..self.c {
                for h in 0..self.h {
                    let src = self.index(n, c, h, 0);
                    let dst = out.index(n, c, h + pad, pad);
                    out.data[dst..dst + self.w].copy_from_slice(&self.data[src..src + self.w]);
                }
            }
        }
        out
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}x{}", self.n, self.c, self.h, self.w)
    }
}
