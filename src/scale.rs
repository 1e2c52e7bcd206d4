//! Positional scales, modelled on d3's `scaleLinear` and `scaleBand`.

/// Maps a continuous domain onto a continuous range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Not clamped. A degenerate domain maps everything to the middle of
    /// the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 == d0 {
            0.5
        } else {
            (value - d0) / (d1 - d0)
        };
        r0 + t * (r1 - r0)
    }
}

/// Splits a range into equal bands, one per domain value.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale<T> {
    domain: Vec<T>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl<T: PartialEq> BandScale<T> {
    /// Bands are separated by `padding_inner` × step; there is no outer
    /// padding.
    pub fn new(domain: Vec<T>, range: (f64, f64), padding_inner: f64) -> Self {
        let padding_inner = padding_inner.clamp(0.0, 1.0);
        let n = domain.len() as f64;
        let (start, stop) = range;
        let step = (stop - start) / (n - padding_inner).max(1.0);
        Self {
            domain,
            start,
            step,
            bandwidth: step * (1.0 - padding_inner),
        }
    }

    /// Leading edge of the band of `value`.
    pub fn position(&self, value: &T) -> Option<f64> {
        self.domain
            .iter()
            .position(|v| v == value)
            .map(|i| self.start + self.step * i as f64)
    }

    pub fn center(&self, value: &T) -> Option<f64> {
        self.position(value).map(|p| p + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &[T] {
        &self.domain
    }

    /// Domain value whose band contains `coordinate`; the padding between
    /// bands belongs to no value.
    pub fn invert(&self, coordinate: f64) -> Option<&T> {
        let offset = coordinate - self.start;
        if offset < 0.0 || self.step <= 0.0 {
            return None;
        }
        let index = (offset / self.step).floor() as usize;
        let inside = offset - index as f64 * self.step <= self.bandwidth;
        self.domain.get(index).filter(|_| inside)
    }
}
