//! The random-source seam used by the simulator.

/// A source of uniform floats in `[0.0, 1.0)`.
///
/// Production wiring uses [`RngManager`](super::RngManager); tests can use
/// [`SequenceSource`] to script the exact values a tick will see.
pub trait RandomSource {
    /// Next uniform value in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform draw in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform index in `0..len`. Returns 0 when `len == 0`.
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let scaled = (self.next_f64() * len as f64).floor();
        if scaled.is_finite() && scaled > 0.0 {
            (scaled as usize).min(len - 1)
        } else {
            0
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Replays a fixed list of values, wrapping around at the end.
///
/// Values outside `[0.0, 1.0)` are clamped into range so a script can never
/// push a draw out of its documented interval.
///
/// # Example
/// ```
/// use covenant_guard_core::rng::{RandomSource, SequenceSource};
///
/// let mut source = SequenceSource::new(vec![0.25, 0.75]);
/// assert_eq!(source.next_f64(), 0.25);
/// assert_eq!(source.next_f64(), 0.75);
/// assert_eq!(source.next_f64(), 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    position: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            position: 0,
        }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.position
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        if value.is_nan() || value < 0.0 {
            0.0
        } else if value >= 1.0 {
            1.0 - f64::EPSILON
        } else {
            value
        }
    }
}
