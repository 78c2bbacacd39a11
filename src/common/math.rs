//! Fixed-length sliding windows over ordered `f64` samples.

use std::collections::VecDeque;

/// Count-bounded sliding window.
///
/// Holds at most `capacity` of the most recent samples. Statistics are only
/// reported once the window is full, which is how warm-up periods are
/// expressed throughout the indicator engine.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a sample, evicting the oldest one when the window is full.
    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.values.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean of the window, `None` until full.
    pub fn mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.capacity as f64)
    }

    /// Sample (n-1) standard deviation, `None` until full or when `n < 2`.
    pub fn sample_std_dev(&self) -> Option<f64> {
        if !self.is_full() || self.capacity < 2 {
            return None;
        }
        let mean = self.mean()?;
        let sum_sq: f64 = self.values.iter().map(|v| (v - mean).powi(2)).sum();
        Some((sum_sq / (self.capacity - 1) as f64).sqrt())
    }
}

/// Keep a value only if it is a real number.
pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
