//! Rate window - fixed-capacity circular buffer with a running sum
//!
//! The average is O(1) per update: when the oldest slot is overwritten its
//! value leaves the sum before the new one enters.

/// Circular buffer of the most recent rate samples
#[derive(Clone, Debug)]
pub struct RateWindow {
    values: Vec<f32>,
    /// Running sum of the occupied slots, widened to bound drift
    sum: f64,
    /// Occupied slots (saturates at capacity)
    count: usize,
    /// Next slot to write
    write_index: usize,
}

impl RateWindow {
    /// Window holding `capacity` samples (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            values: vec![0.0; capacity.max(1)],
            sum: 0.0,
            count: 0,
            write_index: 0,
        }
    }

    /// Push a sample, replacing the oldest once full
    pub fn push(&mut self, value: f32) {
        if self.count < self.values.len() {
            self.count += 1;
        } else {
            self.sum -= self.values[self.write_index] as f64;
        }
        self.values[self.write_index] = value;
        self.sum += value as f64;
        self.write_index = (self.write_index + 1) % self.values.len();
    }

    /// Mean of the samples held (0 when empty)
    pub fn average(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            (self.sum / self.count as f64) as f32
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Whether the window has wrapped at least once
    pub fn is_full(&self) -> bool {
        self.count == self.values.len()
    }

    /// Samples in chronological order, oldest first
    pub fn iter_chronological(&self) -> impl Iterator<Item = f32> + '_ {
        let cap = self.values.len();
        let start = if self.is_full() { self.write_index } else { 0 };
        (0..self.count).map(move |i| self.values[(start + i) % cap])
    }

    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0.0);
        self.sum = 0.0;
        self.count = 0;
        self.write_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_average_is_zero() {
        let w = RateWindow::new(5);
        assert_eq!(w.average(), 0.0);
        assert!(w.is_empty());
    }

    #[test]
    fn test_partial_fill() {
        let mut w = RateWindow::new(5);
        w.push(100.0);
        w.push(110.0);
        assert_eq!(w.len(), 2);
        assert!((w.average() - 105.0).abs() < 1e-4);
        assert!(!w.is_full());
    }

    #[test]
    fn test_overwrites_oldest() {
        let mut w = RateWindow::new(3);
        for v in [10.0, 20.0, 30.0, 40.0] {
            w.push(v);
        }
        assert!(w.is_full());
        assert_eq!(w.iter_chronological().collect::<Vec<_>>(), vec![20.0, 30.0, 40.0]);
        assert!((w.average() - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut w = RateWindow::new(0);
        w.push(5.0);
        w.push(7.0);
        assert_eq!(w.capacity(), 1);
        assert_eq!(w.average(), 7.0);
    }

    proptest! {
        #[test]
        fn prop_average_matches_naive_tail(
            capacity in 1usize..20,
            rates in prop::collection::vec(40.0f32..200.0, 1..200)
        ) {
            let mut w = RateWindow::new(capacity);
            for r in &rates {
                w.push(*r);
            }
            let tail = &rates[rates.len().saturating_sub(capacity)..];
            let naive = tail.iter().map(|v| *v as f64).sum::<f64>() / tail.len() as f64;
            prop_assert!((w.average() as f64 - naive).abs() < 1e-3);
            prop_assert_eq!(w.iter_chronological().collect::<Vec<_>>(), tail.to_vec());
        }
    }
}
