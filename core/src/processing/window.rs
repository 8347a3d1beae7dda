/// Fixed-capacity circular window with a running sum.
pub struct RingWindow {
    slots: Vec<f64>,
    capacity: usize,
    count: usize,
    sum: f64,
}

impl RingWindow {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            count: 0,
            sum: 0.0,
        }
    }

    /// Overwrites the oldest slot and returns the mean of the filled slots.
    pub fn push(&mut self, value: f64) -> f64 {
        let pos = self.count % self.capacity;
        if pos < self.slots.len() {
            self.sum -= self.slots[pos];
            self.slots[pos] = value;
        } else {
            self.slots.push(value);
        }
        self.sum += value;
        self.count += 1;
        self.mean()
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count.min(self.capacity) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_covers_partial_then_full_window() {
        let mut window = RingWindow::with_capacity(3);
        assert_eq!(window.push(3.0), 3.0);
        assert_eq!(window.push(6.0), 4.5);
        assert_eq!(window.push(9.0), 6.0);
        assert_eq!(window.push(12.0), 9.0);
        assert_eq!(window.slots.len(), 3);
    }

    #[test]
    fn zero_capacity_behaves_as_one() {
        let mut window = RingWindow::with_capacity(0);
        assert_eq!(window.push(2.0), 2.0);
        assert_eq!(window.push(0.0), 0.0);
    }
}
