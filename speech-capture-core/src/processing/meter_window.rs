/// Fixed-capacity window over the most recent live samples.
///
/// The capture callback pushes every delivered block; old samples are
/// overwritten so the window always holds the newest `capacity` samples.
/// The meter loop snapshots via [`latest`](Self::latest) without
/// consuming, so writer and reader never contend over ownership. Wrap in
/// `Arc<parking_lot::Mutex<_>>` for cross-thread use.
#[derive(Debug)]
pub struct MeterWindow {
    buffer: Vec<f32>,
    write_index: usize,
    filled: usize,
}

impl MeterWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            write_index: 0,
            filled: 0,
        }
    }

    /// Push samples, overwriting the oldest when the window is full.
    pub fn push(&mut self, samples: &[f32]) {
        let capacity = self.buffer.len();

        // Only the tail can survive anyway.
        let samples = if samples.len() > capacity {
            &samples[samples.len() - capacity..]
        } else {
            samples
        };

        for &sample in samples {
            self.buffer[self.write_index] = sample;
            self.write_index = (self.write_index + 1) % capacity;
        }
        self.filled = (self.filled + samples.len()).min(capacity);
    }

    /// Snapshot up to `count` most recent samples, oldest first.
    pub fn latest(&self, count: usize) -> Vec<f32> {
        let capacity = self.buffer.len();
        let take = count.min(self.filled);
        (0..take)
            .map(|i| self.buffer[(self.write_index + capacity - take + i) % capacity])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn clear(&mut self) {
        self.write_index = 0;
        self.filled = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_returns_newest_oldest_first() {
        let mut window = MeterWindow::new(8);
        window.push(&[1.0, 2.0, 3.0, 4.0]);

        assert_eq!(window.latest(2), vec![3.0, 4.0]);
        assert_eq!(window.latest(4), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn latest_caps_at_fill_level() {
        let mut window = MeterWindow::new(8);
        window.push(&[1.0, 2.0]);
        assert_eq!(window.latest(8), vec![1.0, 2.0]);
    }

    #[test]
    fn overwrites_oldest_when_full() {
        let mut window = MeterWindow::new(4);
        window.push(&[1.0, 2.0, 3.0, 4.0]);
        window.push(&[5.0, 6.0]);

        assert_eq!(window.len(), 4);
        assert_eq!(window.latest(4), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn push_larger_than_capacity_keeps_tail() {
        let mut window = MeterWindow::new(3);
        window.push(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(window.latest(3), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn wraparound_across_pushes() {
        let mut window = MeterWindow::new(4);
        window.push(&[1.0, 2.0, 3.0]);
        window.push(&[4.0, 5.0, 6.0]);

        assert_eq!(window.latest(4), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn clear_empties_the_window() {
        let mut window = MeterWindow::new(4);
        window.push(&[1.0, 2.0]);
        window.clear();

        assert!(window.is_empty());
        assert!(window.latest(4).is_empty());
    }

    #[test]
    fn empty_operations() {
        let mut window = MeterWindow::new(4);
        assert!(window.latest(4).is_empty());
        window.push(&[]);
        assert!(window.is_empty());
    }
}
