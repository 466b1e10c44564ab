/// Fixed-capacity sample window with overwrite-oldest eviction.
///
/// The buffer is pre-filled at construction, so its length is always exactly
/// the capacity and a fresh snapshot is immediately plottable. The producer
/// is the only writer; readers take an owned chronological copy via
/// [`RingBuffer::snapshot`] and never alias the live storage.
pub struct RingBuffer<T> {
    data: Vec<T>,
    /// Index of the oldest element, which is also the next write slot.
    head: usize,
}

impl<T: Clone> RingBuffer<T> {
    pub fn new(capacity: usize, fill: T) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be non-zero");
        Self {
            data: vec![fill; capacity],
            head: 0,
        }
    }

    /// Appends `value`, dropping the oldest element. O(1), never fails.
    pub fn push(&mut self, value: T) {
        self.data[self.head] = value;
        self.head = (self.head + 1) % self.data.len();
    }

    /// Owned copy of the contents, oldest first. Length equals capacity.
    pub fn snapshot(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.data.len());
        out.extend_from_slice(&self.data[self.head..]);
        out.extend_from_slice(&self.data[..self.head]);
        out
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_starts_prefilled() {
        let ring = RingBuffer::new(4, 0u16);
        assert_eq!(ring.snapshot(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn snapshot_is_chronological_after_partial_fill() {
        let mut ring = RingBuffer::new(4, 0u16);
        ring.push(1);
        ring.push(2);
        assert_eq!(ring.snapshot(), vec![0, 0, 1, 2]);
    }

    #[test]
    fn push_beyond_capacity_keeps_last_n_in_order() {
        let mut ring = RingBuffer::new(4, 0u16);
        for v in 1..=10 {
            ring.push(v);
        }
        assert_eq!(ring.snapshot(), vec![7, 8, 9, 10]);
    }

    #[test]
    fn snapshot_length_always_equals_capacity() {
        let mut ring = RingBuffer::new(7, 0u16);
        for v in 0..23 {
            assert_eq!(ring.snapshot().len(), 7);
            ring.push(v);
        }
        assert_eq!(ring.snapshot().len(), 7);
    }

    #[test]
    fn snapshot_is_independent_of_later_pushes() {
        let mut ring = RingBuffer::new(3, 0u16);
        ring.push(1);
        let snap = ring.snapshot();
        ring.push(2);
        ring.push(3);
        assert_eq!(snap, vec![0, 0, 1]);
    }
}
