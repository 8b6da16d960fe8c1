//! # Windowed Shuffle

use rand::Rng;

/// Cap on the initial buffer allocation; the buffer grows on demand.
const MAX_INITIAL_CAPACITY: usize = 1024;

/// Approximate shuffle through a bounded buffer.
///
/// The buffer is filled with up to `buffer_size` upstream items; each step
/// emits a uniformly chosen buffered item, and refills from upstream.
/// A `buffer_size` of `0` or `1` preserves upstream order.
#[derive(Debug, Clone)]
pub struct ShuffleBuffer<I: Iterator, R: Rng> {
    inner: I,
    buffer: Vec<I::Item>,
    buffer_size: usize,
    rng: R,
}

impl<I: Iterator, R: Rng> ShuffleBuffer<I, R> {
    /// Create a new shuffle buffer.
    ///
    /// ## Arguments
    /// * `inner` - the upstream iterator.
    /// * `buffer_size` - the shuffle window.
    /// * `rng` - the generator driving selection.
    pub fn new(
        inner: I,
        buffer_size: usize,
        rng: R,
    ) -> Self {
        let buffer_size = buffer_size.max(1);
        Self {
            inner,
            buffer: Vec::with_capacity(buffer_size.min(MAX_INITIAL_CAPACITY)),
            buffer_size,
            rng,
        }
    }
}

impl<I: Iterator, R: Rng> Iterator for ShuffleBuffer<I, R> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        while self.buffer.len() < self.buffer_size {
            match self.inner.next() {
                Some(item) => self.buffer.push(item),
                None => break,
            }
        }

        match self.buffer.len() {
            0 => None,
            1 => self.buffer.pop(),
            n => {
                let idx = self.rng.random_range(0..n);
                Some(self.buffer.swap_remove(idx))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.inner.size_hint();
        let n = self.buffer.len();
        (
            lo.saturating_add(n),
            hi.and_then(|hi| hi.checked_add(n)),
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn test_small_buffer_preserves_order() {
        for size in [0, 1] {
            let out: Vec<u32> =
                ShuffleBuffer::new(0..10u32, size, ChaCha8Rng::seed_from_u64(0)).collect();
            assert_eq!(out, (0..10).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let out: Vec<u32> =
            ShuffleBuffer::new(0..100u32, 16, ChaCha8Rng::seed_from_u64(1)).collect();
        assert_eq!(out.len(), 100);
        assert_ne!(out, (0..100).collect::<Vec<_>>());

        let mut sorted = out.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..100).collect::<Vec<_>>());

        let again: Vec<u32> =
            ShuffleBuffer::new(0..100u32, 16, ChaCha8Rng::seed_from_u64(1)).collect();
        assert_eq!(out, again);
    }

    #[test]
    fn test_window_bounds_displacement() {
        // An item cannot be emitted before the window has reached it.
        let size = 4;
        let out: Vec<usize> =
            ShuffleBuffer::new(0..50usize, size, ChaCha8Rng::seed_from_u64(2)).collect();
        for (pos, &item) in out.iter().enumerate() {
            assert!(item < pos + size);
        }
    }
}
