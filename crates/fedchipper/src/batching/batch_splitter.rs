//! # Batch Splitter
//!
//! Pads token sequences to `max_sequence_length + 1`, groups them into
//! batches, and splits each batch into next-token `(input, target)` pairs.

use core::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::{
    batching::TokenBatch,
    errors::{FCResult, invalid_option},
    tokenizer::TokenSequence,
    types::TokenType,
};

/// A teacher-forced language modeling batch.
///
/// Both arrays have shape `[rows, max_sequence_length]`;
/// `target` row `i` is `input` row `i` shifted left by one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTargetBatch<T: TokenType> {
    /// The model input tokens.
    pub input: TokenBatch<T>,

    /// The next-token targets.
    pub target: TokenBatch<T>,
}

impl<T: TokenType> InputTargetBatch<T> {
    /// The number of rows in the batch.
    pub fn num_rows(&self) -> usize {
        self.input.num_rows()
    }
}

/// Padded batch and `(input, target)` split policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSplitter {
    batch_size: usize,
    max_sequence_length: usize,
}

impl BatchSplitter {
    /// Create a new splitter.
    ///
    /// ## Arguments
    /// * `batch_size` - the max rows per batch; must be positive.
    /// * `max_sequence_length` - the `input`/`target` row width; must be positive.
    pub fn new(
        batch_size: usize,
        max_sequence_length: usize,
    ) -> FCResult<Self> {
        if batch_size == 0 {
            return invalid_option("client_batch_size", "a positive integer", 0);
        }
        if max_sequence_length == 0 {
            return invalid_option("max_sequence_length", "a positive integer", 0);
        }
        Ok(Self {
            batch_size,
            max_sequence_length,
        })
    }

    /// The max rows per batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// The `input`/`target` row width.
    pub fn max_sequence_length(&self) -> usize {
        self.max_sequence_length
    }

    /// The padded sequence width; `max_sequence_length + 1`.
    pub fn padded_width(&self) -> usize {
        self.max_sequence_length + 1
    }

    /// Right-pad (or truncate) a sequence with `0` to [`Self::padded_width`].
    pub fn pad_sequence<T: TokenType>(
        &self,
        tokens: &[T],
    ) -> Vec<T> {
        let width = self.padded_width();
        let mut row = Vec::with_capacity(width);
        row.extend(tokens.iter().take(width).copied());
        row.resize(width, T::zero());
        row
    }

    /// Pad and split one group of sequences.
    ///
    /// The group may hold fewer than `batch_size` sequences.
    pub fn split_batch<T: TokenType>(
        &self,
        sequences: &[TokenSequence<T>],
    ) -> InputTargetBatch<T> {
        let width = self.max_sequence_length;
        let mut input = TokenBatch::with_capacity(width, sequences.len());
        let mut target = TokenBatch::with_capacity(width, sequences.len());

        for tokens in sequences {
            let row = self.pad_sequence(tokens);
            input.push_row(&row[..width]);
            target.push_row(&row[1..]);
        }

        InputTargetBatch { input, target }
    }

    /// Lazily batch and split a sequence stream.
    ///
    /// The final batch may be short; no batch is dropped.
    pub fn split<I, T>(
        &self,
        sequences: I,
    ) -> SplitBatches<I::IntoIter, T>
    where
        I: IntoIterator<Item = TokenSequence<T>>,
        T: TokenType,
    {
        SplitBatches {
            inner: sequences.into_iter(),
            splitter: *self,
            _marker: PhantomData,
        }
    }
}

/// Iterator over [`InputTargetBatch`]es; see [`BatchSplitter::split`].
#[derive(Debug, Clone)]
pub struct SplitBatches<I, T>
where
    I: Iterator<Item = TokenSequence<T>>,
    T: TokenType,
{
    inner: I,
    splitter: BatchSplitter,
    _marker: PhantomData<T>,
}

impl<I, T> Iterator for SplitBatches<I, T>
where
    I: Iterator<Item = TokenSequence<T>>,
    T: TokenType,
{
    type Item = InputTargetBatch<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let group: Vec<TokenSequence<T>> = self
            .inner
            .by_ref()
            .take(self.splitter.batch_size)
            .collect();

        if group.is_empty() {
            None
        } else {
            Some(self.splitter.split_batch(&group))
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_split_batch() {
        let splitter = BatchSplitter::new(2, 3).unwrap();
        let batch = splitter.split_batch::<u32>(&[vec![5, 1, 4, 6], vec![5, 2, 6]]);

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(
            batch.input.to_nested_vec(),
            vec![vec![5, 1, 4], vec![5, 2, 6]]
        );
        assert_eq!(
            batch.target.to_nested_vec(),
            vec![vec![1, 4, 6], vec![2, 6, 0]]
        );
    }

    #[test]
    fn test_split_keeps_short_final_batch() {
        let splitter = BatchSplitter::new(2, 2).unwrap();
        let sequences: Vec<Vec<u32>> = vec![vec![9, 1, 10], vec![9, 2], vec![9, 3, 10]];

        let batches: Vec<_> = splitter.split(sequences).collect();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].input.shape(), [2, 2]);
        assert_eq!(batches[1].input.shape(), [1, 2]);
        assert_eq!(batches[1].target.to_nested_vec(), vec![vec![3, 10]]);

        let empty: Vec<Vec<u32>> = vec![];
        assert_eq!(splitter.split(empty).count(), 0);
    }

    #[test]
    fn test_invalid_splitter() {
        assert!(BatchSplitter::new(0, 3).is_err());
        assert!(BatchSplitter::new(3, 0).is_err());
    }

    proptest! {
        #[test]
        fn target_is_input_shifted(
            sequences in proptest::collection::vec(
                proptest::collection::vec(1..100u32, 1..6), 0..12),
            batch_size in 1..5usize,
        ) {
            let max_len = 5;
            let splitter = BatchSplitter::new(batch_size, max_len).unwrap();
            let total = sequences.len();

            let mut rows = 0;
            for batch in splitter.split(sequences) {
                prop_assert!(batch.num_rows() <= batch_size);
                prop_assert_eq!(batch.input.width(), max_len);
                prop_assert_eq!(batch.target.width(), max_len);
                for (input, target) in batch.input.rows().zip(batch.target.rows()) {
                    prop_assert_eq!(&input[1..], &target[..max_len - 1]);
                }
                rows += batch.num_rows();
            }
            prop_assert_eq!(rows, total);
        }
    }
}
