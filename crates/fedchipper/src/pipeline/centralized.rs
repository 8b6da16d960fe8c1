//! # Centralized Datasets
//!
//! Pooled train, validation, and test batch streams.
//!
//! ```text
//! train      = all train clients, pooled
//! validation = pooled test records [..num_validation_examples]
//! test       = pooled test records [num_validation_examples..]
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    batching::InputTargetBatch,
    errors::{FCResult, invalid_option},
    pipeline::{PreprocessOptions, PreprocessPipeline},
    records::ClientData,
    types::TokenType,
    vocab::VocabIndex,
};

/// Options for [`CentralizedDatasets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralizedDatasetOptions {
    /// The number of most frequent words kept; must be positive.
    pub vocab_size: i64,

    /// Sentence truncation / batch padding length.
    pub max_sequence_length: i64,

    /// The number of oov buckets.
    pub num_oov_buckets: i64,

    /// The train batch size.
    pub train_batch_size: i64,

    /// The validation batch size.
    pub validation_batch_size: i64,

    /// The test batch size.
    pub test_batch_size: i64,

    /// The number of pooled test records held out for validation.
    pub num_validation_examples: i64,

    /// The train shuffle buffer size.
    pub train_shuffle_buffer_size: i64,

    /// The validation shuffle buffer size.
    pub validation_shuffle_buffer_size: i64,

    /// The test shuffle buffer size.
    pub test_shuffle_buffer_size: i64,

    /// Pin the shuffle generator seed.
    pub shuffle_seed: Option<u64>,
}

impl Default for CentralizedDatasetOptions {
    fn default() -> Self {
        Self {
            vocab_size: 10_000,
            max_sequence_length: 20,
            num_oov_buckets: 1,
            train_batch_size: 16,
            validation_batch_size: 100,
            test_batch_size: 100,
            num_validation_examples: 10_000,
            train_shuffle_buffer_size: 10_000,
            validation_shuffle_buffer_size: 1,
            test_shuffle_buffer_size: 1,
            shuffle_seed: None,
        }
    }
}

impl CentralizedDatasetOptions {
    /// Sets the vocab size.
    pub fn with_vocab_size(
        self,
        vocab_size: i64,
    ) -> Self {
        Self { vocab_size, ..self }
    }

    /// Sets the max sequence length.
    pub fn with_max_sequence_length(
        self,
        max_sequence_length: i64,
    ) -> Self {
        Self {
            max_sequence_length,
            ..self
        }
    }

    /// Sets the train, validation, and test batch sizes.
    pub fn with_batch_sizes(
        self,
        train_batch_size: i64,
        validation_batch_size: i64,
        test_batch_size: i64,
    ) -> Self {
        Self {
            train_batch_size,
            validation_batch_size,
            test_batch_size,
            ..self
        }
    }

    /// Sets the number of validation examples.
    pub fn with_num_validation_examples(
        self,
        num_validation_examples: i64,
    ) -> Self {
        Self {
            num_validation_examples,
            ..self
        }
    }

    /// Sets the shuffle seed.
    pub fn with_shuffle_seed<S: Into<Option<u64>>>(
        self,
        shuffle_seed: S,
    ) -> Self {
        Self {
            shuffle_seed: shuffle_seed.into(),
            ..self
        }
    }

    fn split_options(
        &self,
        batch_size: i64,
        shuffle_buffer_size: i64,
    ) -> PreprocessOptions {
        PreprocessOptions {
            client_batch_size: batch_size,
            client_epochs_per_round: 1,
            max_sequence_length: self.max_sequence_length,
            max_elements_per_client: -1,
            num_oov_buckets: self.num_oov_buckets,
            max_shuffle_buffer_size: shuffle_buffer_size,
            shuffle_seed: self.shuffle_seed,
        }
    }

    /// The options of the train stream.
    pub fn train_options(&self) -> PreprocessOptions {
        self.split_options(self.train_batch_size, self.train_shuffle_buffer_size)
    }

    /// The options of the validation stream.
    pub fn validation_options(&self) -> PreprocessOptions {
        self.split_options(
            self.validation_batch_size,
            self.validation_shuffle_buffer_size,
        )
    }

    /// The options of the test stream.
    pub fn test_options(&self) -> PreprocessOptions {
        self.split_options(self.test_batch_size, self.test_shuffle_buffer_size)
    }
}

/// Centralized train, validation, and test datasets sharing one vocabulary.
#[derive(Debug, Clone)]
pub struct CentralizedDatasets<T: TokenType, D: ClientData> {
    train: D,
    test: D,
    num_validation_examples: usize,
    train_pipeline: PreprocessPipeline<T>,
    validation_pipeline: PreprocessPipeline<T>,
    test_pipeline: PreprocessPipeline<T>,
}

impl<T: TokenType, D: ClientData> CentralizedDatasets<T, D> {
    /// Assemble centralized datasets.
    ///
    /// ## Arguments
    /// * `train` - the train client data; pooled across clients.
    /// * `test` - the test client data; pooled, then split into validation and test.
    /// * `ranked_words` - the vocabulary source, most frequent first.
    /// * `options` - the dataset options.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(train, test, ranked_words))
    )]
    pub fn new<W, S>(
        train: D,
        test: D,
        ranked_words: W,
        options: &CentralizedDatasetOptions,
    ) -> FCResult<Self>
    where
        W: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if options.vocab_size <= 0 {
            return invalid_option("vocab_size", "a positive integer", options.vocab_size);
        }
        if options.num_validation_examples < 0 {
            return invalid_option(
                "num_validation_examples",
                "a non-negative integer",
                options.num_validation_examples,
            );
        }

        let train_config = options.train_options().validate()?;
        let validation_config = options.validation_options().validate()?;
        let test_config = options.test_options().validate()?;

        let vocab = Arc::new(VocabIndex::from_top_words(
            ranked_words,
            options.vocab_size as usize,
            train_config.num_oov_buckets(),
        )?);

        Ok(Self {
            train,
            test,
            num_validation_examples: options.num_validation_examples as usize,
            train_pipeline: PreprocessPipeline::new(vocab.clone(), train_config)?,
            validation_pipeline: PreprocessPipeline::new(vocab.clone(), validation_config)?,
            test_pipeline: PreprocessPipeline::new(vocab, test_config)?,
        })
    }

    /// The shared vocabulary.
    pub fn vocab(&self) -> &Arc<VocabIndex<T>> {
        self.train_pipeline.tokenizer().vocab()
    }

    /// The number of pooled test records held out for validation.
    pub fn num_validation_examples(&self) -> usize {
        self.num_validation_examples
    }

    /// Lazily preprocess all train records.
    pub fn train_batches<'a>(
        &'a self
    ) -> FCResult<impl Iterator<Item = InputTargetBatch<T>> + use<'a, T, D>> {
        Ok(self.train_pipeline.preprocess(self.train.pooled_records()?))
    }

    /// Lazily preprocess the first `num_validation_examples` pooled test records.
    pub fn validation_batches<'a>(
        &'a self
    ) -> FCResult<impl Iterator<Item = InputTargetBatch<T>> + use<'a, T, D>> {
        let records = self
            .test
            .pooled_records()?
            .take(self.num_validation_examples);
        Ok(self.validation_pipeline.preprocess(records))
    }

    /// Lazily preprocess the pooled test records after the validation split.
    pub fn test_batches<'a>(
        &'a self
    ) -> FCResult<impl Iterator<Item = InputTargetBatch<T>> + use<'a, T, D>> {
        let records = self
            .test
            .pooled_records()?
            .skip(self.num_validation_examples);
        Ok(self.test_pipeline.preprocess(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::FedchipperError,
        records::{ClientRecord, InMemoryClientData},
    };

    fn client_data(sentences: &[(&str, &str)]) -> InMemoryClientData {
        InMemoryClientData::from_pairs(
            sentences
                .iter()
                .enumerate()
                .map(|(i, (id, s))| (*id, ClientRecord::new(*s, format!("d{i}")))),
        )
    }

    fn rows(batches: impl Iterator<Item = InputTargetBatch<u32>>) -> Vec<Vec<u32>> {
        batches.flat_map(|b| b.input.to_nested_vec()).collect()
    }

    #[test]
    fn test_centralized_datasets() {
        let train = client_data(&[("x", "a"), ("y", "b"), ("x", "c")]);
        let test = client_data(&[("p", "a"), ("q", "b"), ("p", "c"), ("q", "a b")]);
        let options = CentralizedDatasetOptions::default()
            .with_vocab_size(3)
            .with_max_sequence_length(3)
            .with_batch_sizes(2, 2, 2)
            .with_num_validation_examples(3);

        let datasets = CentralizedDatasets::<u32, _>::new(train, test, ["a", "b", "c"], &options)
            .unwrap();
        assert_eq!(datasets.vocab().len(), 3);

        let mut train_rows = rows(datasets.train_batches().unwrap());
        train_rows.sort();
        assert_eq!(
            train_rows,
            vec![vec![5, 1, 6], vec![5, 2, 6], vec![5, 3, 6]]
        );

        // Pooled test order: p = [a, c]; q = [b, a b].
        assert_eq!(
            rows(datasets.validation_batches().unwrap()),
            vec![vec![5, 1, 6], vec![5, 3, 6], vec![5, 2, 6]]
        );
        assert_eq!(rows(datasets.test_batches().unwrap()), vec![vec![5, 1, 2]]);
    }

    #[test]
    fn test_validation_exceeds_test_records() {
        let train = client_data(&[("x", "a")]);
        let test = client_data(&[("p", "a"), ("p", "b")]);
        let datasets = CentralizedDatasets::<u32, _>::new(
            train,
            test,
            ["a", "b"],
            &CentralizedDatasetOptions::default().with_vocab_size(2),
        )
        .unwrap();

        assert_eq!(datasets.num_validation_examples(), 10_000);
        assert_eq!(datasets.validation_batches().unwrap().count(), 1);
        assert_eq!(datasets.test_batches().unwrap().count(), 0);
    }

    #[test]
    fn test_rejects_invalid_options() {
        let build = |options: CentralizedDatasetOptions| {
            CentralizedDatasets::<u32, _>::new(
                client_data(&[("x", "a")]),
                client_data(&[("p", "a")]),
                ["a"],
                &options,
            )
        };

        assert!(matches!(
            build(CentralizedDatasetOptions::default().with_vocab_size(-1)),
            Err(FedchipperError::InvalidOption {
                name: "vocab_size",
                ..
            })
        ));
        assert!(matches!(
            build(CentralizedDatasetOptions::default().with_num_validation_examples(-1)),
            Err(FedchipperError::InvalidOption {
                name: "num_validation_examples",
                ..
            })
        ));
        assert!(matches!(
            build(CentralizedDatasetOptions::default().with_batch_sizes(16, 0, 100)),
            Err(FedchipperError::InvalidOption {
                name: "client_batch_size",
                ..
            })
        ));
    }
}
