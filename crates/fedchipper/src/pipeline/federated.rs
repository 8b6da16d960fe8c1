//! # Federated Datasets
//!
//! Per-client train and test batch streams over client-partitioned data.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    batching::InputTargetBatch,
    errors::{FCResult, invalid_option},
    pipeline::{PreprocessOptions, PreprocessPipeline},
    records::{ClientData, TransformingClientData},
    secrets::SecretInsertingTransform,
    types::TokenType,
    vocab::VocabIndex,
};

/// Options for [`FederatedDatasets`].
///
/// Shuffle buffer sizes `<= 1` disable shuffling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FederatedDatasetOptions {
    /// The number of most frequent words kept; must be positive.
    pub vocab_size: i64,

    /// Sentence truncation / batch padding length.
    pub max_sequence_length: i64,

    /// The number of oov buckets.
    pub num_oov_buckets: i64,

    /// The batch size for all train clients.
    pub train_client_batch_size: i64,

    /// The batch size for all test clients.
    pub test_client_batch_size: i64,

    /// Epochs per round for train clients.
    pub train_client_epochs_per_round: i64,

    /// Epochs per round for test clients.
    pub test_client_epochs_per_round: i64,

    /// Max records per train client; `-1` keeps all.
    pub max_elements_per_train_client: i64,

    /// Max records per test client; `-1` keeps all.
    pub max_elements_per_test_client: i64,

    /// The shuffle buffer size for train clients.
    pub train_shuffle_buffer_size: i64,

    /// The shuffle buffer size for test clients.
    pub test_shuffle_buffer_size: i64,

    /// Pin the shuffle generator seed.
    pub shuffle_seed: Option<u64>,
}

impl Default for FederatedDatasetOptions {
    fn default() -> Self {
        Self {
            vocab_size: 10_000,
            max_sequence_length: 20,
            num_oov_buckets: 1,
            train_client_batch_size: 16,
            test_client_batch_size: 100,
            train_client_epochs_per_round: 1,
            test_client_epochs_per_round: 1,
            max_elements_per_train_client: 1000,
            max_elements_per_test_client: -1,
            train_shuffle_buffer_size: 10_000,
            test_shuffle_buffer_size: 1,
            shuffle_seed: None,
        }
    }
}

impl FederatedDatasetOptions {
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

    /// Sets the number of oov buckets.
    pub fn with_num_oov_buckets(
        self,
        num_oov_buckets: i64,
    ) -> Self {
        Self {
            num_oov_buckets,
            ..self
        }
    }

    /// Sets the train and test batch sizes.
    pub fn with_client_batch_sizes(
        self,
        train_client_batch_size: i64,
        test_client_batch_size: i64,
    ) -> Self {
        Self {
            train_client_batch_size,
            test_client_batch_size,
            ..self
        }
    }

    /// Sets the train and test epochs per round.
    pub fn with_client_epochs_per_round(
        self,
        train_client_epochs_per_round: i64,
        test_client_epochs_per_round: i64,
    ) -> Self {
        Self {
            train_client_epochs_per_round,
            test_client_epochs_per_round,
            ..self
        }
    }

    /// Sets the train and test max elements per client.
    pub fn with_max_elements_per_client(
        self,
        max_elements_per_train_client: i64,
        max_elements_per_test_client: i64,
    ) -> Self {
        Self {
            max_elements_per_train_client,
            max_elements_per_test_client,
            ..self
        }
    }

    /// Sets the train and test shuffle buffer sizes.
    pub fn with_shuffle_buffer_sizes(
        self,
        train_shuffle_buffer_size: i64,
        test_shuffle_buffer_size: i64,
    ) -> Self {
        Self {
            train_shuffle_buffer_size,
            test_shuffle_buffer_size,
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

    /// The validated vocab size.
    pub fn checked_vocab_size(&self) -> FCResult<usize> {
        if self.vocab_size <= 0 {
            return invalid_option("vocab_size", "a positive integer", self.vocab_size);
        }
        Ok(self.vocab_size as usize)
    }

    /// The per-client options for train clients.
    pub fn train_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            client_batch_size: self.train_client_batch_size,
            client_epochs_per_round: self.train_client_epochs_per_round,
            max_sequence_length: self.max_sequence_length,
            max_elements_per_client: self.max_elements_per_train_client,
            num_oov_buckets: self.num_oov_buckets,
            max_shuffle_buffer_size: self.train_shuffle_buffer_size.max(1),
            shuffle_seed: self.shuffle_seed,
        }
    }

    /// The per-client options for test clients.
    pub fn test_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            client_batch_size: self.test_client_batch_size,
            client_epochs_per_round: self.test_client_epochs_per_round,
            max_sequence_length: self.max_sequence_length,
            max_elements_per_client: self.max_elements_per_test_client,
            num_oov_buckets: self.num_oov_buckets,
            max_shuffle_buffer_size: self.test_shuffle_buffer_size.max(1),
            shuffle_seed: self.shuffle_seed,
        }
    }
}

/// Federated train and test datasets sharing one vocabulary.
///
/// Train clients may be wrapped by a [`SecretInsertingTransform`];
/// test clients are never transformed.
#[derive(Debug, Clone)]
pub struct FederatedDatasets<T: TokenType, D: ClientData> {
    train: TransformingClientData<D>,
    test: D,
    train_pipeline: PreprocessPipeline<T>,
    test_pipeline: PreprocessPipeline<T>,
}

impl<T: TokenType, D: ClientData> FederatedDatasets<T, D> {
    /// Assemble federated datasets.
    ///
    /// ## Arguments
    /// * `train` - the train client data.
    /// * `test` - the test client data.
    /// * `ranked_words` - the vocabulary source, most frequent first.
    /// * `options` - the dataset options.
    /// * `train_transform` - optional secret insertion on train clients.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(train, test, ranked_words, train_transform))
    )]
    pub fn new<W, S>(
        train: D,
        test: D,
        ranked_words: W,
        options: &FederatedDatasetOptions,
        train_transform: Option<SecretInsertingTransform>,
    ) -> FCResult<Self>
    where
        W: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vocab_size = options.checked_vocab_size()?;
        let train_config = options.train_options().validate()?;
        let test_config = options.test_options().validate()?;

        let vocab = Arc::new(VocabIndex::from_top_words(
            ranked_words,
            vocab_size,
            train_config.num_oov_buckets(),
        )?);

        log::info!(
            "Federated datasets: {} train clients; {} test clients; {} vocab words",
            train.num_clients(),
            test.num_clients(),
            vocab.len()
        );

        Ok(Self {
            train: TransformingClientData::new(train, train_transform),
            test,
            train_pipeline: PreprocessPipeline::new(vocab.clone(), train_config)?,
            test_pipeline: PreprocessPipeline::new(vocab, test_config)?,
        })
    }

    /// The shared vocabulary.
    pub fn vocab(&self) -> &Arc<VocabIndex<T>> {
        self.train_pipeline.tokenizer().vocab()
    }

    /// The (possibly transformed) train client data.
    pub fn train_data(&self) -> &TransformingClientData<D> {
        &self.train
    }

    /// The test client data.
    pub fn test_data(&self) -> &D {
        &self.test
    }

    /// The train pipeline.
    pub fn train_pipeline(&self) -> &PreprocessPipeline<T> {
        &self.train_pipeline
    }

    /// The test pipeline.
    pub fn test_pipeline(&self) -> &PreprocessPipeline<T> {
        &self.test_pipeline
    }

    /// Lazily preprocess one train client.
    pub fn train_client_batches<'a>(
        &'a self,
        client_id: &str,
    ) -> FCResult<impl Iterator<Item = InputTargetBatch<T>> + use<'a, T, D>> {
        self.train_pipeline.client_batches(&self.train, client_id)
    }

    /// Lazily preprocess one test client.
    pub fn test_client_batches<'a>(
        &'a self,
        client_id: &str,
    ) -> FCResult<impl Iterator<Item = InputTargetBatch<T>> + use<'a, T, D>> {
        self.test_pipeline.client_batches(&self.test, client_id)
    }
}
