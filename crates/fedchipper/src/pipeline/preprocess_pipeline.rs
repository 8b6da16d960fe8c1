//! # Preprocess Pipeline

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    batching::{BatchSplitter, InputTargetBatch},
    errors::{FCResult, FedchipperError},
    pipeline::{PreprocessConfig, PreprocessOptions, ShuffleBuffer},
    records::{ClientData, ClientRecord},
    tokenizer::SentenceTokenizer,
    types::TokenType,
    vocab::VocabIndex,
};

/// Per-client preprocessing pipeline.
///
/// Each traversal runs, strictly in order:
/// 1. take at most `max_elements_per_client` records;
/// 2. windowed shuffle;
/// 3. repeat `client_epochs_per_round` times, reshuffling each epoch;
/// 4. tokenize with [`SentenceTokenizer::to_ids`];
/// 5. batch and split with [`BatchSplitter`].
///
/// The pipeline is immutable; every call to [`Self::preprocess`]
/// builds a fresh lazy iterator.
#[derive(Debug, Clone)]
pub struct PreprocessPipeline<T: TokenType> {
    config: PreprocessConfig,
    tokenizer: SentenceTokenizer<T>,
    splitter: BatchSplitter,
}

impl<T: TokenType> PreprocessPipeline<T> {
    /// Create a new pipeline.
    ///
    /// ## Arguments
    /// * `vocab` - the vocabulary index.
    /// * `config` - the validated configuration.
    ///
    /// ## Returns
    /// A new pipeline; or an error if the vocab oov buckets disagree with `config`.
    pub fn new(
        vocab: Arc<VocabIndex<T>>,
        config: PreprocessConfig,
    ) -> FCResult<Self> {
        let vocab_buckets = vocab.specials().num_oov_buckets();
        if vocab_buckets != config.num_oov_buckets() {
            return Err(FedchipperError::VocabConflict(format!(
                "vocab has {vocab_buckets} oov buckets; config requires {}",
                config.num_oov_buckets()
            )));
        }

        let tokenizer = SentenceTokenizer::new(vocab, config.max_sequence_length())?;
        let splitter =
            BatchSplitter::new(config.client_batch_size(), config.max_sequence_length())?;

        Ok(Self {
            config,
            tokenizer,
            splitter,
        })
    }

    /// Build a pipeline from options and frequency-ranked words.
    ///
    /// ## Arguments
    /// * `words` - the vocabulary, most frequent first.
    /// * `options` - the raw options; validated here.
    pub fn from_words<W, S>(
        words: W,
        options: &PreprocessOptions,
    ) -> FCResult<Self>
    where
        W: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = options.validate()?;
        let vocab = VocabIndex::from_words(words, config.num_oov_buckets())?;
        Self::new(Arc::new(vocab), config)
    }

    /// The configuration.
    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// The tokenizer.
    pub fn tokenizer(&self) -> &SentenceTokenizer<T> {
        &self.tokenizer
    }

    /// The batch splitter.
    pub fn splitter(&self) -> &BatchSplitter {
        &self.splitter
    }

    /// Lazily preprocess one client's records.
    ///
    /// ## Arguments
    /// * `records` - the client's records; cloned once per epoch.
    ///
    /// ## Returns
    /// A finite iterator of `(input, target)` batches.
    pub fn preprocess<I>(
        &self,
        records: I,
    ) -> impl Iterator<Item = InputTargetBatch<T>>
    where
        I: IntoIterator<Item = ClientRecord>,
        I::IntoIter: Clone,
    {
        let limit = self.config.max_elements_per_client().unwrap_or(usize::MAX);
        let source = records.into_iter().take(limit);

        let buffer_size = self.config.shuffle_buffer_size();
        let mut rng = self.config.shuffle_rng();
        let epochs = (0..self.config.client_epochs_per_round()).flat_map(move |_| {
            ShuffleBuffer::new(source.clone(), buffer_size, ChaCha8Rng::from_rng(&mut rng))
        });

        let sequences = epochs.map(|record| self.tokenizer.to_ids(&record.tokens));
        self.splitter.split(sequences)
    }

    /// Lazily preprocess the records of one client of `data`.
    ///
    /// ## Returns
    /// The batch iterator; or [`FedchipperError::UnknownClient`].
    pub fn client_batches<'a, D: ClientData>(
        &'a self,
        data: &'a D,
        client_id: &str,
    ) -> FCResult<impl Iterator<Item = InputTargetBatch<T>> + use<'a, T, D>> {
        Ok(self.preprocess(data.client_records(client_id)?))
    }
}
