//! # Preprocess Options
//!
//! Options for building a [`PreprocessPipeline`](crate::pipeline::PreprocessPipeline).

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{FCResult, invalid_option};

/// Default shuffle buffer cap.
pub const DEFAULT_MAX_SHUFFLE_BUFFER_SIZE: i64 = 10_000;

/// Raw, unvalidated per-client preprocessing options.
///
/// Integer fields are signed to mirror the configuration surface;
/// `max_elements_per_client = -1` means "unbounded".
///
/// See [`PreprocessOptions::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// The max rows per batch; must be positive.
    pub client_batch_size: i64,

    /// The number of times the bounded client data is repeated; must be positive.
    pub client_epochs_per_round: i64,

    /// Sentence truncation / batch padding length; must be positive.
    pub max_sequence_length: i64,

    /// The max records taken per client; positive, or `-1` for unbounded.
    pub max_elements_per_client: i64,

    /// The number of oov buckets; must be positive.
    pub num_oov_buckets: i64,

    /// The shuffle buffer cap; must be non-negative.
    pub max_shuffle_buffer_size: i64,

    /// Pin the shuffle generator seed; when `None`, shuffles are unseeded.
    pub shuffle_seed: Option<u64>,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            client_batch_size: 16,
            client_epochs_per_round: 1,
            max_sequence_length: 20,
            max_elements_per_client: 1000,
            num_oov_buckets: 1,
            max_shuffle_buffer_size: DEFAULT_MAX_SHUFFLE_BUFFER_SIZE,
            shuffle_seed: None,
        }
    }
}

impl PreprocessOptions {
    /// Sets the batch size.
    pub fn with_client_batch_size(
        self,
        client_batch_size: i64,
    ) -> Self {
        Self {
            client_batch_size,
            ..self
        }
    }

    /// Sets the epochs per round.
    pub fn with_client_epochs_per_round(
        self,
        client_epochs_per_round: i64,
    ) -> Self {
        Self {
            client_epochs_per_round,
            ..self
        }
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

    /// Sets the max elements per client; `-1` for unbounded.
    pub fn with_max_elements_per_client(
        self,
        max_elements_per_client: i64,
    ) -> Self {
        Self {
            max_elements_per_client,
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

    /// Sets the shuffle buffer cap.
    pub fn with_max_shuffle_buffer_size(
        self,
        max_shuffle_buffer_size: i64,
    ) -> Self {
        Self {
            max_shuffle_buffer_size,
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

    /// Validate the options.
    ///
    /// ## Returns
    /// The typed [`PreprocessConfig`]; or the first invalid option.
    pub fn validate(&self) -> FCResult<PreprocessConfig> {
        let positive = |name: &'static str, value: i64| -> FCResult<usize> {
            if value <= 0 {
                invalid_option(name, "a positive integer", value)
            } else {
                Ok(value as usize)
            }
        };

        let client_batch_size = positive("client_batch_size", self.client_batch_size)?;
        let client_epochs_per_round =
            positive("client_epochs_per_round", self.client_epochs_per_round)?;
        let max_sequence_length = positive("max_sequence_length", self.max_sequence_length)?;

        let max_elements_per_client = match self.max_elements_per_client {
            -1 => None,
            n if n > 0 => Some(n as usize),
            n => return invalid_option("max_elements_per_client", "a positive integer or -1", n),
        };

        let num_oov_buckets = positive("num_oov_buckets", self.num_oov_buckets)?;

        if self.max_shuffle_buffer_size < 0 {
            return invalid_option(
                "max_shuffle_buffer_size",
                "a non-negative integer",
                self.max_shuffle_buffer_size,
            );
        }
        let max_shuffle_buffer_size = self.max_shuffle_buffer_size as usize;

        let shuffle_buffer_size = match max_elements_per_client {
            Some(n) if n <= max_shuffle_buffer_size => n,
            _ => max_shuffle_buffer_size,
        };

        Ok(PreprocessConfig {
            client_batch_size,
            client_epochs_per_round,
            max_sequence_length,
            max_elements_per_client,
            num_oov_buckets,
            shuffle_buffer_size,
            shuffle_seed: self.shuffle_seed,
        })
    }
}

/// Validated per-client preprocessing configuration.
///
/// Built by [`PreprocessOptions::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessConfig {
    client_batch_size: usize,
    client_epochs_per_round: usize,
    max_sequence_length: usize,
    max_elements_per_client: Option<usize>,
    num_oov_buckets: usize,
    shuffle_buffer_size: usize,
    shuffle_seed: Option<u64>,
}

impl PreprocessConfig {
    /// The max rows per batch.
    pub fn client_batch_size(&self) -> usize {
        self.client_batch_size
    }

    /// The number of epochs per round.
    pub fn client_epochs_per_round(&self) -> usize {
        self.client_epochs_per_round
    }

    /// Sentence truncation / batch padding length.
    pub fn max_sequence_length(&self) -> usize {
        self.max_sequence_length
    }

    /// The max records taken per client; `None` is unbounded.
    pub fn max_elements_per_client(&self) -> Option<usize> {
        self.max_elements_per_client
    }

    /// The number of oov buckets.
    pub fn num_oov_buckets(&self) -> usize {
        self.num_oov_buckets
    }

    /// The derived shuffle buffer size.
    ///
    /// This is `max_shuffle_buffer_size`, unless `max_elements_per_client`
    /// is bounded and no larger; in which case it is `max_elements_per_client`.
    pub fn shuffle_buffer_size(&self) -> usize {
        self.shuffle_buffer_size
    }

    /// The pinned shuffle seed, if any.
    pub fn shuffle_seed(&self) -> Option<u64> {
        self.shuffle_seed
    }

    /// Build a fresh shuffle generator for one traversal.
    pub fn shuffle_rng(&self) -> ChaCha8Rng {
        match self.shuffle_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }
}
