//! # Parallel Preprocessor

use serde::{Deserialize, Serialize};

use crate::{
    batching::InputTargetBatch,
    errors::FCResult,
    pipeline::PreprocessPipeline,
    records::ClientData,
    types::TokenType,
};

/// The materialized batches of one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientBatches<T: TokenType> {
    /// The client id.
    pub client_id: String,

    /// The client's batches, in traversal order.
    pub batches: Vec<InputTargetBatch<T>>,
}

/// Client-Level Parallel Preprocessor Wrapper.
///
/// Each client's stream is sequential; distinct clients run on the ``rayon`` pool.
#[derive(Debug, Clone)]
pub struct ParallelRayonPreprocessor<T: TokenType> {
    /// Inner pipeline.
    pub inner: PreprocessPipeline<T>,
}

impl<T: TokenType> ParallelRayonPreprocessor<T> {
    /// Create a new parallel preprocessor.
    ///
    /// ## Arguments
    /// * `inner` - The pipeline to wrap.
    ///
    /// ## Returns
    /// A new `ParallelRayonPreprocessor` instance.
    pub fn new(inner: PreprocessPipeline<T>) -> Self {
        Self { inner }
    }

    /// Preprocess a set of clients in parallel.
    ///
    /// ## Arguments
    /// * `data` - the client data.
    /// * `client_ids` - the clients to preprocess.
    ///
    /// ## Returns
    /// One [`ClientBatches`] per client id, in `client_ids` order;
    /// or the first error encountered.
    pub fn preprocess_clients<D, S>(
        &self,
        data: &D,
        client_ids: &[S],
    ) -> FCResult<Vec<ClientBatches<T>>>
    where
        D: ClientData + Sync,
        S: AsRef<str> + Sync,
    {
        use rayon::prelude::*;
        client_ids
            .par_iter()
            .map(|client_id| -> FCResult<ClientBatches<T>> {
                let client_id = client_id.as_ref();
                Ok(ClientBatches {
                    client_id: client_id.to_string(),
                    batches: self.inner.client_batches(data, client_id)?.collect(),
                })
            })
            .collect()
    }

    /// Preprocess every client of `data` in parallel.
    pub fn preprocess_all<D>(
        &self,
        data: &D,
    ) -> FCResult<Vec<ClientBatches<T>>>
    where
        D: ClientData + Sync,
    {
        self.preprocess_clients(data, data.client_ids())
    }
}

impl<T: TokenType> From<PreprocessPipeline<T>> for ParallelRayonPreprocessor<T> {
    fn from(inner: PreprocessPipeline<T>) -> Self {
        Self::new(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::FedchipperError,
        pipeline::PreprocessOptions,
        records::{ClientRecord, InMemoryClientData},
        types::{check_is_send, check_is_sync},
    };

    fn sample_data() -> InMemoryClientData {
        let mut data = InMemoryClientData::default();
        for c in 0..12 {
            for i in 0..=c {
                data.push(format!("c{c}"), ClientRecord::new("a b", format!("{i}")));
            }
        }
        data
    }

    #[test]
    fn test_preprocess_clients() {
        let options = PreprocessOptions::default()
            .with_client_batch_size(4)
            .with_max_sequence_length(3)
            .with_shuffle_seed(11u64);
        let pipeline = PreprocessPipeline::<u32>::from_words(["a", "b"], &options).unwrap();
        let preprocessor = ParallelRayonPreprocessor::from(pipeline.clone());
        check_is_send(&preprocessor);
        check_is_sync(&preprocessor);

        let data = sample_data();
        let results = preprocessor.preprocess_all(&data).unwrap();
        assert_eq!(results.len(), 12);

        for (c, result) in results.iter().enumerate() {
            assert_eq!(result.client_id, format!("c{c}"));
            let rows: usize = result.batches.iter().map(InputTargetBatch::num_rows).sum();
            assert_eq!(rows, c + 1);

            let expected: Vec<_> = pipeline
                .client_batches(&data, &result.client_id)
                .unwrap()
                .collect();
            assert_eq!(result.batches, expected);
        }
    }

    #[test]
    fn test_unknown_client() {
        let pipeline =
            PreprocessPipeline::<u32>::from_words(["a"], &PreprocessOptions::default()).unwrap();
        let preprocessor = ParallelRayonPreprocessor::new(pipeline);

        let result = preprocessor.preprocess_clients(&sample_data(), &["c0", "nope"]);
        assert!(matches!(result, Err(FedchipperError::UnknownClient(id)) if id == "nope"));
    }
}
