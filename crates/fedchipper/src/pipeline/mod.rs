//! # Preprocessing Pipelines
//!
//! * [`PreprocessOptions`] / [`PreprocessConfig`] - per-client options, and their validated form.
//! * [`PreprocessPipeline`] - take, shuffle, repeat, tokenize, then batch and split.
//! * [`FederatedDatasets`] - per-client train and test streams.
//! * [`CentralizedDatasets`] - pooled train, validation, and test streams.

pub mod centralized;
pub mod federated;
pub mod preprocess_options;
pub mod preprocess_pipeline;
pub mod shuffle;

#[doc(inline)]
pub use centralized::{CentralizedDatasetOptions, CentralizedDatasets};
#[doc(inline)]
pub use federated::{FederatedDatasetOptions, FederatedDatasets};
#[doc(inline)]
pub use preprocess_options::{
    DEFAULT_MAX_SHUFFLE_BUFFER_SIZE,
    PreprocessConfig,
    PreprocessOptions,
};
#[doc(inline)]
pub use preprocess_pipeline::PreprocessPipeline;
#[doc(inline)]
pub use shuffle::ShuffleBuffer;
