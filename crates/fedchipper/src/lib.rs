//! # `fedchipper` Federated Next-Word-Prediction Preprocessing
//!
//! `fedchipper` prepares per-client text records for federated next-word-prediction
//! training and evaluation; and can insert synthetic "secret" phrases into a
//! controlled subset of clients, for memorization and privacy auditing.
//!
//! See:
//! * [`vocab`] to build a [`vocab::VocabIndex`] from a frequency-ranked word source.
//! * [`tokenizer`] to map sentences to bounded token sequences.
//! * [`batching`] to pad, batch, and split sequences into `(input, target)` pairs.
//! * [`pipeline`] for the per-client take / shuffle / repeat / tokenize / batch pipeline;
//!   and federated or centralized dataset assembly.
//! * [`secrets`] to assign secrets to clients and insert them into examples.
//! * [`records`] for client-partitioned record stores.
//!
//! ## Token Layout
//!
//! ```text
//! pad = 0
//! vocab words = 1..=V
//! oov buckets = V+1..=V+B
//! bos = V+B+1
//! eos = V+B+2
//! ```
//!
//! ## Crate Features
#![doc = document_features::document_features!()]
//!
//! ## Preprocessing a Client
//!
//! ```rust
//! use fedchipper::pipeline::{PreprocessOptions, PreprocessPipeline};
//! use fedchipper::records::ClientRecord;
//!
//! let options = PreprocessOptions::default()
//!     .with_client_batch_size(2)
//!     .with_max_sequence_length(3);
//! let pipeline = PreprocessPipeline::<u32>::from_words(["a", "b", "c"], &options)?;
//!
//! let records = vec![ClientRecord::new("a z", "2010-01-01")];
//! let batches: Vec<_> = pipeline.preprocess(records).collect();
//!
//! assert_eq!(batches[0].input.to_nested_vec(), vec![vec![5, 1, 4]]);
//! assert_eq!(batches[0].target.to_nested_vec(), vec![vec![1, 4, 6]]);
//! # Ok::<(), fedchipper::errors::FedchipperError>(())
//! ```
#![warn(missing_docs, unused)]

#[cfg(feature = "rayon")]
pub mod rayon;

pub mod batching;
pub mod errors;
pub mod hashing;
pub mod pipeline;
pub mod records;
pub mod secrets;
pub mod tokenizer;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use errors::{FCResult, FedchipperError};
#[doc(inline)]
pub use types::TokenType;
