//! # Batching
//!
//! * [`TokenBatch`] - a dense row-major token array.
//! * [`BatchSplitter`] - padded batching and next-token `(input, target)` splits.

pub mod batch_splitter;
pub mod token_batch;

#[doc(inline)]
pub use batch_splitter::{BatchSplitter, InputTargetBatch, SplitBatches};
#[doc(inline)]
pub use token_batch::TokenBatch;
