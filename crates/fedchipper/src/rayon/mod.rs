//! # Rayon Utilities
//!
//! [`rayon`] powered wrappers for preprocessing many clients in parallel.

mod rayon_preprocessor;

pub use rayon_preprocessor::{ClientBatches, ParallelRayonPreprocessor};
