//! # Tokenizer
//!
//! Maps raw sentences to bounded token sequences, see [`SentenceTokenizer`].

pub mod sentence_tokenizer;

#[doc(inline)]
pub use sentence_tokenizer::{SentenceTokenizer, TokenSequence};
