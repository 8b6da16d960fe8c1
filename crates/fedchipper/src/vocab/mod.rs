//! # Vocabulary
//!
//! This module provides the dense word vocabulary and its special tokens.
//!
//! * [`VocabIndex`] - the immutable ``{ word -> T }`` index, with oov hashing.
//! * [`SpecialTokens`] - the `pad`, `oov`, `bos`, and `eos` token ids.
//! * [`word_counts`] - frequency-ranked vocabulary source io.

pub mod special_tokens;
pub mod vocab_index;
pub mod word_counts;

#[doc(inline)]
pub use special_tokens::SpecialTokens;
#[doc(inline)]
pub use vocab_index::VocabIndex;
#[doc(inline)]
pub use word_counts::{WordCounts, load_word_counts_path, read_word_counts, top_vocab_words};
