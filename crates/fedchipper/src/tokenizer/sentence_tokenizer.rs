//! # Sentence Tokenizer

use std::sync::Arc;

use crate::{
    errors::{FCResult, invalid_option},
    types::TokenType,
    vocab::{SpecialTokens, VocabIndex},
};

/// A tokenized record: `bos`, word tokens, and an optional `eos`.
///
/// ## Style Hints
/// Instance names should prefer `tokens`, or `token_seq`.
pub type TokenSequence<T> = Vec<T>;

/// Maps raw space-joined sentences to bounded [`TokenSequence`]s.
///
/// ```text
/// "a z" ; L=3 ; vocab=["a", "b", "c"] ; B=1
///   => [bos, a, oov(z), eos]
///   => [5, 1, 4, 6]
/// ```
#[derive(Debug, Clone)]
pub struct SentenceTokenizer<T: TokenType> {
    vocab: Arc<VocabIndex<T>>,
    max_sequence_length: usize,
}

impl<T: TokenType> SentenceTokenizer<T> {
    /// Create a new tokenizer.
    ///
    /// ## Arguments
    /// * `vocab` - the vocabulary index.
    /// * `max_sequence_length` - the max number of words kept per sentence; must be positive.
    pub fn new(
        vocab: Arc<VocabIndex<T>>,
        max_sequence_length: usize,
    ) -> FCResult<Self> {
        if max_sequence_length == 0 {
            return invalid_option("max_sequence_length", "a positive integer", 0);
        }
        Ok(Self {
            vocab,
            max_sequence_length,
        })
    }

    /// The vocabulary index.
    pub fn vocab(&self) -> &Arc<VocabIndex<T>> {
        &self.vocab
    }

    /// The special tokens.
    pub fn specials(&self) -> &SpecialTokens<T> {
        self.vocab.specials()
    }

    /// The max number of words kept per sentence.
    pub fn max_sequence_length(&self) -> usize {
        self.max_sequence_length
    }

    /// Tokenize one sentence.
    ///
    /// The sentence is split on single spaces and truncated to
    /// `max_sequence_length` words. `eos` is appended only when the
    /// sentence was not truncated to exactly `max_sequence_length` words;
    /// `bos` is always prepended.
    ///
    /// The result has at most `max_sequence_length + 1` tokens.
    pub fn to_ids(
        &self,
        sentence: &str,
    ) -> TokenSequence<T> {
        let specials = self.vocab.specials();

        let mut tokens = Vec::with_capacity(self.max_sequence_length + 2);
        tokens.push(specials.bos());
        tokens.extend(
            sentence
                .split(' ')
                .take(self.max_sequence_length)
                .map(|word| self.vocab.lookup(word)),
        );

        // `tokens` holds `bos` plus the kept words.
        if tokens.len() - 1 < self.max_sequence_length {
            tokens.push(specials.eos());
        }
        tokens
    }

    /// Tokenize a batch of sentences.
    pub fn to_ids_batch<S: AsRef<str>>(
        &self,
        sentences: &[S],
    ) -> Vec<TokenSequence<T>> {
        sentences.iter().map(|s| self.to_ids(s.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::{check_is_send, check_is_sync};

    fn abc_tokenizer(max_sequence_length: usize) -> SentenceTokenizer<u32> {
        let vocab = VocabIndex::from_words(["a", "b", "c"], 1).unwrap();
        SentenceTokenizer::new(Arc::new(vocab), max_sequence_length).unwrap()
    }

    #[test]
    fn test_to_ids() {
        let tokenizer = abc_tokenizer(3);
        check_is_send(&tokenizer);
        check_is_sync(&tokenizer);

        assert_eq!(tokenizer.to_ids("a z"), vec![5, 1, 4, 6]);
        assert_eq!(tokenizer.to_ids("a b c"), vec![5, 1, 2, 3]);
        assert_eq!(tokenizer.to_ids("c b a a b"), vec![5, 3, 2, 1]);
        assert_eq!(tokenizer.to_ids("b"), vec![5, 2, 6]);
    }

    #[test]
    fn test_to_ids_empty_words() {
        let tokenizer = abc_tokenizer(3);

        // The empty sentence is a single empty word.
        assert_eq!(tokenizer.to_ids(""), vec![5, 4, 6]);

        // Double spaces yield an empty (oov) word.
        assert_eq!(tokenizer.to_ids("a  b"), vec![5, 1, 4, 2]);
    }

    #[test]
    fn test_to_ids_batch() {
        let tokenizer = abc_tokenizer(2);
        assert_eq!(
            tokenizer.to_ids_batch(&["a", "b c a"]),
            vec![vec![5, 1, 6], vec![5, 2, 3]]
        );
    }

    #[test]
    fn test_rejects_zero_length() {
        let vocab = Arc::new(VocabIndex::<u32>::from_words(["a"], 1).unwrap());
        assert!(SentenceTokenizer::new(vocab, 0).is_err());
    }

    proptest! {
        #[test]
        fn in_vocab_sentences_roundtrip(
            word_idx in proptest::collection::vec(0..3usize, 1..8),
            max_len in 1..10usize,
        ) {
            let words = ["a", "b", "c"];
            let tokenizer = abc_tokenizer(max_len);
            let sentence: Vec<&str> = word_idx.iter().map(|&i| words[i]).collect();
            let tokens = tokenizer.to_ids(&sentence.join(" "));

            let specials = tokenizer.specials();
            prop_assert_eq!(tokens[0], specials.bos());
            prop_assert!(tokens.len() <= max_len + 1);

            let kept = sentence.len().min(max_len);
            let has_eos = tokens.last() == Some(&specials.eos());
            prop_assert_eq!(has_eos, kept < max_len);

            let decoded: Vec<&str> = tokens
                .iter()
                .filter(|&&t| t != specials.bos() && t != specials.eos() && t != specials.pad())
                .map(|&t| words[t as usize - 1])
                .collect();
            prop_assert_eq!(decoded, sentence[..kept].to_vec());
        }

        #[test]
        fn oov_words_are_stable(word in "[d-z]{1,12}") {
            let tokenizer = abc_tokenizer(4);
            let first = tokenizer.to_ids(&word);
            let second = tokenizer.to_ids(&word);
            prop_assert_eq!(&first, &second);
            prop_assert!(tokenizer.specials().is_oov(first[1]));
        }
    }
}
