//! # Vocabulary Index

use crate::{
    errors::{FCResult, FedchipperError, invalid_option},
    hashing::hash_bucket,
    types::{FCHashMap, TokenType, hash_map_with_capacity},
    vocab::SpecialTokens,
};

/// Immutable `{ word -> T }` index over a frequency-ranked vocabulary.
///
/// The `i`-th word (0-based) maps to token `i + 1`; `0` is reserved for padding.
/// Words not in the vocabulary are hashed into one of the oov buckets of
/// [`SpecialTokens`].
#[derive(Debug, Clone)]
pub struct VocabIndex<T: TokenType> {
    words: Vec<String>,
    word_tokens: FCHashMap<String, T>,
    specials: SpecialTokens<T>,
}

impl<T: TokenType> VocabIndex<T> {
    /// Build an index from frequency-ranked words.
    ///
    /// ## Arguments
    /// * `words` - the vocabulary, most frequent first.
    /// * `num_oov_buckets` - the number of oov buckets; must be positive.
    ///
    /// ## Returns
    /// A new `VocabIndex`; or an error if the vocab is empty, contains
    /// duplicate words, or the special tokens do not fit in `T`.
    pub fn from_words<W, S>(
        words: W,
        num_oov_buckets: usize,
    ) -> FCResult<Self>
    where
        W: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        let specials = SpecialTokens::try_new(words.len(), num_oov_buckets)?;

        let mut word_tokens = hash_map_with_capacity(words.len());
        for (idx, word) in words.iter().enumerate() {
            // Bounded by `specials.max_token()`, which fits in `T`.
            let token = T::from_usize(idx + 1).ok_or(FedchipperError::TokenOverflow {
                max_token: idx + 1,
            })?;
            if word_tokens.insert(word.clone(), token).is_some() {
                return Err(FedchipperError::VocabConflict(format!(
                    "duplicate vocab word: {word:?}"
                )));
            }
        }

        Ok(Self {
            words,
            word_tokens,
            specials,
        })
    }

    /// Build an index from the top `vocab_size` frequency-ranked words.
    ///
    /// Fewer than `vocab_size` words may be available; in which case
    /// the index holds all of them.
    pub fn from_top_words<W, S>(
        words: W,
        vocab_size: usize,
        num_oov_buckets: usize,
    ) -> FCResult<Self>
    where
        W: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if vocab_size == 0 {
            return invalid_option("vocab_size", "a positive integer", 0);
        }
        let index = Self::from_words(words.into_iter().take(vocab_size), num_oov_buckets)?;
        if index.len() < vocab_size {
            log::warn!(
                "vocab source holds {} words; fewer than the requested vocab_size {}",
                index.len(),
                vocab_size
            );
        }
        Ok(index)
    }

    /// The number of dense vocabulary words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Is the vocabulary empty?
    ///
    /// Construction rejects empty vocabularies; so this is always `false`.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The vocabulary words, most frequent first.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The special tokens.
    pub fn specials(&self) -> &SpecialTokens<T> {
        &self.specials
    }

    /// Look up the dense token for an in-vocabulary word.
    pub fn lookup_word(
        &self,
        word: &str,
    ) -> Option<T> {
        self.word_tokens.get(word).copied()
    }

    /// Look up the token for any word.
    ///
    /// In-vocabulary words map to their dense token; all other words
    /// map to a stable oov bucket token.
    pub fn lookup(
        &self,
        word: &str,
    ) -> T {
        match self.lookup_word(word) {
            Some(token) => token,
            None => self.oov_token(word),
        }
    }

    /// The oov bucket token for a word, regardless of vocabulary membership.
    pub fn oov_token(
        &self,
        word: &str,
    ) -> T {
        let oov = self.specials.oov();
        oov[hash_bucket(word.as_bytes(), oov.len())]
    }

    /// Look up the word for a dense token.
    pub fn lookup_token(
        &self,
        token: T,
    ) -> Option<&str> {
        let idx = token.to_usize()?.checked_sub(1)?;
        self.words.get(idx).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocab_index() {
        let index = VocabIndex::<u32>::from_words(["a", "b", "c"], 1).unwrap();
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());

        assert_eq!(index.lookup("a"), 1);
        assert_eq!(index.lookup("b"), 2);
        assert_eq!(index.lookup("c"), 3);
        assert_eq!(index.lookup("z"), 4);
        assert_eq!(index.lookup_word("z"), None);

        assert_eq!(index.lookup_token(2), Some("b"));
        assert_eq!(index.lookup_token(0), None);
        assert_eq!(index.lookup_token(4), None);

        assert_eq!(index.specials().bos(), 5);
        assert_eq!(index.specials().eos(), 6);
    }

    #[test]
    fn test_oov_buckets_are_stable() {
        let index = VocabIndex::<u32>::from_words(["a", "b"], 5).unwrap();
        for word in ["x", "yy", "zzz", ""] {
            let token = index.lookup(word);
            assert!(index.specials().is_oov(token));
            assert_eq!(token, index.lookup(word));
        }
    }

    #[test]
    fn test_from_top_words() {
        let words = ["the", "a", "of", "to"];
        let index = VocabIndex::<u32>::from_top_words(words, 2, 1).unwrap();
        assert_eq!(index.words(), &["the".to_string(), "a".to_string()]);
        assert_eq!(index.lookup("of"), 3);

        let index = VocabIndex::<u32>::from_top_words(words, 10, 1).unwrap();
        assert_eq!(index.len(), 4);

        assert!(VocabIndex::<u32>::from_top_words(words, 0, 1).is_err());
    }

    #[test]
    fn test_rejects_bad_vocab() {
        assert!(VocabIndex::<u32>::from_words(Vec::<String>::new(), 1).is_err());
        assert!(matches!(
            VocabIndex::<u32>::from_words(["a", "b", "a"], 1),
            Err(FedchipperError::VocabConflict(_))
        ));
        assert!(VocabIndex::<u32>::from_words(["a"], 0).is_err());
    }
}
