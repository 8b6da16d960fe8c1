//! # Special Tokens

use crate::{
    errors::{FCResult, FedchipperError, invalid_option},
    types::TokenType,
};

/// Special token ids added around a dense vocabulary.
///
/// For a vocabulary of `V` words and `B` oov buckets:
/// * `pad` - `0`,
/// * `oov` - `V+1 ..= V+B`,
/// * `bos` - `V+B+1`,
/// * `eos` - `V+B+2`.
///
/// The dense vocabulary occupies `1 ..= V`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTokens<T: TokenType> {
    pad: T,
    oov: Vec<T>,
    bos: T,
    eos: T,
}

impl<T: TokenType> SpecialTokens<T> {
    /// Derive the special tokens for a vocabulary.
    ///
    /// ## Arguments
    /// * `vocab_size` - the number of dense vocabulary words; must be positive.
    /// * `num_oov_buckets` - the number of oov buckets; must be positive.
    ///
    /// ## Returns
    /// A new `SpecialTokens`, or an error if the sizes are invalid,
    /// or `eos` does not fit in `T`.
    pub fn try_new(
        vocab_size: usize,
        num_oov_buckets: usize,
    ) -> FCResult<Self> {
        if vocab_size == 0 {
            return invalid_option("vocab_size", "a positive integer", 0);
        }
        if num_oov_buckets == 0 {
            return invalid_option("num_oov_buckets", "a positive integer", 0);
        }

        let max_token = vocab_size
            .checked_add(num_oov_buckets)
            .and_then(|n| n.checked_add(2))
            .ok_or(FedchipperError::TokenOverflow {
                max_token: usize::MAX,
            })?;
        let token = |n: usize| T::from_usize(n).ok_or(FedchipperError::TokenOverflow { max_token });

        Ok(Self {
            pad: T::zero(),
            oov: (0..num_oov_buckets)
                .map(|n| token(vocab_size + 1 + n))
                .collect::<FCResult<Vec<_>>>()?,
            bos: token(vocab_size + num_oov_buckets + 1)?,
            eos: token(max_token)?,
        })
    }

    /// The padding token; always `0`.
    pub fn pad(&self) -> T {
        self.pad
    }

    /// The oov bucket tokens, in bucket order.
    pub fn oov(&self) -> &[T] {
        &self.oov
    }

    /// The number of oov buckets.
    pub fn num_oov_buckets(&self) -> usize {
        self.oov.len()
    }

    /// The beginning-of-sequence token.
    pub fn bos(&self) -> T {
        self.bos
    }

    /// The end-of-sequence token.
    pub fn eos(&self) -> T {
        self.eos
    }

    /// The largest token id which may be emitted; this is `eos`.
    pub fn max_token(&self) -> T {
        self.eos
    }

    /// Is this token one of the oov bucket tokens?
    pub fn is_oov(
        &self,
        token: T,
    ) -> bool {
        match (self.oov.first(), self.oov.last()) {
            (Some(&first), Some(&last)) => first <= token && token <= last,
            _ => false,
        }
    }
}
