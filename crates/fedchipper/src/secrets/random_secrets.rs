//! # Random Secrets

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::errors::{FCResult, FedchipperError};

/// Generate random secret phrases from a vocabulary.
///
/// Each secret is `secret_len` words drawn uniformly, with replacement,
/// from `vocab`; joined by single spaces.
///
/// ## Arguments
/// * `vocab` - the words to draw from; must be non-empty.
/// * `num_secrets` - the number of secrets to generate.
/// * `secret_len` - the number of words per secret.
/// * `seed` - the generator seed.
pub fn make_random_secrets<S: AsRef<str>>(
    vocab: &[S],
    num_secrets: usize,
    secret_len: usize,
    seed: u64,
) -> FCResult<Vec<String>> {
    if vocab.is_empty() {
        return Err(FedchipperError::InvalidSecrets(
            "cannot draw secrets from an empty vocab".to_string(),
        ));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Ok((0..num_secrets)
        .map(|_| {
            (0..secret_len)
                .map(|_| vocab[rng.random_range(0..vocab.len())].as_ref())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_random_secrets() {
        let vocab = ["the", "to", "of", "and", "a"];

        let secrets = make_random_secrets(&vocab, 4, 3, 0).unwrap();
        assert_eq!(secrets.len(), 4);
        for secret in &secrets {
            let words: Vec<&str> = secret.split(' ').collect();
            assert_eq!(words.len(), 3);
            assert!(words.iter().all(|w| vocab.contains(w)));
        }

        assert_eq!(secrets, make_random_secrets(&vocab, 4, 3, 0).unwrap());
        assert_ne!(secrets, make_random_secrets(&vocab, 4, 3, 1).unwrap());
    }

    #[test]
    fn test_make_random_secrets_empty_vocab() {
        let vocab: [&str; 0] = [];
        assert!(make_random_secrets(&vocab, 1, 3, 0).is_err());
        assert!(
            make_random_secrets(&["a"], 0, 3, 0)
                .unwrap()
                .is_empty()
        );
    }
}
