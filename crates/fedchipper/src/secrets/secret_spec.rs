//! # Secret Specifications

use serde::{Deserialize, Serialize};

use crate::{
    errors::{FCResult, FedchipperError},
    types::FCHashSet,
};

/// A secret phrase, and how widely to insert it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretSpec {
    /// The secret phrase; words joined by single spaces.
    pub phrase: String,

    /// The number of distinct clients which receive this secret.
    pub client_count: usize,

    /// The per-example replacement probability for an assigned client; in `(0, 1]`.
    pub probability: f64,
}

impl SecretSpec {
    /// Create a new secret spec.
    pub fn new<S: Into<String>>(
        phrase: S,
        client_count: usize,
        probability: f64,
    ) -> Self {
        Self {
            phrase: phrase.into(),
            client_count,
            probability,
        }
    }
}

/// Is `probability` in `(0, 1]`?
///
/// `NaN` is not.
pub fn is_valid_probability(probability: f64) -> bool {
    probability > 0.0 && probability <= 1.0
}

/// Validate an ordered secrets configuration against a client population.
///
/// ## Arguments
/// * `secrets` - the secrets, in declaration order.
/// * `num_clients` - the size of the full client population.
///
/// ## Returns
/// The total requested client count; or an error if the secrets are empty,
/// contain duplicate phrases, any count is zero, any probability is outside
/// `(0, 1]`, or the total count does not leave at least one client unassigned.
pub fn validate_secrets(
    secrets: &[SecretSpec],
    num_clients: usize,
) -> FCResult<usize> {
    if secrets.is_empty() {
        return Err(FedchipperError::InvalidSecrets(
            "`secrets` must be non-empty".to_string(),
        ));
    }

    let mut seen: FCHashSet<&str> = FCHashSet::default();
    for spec in secrets {
        if !seen.insert(spec.phrase.as_str()) {
            return Err(FedchipperError::InvalidSecrets(format!(
                "duplicate secret phrase: {:?}",
                spec.phrase
            )));
        }
    }

    if secrets.iter().any(|spec| spec.client_count == 0) {
        return Err(FedchipperError::InvalidSecrets(
            "client count for each secret must be positive".to_string(),
        ));
    }

    if let Some(spec) = secrets
        .iter()
        .find(|spec| !is_valid_probability(spec.probability))
    {
        return Err(FedchipperError::InvalidSecrets(format!(
            "probabilities must be in (0, 1]; {:?} has {}",
            spec.phrase, spec.probability
        )));
    }

    let total = secrets
        .iter()
        .try_fold(0usize, |acc, spec| acc.checked_add(spec.client_count))
        .unwrap_or(usize::MAX);
    if total >= num_clients {
        return Err(FedchipperError::InvalidSecrets(format!(
            "client counts ({total}) must sum to less than the number of clients ({num_clients})"
        )));
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secrets() {
        let secrets = vec![SecretSpec::new("x y z", 2, 0.5), SecretSpec::new("q", 1, 1.0)];
        assert_eq!(validate_secrets(&secrets, 4).unwrap(), 3);

        // A total match leaves no client unassigned.
        assert!(validate_secrets(&secrets, 3).is_err());
    }

    #[test]
    fn test_validate_secrets_rejects() {
        assert!(validate_secrets(&[], 10).is_err());
        assert!(validate_secrets(&[SecretSpec::new("a", 0, 0.5)], 10).is_err());
        assert!(validate_secrets(&[SecretSpec::new("a", 1, 0.0)], 10).is_err());
        assert!(validate_secrets(&[SecretSpec::new("a", 1, 1.5)], 10).is_err());
        assert!(validate_secrets(&[SecretSpec::new("a", 1, f64::NAN)], 10).is_err());
        assert!(
            validate_secrets(
                &[SecretSpec::new("a", 1, 0.5), SecretSpec::new("a", 1, 0.5)],
                10
            )
            .is_err()
        );
        assert!(validate_secrets(&[SecretSpec::new("a", usize::MAX, 0.5)], 10).is_err());
    }
}
