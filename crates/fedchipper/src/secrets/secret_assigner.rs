//! # Secret Assignment
//!
//! Deterministic allocation of client quotas to secret phrases.

use std::sync::Arc;

use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

use crate::{
    errors::{FCResult, FedchipperError},
    secrets::{SecretSpec, validate_secrets},
    types::{FCHashMap, FCHashSet, hash_map_with_capacity},
};

/// The secret assigned to a single client.
#[derive(Debug, Clone, PartialEq)]
pub struct SecretAssignment {
    /// The secret phrase.
    pub secret: Arc<str>,

    /// The per-example replacement probability.
    pub probability: f64,
}

/// Immutable `{ client_id -> SecretAssignment }` map.
///
/// Clients not in the map are untouched by secret insertion.
#[derive(Debug, Clone)]
pub struct ClientSecretAssignment {
    seed: u64,
    assignments: FCHashMap<String, SecretAssignment>,
}

impl ClientSecretAssignment {
    /// Assign secrets to clients.
    ///
    /// The full client population is permuted with a `ChaCha8` generator
    /// seeded by `seed`; the permutation is then walked once, consuming
    /// `client_count` consecutive clients for each secret, in declaration order.
    ///
    /// Changing the declaration order of `secrets` changes which clients
    /// receive which secret, even with the same `seed`.
    ///
    /// ## Arguments
    /// * `client_ids` - the full, duplicate-free client population.
    /// * `secrets` - the secrets, in declaration order.
    /// * `seed` - the permutation seed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(client_ids, secrets), fields(num_clients = client_ids.len()))
    )]
    pub fn assign<S: AsRef<str>>(
        client_ids: &[S],
        secrets: &[SecretSpec],
        seed: u64,
    ) -> FCResult<Self> {
        let total = validate_secrets(secrets, client_ids.len())?;

        let mut permutation: Vec<&str> = client_ids.iter().map(AsRef::as_ref).collect();
        {
            let mut unique: FCHashSet<&str> = FCHashSet::default();
            if let Some(dup) = permutation.iter().find(|&&id| !unique.insert(id)) {
                return Err(FedchipperError::InvalidSecrets(format!(
                    "duplicate client id: {dup:?}"
                )));
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        permutation.shuffle(&mut rng);

        let mut assignments = hash_map_with_capacity(total);
        let mut remaining = permutation.into_iter();
        for spec in secrets {
            let assignment = SecretAssignment {
                secret: Arc::from(spec.phrase.as_str()),
                probability: spec.probability,
            };
            for client_id in remaining.by_ref().take(spec.client_count) {
                assignments.insert(client_id.to_string(), assignment.clone());
            }
        }

        log::info!(
            "Assigned {} secrets to {} of {} clients",
            secrets.len(),
            assignments.len(),
            client_ids.len()
        );

        Ok(Self { seed, assignments })
    }

    /// The seed used for assignment; also mixed into per-client seeds.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The number of assigned clients.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Are there no assigned clients?
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Get the assignment of a client, if any.
    pub fn get(
        &self,
        client_id: &str,
    ) -> Option<&SecretAssignment> {
        self.assignments.get(client_id)
    }

    /// Iterate over `(client_id, assignment)` pairs, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretAssignment)> {
        self.assignments.iter().map(|(id, a)| (id.as_str(), a))
    }

    /// The sorted client ids assigned a given secret.
    pub fn clients_for_secret(
        &self,
        secret: &str,
    ) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .iter()
            .filter(|(_, a)| a.secret.as_ref() == secret)
            .map(|(id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{check_is_send, check_is_sync};

    fn client_ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{i}")).collect()
    }

    #[test]
    fn test_assign_scenario() {
        let ids = client_ids(4);
        let secrets = vec![SecretSpec::new("x y z", 2, 0.5)];

        let assignment = ClientSecretAssignment::assign(&ids, &secrets, 1).unwrap();
        check_is_send(&assignment);
        check_is_sync(&assignment);

        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment.seed(), 1);
        for (id, a) in assignment.iter() {
            assert!(ids.iter().any(|c| c == id));
            assert_eq!(a.secret.as_ref(), "x y z");
            assert_eq!(a.probability, 0.5);
        }

        let again = ClientSecretAssignment::assign(&ids, &secrets, 1).unwrap();
        assert_eq!(
            assignment.clients_for_secret("x y z"),
            again.clients_for_secret("x y z")
        );
    }

    #[test]
    fn test_assign_partitions_population() {
        let ids = client_ids(50);
        let secrets = vec![
            SecretSpec::new("alpha", 5, 0.1),
            SecretSpec::new("beta", 7, 0.2),
            SecretSpec::new("gamma", 1, 1.0),
        ];

        let assignment = ClientSecretAssignment::assign(&ids, &secrets, 42).unwrap();
        assert_eq!(assignment.len(), 13);
        assert_eq!(assignment.clients_for_secret("alpha").len(), 5);
        assert_eq!(assignment.clients_for_secret("beta").len(), 7);
        assert_eq!(assignment.clients_for_secret("gamma").len(), 1);

        for id in &ids {
            if let Some(a) = assignment.get(id) {
                let expected = secrets
                    .iter()
                    .find(|s| s.phrase == a.secret.as_ref())
                    .unwrap();
                assert_eq!(a.probability, expected.probability);
            }
        }
        assert!(assignment.get("not-a-client").is_none());
    }

    #[test]
    fn test_assign_depends_on_seed_and_order() {
        let ids = client_ids(200);
        let forward = vec![SecretSpec::new("a", 20, 0.5), SecretSpec::new("b", 20, 0.5)];
        let backward = vec![SecretSpec::new("b", 20, 0.5), SecretSpec::new("a", 20, 0.5)];

        let base = ClientSecretAssignment::assign(&ids, &forward, 7).unwrap();
        let reseeded = ClientSecretAssignment::assign(&ids, &forward, 8).unwrap();
        let reordered = ClientSecretAssignment::assign(&ids, &backward, 7).unwrap();

        assert_ne!(
            base.clients_for_secret("a"),
            reseeded.clients_for_secret("a")
        );
        assert_eq!(
            base.clients_for_secret("a"),
            reordered.clients_for_secret("b")
        );
    }

    #[test]
    fn test_assign_rejects() {
        let ids = client_ids(4);
        assert!(ClientSecretAssignment::assign(&ids, &[SecretSpec::new("a", 4, 0.5)], 0).is_err());
        assert!(ClientSecretAssignment::assign(&ids, &[], 0).is_err());

        let dup_ids = vec!["c0", "c1", "c0"];
        assert!(matches!(
            ClientSecretAssignment::assign(&dup_ids, &[SecretSpec::new("a", 1, 0.5)], 0),
            Err(FedchipperError::InvalidSecrets(_))
        ));
    }
}
