//! # Secret Inserting Example Transforms
//!
//! Per-example replacement decisions are a pure function of:
//! * the client seed; `(md5(client_id) as big-endian integer + seed) mod 2^32`,
//! * the example seed; `fnv1a_64(creation_date) mod 2^32`.
//!
//! No sequential or global generator state is involved; so decisions are
//! reproducible across traversals, and safe to evaluate in any order,
//! or in parallel.

use std::sync::Arc;

use md5::{Digest, Md5};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    errors::{FCResult, FedchipperError},
    hashing::hash_seed32,
    records::ClientRecord,
    secrets::{ClientSecretAssignment, SecretAssignment, SecretSpec},
};

/// Derive the 32-bit seed of a client.
///
/// This is `(md5(client_id) + seed) mod 2^32`, reading the digest as a
/// big-endian integer; only its low 4 bytes survive the modulus.
pub fn client_seed(
    client_id: &str,
    seed: u64,
) -> u32 {
    let digest = Md5::digest(client_id.as_bytes());
    let low = u32::from_be_bytes([digest[12], digest[13], digest[14], digest[15]]);
    low.wrapping_add(seed as u32)
}

/// Derive the 32-bit seed of an example from its `creation_date`.
pub fn example_seed(creation_date: &str) -> u32 {
    hash_seed32(creation_date.as_bytes())
}

/// Draw one uniform value in `[0, 1)` from exactly two seeds.
pub fn stateless_uniform(
    client_seed: u32,
    example_seed: u32,
) -> f64 {
    let key = ((client_seed as u64) << 32) | example_seed as u64;
    ChaCha8Rng::seed_from_u64(key).random::<f64>()
}

/// Per-client secret insertion transform.
///
/// Built once per client; applied lazily to each of the client's records.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleTransformer {
    secret: Arc<str>,
    probability: f64,
    client_seed: u32,
}

impl ExampleTransformer {
    /// Create the transform for a client.
    ///
    /// ## Arguments
    /// * `client_id` - the client id.
    /// * `assignment` - the client's assigned secret.
    /// * `seed` - the global secret insertion seed.
    pub fn new(
        client_id: &str,
        assignment: &SecretAssignment,
        seed: u64,
    ) -> Self {
        Self {
            secret: assignment.secret.clone(),
            probability: assignment.probability,
            client_seed: client_seed(client_id, seed),
        }
    }

    /// The secret phrase.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The per-example replacement probability.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// The derived client seed.
    pub fn client_seed(&self) -> u32 {
        self.client_seed
    }

    /// The uniform draw for an example with the given `creation_date`.
    pub fn example_draw(
        &self,
        creation_date: &str,
    ) -> f64 {
        stateless_uniform(self.client_seed, example_seed(creation_date))
    }

    /// Should this record's text be replaced with the secret?
    pub fn should_replace(
        &self,
        record: &ClientRecord,
    ) -> bool {
        self.example_draw(&record.creation_date) < self.probability
    }

    /// Apply the transform to a record.
    pub fn apply(
        &self,
        mut record: ClientRecord,
    ) -> ClientRecord {
        if self.should_replace(&record) {
            record.tokens = self.secret.to_string();
        }
        record
    }
}

/// Builds per-client [`ExampleTransformer`]s from a shared [`ClientSecretAssignment`].
#[derive(Debug, Clone)]
pub struct SecretInsertingTransform {
    assignment: Arc<ClientSecretAssignment>,
}

impl From<ClientSecretAssignment> for SecretInsertingTransform {
    fn from(assignment: ClientSecretAssignment) -> Self {
        Self::from_assignment(Arc::new(assignment))
    }
}

impl SecretInsertingTransform {
    /// Assign secrets to clients, and wrap the assignment.
    ///
    /// See [`ClientSecretAssignment::assign`].
    pub fn new<S: AsRef<str>>(
        client_ids: &[S],
        secrets: &[SecretSpec],
        seed: u64,
    ) -> FCResult<Self> {
        Ok(ClientSecretAssignment::assign(client_ids, secrets, seed)?.into())
    }

    /// Wrap an existing assignment.
    pub fn from_assignment(assignment: Arc<ClientSecretAssignment>) -> Self {
        Self { assignment }
    }

    /// The shared assignment.
    pub fn assignment(&self) -> &Arc<ClientSecretAssignment> {
        &self.assignment
    }

    /// Build the transform for a client.
    ///
    /// Each client supports exactly one transformed replica;
    /// so `index` must be zero.
    ///
    /// ## Returns
    /// * `Ok(None)` - the client has no assigned secret; leave it untouched.
    /// * `Ok(Some(transform))` - the client's transform.
    /// * `Err(TransformIndex)` - `index` was nonzero.
    pub fn make_transform(
        &self,
        client_id: &str,
        index: usize,
    ) -> FCResult<Option<ExampleTransformer>> {
        if index != 0 {
            return Err(FedchipperError::TransformIndex { index });
        }
        Ok(self
            .assignment
            .get(client_id)
            .map(|a| ExampleTransformer::new(client_id, a, self.assignment.seed())))
    }
}
