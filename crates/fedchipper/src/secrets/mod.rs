//! # Secret Insertion
//!
//! Inserts synthetic "secret" phrases into a controlled subset of clients,
//! for memorization and privacy auditing.
//!
//! * [`ClientSecretAssignment`] - seeded, one-time allocation of client quotas to secrets.
//! * [`SecretInsertingTransform`] - builds per-client [`ExampleTransformer`]s.
//! * [`ExampleTransformer`] - hash-seeded per-example replacement decisions.
//!
//! The method follows Thakkar et al. (2020), <https://arxiv.org/abs/2006.07490>;
//! except that a deterministic number of clients is selected for each secret.

pub mod example_transformer;
pub mod random_secrets;
pub mod secret_assigner;
pub mod secret_spec;

#[doc(inline)]
pub use example_transformer::{
    ExampleTransformer,
    SecretInsertingTransform,
    client_seed,
    example_seed,
    stateless_uniform,
};
#[doc(inline)]
pub use random_secrets::make_random_secrets;
#[doc(inline)]
pub use secret_assigner::{ClientSecretAssignment, SecretAssignment};
#[doc(inline)]
pub use secret_spec::{SecretSpec, is_valid_probability, validate_secrets};
