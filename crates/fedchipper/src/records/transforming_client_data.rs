//! # Transforming Client Data

use crate::{
    errors::FCResult,
    records::{ClientData, ClientRecord},
    secrets::{ExampleTransformer, SecretInsertingTransform},
};

/// A record iterator with an optional per-client transform applied lazily.
#[derive(Debug, Clone)]
pub struct TransformedRecords<I> {
    inner: I,
    transform: Option<ExampleTransformer>,
}

impl<I> Iterator for TransformedRecords<I>
where
    I: Iterator<Item = ClientRecord>,
{
    type Item = ClientRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.inner.next()?;
        Some(match &self.transform {
            Some(transform) => transform.apply(record),
            None => record,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// [`ClientData`] wrapper applying secret insertion to each client's records.
///
/// Per-client transforms are built when the client's records are requested;
/// clients with no assigned secret pass through untouched.
#[derive(Debug, Clone)]
pub struct TransformingClientData<D: ClientData> {
    inner: D,
    transform: Option<SecretInsertingTransform>,
}

impl<D: ClientData> TransformingClientData<D> {
    /// Wrap client data.
    ///
    /// ## Arguments
    /// * `inner` - the wrapped client data.
    /// * `transform` - the secret insertion transform; `None` is the identity.
    pub fn new(
        inner: D,
        transform: Option<SecretInsertingTransform>,
    ) -> Self {
        Self { inner, transform }
    }

    /// The wrapped client data.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// The secret insertion transform, if any.
    pub fn transform(&self) -> Option<&SecretInsertingTransform> {
        self.transform.as_ref()
    }
}

impl<D: ClientData> ClientData for TransformingClientData<D> {
    type Records<'a>
        = TransformedRecords<D::Records<'a>>
    where
        Self: 'a;

    fn client_ids(&self) -> &[String] {
        self.inner.client_ids()
    }

    fn client_records(
        &self,
        client_id: &str,
    ) -> FCResult<Self::Records<'_>> {
        let inner = self.inner.client_records(client_id)?;
        let transform = match &self.transform {
            Some(t) => t.make_transform(client_id, 0)?,
            None => None,
        };
        if transform.is_some() {
            log::debug!("Inserting secrets for client {client_id:?}");
        }
        Ok(TransformedRecords { inner, transform })
    }
}
