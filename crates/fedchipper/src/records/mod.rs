//! # Client Records
//!
//! * [`ClientRecord`] - one raw client example.
//! * [`ClientData`] - client-partitioned record stores.
//! * [`InMemoryClientData`] - an in-memory store, with JSON lines io.
//! * [`TransformingClientData`] - applies secret insertion per client.

pub mod client_data;
pub mod client_record;
pub mod transforming_client_data;

#[doc(inline)]
pub use client_data::{ClientData, ClientRecordRow, InMemoryClientData, PooledRecords};
#[doc(inline)]
pub use client_record::ClientRecord;
#[doc(inline)]
pub use transforming_client_data::{TransformedRecords, TransformingClientData};
