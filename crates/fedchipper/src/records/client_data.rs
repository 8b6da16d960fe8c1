//! # Client Data
//!
//! Client-partitioned record stores.

use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{FCResult, FedchipperError},
    records::ClientRecord,
    types::FCHashMap,
};

/// A store of records partitioned by client id.
///
/// Record iterators are [`Clone`]; so that per-client epochs can
/// re-read the same source definition rather than materializing it.
pub trait ClientData {
    /// The per-client record iterator.
    type Records<'a>: Iterator<Item = ClientRecord> + Clone
    where
        Self: 'a;

    /// All client ids, in a stable order.
    fn client_ids(&self) -> &[String];

    /// The records of one client.
    ///
    /// ## Returns
    /// The record iterator, or [`FedchipperError::UnknownClient`].
    fn client_records(
        &self,
        client_id: &str,
    ) -> FCResult<Self::Records<'_>>;

    /// The number of clients.
    fn num_clients(&self) -> usize {
        self.client_ids().len()
    }

    /// The records of all clients, pooled in client id order.
    fn pooled_records(&self) -> FCResult<PooledRecords<Self::Records<'_>>> {
        let sources = self
            .client_ids()
            .iter()
            .map(|id| self.client_records(id))
            .collect::<FCResult<Vec<_>>>()?;
        Ok(sources.into_iter().flatten())
    }
}

/// Pooled records of several clients; see [`ClientData::pooled_records`].
pub type PooledRecords<R> = core::iter::Flatten<std::vec::IntoIter<R>>;

/// A JSON lines row: a client id and the flattened record fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecordRow {
    /// The owning client.
    pub client_id: String,

    /// The record.
    #[serde(flatten)]
    pub record: ClientRecord,
}

/// In-memory [`ClientData`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryClientData {
    client_ids: Vec<String>,
    client_records: FCHashMap<String, Vec<ClientRecord>>,
}

impl InMemoryClientData {
    /// Build from `(client_id, record)` pairs.
    ///
    /// Client ids are ordered by first appearance;
    /// records keep their relative order within each client.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, ClientRecord)>,
        S: Into<String>,
    {
        let mut data = Self::default();
        for (client_id, record) in pairs {
            data.push(client_id, record);
        }
        data
    }

    /// Append a record to a client; registering the client if new.
    pub fn push<S: Into<String>>(
        &mut self,
        client_id: S,
        record: ClientRecord,
    ) {
        let client_id = client_id.into();
        match self.client_records.get_mut(&client_id) {
            Some(records) => records.push(record),
            None => {
                self.client_ids.push(client_id.clone());
                self.client_records.insert(client_id, vec![record]);
            }
        }
    }

    /// The total number of records.
    pub fn num_records(&self) -> usize {
        self.client_records.values().map(Vec::len).sum()
    }

    /// Load from a JSON lines file of [`ClientRecordRow`]s.
    pub fn load_jsonl_path<P: AsRef<Path>>(path: P) -> FCResult<Self> {
        let path = path.as_ref();
        log::info!("Loading client records: {}", path.display());
        Self::read_jsonl(BufReader::new(File::open(path)?))
    }

    /// Read from a JSON lines stream of [`ClientRecordRow`]s.
    pub fn read_jsonl<R: BufRead>(reader: R) -> FCResult<Self> {
        let mut data = Self::default();
        for row in serde_json::Deserializer::from_reader(reader).into_iter::<ClientRecordRow>() {
            let row = row?;
            data.push(row.client_id, row.record);
        }
        log::debug!(
            "Read {} records for {} clients",
            data.num_records(),
            data.num_clients()
        );
        Ok(data)
    }

    /// Write as a JSON lines stream of [`ClientRecordRow`]s.
    pub fn write_jsonl<W: Write>(
        &self,
        writer: &mut W,
    ) -> FCResult<()> {
        for client_id in &self.client_ids {
            for record in self.client_records.get(client_id).into_iter().flatten() {
                let row = ClientRecordRow {
                    client_id: client_id.clone(),
                    record: record.clone(),
                };
                serde_json::to_writer(&mut *writer, &row)?;
                writeln!(writer)?;
            }
        }
        Ok(())
    }
}

impl ClientData for InMemoryClientData {
    type Records<'a> = core::iter::Cloned<core::slice::Iter<'a, ClientRecord>>;

    fn client_ids(&self) -> &[String] {
        &self.client_ids
    }

    fn client_records(
        &self,
        client_id: &str,
    ) -> FCResult<Self::Records<'_>> {
        self.client_records
            .get(client_id)
            .map(|records| records.iter().cloned())
            .ok_or_else(|| FedchipperError::UnknownClient(client_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn sample_data() -> InMemoryClientData {
        InMemoryClientData::from_pairs([
            ("c1", ClientRecord::new("a b", "d0")),
            ("c0", ClientRecord::new("c", "d1")),
            ("c1", ClientRecord::new("b", "d2")),
        ])
    }

    #[test]
    fn test_in_memory_client_data() {
        let data = sample_data();
        assert_eq!(data.client_ids(), &["c1".to_string(), "c0".to_string()]);
        assert_eq!(data.num_clients(), 2);
        assert_eq!(data.num_records(), 3);

        let tokens: Vec<String> = data
            .client_records("c1")
            .unwrap()
            .map(|r| r.tokens)
            .collect();
        assert_eq!(tokens, vec!["a b".to_string(), "b".to_string()]);

        assert!(matches!(
            data.client_records("nope"),
            Err(FedchipperError::UnknownClient(_))
        ));

        let pooled: Vec<String> = data
            .pooled_records()
            .unwrap()
            .map(|r| r.creation_date)
            .collect();
        assert_eq!(pooled, vec!["d0", "d2", "d1"]);
    }

    #[test]
    fn test_jsonl_roundtrip() {
        let data = sample_data();

        let mut buf = Vec::new();
        data.write_jsonl(&mut buf).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with(r#"{"client_id":"c1","#));

        let loaded = InMemoryClientData::read_jsonl(Cursor::new(buf)).unwrap();
        assert_eq!(loaded.client_ids(), data.client_ids());
        assert_eq!(
            loaded.client_records("c1").unwrap().collect::<Vec<_>>(),
            data.client_records("c1").unwrap().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_read_jsonl_defaults_missing_fields() {
        let text = "{\"client_id\": \"x\", \"tokens\": \"hello world\"}\n\n";
        let data = InMemoryClientData::read_jsonl(Cursor::new(text)).unwrap();
        let record = data.client_records("x").unwrap().next().unwrap();
        assert_eq!(record.tokens, "hello world");
        assert_eq!(record.creation_date, "");
    }
}
