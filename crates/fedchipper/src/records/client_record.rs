//! # Client Records

use serde::{Deserialize, Serialize};

/// One raw client example.
///
/// Fields are sorted lexicographically by key, for consistency across datasets.
/// Only `tokens` and `creation_date` are consumed by preprocessing;
/// the remaining fields are carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientRecord {
    /// The example creation date; also used to seed per-example decisions.
    pub creation_date: String,

    /// The example score.
    pub score: i64,

    /// The example tags.
    pub tags: String,

    /// The example title.
    pub title: String,

    /// The raw sentence; words joined by single spaces.
    pub tokens: String,

    /// The example type.
    #[serde(rename = "type")]
    pub record_type: String,
}

impl ClientRecord {
    /// Create a record with the given `tokens` and `creation_date`.
    pub fn new<S, D>(
        tokens: S,
        creation_date: D,
    ) -> Self
    where
        S: Into<String>,
        D: Into<String>,
    {
        Self {
            tokens: tokens.into(),
            creation_date: creation_date.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json() {
        let json = r#"{"creation_date":"2010-01-01","score":3,"tokens":"a b","type":"question"}"#;
        let record: ClientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.creation_date, "2010-01-01");
        assert_eq!(record.score, 3);
        assert_eq!(record.tokens, "a b");
        assert_eq!(record.record_type, "question");
        assert_eq!(record.title, "");

        let rebuilt: ClientRecord =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(rebuilt, record);
    }
}
