//! # Error Types

/// Errors from fedchipper operations.
///
/// Every variant except [`Io`](Self::Io) and [`Json`](Self::Json) indicates
/// a misconfiguration which must be corrected by the caller.
#[derive(Debug, thiserror::Error)]
pub enum FedchipperError {
    /// A numeric option is out of its permitted range.
    #[error("{name} must be {requirement}; you have passed {value}")]
    InvalidOption {
        /// The option name.
        name: &'static str,

        /// A description of the permitted range.
        requirement: &'static str,

        /// The rejected value.
        value: i64,
    },

    /// The largest special token does not fit in the token type.
    #[error("max token ({max_token}) exceeds token type capacity")]
    TokenOverflow {
        /// The largest token id the configuration would emit.
        max_token: usize,
    },

    /// Vocabulary data is inconsistent.
    #[error("vocab conflict: {0}")]
    VocabConflict(String),

    /// The secrets configuration is invalid.
    #[error("invalid secrets: {0}")]
    InvalidSecrets(String),

    /// A per-client transform was requested for a replica other than zero.
    #[error(
        "secret insertion supports exactly one transformed replica per client; \
         `index` should always be zero, got {index}"
    )]
    TransformIndex {
        /// The rejected replica index.
        index: usize,
    },

    /// The client id is not known to the dataset.
    #[error("unknown client id: {0:?}")]
    UnknownClient(String),

    /// Parse error in an input source.
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for fedchipper operations.
pub type FCResult<T> = core::result::Result<T, FedchipperError>;

/// Build an [`FedchipperError::InvalidOption`] error.
pub(crate) fn invalid_option<T>(
    name: &'static str,
    requirement: &'static str,
    value: i64,
) -> FCResult<T> {
    Err(FedchipperError::InvalidOption {
        name,
        requirement,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_option_message() {
        let err = invalid_option::<()>("client_batch_size", "a positive integer", 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "client_batch_size must be a positive integer; you have passed 0"
        );
    }

    #[test]
    fn test_transform_index_message() {
        let err = FedchipperError::TransformIndex { index: 2 };
        assert!(err.to_string().ends_with("got 2"));
    }
}
