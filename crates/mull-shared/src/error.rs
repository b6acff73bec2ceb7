use thiserror::Error;

/// Failures raised while resolving, validating or editing relay references.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("`{0}` is not in the right format (ab-cde-fg-123 or abcd123-efgh456)")]
    InvalidFormat(String),

    #[error("Relay `{0}` already in list")]
    AlreadyExists(String),

    #[error("Relay `{0}` not found")]
    NotFound(String),

    #[error("Index {index} out of range ({len} entries)")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("No query results available: {0}")]
    ResultsUnavailable(String),

    #[error("No query provided")]
    EmptyQuery,
}

impl RelayError {
    /// Build an `IndexOutOfRange` from any integer index.
    pub fn out_of_range(index: impl TryInto<i64>, len: usize) -> Self {
        RelayError::IndexOutOfRange {
            index: index.try_into().unwrap_or(i64::MAX),
            len,
        }
    }
}
