//! # Error Types

/// Errors from subword-bpe operations.
#[derive(Debug, thiserror::Error)]
pub enum BpeError {
    /// A vocabulary or model line did not match its expected field layout
    /// (wrong field count, non-integer weight).
    #[error("line {line}: malformed record: {detail}")]
    InputFormat {
        /// 1-based line number within the ingested stream.
        line: usize,
        /// Human-readable description of what was wrong with the line.
        detail: String,
    },

    /// The same key (token in a vocabulary file, pair in a model file)
    /// appeared twice while loading a file.
    #[error("line {line}: duplicate key {key:?}")]
    DuplicateKey {
        /// 1-based line number of the second (rejected) occurrence.
        line: usize,
        /// The token or `"a b"` pair text that was duplicated.
        key: String,
    },

    /// Propagated I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for subword-bpe operations.
pub type BpeResult<T> = Result<T, BpeError>;
