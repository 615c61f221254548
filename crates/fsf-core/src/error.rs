//! Error types for FSF parsing and derivation
//!
//! All fallible operations return `Result<T, Error>`.
//! Lines that do not look like `set` statements are never errors;
//! everything below aborts the call that raised it.

use std::path::PathBuf;

/// FSF parse and derivation errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A positional field token arrived out of order in a sequence container
    #[error("line {line}: {container}({token}) out of order, expected index {expected}")]
    SequenceOrderViolation {
        line: usize,
        container: String,
        token: String,
        expected: usize,
    },

    /// Container name not present in the container kind table
    #[error("line {line}: unknown container '{container}'")]
    UnknownContainer { line: usize, container: String },

    /// Positional token on an object container, or named field on a sequence
    #[error("line {line}: field '{field}' does not fit {kind} container '{container}'")]
    ContainerKindMismatch {
        line: usize,
        container: String,
        field: String,
        kind: &'static str,
    },

    /// A raw value could not be converted to the type its field requires
    #[error("cannot convert {field} value '{raw}' to {expected}")]
    CoercionFailure {
        field: String,
        raw: String,
        expected: &'static str,
    },

    /// A derived view needed a key that is not in the design
    #[error("missing key '{0}'")]
    MissingDerivedKey(String),

    /// Two keys under one prefix carry the same trailing index
    #[error("keys under '{prefix}' share index {index}")]
    DuplicateIndex { prefix: String, index: u64 },

    /// Two records of one derived view carry the same name
    #[error("{view}: name '{name}' used more than once")]
    DuplicateName { view: &'static str, name: String },

    /// A key under a numbered prefix has no trailing digits
    #[error("key '{key}' under '{prefix}' has no trailing index")]
    UnindexedKey { prefix: String, key: String },

    /// A derived view expected a number
    #[error("value of '{key}' is not numeric: '{raw}'")]
    NotNumeric { key: String, raw: String },

    /// Contrast sets disagree on the number of contrasts
    #[error("{kind} contrasts: found {found} names, expected {expected}")]
    ContrastCountMismatch {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    /// Rows of a matrix have different lengths
    #[error("matrix row {row} has {found} values, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Design matrix text violates the fixed-key contract
    #[error("design matrix: {0}")]
    MatrixFormat(String),

    /// File could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for FSF operations
pub type Result<T> = std::result::Result<T, Error>;
