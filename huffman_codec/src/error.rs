//! Errors reported by the encoder and the decoder.

use thiserror::Error;

/// Error returned by operations of this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// There are no symbols to build the Huffman tree from.
    #[error("no symbols to build the Huffman tree from")]
    EmptyInput,

    /// The symbol has no code in the code table of the encoder.
    #[error("symbol {0:#04x} has no code in the code table")]
    UnknownSymbol(u8),

    /// The artifact is malformed or truncated.
    #[error("corrupt artifact: {0}")]
    CorruptArtifact(String),

    /// The underlying reader or writer failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Constructs [`Error::CorruptArtifact`] with the given `reason`.
    #[inline] pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Error::CorruptArtifact(reason.into())
    }
}

/// Result type of operations of this crate.
pub type Result<T> = std::result::Result<T, Error>;
