use thiserror::Error;

use crate::signature::Signature;

/// Failures detected by the decruncher itself while walking the bit stream.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrunchError {
    #[error("Crunched payload ended before the output was complete")]
    TruncatedInput,

    #[error("Decrunched data overflows the output buffer")]
    OutputOverflow,

    #[error("Back-reference points outside the decrunched data")]
    InvalidBackReference,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PowerPackerError {
    #[error("Input is not a PowerPacker container")]
    NotPowerPacker,

    #[error("{0} crunched files are not supported")]
    Unsupported(Signature),

    #[error("Container of {len} bytes is too short (minimum is 12)")]
    ContainerTooShort { len: usize },

    #[error("Decrunched size {len} exceeds the limit of {limit} bytes")]
    OutputTooLarge { len: usize, limit: usize },

    #[error("Corrupt crunched data: {0}")]
    Corrupt(#[from] DecrunchError),
}
