use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

/// Everything that can go wrong while building or reading a container.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// The input doesn't start with the PNG signature.
    #[error("input doesn't start with the expected signature")]
    InvalidSignature,

    #[error("input truncated at byte {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("checksum mismatch in {chunk_type} chunk: expected {expected:#010x}, found {found:#010x}")]
    ChecksumMismatch {
        chunk_type: String,
        expected: u32,
        found: u32,
    },

    #[error("failed to decompress image data: {0}")]
    Decompression(String),

    #[error("missing required metadata: {0}")]
    MissingMetadata(&'static str),

    #[error("malformed container: {0}")]
    Format(String),
}
