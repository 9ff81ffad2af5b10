use thiserror::Error;

/// Main error type for TLV stream operations
#[derive(Error, Debug)]
pub enum TlvError {
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Timeout")]
    Timeout,

    #[error("Truncated record: {0}")]
    Truncated(String),

    #[error("Invalid length encoding: {0}")]
    InvalidEncoding(String),

    #[error("Record too large: {total} bytes exceeds limit of {max_len}")]
    TooLarge { total: usize, max_len: usize },

    #[error("Allocation failure: {0}")]
    Allocation(#[from] std::collections::TryReserveError),
}

/// Result type alias for TLV stream operations
pub type TlvResult<T> = Result<T, TlvError>;
