//! Crate-wide error type.

/// Errors surfaced by the sender and receiver roles.
#[derive(thiserror::Error, Debug)]
pub enum AdxError {
    /// I/O error from the socket, payload source, log file, or sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Datagram too short to carry the fixed header.
    #[error("datagram too short for header: {0} bytes")]
    TruncatedHeader(usize),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AdxError>;
