//! Upload error types.

/// Errors produced by an upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot upload an empty file")]
    EmptySource,

    /// A chunk or finalize request was rejected or never completed.
    /// The message is what the user sees.
    #[error("{0}")]
    Transport(String),

    /// The record finalizer rejected an otherwise complete chunk set.
    #[error("{0}")]
    Finalize(String),

    #[error("cancelled")]
    Cancelled,

    #[error("transfer error: {0}")]
    Transfer(#[from] corpus_transfer::TransferError),
}
