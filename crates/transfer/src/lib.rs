//! Chunked media transfer: chunk planning, sequential chunk reading,
//! upload session state and progress accounting.

mod plan;
mod progress;
mod reader;
mod session;

pub use plan::ChunkPlan;
pub use progress::{ProgressCallback, SpeedCalculator, UploadProgress};
pub use reader::{Chunk, ChunkReader, MediaSource};
pub use session::{SessionId, UploadSession, UploadStatus};

/// Default chunk size: 1 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("{total_size} bytes in {chunk_size}-byte chunks exceeds the chunk index range")]
    TooManyChunks { total_size: u64, chunk_size: u64 },

    #[error("chunk {index} out of range (total {total})")]
    ChunkOutOfRange { index: u32, total: u32 },

    #[error("chunk {got} acknowledged out of order (expected {expected})")]
    OutOfOrder { expected: u32, got: u32 },

    #[error("short read on chunk {index}: expected {expected} bytes, got {got}")]
    ShortRead { index: u32, expected: u64, got: u64 },
}
