//! Chunked media upload: split, send, finalize.
//!
//! This crate implements the upload **business logic** with no HTTP
//! dependency. The caller provides [`ChunkTransport`] and
//! [`RecordFinalizer`] implementations that bridge to the actual API
//! client.
//!
//! # Pipeline
//!
//! 1. **Plan** — fix the chunk count from the source size and chunk size
//! 2. **Session** — generate a fresh random session identity
//! 3. **Chunks** — send each chunk in order, awaiting its acknowledgement
//! 4. **Finalize** — turn the acknowledged chunk set into a media record

pub mod coordinator;
pub mod error;
pub mod media;
pub mod orchestrator;
pub mod transport;
pub mod types;

// Re-export primary types for convenience.
pub use coordinator::{UploadCoordinator, UploadOptions, upload_file_in_chunks};
pub use error::UploadError;
pub use media::{infer_media_type, scan_media_files};
pub use orchestrator::UploadOrchestrator;
pub use transport::{ChunkTransport, RecordFinalizer, TransportFuture};
pub use types::{UploadEvent, UploadJob, UploadOutcome};
