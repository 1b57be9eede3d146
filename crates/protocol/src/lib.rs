//! Wire types for the corpus records and auth HTTP API.
//!
//! Multipart form layouts for the chunk and finalize endpoints, the JSON
//! shapes returned by the server, and the endpoint table shared by the
//! HTTP client.

pub mod auth;
pub mod constants;
pub mod error;
pub mod records;

// Re-export primary types for convenience.
pub use constants::Endpoint;
pub use error::extract_error_message;
pub use records::{
    ChunkAck, ChunkForm, FinalizeRequest, Location, MediaRecord, RecordMetadata, RecordStatus,
};
