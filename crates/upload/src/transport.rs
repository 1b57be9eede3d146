//! Transport traits the coordinator drives.
//!
//! The app implements these on top of the HTTP client.

use std::future::Future;
use std::pin::Pin;

use corpus_protocol::records::{ChunkAck, ChunkForm, FinalizeRequest, MediaRecord};

use crate::error::UploadError;

/// Boxed future returned by transport calls.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, UploadError>> + Send + 'a>>;

/// Sends one chunk and resolves once the server acknowledged it.
pub trait ChunkTransport: Send + Sync {
    fn send_chunk(&self, data: Vec<u8>, form: ChunkForm) -> TransportFuture<'_, ChunkAck>;
}

/// Converts a fully acknowledged chunk set into a persisted record.
pub trait RecordFinalizer: Send + Sync {
    fn finalize(&self, request: FinalizeRequest) -> TransportFuture<'_, MediaRecord>;
}
