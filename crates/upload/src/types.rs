//! Data types for multi-file uploads.

use corpus_protocol::records::{MediaRecord, RecordMetadata};
use corpus_transfer::{MediaSource, UploadProgress};

use crate::error::UploadError;

/// One file to upload with its record metadata.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub source: MediaSource,
    pub metadata: RecordMetadata,
}

/// Event emitted while uploads run.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// A chunk was acknowledged.
    Progress(UploadProgress),
    /// The record was created.
    Completed { filename: String, uid: String },
    /// The upload failed or was cancelled.
    Failed { filename: String, error: String },
}

/// Result of a single job, in job order.
#[derive(Debug)]
pub struct UploadOutcome {
    pub filename: String,
    pub result: Result<MediaRecord, UploadError>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
