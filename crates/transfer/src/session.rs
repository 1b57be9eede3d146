use std::fmt;
use std::time::Instant;

use corpus_protocol::records::{ChunkForm, FinalizeRequest, RecordMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TransferError;
use crate::plan::ChunkPlan;
use crate::progress::UploadProgress;

/// Client-generated identity correlating every chunk of one upload attempt
/// with its finalize call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random (v4) identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

/// Lifecycle of an upload session on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Pending,
    InProgress,
    Finalizing,
    Completed,
    Failed,
    Cancelled,
}

/// State of one in-flight file transfer.
///
/// Owned by a single upload task. Acknowledgements must arrive in plan
/// order, so the acknowledged set is always a prefix of the plan.
#[derive(Debug)]
pub struct UploadSession {
    id: SessionId,
    filename: String,
    plan: ChunkPlan,
    acked_count: u32,
    bytes_acked: u64,
    status: UploadStatus,
    error: Option<String>,
    started_at: Option<Instant>,
}

impl UploadSession {
    /// Creates a pending session with a freshly generated identity.
    pub fn new(filename: impl Into<String>, plan: ChunkPlan) -> Self {
        Self::with_id(SessionId::generate(), filename, plan)
    }

    pub fn with_id(id: SessionId, filename: impl Into<String>, plan: ChunkPlan) -> Self {
        Self {
            id,
            filename: filename.into(),
            plan,
            acked_count: 0,
            bytes_acked: 0,
            status: UploadStatus::Pending,
            error: None,
            started_at: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn plan(&self) -> &ChunkPlan {
        &self.plan
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Time since [`start`](Self::start), if started.
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.started_at.map(|t| t.elapsed())
    }

    /// Marks the session as in-progress.
    pub fn start(&mut self) {
        self.status = UploadStatus::InProgress;
        self.started_at = Some(Instant::now());
    }

    /// Form fields for chunk `index`.
    pub fn chunk_form(&self, index: u32) -> ChunkForm {
        ChunkForm {
            filename: self.filename.clone(),
            chunk_index: index,
            total_chunks: self.plan.total_chunks(),
            upload_uuid: self.id.to_string(),
        }
    }

    /// Index the server must acknowledge next, or `None` when all are in.
    pub fn next_index(&self) -> Option<u32> {
        (self.acked_count < self.plan.total_chunks()).then_some(self.acked_count)
    }

    /// Records the server's acknowledgement of chunk `index`.
    pub fn acknowledge(&mut self, index: u32) -> Result<UploadProgress, TransferError> {
        let len = self.plan.chunk_len(index)?;
        if index != self.acked_count {
            return Err(TransferError::OutOfOrder {
                expected: self.acked_count,
                got: index,
            });
        }
        self.acked_count += 1;
        self.bytes_acked += len;
        Ok(self.progress())
    }

    /// Acknowledgements form a prefix of the plan, so this is a bound check.
    pub fn is_acknowledged(&self, index: u32) -> bool {
        index < self.acked_count
    }

    pub fn acknowledged_count(&self) -> u32 {
        self.acked_count
    }

    /// Returns `true` once every planned chunk is acknowledged.
    pub fn is_complete(&self) -> bool {
        self.acked_count == self.plan.total_chunks()
    }

    /// Builds the finalize call and moves the session to `Finalizing`.
    pub fn begin_finalize(&mut self, metadata: RecordMetadata) -> FinalizeRequest {
        self.status = UploadStatus::Finalizing;
        FinalizeRequest {
            metadata,
            upload_uuid: self.id.to_string(),
            filename: self.filename.clone(),
            total_chunks: self.plan.total_chunks(),
        }
    }

    pub fn complete(&mut self) {
        self.status = UploadStatus::Completed;
    }

    pub fn fail(&mut self, err: &str) {
        self.status = UploadStatus::Failed;
        self.error = Some(err.to_string());
    }

    pub fn cancel(&mut self) {
        self.status = UploadStatus::Cancelled;
    }

    /// Returns `true` while the session can still make progress.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            UploadStatus::Pending | UploadStatus::InProgress | UploadStatus::Finalizing
        )
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> UploadProgress {
        UploadProgress::new(
            self.id.to_string(),
            self.filename.clone(),
            self.acked_count,
            self.plan.total_chunks(),
            self.bytes_acked,
            self.plan.total_size(),
        )
        .with_elapsed(self.elapsed().unwrap_or_default())
    }
}
