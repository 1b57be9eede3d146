//! Upload coordinator: one sequential chunk pipeline per file.

use corpus_protocol::records::{MediaRecord, RecordMetadata};
use corpus_transfer::{ChunkPlan, DEFAULT_CHUNK_SIZE, MediaSource, ProgressCallback, UploadSession};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::UploadError;
use crate::transport::{ChunkTransport, RecordFinalizer, TransportFuture};

/// Tunables for an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Bytes per chunk. Every chunk but the last has exactly this size.
    pub chunk_size: u64,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Drives a single upload from first chunk to finalize.
pub struct UploadCoordinator<'a> {
    transport: &'a dyn ChunkTransport,
    finalizer: &'a dyn RecordFinalizer,
    options: UploadOptions,
    cancel: CancellationToken,
}

impl<'a> UploadCoordinator<'a> {
    pub fn new(
        transport: &'a dyn ChunkTransport,
        finalizer: &'a dyn RecordFinalizer,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            transport,
            finalizer,
            options: UploadOptions::default(),
            cancel,
        }
    }

    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }

    /// Uploads `source` in chunks under a fresh session and finalizes it
    /// into a record carrying `metadata`.
    ///
    /// Chunk `i + 1` is never sent before chunk `i` is acknowledged.
    /// `on_progress` fires once per acknowledged chunk and reaches exactly
    /// 100 before finalize is attempted. The first failure aborts the
    /// upload; chunks already sent stay on the server.
    ///
    /// Cancellation is honoured up to the start of finalize. Once finalize
    /// is sent its response is awaited, so a created record is never
    /// reported as cancelled.
    pub async fn upload_file_in_chunks(
        &self,
        source: &MediaSource,
        metadata: RecordMetadata,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<MediaRecord, UploadError> {
        if source.is_empty() {
            return Err(UploadError::EmptySource);
        }
        self.check_cancelled()?;

        let plan = ChunkPlan::new(source.size(), self.options.chunk_size)?;
        let mut session = UploadSession::new(source.filename(), plan);
        session.start();

        info!(
            session = %session.id(),
            filename = %source.filename(),
            bytes = source.size(),
            total_chunks = plan.total_chunks(),
            "upload started"
        );

        match self.run(&mut session, source, metadata, on_progress).await {
            Ok(record) => {
                session.complete();
                info!(
                    session = %session.id(),
                    uid = %record.uid,
                    elapsed_ms = session.elapsed().map(|d| d.as_millis() as u64),
                    "upload finalized"
                );
                Ok(record)
            }
            Err(UploadError::Cancelled) => {
                session.cancel();
                warn!(
                    session = %session.id(),
                    orphaned_chunks = session.acknowledged_count(),
                    "upload cancelled"
                );
                Err(UploadError::Cancelled)
            }
            Err(e) => {
                session.fail(&e.to_string());
                warn!(
                    session = %session.id(),
                    orphaned_chunks = session.acknowledged_count(),
                    error = %e,
                    "upload failed"
                );
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        session: &mut UploadSession,
        source: &MediaSource,
        metadata: RecordMetadata,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<MediaRecord, UploadError> {
        let mut reader = source.open(*session.plan()).await?;

        loop {
            self.check_cancelled()?;
            let Some(chunk) = reader.next_chunk().await? else {
                break;
            };

            let index = chunk.index;
            let len = chunk.len();
            let form = session.chunk_form(index);
            self.cancellable(self.transport.send_chunk(chunk.data, form))
                .await?;

            let progress = session.acknowledge(index)?;
            debug!(
                session = %session.id(),
                chunk_index = index,
                bytes = len,
                percentage = progress.percentage,
                "chunk acknowledged"
            );
            if let Some(cb) = on_progress {
                cb(&progress);
            }
        }

        debug_assert!(session.is_complete());
        self.check_cancelled()?;

        let request = session.begin_finalize(metadata);
        self.finalizer.finalize(request).await
    }

    /// Races a transport call against cancellation.
    async fn cancellable<T>(&self, call: TransportFuture<'_, T>) -> Result<T, UploadError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(UploadError::Cancelled),
            result = call => result,
        }
    }

    fn check_cancelled(&self) -> Result<(), UploadError> {
        if self.cancel.is_cancelled() {
            Err(UploadError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// One-shot upload without external cancellation.
///
/// `chunk_size` defaults to [`DEFAULT_CHUNK_SIZE`].
pub async fn upload_file_in_chunks(
    transport: &dyn ChunkTransport,
    finalizer: &dyn RecordFinalizer,
    source: &MediaSource,
    metadata: RecordMetadata,
    chunk_size: Option<u64>,
    on_progress: Option<&ProgressCallback>,
) -> Result<MediaRecord, UploadError> {
    let options = UploadOptions {
        chunk_size: chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
    };
    UploadCoordinator::new(transport, finalizer, CancellationToken::new())
        .with_options(options)
        .upload_file_in_chunks(source, metadata, on_progress)
        .await
}
