//! Upload orchestrator for multi-file uploads.
//!
//! Runs one coordinator per file, aggregates progress events, and
//! supports cancellation of the whole batch.

use futures_util::StreamExt;
use futures_util::stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use corpus_transfer::ProgressCallback;

use crate::coordinator::{UploadCoordinator, UploadOptions};
use crate::transport::{ChunkTransport, RecordFinalizer};
use crate::types::{UploadEvent, UploadJob, UploadOutcome};

const DEFAULT_CONCURRENCY: usize = 2;

/// Orchestrates uploads of several files.
pub struct UploadOrchestrator {
    events_tx: mpsc::Sender<UploadEvent>,
    events_rx: Option<mpsc::Receiver<UploadEvent>>,
    cancel: CancellationToken,
    options: UploadOptions,
    concurrency: usize,
}

impl Default for UploadOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadOrchestrator {
    /// Creates a new orchestrator.
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
            options: UploadOptions::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }

    /// Maximum number of files in flight at once (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<UploadEvent>> {
        self.events_rx.take()
    }

    /// Returns the cancellation token shared by every upload in the batch.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Uploads every job, several at a time.
    ///
    /// Each file runs independently under its own session. If one fails,
    /// the others continue. Returns one outcome per job, in job order.
    ///
    /// Events are dropped rather than awaited when the channel is full or
    /// the receiver was never taken.
    pub async fn upload_all(
        &self,
        transport: &dyn ChunkTransport,
        finalizer: &dyn RecordFinalizer,
        jobs: Vec<UploadJob>,
    ) -> Vec<UploadOutcome> {
        if jobs.is_empty() {
            return Vec::new();
        }

        info!(files = jobs.len(), concurrency = self.concurrency, "batch upload started");

        stream::iter(jobs)
            .map(|job| self.upload_single(transport, finalizer, job))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn upload_single(
        &self,
        transport: &dyn ChunkTransport,
        finalizer: &dyn RecordFinalizer,
        job: UploadJob,
    ) -> UploadOutcome {
        let filename = job.source.filename().to_string();
        let coordinator = UploadCoordinator::new(transport, finalizer, self.cancel.clone())
            .with_options(self.options.clone());

        let events_tx = self.events_tx.clone();
        let on_progress: ProgressCallback = Box::new(move |progress| {
            let _ = events_tx.try_send(UploadEvent::Progress(progress.clone()));
        });

        let result = coordinator
            .upload_file_in_chunks(&job.source, job.metadata, Some(&on_progress))
            .await;

        match &result {
            Ok(record) => {
                let _ = self.events_tx.try_send(UploadEvent::Completed {
                    filename: filename.clone(),
                    uid: record.uid.clone(),
                });
                info!(file = %filename, uid = %record.uid, "upload completed");
            }
            Err(e) => {
                let err_msg = e.to_string();
                let _ = self.events_tx.try_send(UploadEvent::Failed {
                    filename: filename.clone(),
                    error: err_msg.clone(),
                });
                error!(file = %filename, error = %err_msg, "upload failed");
            }
        }

        UploadOutcome { filename, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::tests::{MockServer, metadata};
    use crate::error::UploadError;
    use corpus_transfer::MediaSource;

    fn job(name: &str, len: usize) -> UploadJob {
        UploadJob {
            source: MediaSource::from_bytes(name, vec![5u8; len]),
            metadata: metadata(),
        }
    }

    fn small_chunks() -> UploadOptions {
        UploadOptions { chunk_size: 4 }
    }

    #[tokio::test]
    async fn upload_all_empty() {
        let orch = UploadOrchestrator::new();
        let server = MockServer::default();
        let outcomes = orch.upload_all(&server, &server, Vec::new()).await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn upload_all_keeps_job_order_and_distinct_sessions() {
        let mut orch = UploadOrchestrator::new()
            .with_options(small_chunks())
            .with_concurrency(3);
        let mut rx = orch.take_events().unwrap();
        let server = MockServer::default();

        let outcomes = orch
            .upload_all(
                &server,
                &server,
                vec![job("a.mp4", 10), job("b.mp4", 3), job("c.mp4", 17)],
            )
            .await;

        let names: Vec<&str> = outcomes.iter().map(|o| o.filename.as_str()).collect();
        assert_eq!(names, vec!["a.mp4", "b.mp4", "c.mp4"]);
        assert!(outcomes.iter().all(UploadOutcome::is_success));

        let uids: std::collections::HashSet<String> = outcomes
            .iter()
            .map(|o| o.result.as_ref().unwrap().uid.clone())
            .collect();
        assert_eq!(uids.len(), 3);
        assert_eq!(server.finalize_count(), 3);

        let mut progress = 0;
        let mut completed = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                UploadEvent::Progress(_) => progress += 1,
                UploadEvent::Completed { .. } => completed += 1,
                UploadEvent::Failed { .. } => panic!("unexpected failure"),
            }
        }
        // 3 + 1 + 5 chunks
        assert_eq!(progress, 9);
        assert_eq!(completed, 3);
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_others() {
        let mut orch = UploadOrchestrator::new().with_options(small_chunks());
        let mut rx = orch.take_events().unwrap();
        let server = MockServer::default();

        let outcomes = orch
            .upload_all(&server, &server, vec![job("ok.mp4", 8), job("empty.mp4", 0)])
            .await;

        assert!(outcomes[0].is_success());
        assert!(matches!(outcomes[1].result, Err(UploadError::EmptySource)));

        let mut failed = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let UploadEvent::Failed { filename, .. } = event {
                failed.push(filename);
            }
        }
        assert_eq!(failed, vec!["empty.mp4".to_string()]);
    }

    #[tokio::test]
    async fn cancel_token_stops_batch() {
        let orch = UploadOrchestrator::new().with_options(small_chunks());
        orch.cancel_token().cancel();
        let server = MockServer::default();

        let outcomes = orch
            .upload_all(&server, &server, vec![job("a.mp4", 8), job("b.mp4", 8)])
            .await;

        assert!(
            outcomes
                .iter()
                .all(|o| matches!(o.result, Err(UploadError::Cancelled)))
        );
        assert!(server.chunk_indices().is_empty());
    }

    #[tokio::test]
    async fn events_dropped_without_receiver() {
        // 300 progress events exceed the channel capacity; nothing blocks.
        let orch = UploadOrchestrator::new().with_options(UploadOptions { chunk_size: 1 });
        let server = MockServer::default();
        let outcomes = orch
            .upload_all(&server, &server, vec![job("big.mp4", 300)])
            .await;
        assert!(outcomes[0].is_success());
    }

    #[test]
    fn concurrency_is_at_least_one() {
        let orch = UploadOrchestrator::new().with_concurrency(0);
        assert_eq!(orch.concurrency, 1);
    }
}
