//! Adapters bridging `corpus_client::Client` to the transport traits
//! required by `corpus-upload`.

use corpus_client::Client;
use corpus_protocol::records::{ChunkAck, ChunkForm, FinalizeRequest, MediaRecord};
use corpus_upload::{ChunkTransport, RecordFinalizer, TransportFuture, UploadError};

/// Implements both upload traits over one HTTP client.
pub struct ClientAdapter {
    client: Client,
}

impl ClientAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ChunkTransport for ClientAdapter {
    fn send_chunk(&self, data: Vec<u8>, form: ChunkForm) -> TransportFuture<'_, ChunkAck> {
        Box::pin(async move {
            self.client
                .send_chunk(data, &form)
                .await
                .map_err(|e| UploadError::Transport(e.to_string()))
        })
    }
}

impl RecordFinalizer for ClientAdapter {
    fn finalize(&self, request: FinalizeRequest) -> TransportFuture<'_, MediaRecord> {
        Box::pin(async move {
            self.client
                .finalize(&request)
                .await
                .map_err(|e| UploadError::Finalize(e.to_string()))
        })
    }
}
