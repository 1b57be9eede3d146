//! Records API client.
//!
//! Async HTTP client using `reqwest`, authenticated with an explicit
//! bearer credential supplied at construction.

use corpus_protocol::constants::{CHUNK_REQUEST_TIMEOUT, DEFAULT_BASE_URL, REQUEST_TIMEOUT};
use corpus_protocol::records::{ChunkAck, ChunkForm, FinalizeRequest, MediaRecord};
use corpus_protocol::{Endpoint, extract_error_message};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Errors from the corpus API client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response. `message` is the server's first detail
    /// message, or the operation's fallback text.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid access token")]
    InvalidToken,
}

impl Error {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Credential attached to every request.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// No `Authorization` header; the server decides whether to reject.
    #[default]
    Anonymous,
    Bearer(String),
}

impl Credentials {
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(t) if !t.is_empty() => Self::Bearer(t),
            _ => Self::Anonymous,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Corpus API client.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a client for `base_url` carrying `credentials` on every request.
    pub fn new(base_url: &str, credentials: &Credentials) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Credentials::Bearer(token) = credentials {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| Error::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let base_url = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url.trim_end_matches('/')
        };

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Uploads one chunk of a session.
    pub async fn send_chunk(&self, data: Vec<u8>, form: &ChunkForm) -> Result<ChunkAck, Error> {
        let len = data.len();
        let part = Part::bytes(data)
            .file_name(form.filename.clone())
            .mime_str("application/octet-stream")?;
        let mut multipart = Form::new().part("chunk", part);
        for (name, value) in form.fields() {
            multipart = multipart.text(name, value);
        }

        let resp = self
            .http
            .post(self.url(Endpoint::UploadChunk))
            .timeout(CHUNK_REQUEST_TIMEOUT)
            .multipart(multipart)
            .send()
            .await?;
        let body = success_body(resp, Endpoint::UploadChunk).await?;

        debug!(
            upload_uuid = %form.upload_uuid,
            chunk_index = form.chunk_index,
            bytes = len,
            "chunk accepted"
        );

        // The acknowledgement is opaque; an empty or non-JSON body still counts.
        Ok(serde_json::from_slice(&body).unwrap_or(ChunkAck::Null))
    }

    /// Converts an acknowledged chunk set into a persisted record.
    pub async fn finalize(&self, request: &FinalizeRequest) -> Result<MediaRecord, Error> {
        let mut multipart = Form::new();
        for (name, value) in request.form_fields() {
            multipart = multipart.text(name, value);
        }

        let resp = self
            .http
            .post(self.url(Endpoint::UploadRecord))
            .timeout(REQUEST_TIMEOUT)
            .multipart(multipart)
            .send()
            .await?;
        let body = success_body(resp, Endpoint::UploadRecord).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Performs a JSON POST.
    pub(crate) async fn post_json<B, R>(&self, endpoint: Endpoint, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self
            .http
            .post(self.url(endpoint))
            .timeout(REQUEST_TIMEOUT)
            .json(body)
            .send()
            .await?;
        let body = success_body(resp, endpoint).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Performs a GET returning JSON.
    pub(crate) async fn get_json<R: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<R, Error> {
        let resp = self
            .http
            .get(self.url(endpoint))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        let body = success_body(resp, endpoint).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Returns the body of a successful response, or the API error it carries.
async fn success_body(resp: reqwest::Response, endpoint: Endpoint) -> Result<Vec<u8>, Error> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.bytes().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| endpoint.fallback_error().to_string());
        debug!(
            endpoint = endpoint.path(),
            status = status.as_u16(),
            %message,
            "request rejected"
        );
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp.bytes().await?.to_vec())
}
