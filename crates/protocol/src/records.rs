use serde::{Deserialize, Serialize};

/// Moderation state of a corpus record.
///
/// Uploads always start out as `Pending`; the review workflow moves them to
/// `Approved` or `Rejected`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    /// A status string this client does not know about.
    #[serde(other)]
    Unknown,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque chunk acknowledgement. Only its arrival matters.
pub type ChunkAck = serde_json::Value;

/// Text fields sent alongside each chunk's binary `chunk` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkForm {
    pub filename: String,
    pub chunk_index: u32,
    pub total_chunks: u32,
    pub upload_uuid: String,
}

impl ChunkForm {
    /// Multipart text fields in wire order (`chunk` itself is added by the transport).
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("filename", self.filename.clone()),
            ("chunk_index", self.chunk_index.to_string()),
            ("total_chunks", self.total_chunks.to_string()),
            ("upload_uuid", self.upload_uuid.clone()),
        ]
    }
}

/// Caller-supplied metadata for a record.
///
/// Required fields are validated by the caller before an upload starts;
/// the upload pipeline passes them through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: String,
    pub user_id: String,
    pub media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub release_rights: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_uid_filename: Option<bool>,
}

/// Finalize call: session identity plus the record metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeRequest {
    pub metadata: RecordMetadata,
    pub upload_uuid: String,
    pub filename: String,
    pub total_chunks: u32,
}

impl FinalizeRequest {
    /// Multipart text fields in wire order. Absent optional values are omitted.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let m = &self.metadata;
        let mut fields = vec![("title", m.title.clone())];
        if let Some(description) = &m.description {
            fields.push(("description", description.clone()));
        }
        fields.push(("category_id", m.category_id.clone()));
        fields.push(("user_id", m.user_id.clone()));
        fields.push(("media_type", m.media_type.clone()));
        fields.push(("upload_uuid", self.upload_uuid.clone()));
        fields.push(("filename", self.filename.clone()));
        fields.push(("total_chunks", self.total_chunks.to_string()));
        if let Some(latitude) = m.latitude {
            fields.push(("latitude", latitude.to_string()));
        }
        if let Some(longitude) = m.longitude {
            fields.push(("longitude", longitude.to_string()));
        }
        fields.push(("release_rights", m.release_rights.clone()));
        fields.push(("language", m.language.clone()));
        if let Some(use_uid) = m.use_uid_filename {
            fields.push(("use_uid_filename", use_uid.to_string()));
        }
        fields
    }
}

/// Geolocation attached to a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// A persisted media record as returned by the finalize endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub media_type: String,
    pub file_url: String,
    pub file_name: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub reviewed: bool,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<String>,
    pub release_rights: String,
    pub language: String,
    pub uid: String,
    pub user_id: String,
    pub category_id: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
}
