use serde::{Deserialize, Serialize};

use super::EntityId;

/// Body of `POST /API/mam/apps/internal/uploadchunk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkUploadRequest {
    /// Identifier returned by the previous chunk; empty for the first one.
    #[serde(rename = "TransactionId")]
    pub transaction_id: String,
    /// Base64 of the raw chunk bytes.
    #[serde(rename = "ChunkData")]
    pub chunk_data: String,
    /// 1-based position of this chunk.
    #[serde(rename = "ChunkSequenceNumber")]
    pub chunk_sequence_number: u32,
    /// Size of the whole file in bytes.
    #[serde(rename = "TotalApplicationSize")]
    pub total_application_size: u64,
    /// Raw (pre-encoding) size of this chunk.
    #[serde(rename = "ChunkSize")]
    pub chunk_size: u64,
}

/// Response to a chunk upload.
///
/// Some server versions spell the identifier `TranscationId`; both are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkUploadResponse {
    #[serde(rename = "TransactionId", alias = "TranscationId", default)]
    pub transaction_id: Option<String>,
    #[serde(rename = "UploadSuccess", default)]
    pub upload_success: Option<bool>,
}

/// Response to `POST /API/mam/blobs/uploadblob`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobUploadResponse {
    #[serde(rename = "Value")]
    pub value: i64,
    #[serde(rename = "Uuid", alias = "uuid", default)]
    pub uuid: Option<String>,
}

/// Success body of `POST /API/mam/apps/internal/application`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateApplicationResponse {
    #[serde(rename = "Id", default)]
    pub id: Option<EntityId>,
    #[serde(rename = "ApplicationName", default)]
    pub application_name: Option<String>,
    #[serde(rename = "AppVersion", default)]
    pub app_version: Option<String>,
    #[serde(rename = "BundleId", default)]
    pub bundle_id: Option<String>,
}

/// Error envelope returned by the API on non-success statuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(rename = "errorCode", alias = "ErrorCode", default)]
    pub error_code: Option<i64>,
    #[serde(rename = "message", alias = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "activityId", alias = "ActivityId", default)]
    pub activity_id: Option<String>,
}

impl ApiErrorBody {
    /// The server's message when the body is an error envelope, else the raw body.
    pub fn message_from(raw: &str) -> String {
        serde_json::from_str::<ApiErrorBody>(raw)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| raw.to_string())
    }
}
