//! Chunked transfer engine.
//!
//! Chunks are sent strictly one after another. Each request carries the
//! transaction id returned by the previous response (empty for the first
//! chunk); the server is authoritative for that value. Any failed chunk
//! aborts the transfer. There is no retry and no resume.

use std::path::Path;

use appdrop_core::models::ChunkUploadRequest;
use appdrop_core::{ChunkReader, IngestError};

use crate::ApiClient;

/// Result of a completed chunked upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedUpload {
    /// Identifier returned by the last chunk response.
    pub transaction_id: String,
    pub chunks: u32,
    pub bytes: u64,
}

pub struct ChunkedTransfer<'a> {
    client: &'a ApiClient,
    chunk_size: usize,
}

impl<'a> ChunkedTransfer<'a> {
    pub fn new(client: &'a ApiClient, chunk_size: usize) -> Self {
        Self { client, chunk_size }
    }

    /// Uploads `path` and returns the final transaction id.
    pub async fn upload(&self, path: &Path) -> Result<ChunkedUpload, IngestError> {
        // The reader owns the file handle; it is closed on every return path.
        let mut reader = ChunkReader::open(path, self.chunk_size).await?;
        let total_size = reader.file_size();
        if total_size == 0 {
            return Err(IngestError::EmptyFile(path.to_path_buf()));
        }

        tracing::info!(
            file = %path.display(),
            total_size,
            chunk_size = self.chunk_size,
            expected_chunks = ChunkReader::expected_chunks(total_size, self.chunk_size),
            "Starting chunked upload"
        );

        let mut transaction_id = String::new();
        let mut chunks = 0u32;
        let mut bytes = 0u64;

        while let Some(chunk) = reader.next_chunk().await? {
            let request = ChunkUploadRequest {
                transaction_id: transaction_id.clone(),
                chunk_data: chunk.encode(),
                chunk_sequence_number: chunk.sequence,
                total_application_size: total_size,
                chunk_size: chunk.len() as u64,
            };

            let response = self
                .client
                .upload_chunk(&request)
                .await
                .map_err(|e| IngestError::Transfer {
                    sequence: chunk.sequence,
                    message: e.to_string(),
                })?;

            if response.upload_success == Some(false) {
                return Err(IngestError::Transfer {
                    sequence: chunk.sequence,
                    message: "server reported UploadSuccess=false".to_string(),
                });
            }

            transaction_id = response.transaction_id.unwrap_or_default();
            chunks = chunk.sequence;
            bytes += chunk.len() as u64;

            tracing::debug!(
                sequence = chunk.sequence,
                chunk_bytes = chunk.len(),
                uploaded = bytes,
                total_size,
                transaction_id = %transaction_id,
                "Chunk uploaded"
            );
        }

        if transaction_id.is_empty() {
            return Err(IngestError::Protocol(format!(
                "no transaction id returned after {} chunk(s) of {}",
                chunks,
                path.display()
            )));
        }

        Ok(ChunkedUpload {
            transaction_id,
            chunks,
            bytes,
        })
    }
}
