//! Link-based transfer engine.
//!
//! The server fetches the package itself. Links are probed first: storage
//! providers that do not expose direct file links answer with an HTML page
//! (login, preview, redirect target) that the server would happily store.

use appdrop_core::IngestError;
use reqwest::StatusCode;

use crate::api::LinkProbe;
use crate::ApiClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTransfer {
    /// The server stored the file under this blob id.
    Uploaded { blob_id: i64 },
    /// The link is not directly fetchable; nothing was sent to the server.
    Skipped { reason: String },
}

/// Accepts only a 200 answer whose content type is an `application/*` type.
pub fn check_probe(probe: &LinkProbe) -> Result<(), String> {
    if probe.status != StatusCode::OK {
        return Err(format!("link answered with status {}", probe.status));
    }
    match probe.content_type.as_deref() {
        Some(ct) if ct.trim().to_ascii_lowercase().starts_with("application/") => Ok(()),
        Some(ct) => Err(format!("link serves {} instead of a binary payload", ct)),
        None => Err("link did not report a content type".to_string()),
    }
}

pub async fn transfer_from_link(
    client: &ApiClient,
    link: &str,
    file_name: &str,
    group_id: i64,
) -> Result<LinkTransfer, IngestError> {
    let probe = match client.probe_link(link).await {
        Ok(probe) => probe,
        Err(e) => {
            return Ok(LinkTransfer::Skipped {
                reason: format!("link is not reachable: {}", e),
            })
        }
    };

    if let Err(reason) = check_probe(&probe) {
        return Ok(LinkTransfer::Skipped { reason });
    }

    let blob = client
        .upload_blob_from_link(file_name, group_id, link)
        .await
        .map_err(|e| IngestError::LinkUpload(e.server_message()))?;

    tracing::info!(file = %file_name, blob_id = blob.value, "Server fetched package from link");
    Ok(LinkTransfer::Uploaded {
        blob_id: blob.value,
    })
}
