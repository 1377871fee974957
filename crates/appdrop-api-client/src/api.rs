//! Endpoint methods for the MDM REST API.

use appdrop_core::models::{
    AppSearchResponse, BlobUploadResponse, ChunkUploadRequest, ChunkUploadResponse,
    CreateApplicationResponse, ExistingApplication, GroupSearchResponse, OrganizationGroup,
};
use reqwest::StatusCode;
use serde_json::{Map, Value};

use crate::{ApiClient, ApiError};

pub const GROUP_SEARCH_PATH: &str = "/API/system/groups/search";
pub const APP_SEARCH_PATH: &str = "/API/mam/apps/search";
pub const UPLOAD_CHUNK_PATH: &str = "/API/mam/apps/internal/uploadchunk";
pub const UPLOAD_BLOB_PATH: &str = "/API/mam/blobs/uploadblob";
pub const CREATE_APPLICATION_PATH: &str = "/API/mam/apps/internal/application";

/// Page size requested from the application search.
pub const SEARCH_PAGE_SIZE: u32 = 500;

/// Outcome of a HEAD request against a download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkProbe {
    pub status: StatusCode,
    pub content_type: Option<String>,
}

impl ApiClient {
    /// Organization groups whose name matches `name`.
    pub async fn search_groups(&self, name: &str) -> Result<Vec<OrganizationGroup>, ApiError> {
        let response: GroupSearchResponse = self
            .get(GROUP_SEARCH_PATH, &[("name", name.to_string())])
            .await?;
        Ok(response.location_groups)
    }

    /// Every application named exactly `name` under the group, across all
    /// result pages. The server search is a substring match, so results with
    /// a different name are dropped.
    pub async fn search_applications(
        &self,
        name: &str,
        group_id: i64,
        platform: &str,
    ) -> Result<Vec<ExistingApplication>, ApiError> {
        let mut collected = Vec::new();
        let mut page = 0u32;

        loop {
            let query = [
                ("applicationname", name.to_string()),
                ("locationgroupid", group_id.to_string()),
                ("platform", platform.to_string()),
                ("page", page.to_string()),
                ("pagesize", SEARCH_PAGE_SIZE.to_string()),
            ];
            let response: AppSearchResponse = self.get(APP_SEARCH_PATH, &query).await?;
            let received = response.applications.len();
            collected.extend(response.applications);

            if received == 0 || collected.len() as u64 >= response.total {
                break;
            }
            page += 1;
        }

        tracing::debug!(
            application = %name,
            group_id,
            returned = collected.len(),
            "Application search completed"
        );

        collected.retain(|app| app.application_name == name);
        Ok(collected)
    }

    /// Submits one chunk of a chunked upload.
    pub async fn upload_chunk(
        &self,
        request: &ChunkUploadRequest,
    ) -> Result<ChunkUploadResponse, ApiError> {
        self.post_json(UPLOAD_CHUNK_PATH, request).await
    }

    /// Asks the server to fetch `link` itself and store it as a blob.
    pub async fn upload_blob_from_link(
        &self,
        file_name: &str,
        group_id: i64,
        link: &str,
    ) -> Result<BlobUploadResponse, ApiError> {
        let query = [
            ("fileName", file_name.to_string()),
            ("organizationGroupId", group_id.to_string()),
            ("moduleType", "Application".to_string()),
            ("fileLink", link.to_string()),
            ("accessVia", "Direct".to_string()),
        ];
        self.post_query(UPLOAD_BLOB_PATH, &query).await
    }

    /// Creates an internal application from assembled metadata.
    pub async fn create_application(
        &self,
        metadata: &Map<String, Value>,
    ) -> Result<CreateApplicationResponse, ApiError> {
        self.post_json(CREATE_APPLICATION_PATH, metadata).await
    }

    /// HEAD request against an external download link. No MDM credentials
    /// are sent to third-party hosts.
    pub async fn probe_link(&self, link: &str) -> Result<LinkProbe, ApiError> {
        let response = self
            .client()
            .head(link)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: link.to_string(),
                source,
            })?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        Ok(LinkProbe {
            status: response.status(),
            content_type,
        })
    }
}
