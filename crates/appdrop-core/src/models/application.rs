use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::package::file_extension;

/// Application record returned by `/API/mam/apps/search`.
///
/// Only used to classify an upload; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingApplication {
    #[serde(rename = "ApplicationName")]
    pub application_name: String,
    #[serde(rename = "ApplicationFileName", alias = "FileName", default)]
    pub file_name: String,
    #[serde(rename = "AppVersion", alias = "ActualFileVersion", default)]
    pub version: String,
    #[serde(rename = "BundleId", default)]
    pub bundle_id: String,
    #[serde(rename = "Id", default)]
    pub id: Option<EntityId>,
}

impl ExistingApplication {
    pub fn extension(&self) -> &str {
        file_extension(&self.file_name)
    }
}

/// Application search response envelope (one page).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSearchResponse {
    #[serde(rename = "Application", default)]
    pub applications: Vec<ExistingApplication>,
    #[serde(rename = "Page", default)]
    pub page: u32,
    #[serde(rename = "PageSize", default)]
    pub page_size: u32,
    #[serde(rename = "Total", default)]
    pub total: u64,
}
