//! Application descriptors.
//!
//! A descriptor is a JSON object whose keys are the server's own field names,
//! so anything not recognized here is forwarded verbatim to the creation call.
//! `FilePath`, `ApplicationUrl` and `UploadViaLink` only steer the transfer and
//! are stripped before submission.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::DEFAULT_PLATFORM;
use crate::error::IngestError;
use crate::package::{file_extension, PackageKind};

pub const KEY_APPLICATION_NAME: &str = "ApplicationName";
pub const KEY_FILE_NAME: &str = "FileName";
pub const KEY_FILE_PATH: &str = "FilePath";
pub const KEY_APPLICATION_URL: &str = "ApplicationUrl";
pub const KEY_UPLOAD_VIA_LINK: &str = "UploadViaLink";
pub const KEY_ACTUAL_FILE_VERSION: &str = "ActualFileVersion";
pub const KEY_DEVICE_TYPE: &str = "DeviceType";

/// Keys that only steer the transfer and never reach the creation endpoint.
pub const TRANSFER_ONLY_KEYS: [&str; 3] = [KEY_FILE_PATH, KEY_APPLICATION_URL, KEY_UPLOAD_VIA_LINK];

/// Location of the structured version of installer packages.
pub const VERSION_CONDITION_POINTER: &str =
    "/DeploymentOptions/WhenToCallInstallComplete/IdentifyApplicationBy/DefiningCriteria/VersionCondition";

/// Structured version fields, in version order.
pub const STRUCTURED_VERSION_KEYS: [&str; 4] =
    ["MajorVersion", "MinorVersion", "BuildNumber", "RevisionNumber"];

/// One application to ingest.
#[derive(Debug, Clone)]
pub struct ApplicationDescriptor {
    /// File the descriptor was read from.
    pub source: PathBuf,
    pub application_name: String,
    pub file_name: String,
    /// Directory holding the package when uploading from disk.
    pub file_path: PathBuf,
    pub application_url: Option<String>,
    pub upload_via_link: bool,
    /// Version used to compare against existing records.
    pub version: String,
    pub kind: PackageKind,
    /// Platform filter for the application search.
    pub platform: String,
    record: Map<String, Value>,
}

impl ApplicationDescriptor {
    /// Reads and parses a descriptor file. A missing `FilePath` defaults to the
    /// descriptor's own directory.
    pub fn from_file(path: &Path) -> Result<Self, IngestError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| IngestError::descriptor(path, format!("cannot read file: {}", e)))?;
        let value: Value = serde_json::from_str(&raw)
            .map_err(|e| IngestError::descriptor(path, format!("invalid JSON: {}", e)))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_value(value, path, base_dir)
    }

    pub fn from_value(value: Value, source: &Path, base_dir: &Path) -> Result<Self, IngestError> {
        let Value::Object(record) = value else {
            return Err(IngestError::descriptor(
                source,
                "descriptor must be a JSON object",
            ));
        };

        let application_name = required_string(&record, KEY_APPLICATION_NAME, source)?;
        let file_name = required_string(&record, KEY_FILE_NAME, source)?;

        let file_path = match record.get(KEY_FILE_PATH) {
            None | Some(Value::Null) => base_dir.to_path_buf(),
            Some(Value::String(p)) if p.trim().is_empty() => base_dir.to_path_buf(),
            Some(Value::String(p)) => base_dir.join(p),
            Some(_) => {
                return Err(IngestError::descriptor(
                    source,
                    format!("{} must be a string", KEY_FILE_PATH),
                ))
            }
        };

        let application_url = match record.get(KEY_APPLICATION_URL) {
            None | Some(Value::Null) => None,
            Some(Value::String(u)) if u.trim().is_empty() => None,
            Some(Value::String(u)) => Some(u.trim().to_string()),
            Some(_) => {
                return Err(IngestError::descriptor(
                    source,
                    format!("{} must be a string", KEY_APPLICATION_URL),
                ))
            }
        };

        let upload_via_link = match record.get(KEY_UPLOAD_VIA_LINK) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                return Err(IngestError::descriptor(
                    source,
                    format!("{} must be a boolean", KEY_UPLOAD_VIA_LINK),
                ))
            }
        };

        if upload_via_link && application_url.is_none() {
            return Err(IngestError::descriptor(
                source,
                format!(
                    "{} is true but no {} is given",
                    KEY_UPLOAD_VIA_LINK, KEY_APPLICATION_URL
                ),
            ));
        }

        let kind = PackageKind::from_file_name(&file_name);
        let flat_version = record.get(KEY_ACTUAL_FILE_VERSION).and_then(scalar_to_string);
        let version = if kind.requires_structured_version() {
            structured_version(&record).or(flat_version)
        } else {
            flat_version
        }
        .unwrap_or_default();

        let platform = record
            .get(KEY_DEVICE_TYPE)
            .and_then(platform_for_device_type)
            .unwrap_or_else(|| DEFAULT_PLATFORM.to_string());

        Ok(Self {
            source: source.to_path_buf(),
            application_name,
            file_name,
            file_path,
            application_url,
            upload_via_link,
            version,
            kind,
            platform,
            record,
        })
    }

    /// Full path of the package on disk.
    pub fn local_file(&self) -> PathBuf {
        self.file_path.join(&self.file_name)
    }

    /// Naive four-character extension used for server-side matching.
    pub fn extension(&self) -> &str {
        file_extension(&self.file_name)
    }

    /// The descriptor record without transfer-only fields.
    pub fn creation_metadata(&self) -> Map<String, Value> {
        let mut metadata = self.record.clone();
        for key in TRANSFER_ONLY_KEYS {
            metadata.remove(key);
        }
        metadata
    }
}

fn required_string(
    record: &Map<String, Value>,
    key: &str,
    source: &Path,
) -> Result<String, IngestError> {
    match record.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) | None | Some(Value::Null) => Err(IngestError::descriptor(
            source,
            format!("missing required field {}", key),
        )),
        Some(_) => Err(IngestError::descriptor(
            source,
            format!("{} must be a string", key),
        )),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `major.minor.build.revision` from the nested version condition; absent
/// parts count as `0`, an absent major means no structured version.
fn structured_version(record: &Map<String, Value>) -> Option<String> {
    let condition = version_condition(record)?;
    let parts: Vec<Option<String>> = STRUCTURED_VERSION_KEYS
        .iter()
        .map(|key| condition.get(*key).and_then(scalar_to_string))
        .collect();
    parts[0].as_ref()?;
    Some(
        parts
            .into_iter()
            .map(|p| p.unwrap_or_else(|| "0".to_string()))
            .collect::<Vec<_>>()
            .join("."),
    )
}

pub(crate) fn version_condition(record: &Map<String, Value>) -> Option<&Map<String, Value>> {
    let mut segments = VERSION_CONDITION_POINTER.trim_start_matches('/').split('/');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = current.get(segment)?;
    }
    current.as_object()
}

pub(crate) fn version_condition_mut(
    record: &mut Map<String, Value>,
) -> Option<&mut Map<String, Value>> {
    let mut segments = VERSION_CONDITION_POINTER.trim_start_matches('/').split('/');
    let mut current = record.get_mut(segments.next()?)?;
    for segment in segments {
        current = current.get_mut(segment)?;
    }
    current.as_object_mut()
}

fn platform_for_device_type(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => match n.as_i64()? {
            2 => Some("Apple".to_string()),
            5 => Some("Android".to_string()),
            12 => Some("WinRT".to_string()),
            _ => None,
        },
        _ => None,
    }
}

/// Every `*.json` file directly inside `dir`, sorted by file name.
pub fn discover_descriptor_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
