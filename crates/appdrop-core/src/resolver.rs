//! Upload decision for a candidate package.
//!
//! Classification is a pure function of the candidate's extension, its version
//! and the records the server already holds under the same name.

use std::cmp::Ordering;

use crate::models::ExistingApplication;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadDecision {
    /// Same extension and same version already on the server.
    Skip { existing_version: String },
    /// Nothing with this name and extension exists yet.
    CreateNew,
    /// A different version exists; the new one is anchored to `bundle_id`.
    CreateNewVersion { bundle_id: String },
}

impl UploadDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadDecision::Skip { .. } => "skip",
            UploadDecision::CreateNew => "create_new",
            UploadDecision::CreateNewVersion { .. } => "create_new_version",
        }
    }

    pub fn bundle_id(&self) -> Option<&str> {
        match self {
            UploadDecision::CreateNewVersion { bundle_id } => Some(bundle_id),
            _ => None,
        }
    }
}

/// Classifies a candidate against the server's records.
///
/// Extensions are compared exactly. When several records share the extension
/// but none the version, the record with the highest version anchors the new
/// one; equal versions keep the server's order, so the first listed wins.
pub fn classify(
    extension: &str,
    version: &str,
    existing: &[ExistingApplication],
) -> UploadDecision {
    let mut same_extension: Vec<&ExistingApplication> = existing
        .iter()
        .filter(|app| app.extension() == extension)
        .collect();

    if same_extension.is_empty() {
        return UploadDecision::CreateNew;
    }

    if let Some(app) = same_extension.iter().find(|app| app.version == version) {
        return UploadDecision::Skip {
            existing_version: app.version.clone(),
        };
    }

    // Stable sort: ties keep server order.
    same_extension.sort_by(|a, b| compare_versions(&b.version, &a.version));
    UploadDecision::CreateNewVersion {
        bundle_id: same_extension[0].bundle_id.clone(),
    }
}

/// Orders dotted version strings segment by segment, numerically where both
/// segments are numbers and lexically otherwise. Missing segments count as 0.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left: Vec<&str> = a.trim().split('.').collect();
    let right: Vec<&str> = b.trim().split('.').collect();
    let len = left.len().max(right.len());

    for i in 0..len {
        let l = left.get(i).copied().unwrap_or("0");
        let r = right.get(i).copied().unwrap_or("0");
        let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
            (Ok(ln), Ok(rn)) => ln.cmp(&rn),
            _ => l.cmp(r),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
