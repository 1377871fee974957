//! Metadata submitted to the application creation endpoint.

use serde_json::{Map, Value};

use crate::models::descriptor::{version_condition_mut, STRUCTURED_VERSION_KEYS};
use crate::models::ApplicationDescriptor;
use crate::resolver::UploadDecision;

/// Reference to the binary the server already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryReference {
    /// Final transaction id of a chunked upload.
    Transaction(String),
    /// Blob created by a server-side fetch from a link.
    Blob(i64),
}

/// Assembles the creation body for `descriptor`.
///
/// Transfer-only fields are removed and exactly one binary reference is
/// added. A new version carries the anchor's `BundleId`. For installer
/// packages uploaded in chunks the structured version fields are blanked,
/// because the server derives them from the binary and rejects or ignores
/// precomputed values.
pub fn build_creation_metadata(
    descriptor: &ApplicationDescriptor,
    reference: &BinaryReference,
    decision: &UploadDecision,
    group_id: i64,
) -> Map<String, Value> {
    let mut metadata = descriptor.creation_metadata();
    metadata.remove("TransactionId");
    metadata.remove("BlobId");

    match reference {
        BinaryReference::Transaction(id) => {
            metadata.insert("TransactionId".into(), Value::String(id.clone()));
        }
        BinaryReference::Blob(id) => {
            metadata.insert("BlobId".into(), Value::from(*id));
        }
    }

    if let Some(bundle_id) = decision.bundle_id() {
        metadata.insert("BundleId".into(), Value::String(bundle_id.to_string()));
    }

    metadata
        .entry("LocationGroupId")
        .or_insert_with(|| Value::from(group_id));

    let via_link = matches!(reference, BinaryReference::Blob(_));
    if descriptor.kind.requires_structured_version() && !via_link {
        if let Some(condition) = version_condition_mut(&mut metadata) {
            for key in STRUCTURED_VERSION_KEYS {
                condition.insert(key.to_string(), Value::String(String::new()));
            }
        }
    }

    metadata
}
