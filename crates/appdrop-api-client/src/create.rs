//! Application creation invoker.

use appdrop_core::models::CreateApplicationResponse;
use appdrop_core::{
    build_creation_metadata, ApplicationDescriptor, BinaryReference, IngestError, UploadDecision,
};

use crate::ApiClient;

/// Posts the creation request for `descriptor`. A rejection carries the
/// server's message verbatim and only fails this descriptor.
pub async fn create_application(
    client: &ApiClient,
    descriptor: &ApplicationDescriptor,
    reference: &BinaryReference,
    decision: &UploadDecision,
    group_id: i64,
) -> Result<CreateApplicationResponse, IngestError> {
    let metadata = build_creation_metadata(descriptor, reference, decision, group_id);

    tracing::debug!(
        application = %descriptor.application_name,
        fields = metadata.len(),
        "Submitting application creation"
    );

    client
        .create_application(&metadata)
        .await
        .map_err(|e| IngestError::Creation(e.server_message()))
}
