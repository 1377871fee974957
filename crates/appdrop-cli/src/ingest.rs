//! Run orchestration.
//!
//! Descriptors are processed one at a time: load, resolve against the
//! server, transfer the binary, create the application. Problems with one
//! descriptor are logged and recorded; only session failures stop the run.

use std::path::Path;

use appdrop_api_client::chunked::ChunkedTransfer;
use appdrop_api_client::create::create_application;
use appdrop_api_client::link::{transfer_from_link, LinkTransfer};
use appdrop_api_client::ApiClient;
use appdrop_core::models::descriptor::discover_descriptor_files;
use appdrop_core::{
    classify, ApplicationDescriptor, BinaryReference, IngestError, SessionContext, UploadDecision,
};

use crate::summary::{EntryStatus, RunSummary};

/// Result of moving the binary to the server.
enum Transfer {
    Stored(BinaryReference),
    /// The link did not point at a directly fetchable file.
    LinkSkipped(String),
}

pub struct Orchestrator<'a> {
    client: &'a ApiClient,
    session: &'a SessionContext,
    chunk_size: usize,
    dry_run: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        client: &'a ApiClient,
        session: &'a SessionContext,
        chunk_size: usize,
        dry_run: bool,
    ) -> Self {
        Self {
            client,
            session,
            chunk_size,
            dry_run,
        }
    }

    /// Processes every descriptor in `dir`, in file-name order. Returns early
    /// with the error when it is fatal; `summary` keeps what was done so far.
    pub async fn run(&self, dir: &Path, summary: &mut RunSummary) -> Result<(), IngestError> {
        let files = discover_descriptor_files(dir)?;
        tracing::info!(
            directory = %dir.display(),
            descriptors = files.len(),
            dry_run = self.dry_run,
            "Starting ingestion"
        );

        for path in files {
            let descriptor = match ApplicationDescriptor::from_file(&path) {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    tracing::error!(descriptor = %path.display(), error = %e, "Descriptor rejected");
                    summary.record(descriptor_label(&path), EntryStatus::Failed, e.to_string());
                    continue;
                }
            };

            match self.process(&descriptor).await {
                Ok((status, detail)) => summary.record(&descriptor.application_name, status, detail),
                Err(e) if e.is_fatal() => {
                    tracing::error!(
                        application = %descriptor.application_name,
                        error = %e,
                        "Aborting run"
                    );
                    summary.record(&descriptor.application_name, EntryStatus::Failed, e.to_string());
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!(
                        application = %descriptor.application_name,
                        error = %e,
                        "Application not ingested"
                    );
                    summary.record(&descriptor.application_name, EntryStatus::Failed, e.to_string());
                }
            }
        }

        Ok(())
    }

    async fn process(
        &self,
        descriptor: &ApplicationDescriptor,
    ) -> Result<(EntryStatus, String), IngestError> {
        let existing = self
            .client
            .search_applications(
                &descriptor.application_name,
                self.session.group_id(),
                &descriptor.platform,
            )
            .await
            .map_err(|e| e.into_search_error())?;

        let decision = classify(descriptor.extension(), &descriptor.version, &existing);
        tracing::info!(
            application = %descriptor.application_name,
            version = %descriptor.version,
            existing = existing.len(),
            decision = decision.as_str(),
            "Resolved upload decision"
        );

        if let UploadDecision::Skip { existing_version } = &decision {
            let detail = format!("version {} already present", existing_version);
            tracing::warn!(application = %descriptor.application_name, "Skipping: {}", detail);
            return Ok((EntryStatus::Skipped, detail));
        }

        if self.dry_run {
            let detail = match decision.bundle_id() {
                Some(bundle_id) => format!("would create new version of {}", bundle_id),
                None => "would create new application".to_string(),
            };
            return Ok((EntryStatus::Planned, detail));
        }

        let reference = match self.transfer(descriptor).await? {
            Transfer::Stored(reference) => reference,
            Transfer::LinkSkipped(reason) => {
                return Ok((EntryStatus::Skipped, format!("link not usable: {}", reason)))
            }
        };

        let created = create_application(
            self.client,
            descriptor,
            &reference,
            &decision,
            self.session.group_id(),
        )
        .await?;

        let id = created
            .id
            .map(|id| id.value.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        tracing::info!(
            application = %descriptor.application_name,
            application_id = %id,
            decision = decision.as_str(),
            "Application created"
        );

        let detail = match &reference {
            BinaryReference::Transaction(tx) => format!("id {} (transaction {})", id, tx),
            BinaryReference::Blob(blob) => format!("id {} (blob {})", id, blob),
        };
        Ok((EntryStatus::for_decision(&decision), detail))
    }

    async fn transfer(&self, descriptor: &ApplicationDescriptor) -> Result<Transfer, IngestError> {
        match (&descriptor.application_url, descriptor.upload_via_link) {
            (Some(link), true) => {
                let outcome = transfer_from_link(
                    self.client,
                    link,
                    &descriptor.file_name,
                    self.session.group_id(),
                )
                .await?;
                match outcome {
                    LinkTransfer::Uploaded { blob_id } => {
                        Ok(Transfer::Stored(BinaryReference::Blob(blob_id)))
                    }
                    LinkTransfer::Skipped { reason } => {
                        tracing::warn!(
                            application = %descriptor.application_name,
                            link = %link,
                            "Link upload skipped: {}",
                            reason
                        );
                        Ok(Transfer::LinkSkipped(reason))
                    }
                }
            }
            _ => {
                let upload = ChunkedTransfer::new(self.client, self.chunk_size)
                    .upload(&descriptor.local_file())
                    .await?;
                tracing::info!(
                    application = %descriptor.application_name,
                    chunks = upload.chunks,
                    bytes = upload.bytes,
                    "Chunked upload complete"
                );
                let reference = BinaryReference::Transaction(upload.transaction_id);
                Ok(Transfer::Stored(reference))
            }
        }
    }
}

fn descriptor_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
