//! End-of-run report.

use std::fmt;

use appdrop_core::UploadDecision;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Created,
    NewVersion,
    Skipped,
    Failed,
    /// Dry run: the decision that would have been carried out.
    Planned,
}

impl EntryStatus {
    fn label(self) -> &'static str {
        match self {
            EntryStatus::Created => "created",
            EntryStatus::NewVersion => "new version",
            EntryStatus::Skipped => "skipped",
            EntryStatus::Failed => "failed",
            EntryStatus::Planned => "planned",
        }
    }

    /// Status of a successful creation for `decision`.
    pub fn for_decision(decision: &UploadDecision) -> Self {
        match decision {
            UploadDecision::CreateNewVersion { .. } => EntryStatus::NewVersion,
            UploadDecision::CreateNew => EntryStatus::Created,
            UploadDecision::Skip { .. } => EntryStatus::Skipped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub application: String,
    pub status: EntryStatus,
    pub detail: String,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    entries: Vec<SummaryEntry>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        application: impl Into<String>,
        status: EntryStatus,
        detail: impl Into<String>,
    ) {
        self.entries.push(SummaryEntry {
            application: application.into(),
            status,
            detail: detail.into(),
        });
    }

    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    pub fn print(&self) {
        print!("{}", self);
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Summary: {} created, {} new versions, {} skipped, {} failed, {} planned",
            self.count(EntryStatus::Created),
            self.count(EntryStatus::NewVersion),
            self.count(EntryStatus::Skipped),
            self.count(EntryStatus::Failed),
            self.count(EntryStatus::Planned),
        )?;
        for entry in &self.entries {
            writeln!(
                f,
                "  [{:<11}] {}: {}",
                entry.status.label(),
                entry.application,
                entry.detail
            )?;
        }
        Ok(())
    }
}
