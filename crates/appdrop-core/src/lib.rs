//! appdrop core library
//!
//! Domain types shared by the API client and the CLI: application descriptors,
//! server records, upload decisions, the chunk reader used by chunked uploads,
//! error taxonomy and run configuration.

pub mod chunk;
pub mod config;
pub mod creation;
pub mod error;
pub mod models;
pub mod package;
pub mod resolver;

// Re-export commonly used types
pub use chunk::{Chunk, ChunkReader};
pub use config::{
    Credentials, IngestSettings, OrganizationGroupRef, SessionContext, DEFAULT_CHUNK_SIZE,
    DEFAULT_PLATFORM, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE,
};
pub use creation::{build_creation_metadata, BinaryReference};
pub use error::{IngestError, Severity};
pub use models::{ApplicationDescriptor, ExistingApplication, OrganizationGroup};
pub use package::{file_extension, PackageKind};
pub use resolver::{classify, compare_versions, UploadDecision};
