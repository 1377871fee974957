//! Configuration module
//!
//! `IngestSettings` is the fully resolved run configuration (every value either
//! given explicitly or prompted for). `SessionContext` is built once from it
//! after the organization group is selected and is then shared read-only by
//! every component for the rest of the run.

use std::fmt;
use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Default chunk size: 5 MiB.
pub const DEFAULT_CHUNK_SIZE: usize = 5 * 1024 * 1024;
/// Smallest accepted chunk size: 1 MiB.
pub const MIN_CHUNK_SIZE: usize = 1024 * 1024;
/// Largest accepted chunk size: 100 MiB.
pub const MAX_CHUNK_SIZE: usize = 100 * 1024 * 1024;
/// Platform used for the application search when a descriptor names none.
pub const DEFAULT_PLATFORM: &str = "WinRT";

/// Username/password pair for Basic authentication.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Base64 of `username:password`, without the `Basic ` prefix.
    pub fn encoded(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolved settings for one run.
#[derive(Clone, Debug)]
pub struct IngestSettings {
    pub server_url: String,
    pub credentials: Credentials,
    pub api_key: String,
    pub organization_group: String,
    pub descriptor_dir: PathBuf,
    pub chunk_size: usize,
    pub dry_run: bool,
}

impl IngestSettings {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.server_url.starts_with("https://") || self.server_url.starts_with("http://")) {
            return Err(anyhow::anyhow!(
                "Server URL must start with https:// or http:// (got {:?})",
                self.server_url
            ));
        }

        if self.credentials.username.trim().is_empty() || self.credentials.password.is_empty() {
            return Err(anyhow::anyhow!("Username and password must not be empty"));
        }

        if self.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("API key must not be empty"));
        }

        if self.organization_group.trim().is_empty() {
            return Err(anyhow::anyhow!("Organization group name must not be empty"));
        }

        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            return Err(anyhow::anyhow!(
                "Chunk size must be between {} and {} bytes (got {})",
                MIN_CHUNK_SIZE,
                MAX_CHUNK_SIZE,
                self.chunk_size
            ));
        }

        if !self.descriptor_dir.is_dir() {
            return Err(anyhow::anyhow!(
                "Descriptor directory does not exist: {}",
                self.descriptor_dir.display()
            ));
        }

        Ok(())
    }
}

/// The organization group chosen for this run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrganizationGroupRef {
    pub id: i64,
    pub uuid: String,
    pub name: String,
}

/// Authenticated session context, immutable after setup.
#[derive(Clone, Debug)]
pub struct SessionContext {
    server_url: String,
    api_key: String,
    encoded_credentials: String,
    group: OrganizationGroupRef,
}

impl SessionContext {
    pub fn new(
        server_url: &str,
        api_key: impl Into<String>,
        credentials: &Credentials,
        group: OrganizationGroupRef,
    ) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            encoded_credentials: credentials.encoded(),
            group,
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn encoded_credentials(&self) -> &str {
        &self.encoded_credentials
    }

    pub fn group(&self) -> &OrganizationGroupRef {
        &self.group
    }

    pub fn group_id(&self) -> i64 {
        self.group.id
    }
}
