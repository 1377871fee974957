//! Settings resolution.
//!
//! Each value comes from the command line or its `APPDROP_*` environment
//! variable (a `.env` file is loaded first). Anything still missing is asked
//! for interactively, then the whole set is validated once.

use std::path::PathBuf;

use anyhow::Result;
use appdrop_core::{Credentials, IngestSettings, DEFAULT_CHUNK_SIZE};
use clap::Args;

use crate::prompt::Prompter;

const MIB: usize = 1024 * 1024;

#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Base URL of the MDM API server
    #[arg(long, env = "APPDROP_SERVER_URL")]
    pub server_url: Option<String>,

    /// Account used for Basic authentication
    #[arg(long, short = 'u', env = "APPDROP_USERNAME")]
    pub username: Option<String>,

    /// Password for the account (prompted without echo when absent)
    #[arg(long, env = "APPDROP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Tenant API key sent in the aw-tenant-code header
    #[arg(long, env = "APPDROP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Name of the organization group to ingest into
    #[arg(long, short = 'g', env = "APPDROP_ORG_GROUP")]
    pub org_group: Option<String>,

    /// Directory holding the application descriptors (*.json)
    #[arg(long, short = 'd', env = "APPDROP_DESCRIPTOR_DIR")]
    pub descriptor_dir: Option<PathBuf>,

    /// Chunk size in MiB for chunked uploads
    #[arg(
        long,
        env = "APPDROP_CHUNK_SIZE_MB",
        value_parser = clap::value_parser!(u64).range(1..=100)
    )]
    pub chunk_size_mb: Option<u64>,

    /// Resolve and report decisions without transferring or creating anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Fills the gaps in `args` from `prompter` and validates the result.
pub fn resolve_settings(args: SettingsArgs, prompter: &mut dyn Prompter) -> Result<IngestSettings> {
    let server_url = given_or_input(args.server_url, prompter, "Server URL: ")?;
    let username = given_or_input(args.username, prompter, "Username: ")?;
    let password = match non_empty(args.password) {
        Some(password) => password,
        None => prompter.password("Password: ")?,
    };
    let api_key = given_or_input(args.api_key, prompter, "API key: ")?;
    let organization_group =
        given_or_input(args.org_group, prompter, "Organization group name: ")?;
    let descriptor_dir = match args.descriptor_dir {
        Some(dir) => dir,
        None => PathBuf::from(prompter.input("Descriptor directory: ")?),
    };
    let chunk_size = args
        .chunk_size_mb
        .map(|mb| mb as usize * MIB)
        .unwrap_or(DEFAULT_CHUNK_SIZE);

    let settings = IngestSettings {
        server_url: server_url.trim_end_matches('/').to_string(),
        credentials: Credentials::new(username, password),
        api_key,
        organization_group,
        descriptor_dir,
        chunk_size,
        dry_run: args.dry_run,
    };
    settings.validate()?;
    Ok(settings)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn given_or_input(
    value: Option<String>,
    prompter: &mut dyn Prompter,
    prompt: &str,
) -> Result<String> {
    match non_empty(value) {
        Some(v) => Ok(v.trim().to_string()),
        None => prompter.input(prompt),
    }
}
