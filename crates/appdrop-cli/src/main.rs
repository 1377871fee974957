//! appdrop: ingest application packages described by JSON descriptors into an
//! MDM server.
//!
//! Connection settings come from flags or APPDROP_* variables (a .env file is
//! honored) and are prompted for when missing.

use anyhow::Context;
use appdrop_api_client::ApiClient;
use appdrop_cli::ingest::Orchestrator;
use appdrop_cli::init_tracing;
use appdrop_cli::prompt::TerminalPrompter;
use appdrop_cli::session::establish_session;
use appdrop_cli::settings::{resolve_settings, SettingsArgs};
use appdrop_cli::summary::RunSummary;
use clap::Parser;

#[derive(Parser)]
#[command(name = "appdrop", version, about = "Bulk application ingestion for MDM servers")]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Log at debug level, including every chunk
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut prompter = TerminalPrompter;
    let settings = resolve_settings(cli.settings, &mut prompter).context("Invalid settings")?;

    let session = establish_session(&settings, &mut prompter)
        .await
        .context("Failed to establish session")?;
    let client = ApiClient::from_session(&session)?;

    let orchestrator = Orchestrator::new(
        &client,
        &session,
        settings.chunk_size,
        settings.dry_run,
    );
    let mut summary = RunSummary::new();
    let result = orchestrator.run(&settings.descriptor_dir, &mut summary).await;

    summary.print();
    result.context("Run aborted")?;
    Ok(())
}
