//! appdrop: bulk ingestion of application packages into an MDM server.
//!
//! The binary resolves its settings, establishes a session against one
//! organization group and then hands every descriptor to the orchestrator.

pub mod ingest;
pub mod prompt;
pub mod session;
pub mod settings;
pub mod summary;

/// Initialize tracing for the CLI. `verbose` forces debug level; otherwise
/// `RUST_LOG` applies, defaulting to info.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
