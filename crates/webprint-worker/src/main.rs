//! Rendering worker: receives the orchestrator's assembled command line and
//! drives one headless Chromium session to produce a PDF and/or a full-page
//! PNG.
//!
//! The process exits non-zero on any failure; the orchestrator interprets
//! the exit status and captured output.

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod args;
mod session;

use args::WorkerArgs;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("webprint_worker=info".parse()?),
        )
        .init();

    // Argument validation happens here, before any browser resource is
    // acquired; a missing required key exits non-zero without launching.
    let args = WorkerArgs::parse();

    info!(mode = ?args.input_mode, pdf = args.pdf, image = args.image, "starting render");
    session::run(&args).await?;
    info!("render finished");

    Ok(())
}
