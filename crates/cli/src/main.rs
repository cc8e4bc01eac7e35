//! `asc-publish` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse arguments**: `clap` flags, falling back to `ASC_*` environment
//!    variables for the transport configuration.
//! 2. **Wire observability**: install the `tracing-subscriber` stack (and the
//!    OTLP exporter when configured). All spans emitted by `asc` and
//!    `asc-http` flow through it.
//! 3. **Construct infrastructure**: build an `HttpTransport` and inject it
//!    into `asc::Client`.
//! 4. **Dispatch**: run exactly one subcommand, printing the decoded
//!    document as JSON on stdout.

mod commands;
mod telemetry;

use clap::Parser;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let telemetry = telemetry::init(cli.log_format)?;

    let run_id = Uuid::new_v4();
    let result = commands::run(cli)
        .instrument(info_span!("asc_publish", %run_id))
        .await;

    if let Err(err) = &result {
        let message = format!("{err:#}");
        tracing::error!(%run_id, error = %message, "command failed");
    }
    telemetry.shutdown();
    result
}
