//! Argument parsing and subcommand dispatch.

use std::sync::Arc;

use anyhow::Context;
use asc::{
    AppStoreVersionId, Client, PhasedReleaseForVersionQuery, PhasedReleaseId, PhasedReleaseState,
    PhasedReleaseUpdateAttributes, Response,
};
use asc_http::config::{BASE_URL_VAR, TIMEOUT_VAR, TOKEN_VAR};
use asc_http::{HttpTransport, TransportConfig};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::telemetry::LogFormat;

/// Manage App Store version phased releases.
#[derive(Debug, Parser)]
#[command(name = "asc-publish", version)]
pub struct Cli {
    /// Pre-signed App Store Connect bearer token [env: ASC_TOKEN]
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API root [env: ASC_BASE_URL]
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Whole-request timeout in seconds [env: ASC_TIMEOUT_SECS]
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enable phased release for an App Store version.
    Create {
        #[arg(long)]
        version_id: String,

        /// Initial state, e.g. INACTIVE or ACTIVE. Server default when omitted.
        #[arg(long)]
        state: Option<String>,
    },

    /// Pause, resume, or complete a phased release.
    Update {
        #[arg(long)]
        id: String,

        #[arg(long)]
        state: Option<String>,
    },

    /// Cancel a phased release that has not started.
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Read the phased release of an App Store version.
    Get {
        #[arg(long)]
        version_id: String,

        /// Attributes to include, comma separated.
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
}

impl Cli {
    /// Flags win over the environment.
    pub fn transport_config(&self) -> anyhow::Result<TransportConfig> {
        self.transport_config_with(|name| std::env::var(name).ok())
    }

    fn transport_config_with<F>(&self, env: F) -> anyhow::Result<TransportConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        TransportConfig::from_lookup(|name| {
            let flag = match name {
                TOKEN_VAR => self.token.clone(),
                BASE_URL_VAR => self.base_url.clone(),
                TIMEOUT_VAR => self.timeout_secs.map(|secs| secs.to_string()),
                _ => None,
            };
            flag.or_else(|| env(name))
        })
        .context("invalid App Store Connect configuration")
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let transport = HttpTransport::new(cli.transport_config()?)?;
    info!(base_url = %transport.base_url(), "transport ready");
    let client = Client::new(Arc::new(transport));
    let publishing = client.publishing();

    match cli.command {
        Command::Create { version_id, state } => {
            let (doc, response) = publishing
                .create_phased_release(
                    &AppStoreVersionId::new(version_id),
                    state.map(PhasedReleaseState::from),
                )
                .await?;
            report(&response);
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Update { id, state } => {
            let changes = PhasedReleaseUpdateAttributes {
                phased_release_state: state.map(PhasedReleaseState::from),
            };
            let (doc, response) = publishing
                .update_phased_release(&PhasedReleaseId::new(id), changes)
                .await?;
            report(&response);
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Delete { id } => {
            let response = publishing
                .delete_phased_release(&PhasedReleaseId::new(id))
                .await?;
            report(&response);
            println!("{}", response.status);
        }
        Command::Get { version_id, fields } => {
            let query = PhasedReleaseForVersionQuery { fields };
            let (doc, response) = publishing
                .get_phased_release_for_app_store_version(
                    &AppStoreVersionId::new(version_id),
                    Some(&query),
                )
                .await?;
            report(&response);
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}

fn report(response: &Response) {
    match response.rate() {
        Some(rate) => info!(
            status = response.status,
            limit = rate.limit,
            remaining = rate.remaining,
            "request complete"
        ),
        None => info!(status = response.status, "request complete"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("asc-publish").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn get_splits_fields_on_commas() {
        let cli = parse(&["get", "--version-id", "v-1", "--fields", "startDate,currentDayNumber"]);
        let Command::Get { version_id, fields } = cli.command else {
            panic!("expected get");
        };
        assert_eq!(version_id, "v-1");
        assert_eq!(fields, ["startDate", "currentDayNumber"]);
    }

    #[test]
    fn create_state_is_optional() {
        let cli = parse(&["create", "--version-id", "v-1"]);
        assert!(matches!(cli.command, Command::Create { state: None, .. }));
    }

    #[test]
    fn flags_override_environment() {
        let cli = parse(&["--token", "flag-jwt", "--timeout-secs", "7", "delete", "--id", "pr-1"]);
        let config = cli
            .transport_config_with(|name| match name {
                TOKEN_VAR => Some("env-jwt".to_owned()),
                BASE_URL_VAR => Some("http://localhost:4010/v1".to_owned()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.token, "flag-jwt");
        assert_eq!(config.base_url.as_str(), "http://localhost:4010/v1/");
        assert_eq!(config.timeout, Duration::from_secs(7));
    }

    #[test]
    fn missing_token_is_reported() {
        let cli = parse(&["delete", "--id", "pr-1"]);
        assert!(cli.transport_config_with(|_| None).is_err());
    }
}
