//! secgroupctl: inspect and push rule documents in the security group cache.
//!
//! # Usage
//!
//! ```bash
//! # Push the rules of one or more groups for an interface
//! secgroupctl apply --device-id 5d4f3a2e-... --mac aa:bb:cc:dd:ee:ff --groups groups.json
//!
//! # Show what the enforcement agent will read
//! secgroupctl show --device-id 5d4f3a2e-... --mac aa:bb:cc:dd:ee:ff
//!
//! # Remove the document after a port is deleted
//! secgroupctl clear --device-id 5d4f3a2e-... --mac aa:bb:cc:dd:ee:ff
//! ```
//!
//! `groups.json` holds an array of security groups:
//!
//! ```json
//! [{"id": "6f1c...", "rules": [{"ethertype": 2048, "protocol": 6,
//!   "port_range_min": 22, "port_range_max": 22, "direction": "ingress"}]}]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};

use secgroup_redis::{SecgroupConfig, SecurityGroupClient, DEFAULT_CONFIG_PATH};
use secgroup_types::{MacAddress, SecurityGroup};

#[derive(Parser, Debug)]
#[command(name = "secgroupctl")]
#[command(about = "Manage security group rule documents in the rule cache", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serialize security groups and write them for an interface
    Apply {
        #[command(flatten)]
        target: Target,

        /// JSON file containing an array of security groups
        #[arg(long)]
        groups: PathBuf,
    },
    /// Print the stored rule document for an interface
    Show {
        #[command(flatten)]
        target: Target,
    },
    /// Remove the stored rule document for an interface
    Clear {
        #[command(flatten)]
        target: Target,
    },
}

/// The device interface a command addresses.
#[derive(Args, Debug)]
struct Target {
    /// Identifier of the device owning the port
    #[arg(long)]
    device_id: String,

    /// Hardware address of the interface (aa:bb:cc:dd:ee:ff or AA-BB-CC-DD-EE-FF)
    #[arg(long)]
    mac: MacAddress,
}

/// Initialize tracing/logging.
fn init_logging(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

/// Reads the security groups to apply.
fn load_groups(path: &Path) -> Result<Vec<SecurityGroup>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing security groups from {}", path.display()))
}

async fn run(cli: Cli) -> Result<bool> {
    let config = SecgroupConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let client = SecurityGroupClient::connect(&config.redis).await?;

    match cli.command {
        Command::Apply { target, groups } => {
            let groups = load_groups(&groups)?;
            let key = client.rule_key(&target.device_id, target.mac.to_u64());
            let outcome = client
                .write_rules(&target.device_id, target.mac.to_u64(), &groups)
                .await;

            if outcome.is_applied() {
                info!(key, groups = groups.len(), "Rules applied");
            } else {
                warn!(key, ?outcome, "Rules not applied");
            }
            Ok(outcome.is_applied())
        }
        Command::Show { target } => {
            match client
                .get_rules(&target.device_id, target.mac.to_u64())
                .await?
            {
                Some(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
                None => println!("no rules stored for {}", target.mac),
            }
            Ok(true)
        }
        Command::Clear { target } => {
            let outcome = client
                .delete_rules(&target.device_id, target.mac.to_u64())
                .await;
            Ok(outcome.is_applied())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("secgroupctl error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
