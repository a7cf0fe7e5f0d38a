// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use rig_audit::FileAuditSink;
use rig_runtime::Runtime;
use rig_secrets::EnvSecretsResolver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or_default() {
        Commands::ShowConfig => {
            let config = rig_config::load(cli.config.as_deref())?;
            println!("{}", serde_yaml::to_string(&config).unwrap_or_default());
            Ok(())
        }
        Commands::Serve => run_serve(cli.config.as_deref()).await,
    }
}

/// Load configuration, wire up the Runtime pipeline with the configured
/// packs, and serve the Gateway Protocol surface until the process is
/// signalled to stop.
async fn run_serve(config_path: Option<&std::path::Path>) -> anyhow::Result<()> {
    let config = rig_config::load(config_path)?;

    let audit = Arc::new(
        FileAuditSink::open(&config.audit.path)
            .with_context(|| format!("opening audit sink at {}", config.audit.path.display()))?,
    );
    let runtime = Arc::new(Runtime::new(config.policy.clone(), Arc::new(EnvSecretsResolver), audit));

    for pack in &config.packs {
        match pack.as_str() {
            "rig-pack-echo" | "rig-pack-demo" => {}
            other => {
                anyhow::bail!("unknown pack {other:?} — only rig-pack-echo and rig-pack-demo ship with this binary")
            }
        }
    }
    rig_packs::register_demo_packs(&runtime).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid server address {}:{}", config.server.host, config.server.port))?;

    info!(%addr, packs = ?config.packs, "starting rig gateway");
    rig_gateway::serve(addr, runtime).await
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
