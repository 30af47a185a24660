mod config;
mod errors;
mod guard;
mod logging;
mod protocol;
mod server;
mod tools;


use crate::config::{Args, Config};
use crate::guard::PathGuard;
use crate::protocol::registry::CommandRegistry;
use crate::tools::FileService;
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cfg = Config::from_args(&args).context("loading config")?;
    logging::init(&cfg.log);

    if let Err(e) = cfg.validate() {
        error!(error = %e, "invalid project root");
        return Err(e).context("validating config");
    }
    let guard = PathGuard::new(&cfg.root.root_dir).context("opening project root")?;

    let registry = CommandRegistry::new(Arc::new(FileService::new(guard.clone())));
    info!(root = %guard.root().display(), commands = ?registry.list_names(), "sandbox-fs ready, waiting for commands on stdin");

    server::serve(&registry, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}
