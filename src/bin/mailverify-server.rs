use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mailverify_lib::logging;
use mailverify_lib::server::{self, ServerConfig};

#[derive(Parser)]
#[command(name = "mailverify-server", version, about = "HTTP API for email verification")]
struct Args {
    /// TOML config file; env overrides (PORT, MAILVERIFY_*) still apply
    #[arg(long, env = "MAILVERIFY_CONFIG")]
    config: Option<PathBuf>,

    /// more logs (-v debug, -vv trace); RUST_LOG wins
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = ServerConfig::load(args.config.as_deref()).context("load configuration")?;
    server::run(config).await.context("run HTTP server")?;
    Ok(())
}
