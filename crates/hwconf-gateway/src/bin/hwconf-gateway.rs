//! Hardware Configurator Gateway Binary
//!
//! # Usage
//! ```bash
//! hwconf-gateway [--config gateway.json] [--port 3000] [--host 127.0.0.1] \
//!     [--database data/configurator.db] [--verbose]
//! ```
//!
//! Environment (a `.env` file is read if present): `AUTH_SECRET`,
//! `DATABASE_PATH`, `OPENROUTER_API_KEY`, `OPENROUTER_MODEL`, `HOST`, `PORT`.

use anyhow::Context;
use clap::Parser;
use hwconf_gateway::config::log_filter;
use hwconf_gateway::{Gateway, GatewayConfig};

/// Hardware Configurator - requirements in, procurement-ready configurations out
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// SQLite database file
    #[arg(long)]
    database: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // .env is loaded first so a RUST_LOG there applies; it wins over --verbose
    let subscriber = tracing_subscriber::fmt().with_env_filter(log_filter(args.verbose));
    if args.verbose {
        subscriber.with_target(true).with_thread_ids(true).init();
    } else {
        subscriber.with_target(false).init();
    }

    let mut config = match &args.config {
        Some(path) => GatewayConfig::from_file(path)
            .with_context(|| format!("Failed to load config file {}", path))?,
        None => GatewayConfig::default(),
    }
    .apply_env()
    .context("Invalid environment configuration")?;

    if let Some(host) = args.host {
        config = config.with_host(host);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(database) = args.database {
        config = config.with_database_path(database);
    }

    if config.auth.uses_dev_secret() {
        tracing::warn!("AUTH_SECRET is not set, signing tokens with the development secret");
    }
    tracing::debug!(?config, "Configuration loaded");

    print_banner(&config);

    let gateway = Gateway::new(config).context("Failed to initialise gateway")?;
    gateway.start().await?;

    Ok(())
}

fn print_banner(config: &GatewayConfig) {
    println!();
    println!("Hardware Configurator API v{}", hwconf_gateway::VERSION);
    println!("   http://{}:{}", config.host, config.port);
    println!();
    println!("   GET  /api/health");
    println!("   POST /api/auth/signup | /api/auth/login");
    println!("   GET  /api/auth/profile | PUT /api/auth/profile");
    println!("   POST /api/generate");
    println!("   GET  /api/configurations | /api/configurations/:id");
    println!();
    println!("   database: {}", config.database_path);
    println!(
        "   summaries: {}",
        if config.openrouter.api_key().is_some() {
            config.openrouter.model.as_str()
        } else {
            "baseline only"
        }
    );
    println!();
}
