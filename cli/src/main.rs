//! Car Management System - CLI server
//!
//! ```sh
//! # Run with default config (~/.config/car-management/config.toml)
//! car-management-cli
//!
//! # Custom config path and port
//! car-management-cli --config /etc/car-management/config.toml --port 8080
//!
//! # Load sample data, then serve
//! car-management-cli --seed
//!
//! # Validate config without starting
//! car-management-cli --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use car_management::config::AppConfig;
use car_management::server::{init_tracing, ServerHandle, ServerOptions};

/// Car inventory and maintenance tracking REST API.
#[derive(Parser, Debug)]
#[command(
    name = "car-management-cli",
    version,
    about = "Car inventory and maintenance tracking REST API",
    long_about = "REST API for cars, service records, fuel entries, reports and \
                  an activity log.\n\n\
                  Default config: ~/.config/car-management/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CAR_MANAGEMENT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,

    /// Wipe all tables and load sample users, cars and services.
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(car_management::default_config_path);

    let loaded = AppConfig::load(&config_path);
    if cli.check {
        return match loaded {
            Ok(config) => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   Address     : {}", config.server.address());
                println!("   Database    : {}", config.database.url);
                println!("   Uploads     : {}", config.uploads.dir.display());
                println!("   Log level   : {}", config.logging.level);
                Ok(())
            }
            Err(e) => {
                eprintln!("Invalid configuration {}: {}", config_path.display(), e);
                std::process::exit(1);
            }
        };
    }

    let (mut config, load_error) = match loaded {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
        seed: cli.seed,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
