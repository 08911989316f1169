//! Tokenvault server binary.
//!
//! # Usage
//!
//! ```bash
//! # Local development against a default Redis
//! tokenvault-server --bind 0.0.0.0:8888
//!
//! # Explicit backend and TTL policy
//! tokenvault-server --redis-url redis://cache:6379 --default-ttl 600 --max-ttl 1800
//! ```
//!
//! The server secret is generated at startup and never leaves the process:
//! restarting the server invalidates every outstanding token by
//! construction.

use std::{sync::Arc, time::Duration};

use clap::Parser;
use tokenvault_core::{SystemEnv, TokenConfig, Vault};
use tokenvault_crypto::ServerSecret;
use tokenvault_server::{RedisStore, RuntimeConfig, router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Tokenvault secrets server
#[derive(Parser, Debug)]
#[command(name = "tokenvault-server")]
#[command(about = "Short-lived token and encrypted secret storage server")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:8888")]
    bind: String,

    /// Redis connection URL
    #[arg(long, default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    /// Token TTL granted when the caller does not request one (seconds)
    #[arg(long, default_value = "900")]
    default_ttl: u64,

    /// Maximum token TTL a caller may request (seconds)
    #[arg(long, default_value = "3600")]
    max_ttl: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = RuntimeConfig {
        bind_address: args.bind,
        redis_url: args.redis_url,
        token: TokenConfig {
            default_ttl: Duration::from_secs(args.default_ttl),
            max_ttl: Duration::from_secs(args.max_ttl),
        },
    };

    tracing::info!("Tokenvault server starting");
    tracing::info!("Connecting to Redis at {}", config.redis_url);

    let store = RedisStore::connect(&config.redis_url).await?;
    let secret = Arc::new(ServerSecret::generate());

    let vault = Vault::new(secret, store, SystemEnv::new(), config.token);
    let app = router(vault);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
