//! RustStack block gateway server.
//!
//! Connects an in-memory block storage engine and serves the path-style
//! object gateway over HTTP.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:8080 BLOCK_CAPACITY=1048576 ruststack-block-server
//! ruststack-block-server --health-check
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `BLOCK_CAPACITY` | `1048576` | Engine capacity in bytes |
//! | `BLOCK_BUCKET_METADATA_SIZE` | `1024` | Capacity per bucket record |
//! | `BLOCK_OBJECT_METADATA_SIZE` | `512` | Capacity per object record |
//! | `BLOCK_DEFAULT_READ_LENGTH` | `1024` | `GetObject` length when none is given |
//! | `BLOCK_BUFFER_SIZING` | `remaining` | `remaining` or `reserved` |
//! | `BLOCK_MAX_BODY_SIZE` | `16777216` | Largest accepted request body |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ruststack_block_core::{BlockConfig, RustStackBlock};
use ruststack_block_http::service::{BlockHttpConfig, BlockHttpService};
use ruststack_block_server::{BlockStoreHandler, ctrl_c, run_health_check, serve};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

fn build_http_config(config: &BlockConfig) -> BlockHttpConfig {
    BlockHttpConfig {
        max_body_size: config.max_body_size,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Docker HEALTHCHECK mode.
    if std::env::args().any(|a| a == "--health-check") {
        let config = BlockConfig::from_env();
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let config = BlockConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        capacity = config.capacity,
        buffer_sizing = %config.buffer_sizing,
        version = VERSION,
        "starting RustStack block gateway",
    );

    let provider = RustStackBlock::new(config.clone())
        .with_context(|| format!("failed to connect block engine with capacity {}", config.capacity))?;
    let service = BlockHttpService::new(BlockStoreHandler(provider), build_http_config(&config));

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service, ctrl_c()).await
}
