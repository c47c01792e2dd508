//! Integration tests for the RustStack block gateway.
//!
//! Each test starts its own gateway in-process on an ephemeral port and talks
//! to it over real HTTP with `reqwest`:
//!
//! ```text
//! cargo test -p ruststack-block-integration
//! ```

use std::net::SocketAddr;
use std::sync::Once;

use anyhow::{Context, Result};
use ruststack_block_core::{BlockConfig, RustStackBlock};
use ruststack_block_http::service::{BlockHttpConfig, BlockHttpService};
use ruststack_block_server::{BlockStoreHandler, serve};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A gateway running in the current runtime. Shuts down when dropped.
#[derive(Debug)]
pub struct TestGateway {
    addr: SocketAddr,
    client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestGateway {
    /// Start a gateway with the given configuration on `127.0.0.1:0`.
    pub async fn start(config: BlockConfig) -> Result<Self> {
        init_tracing();

        let http_config = BlockHttpConfig {
            max_body_size: config.max_body_size,
        };
        let provider = RustStackBlock::new(config).context("connect block engine")?;
        let service = BlockHttpService::new(BlockStoreHandler(provider), http_config);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind ephemeral port")?;
        let addr = listener.local_addr()?;

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let shutdown = async {
                rx.await.ok();
            };
            if let Err(e) = serve(listener, service, shutdown).await {
                tracing::error!(error = %e, "test gateway failed");
            }
        });

        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .context("build http client")?;

        Ok(Self {
            addr,
            client,
            shutdown: Some(tx),
        })
    }

    /// Start a gateway with `capacity` bytes and otherwise default settings.
    pub async fn with_capacity(capacity: i64) -> Result<Self> {
        Self::start(BlockConfig::builder().capacity(capacity).build()).await
    }

    /// Absolute URL for `path` on this gateway.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// The shared HTTP client.
    #[must_use]
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Create a bucket and return its name.
    pub async fn create_bucket(&self, prefix: &str) -> Result<String> {
        let name = test_bucket_name(prefix);
        let resp = self
            .client
            .post(self.url(&format!("/bucket/{name}")))
            .send()
            .await?;
        anyhow::ensure!(
            resp.status().is_success(),
            "create bucket {name} failed with {}",
            resp.status()
        );
        Ok(name)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Extract the text of the first `<tag>` element in an XML document.
#[must_use]
pub fn xml_text<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = start + xml[start..].find(&close)?;
    Some(&xml[start..end])
}

mod test_bucket;
mod test_capacity;
mod test_error;
mod test_object;
