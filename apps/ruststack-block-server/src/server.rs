//! Accept loop and health probe.

use std::future::Future;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use ruststack_block_http::dispatch::BlockHandler;
use ruststack_block_http::service::BlockHttpService;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Serve connections from `listener` until `shutdown` resolves, then drain
/// in-flight connections.
pub async fn serve<H, S>(listener: TcpListener, service: BlockHttpService<H>, shutdown: S) -> Result<()>
where
    H: BlockHandler,
    S: Future<Output = ()>,
{
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal, draining connections");
}

/// Probe the health endpoint of a running gateway at `addr`.
///
/// Succeeds only on a 200 response whose JSON body reports `running`.
pub async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;
    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    let (head, body) = response
        .split_once("\r\n\r\n")
        .with_context(|| format!("malformed response from {addr}"))?;
    if !head.starts_with("HTTP/1.1 200") {
        anyhow::bail!("unhealthy response from {addr}");
    }
    let status: serde_json::Value =
        serde_json::from_str(body.trim()).context("health body is not JSON")?;
    if status["status"] == "running" {
        Ok(())
    } else {
        anyhow::bail!("gateway at {addr} is not running")
    }
}
