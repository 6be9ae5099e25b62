//! Upsign Server - Cloudinary upload-signature service.
//!
//! This binary hosts the signature API: a POST endpoint computing the
//! Cloudinary upload signature, and a catch-all descriptor document
//! describing the service. It runs with zero configuration; every setting
//! has a hardcoded default.
//!
//! # Usage
//!
//! ```text
//! LISTEN=0.0.0.0:8080 upsign-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use upsign_http::{UpsignHttpConfig, UpsignHttpService};

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address when `LISTEN` is unset.
const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

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

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: UpsignHttpService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

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

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by requesting the descriptor document from a
/// running server.
///
/// Exits with code 0 if the response is 200 OK and names the service,
/// 1 otherwise.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET / HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"Upsign\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

/// Rewrite a wildcard bind address into one a local client can connect to.
fn health_check_addr(listen: &str) -> String {
    listen.replace("0.0.0.0", "127.0.0.1")
}

/// Read the bind address from the environment.
fn listen_addr() -> String {
    std::env::var("LISTEN").unwrap_or_else(|_| DEFAULT_LISTEN.to_owned())
}

/// Read the log level from the environment.
fn log_level() -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned())
}

#[tokio::main]
async fn main() -> Result<()> {
    let listen = listen_addr();

    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let healthy = run_health_check(&health_check_addr(&listen)).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&log_level())?;

    let service = UpsignHttpService::new(UpsignHttpConfig::default());

    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("invalid bind address: {listen}"))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, version = VERSION, "starting Upsign server");

    serve(listener, service).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_default_listen_addr() {
        let addr: SocketAddr = DEFAULT_LISTEN.parse().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_should_rewrite_wildcard_for_health_check() {
        assert_eq!(health_check_addr("0.0.0.0:8080"), "127.0.0.1:8080");
        assert_eq!(health_check_addr("192.168.1.5:8080"), "192.168.1.5:8080");
    }

    /// Bind an ephemeral port and serve a single connection.
    async fn spawn_single_connection_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let service = UpsignHttpService::new(UpsignHttpConfig::default());

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let http = HttpConnBuilder::new(TokioExecutor::new());
            http.serve_connection(TokioIo::new(stream), service)
                .await
                .ok();
        });

        addr
    }

    #[tokio::test]
    async fn test_should_serve_signature_end_to_end() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let addr = spawn_single_connection_server().await;

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let body = r#"{"api_secret":"shh","folder":"images","public_id":"abc123","timestamp":"1700000000"}"#;
        let request = format!(
            "POST /api/gen/signature HTTP/1.1\r\nHost: {addr}\r\n\
             Content-Type: application/json\r\nContent-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len(),
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.contains("200 OK"), "response: {response}");
        assert!(
            response.contains("f1db0b090cc1b2c57704e63ab2f0f1e879782e62"),
            "response: {response}",
        );
    }

    #[tokio::test]
    async fn test_should_pass_health_check_against_running_server() {
        let addr = spawn_single_connection_server().await;
        run_health_check(&addr.to_string()).await.unwrap();
    }
}
